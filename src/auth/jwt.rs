//! JWT token generation and validation
//!
//! Tokens are HS256-signed and carry `name`, `admin` and `exp`. Expiry is
//! checked here rather than by `jsonwebtoken` so that the validity window is
//! exactly `[issued_at, issued_at + validity)` with no leeway. `exp` is whole
//! seconds, so the issue instant is truncated to the second before the window
//! is computed.

use crate::core::error::{Result, StonksError};
use crate::db::models::User;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Display name of the identity the token was issued to
    pub name: String,
    pub admin: bool,
    /// Expiry as unix seconds
    pub exp: i64,
}

/// Issues and verifies signed tokens with one shared secret
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
    validation: Validation,
}

impl TokenIssuer {
    /// Create an issuer from the signing secret and validity window
    pub fn new(secret: &[u8], validity: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validity,
            validation,
        }
    }

    /// Issue a token for a verified identity
    pub fn issue(&self, user: &User) -> Result<String> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as if the current instant were `issued_at`
    ///
    /// Sub-second precision is dropped from `issued_at`.
    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String> {
        let expiration = issued_at
            .trunc_subsecs(0)
            .checked_add_signed(self.validity)
            .ok_or_else(|| StonksError::Internal("Failed to calculate expiration".to_string()))?;

        let claims = Claims {
            name: user.first_name.clone(),
            admin: user.admin,
            exp: expiration.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| StonksError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token against the current instant
    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token's signature and shape, then its expiry against `now`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| StonksError::Unauthorized(format!("Invalid token: {}", e)))?;

        if now.timestamp() >= token_data.claims.exp {
            return Err(StonksError::Unauthorized("Token expired".to_string()));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, Duration::hours(1))
    }

    fn user() -> User {
        User {
            id: "u1".to_string(),
            username: None,
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "hash".to_string(),
            age: 30,
            admin: false,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_claims_derived_from_identity() {
        let issuer = issuer();
        let token = issuer.issue_at(&user(), issued_at()).unwrap();
        let claims = issuer.verify_at(&token, issued_at()).unwrap();

        assert_eq!(claims.name, "A");
        assert!(!claims.admin);
        assert_eq!(claims.exp, issued_at().timestamp() + 3600);
    }

    #[test]
    fn test_admin_flag_comes_from_stored_state() {
        let issuer = issuer();
        let mut admin = user();
        admin.admin = true;

        let token = issuer.issue_at(&admin, issued_at()).unwrap();
        assert!(issuer.verify_at(&token, issued_at()).unwrap().admin);
    }

    #[test]
    fn test_validity_window_is_half_open() {
        let issuer = issuer();
        let token = issuer.issue_at(&user(), issued_at()).unwrap();

        let last_valid = issued_at() + Duration::seconds(3599);
        let expiry = issued_at() + Duration::hours(1);

        assert!(issuer.verify_at(&token, issued_at()).is_ok());
        assert!(issuer.verify_at(&token, last_valid).is_ok());
        assert!(matches!(
            issuer.verify_at(&token, expiry),
            Err(StonksError::Unauthorized(_))
        ));
        assert!(issuer.verify_at(&token, expiry + Duration::days(1)).is_err());
    }

    #[test]
    fn test_fractional_issue_instant_is_truncated() {
        let issuer = issuer();
        let fractional = issued_at() + Duration::milliseconds(700);
        let token = issuer.issue_at(&user(), fractional).unwrap();

        let claims = issuer.verify_at(&token, fractional).unwrap();
        assert_eq!(claims.exp, issued_at().timestamp() + 3600);

        let last_valid = issued_at() + Duration::hours(1) - Duration::milliseconds(1);
        assert!(issuer.verify_at(&token, last_valid).is_ok());
        assert!(issuer
            .verify_at(&token, issued_at() + Duration::hours(1))
            .is_err());
    }

    #[test]
    fn test_token_from_real_clock_is_valid_now() {
        let issuer = issuer();
        let token = issuer.issue(&user()).unwrap();
        assert_eq!(issuer.verify(&token).unwrap().name, "A");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issuer().issue_at(&user(), issued_at()).unwrap();
        let other = TokenIssuer::new(b"ffffffffffffffffffffffffffffffff", Duration::hours(1));
        assert!(other.verify_at(&token, issued_at()).is_err());
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let claims = Claims {
            name: "A".to_string(),
            admin: true,
            exp: issued_at().timestamp() + 60,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(issuer().verify_at(&token, issued_at()).is_err());
    }

    #[test]
    fn test_missing_claim_fails_closed() {
        #[derive(Serialize)]
        struct Partial {
            admin: bool,
            exp: i64,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &Partial { admin: false, exp: issued_at().timestamp() + 60 },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(issuer().verify_at(&token, issued_at()).is_err());
    }

    #[test]
    fn test_wrongly_typed_claim_fails_closed() {
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "name": "A", "admin": "yes", "exp": issued_at().timestamp() + 60 }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(issuer().verify_at(&token, issued_at()).is_err());
    }

    const BASE64URL: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    proptest! {
        #[test]
        fn tampered_token_is_rejected(position in any::<prop::sample::Index>(), pick in 0usize..BASE64URL.len()) {
            let issuer = issuer();
            let token = issuer.issue_at(&user(), issued_at()).unwrap();
            let mut bytes = token.into_bytes();

            let i = position.index(bytes.len());
            let mut replacement = BASE64URL[pick];
            if replacement == bytes[i] {
                replacement = BASE64URL[(pick + 1) % BASE64URL.len()];
            }
            bytes[i] = replacement;

            let tampered = String::from_utf8(bytes).unwrap();
            prop_assert!(issuer.verify_at(&tampered, issued_at()).is_err());
        }
    }
}
