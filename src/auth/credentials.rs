//! Credential verification against the identity store

use crate::auth::password::PasswordHasher;
use crate::core::error::{Result, StonksError};
use crate::db::filter::UserFilter;
use crate::db::models::User;
use crate::db::repository::UserStore;
use std::sync::Arc;

/// Checks an email/password pair against stored identities.
///
/// An unknown email and a wrong password produce the same `Unauthorized`
/// error, and both paths run one bcrypt verification.
pub struct CredentialVerifier {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    dummy_hash: String,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Result<Self> {
        let dummy_hash = crate::auth::password::hash_password("not-a-real-password", hasher.cost())?;
        Ok(Self {
            store,
            hasher,
            dummy_hash,
        })
    }

    /// Return the identity owning these credentials
    pub async fn verify(&self, email: &str, password: &str) -> Result<User> {
        let user = self.store.find_one(UserFilter::by_email(email)).await?;

        let hash = user
            .as_ref()
            .map(|u| u.password_hash.as_str())
            .unwrap_or(self.dummy_hash.as_str());
        let matches = self.hasher.verify(password, hash).await?;

        match user {
            Some(user) if matches => Ok(user),
            _ => Err(StonksError::Unauthorized("Invalid credentials".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::manager::DatabaseManager;
    use crate::db::models::{DeleteOutcome, NewUser, UpdateOutcome, UserPatch};
    use crate::db::repository::UserRepository;
    use async_trait::async_trait;

    struct UnavailableStore;

    #[async_trait]
    impl UserStore for UnavailableStore {
        async fn find(&self, _filter: UserFilter) -> Result<Vec<User>> {
            Err(StonksError::StoreUnavailable("connection refused".to_string()))
        }

        async fn find_one(&self, _filter: UserFilter) -> Result<Option<User>> {
            Err(StonksError::StoreUnavailable("connection refused".to_string()))
        }

        async fn insert(&self, _user: NewUser) -> Result<User> {
            Err(StonksError::StoreUnavailable("connection refused".to_string()))
        }

        async fn update_by_id(&self, _id: &str, _patch: UserPatch) -> Result<UpdateOutcome> {
            Err(StonksError::StoreUnavailable("connection refused".to_string()))
        }

        async fn delete_by_id(&self, _id: &str) -> Result<DeleteOutcome> {
            Err(StonksError::StoreUnavailable("connection refused".to_string()))
        }
    }

    async fn setup() -> (CredentialVerifier, User) {
        let hasher = PasswordHasher::new(crate::auth::password::MIN_COST);
        let store = Arc::new(UserRepository::new(Arc::new(DatabaseManager::new_in_memory().unwrap())));
        let user = store
            .insert(NewUser {
                username: None,
                first_name: "A".to_string(),
                last_name: "B".to_string(),
                email: "a@x.com".to_string(),
                password_hash: hasher.hash("p").await.unwrap(),
                age: 30,
                admin: false,
            })
            .await
            .unwrap();

        (CredentialVerifier::new(store, hasher).unwrap(), user)
    }

    #[tokio::test]
    async fn test_matching_credentials_return_identity() {
        let (verifier, user) = setup().await;
        assert_eq!(verifier.verify("a@x.com", "p").await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_failures_are_indistinguishable() {
        let (verifier, _) = setup().await;

        let wrong_password = verifier.verify("a@x.com", "nope").await.unwrap_err();
        let unknown_email = verifier.verify("b@x.com", "p").await.unwrap_err();

        assert!(matches!(wrong_password, StonksError::Unauthorized(_)));
        assert!(matches!(unknown_email, StonksError::Unauthorized(_)));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.public_message(), unknown_email.public_message());
    }

    #[tokio::test]
    async fn test_dummy_password_does_not_match_unknown_email() {
        let (verifier, _) = setup().await;
        assert!(verifier.verify("b@x.com", "not-a-real-password").await.is_err());
    }

    #[tokio::test]
    async fn test_store_failure_is_not_disguised() {
        let verifier = CredentialVerifier::new(
            Arc::new(UnavailableStore),
            PasswordHasher::new(crate::auth::password::MIN_COST),
        )
        .unwrap();

        let err = verifier.verify("a@x.com", "p").await.unwrap_err();
        assert!(matches!(err, StonksError::StoreUnavailable(_)));
    }
}
