pub mod system;
pub mod users;

pub use system::*;
pub use users::*;

use crate::auth::credentials::CredentialVerifier;
use crate::auth::jwt::TokenIssuer;
use crate::auth::password::PasswordHasher;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::services::UserService;
use crate::db::manager::DatabaseManager;
use crate::db::repository::{UserRepository, UserStore};
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseManager>,
    pub user_service: Arc<UserService>,
    pub credentials: Arc<CredentialVerifier>,
    pub token_issuer: Arc<TokenIssuer>,
}

impl AppState {
    /// Wire the identity store, credential verifier and token issuer together
    pub fn new(db: Arc<DatabaseManager>, config: &Config) -> Result<Self> {
        let security = &config.security;
        let store: Arc<dyn UserStore> = Arc::new(UserRepository::new(db.clone()));
        let hasher = PasswordHasher::new(security.bcrypt_cost);

        let user_service = UserService::new(store.clone(), hasher)
            .with_empty_list_not_found(config.server.empty_list_not_found);
        let credentials = CredentialVerifier::new(store, hasher)?;
        let token_issuer =
            TokenIssuer::new(security.jwt_secret.as_bytes(), security.token_validity());

        Ok(Self {
            db,
            user_service: Arc::new(user_service),
            credentials: Arc::new(credentials),
            token_issuer: Arc::new(token_issuer),
        })
    }
}
