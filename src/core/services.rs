//! Business logic services
//!
//! The record service sits between the REST handlers and the identity store.
//! It owns input validation, password hashing and the mapping of store
//! outcomes onto `NotFound`/`Conflict`.

use crate::api::models::{CreateUserRequest, UpdateUserRequest};
use crate::auth::password::PasswordHasher;
use crate::core::error::{Result, StonksError};
use crate::db::filter::UserFilter;
use crate::db::models::{DeleteOutcome, NewUser, UpdateOutcome, User, UserPatch};
use crate::db::repository::UserStore;
use std::sync::Arc;

/// User record service
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    empty_list_not_found: bool,
}

impl UserService {
    /// Create a new UserService
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self {
            store,
            hasher,
            empty_list_not_found: false,
        }
    }

    /// Report an empty listing as `NotFound` instead of an empty array
    pub fn with_empty_list_not_found(mut self, enabled: bool) -> Self {
        self.empty_list_not_found = enabled;
        self
    }

    /// Register a new user
    pub async fn create(&self, req: CreateUserRequest) -> Result<User> {
        require_non_empty("firstname", &req.firstname)?;
        require_non_empty("lastname", &req.lastname)?;
        require_email(&req.email)?;
        require_non_empty("password", &req.password)?;
        let age = parse_age(req.age)?;

        let username = match req.username {
            Some(name) if name.trim().is_empty() => None,
            other => other,
        };

        if self
            .store
            .find_one(UserFilter::by_email(&req.email))
            .await?
            .is_some()
        {
            return Err(StonksError::Conflict(format!(
                "A user with email {} already exists",
                req.email
            )));
        }

        let password_hash = self.hasher.hash(&req.password).await?;

        let user = self
            .store
            .insert(NewUser {
                username,
                first_name: req.firstname,
                last_name: req.lastname,
                email: req.email,
                password_hash,
                age,
                admin: false,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Get a single user by identifier
    pub async fn get(&self, id: &str) -> Result<User> {
        self.store
            .find_one(UserFilter::by_id(id))
            .await?
            .ok_or_else(|| StonksError::NotFound(format!("User {} not found", id)))
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = self.store.find(UserFilter::all()).await?;

        if users.is_empty() && self.empty_list_not_found {
            return Err(StonksError::NotFound("No users found".to_string()));
        }

        Ok(users)
    }

    /// Partially update a user
    pub async fn update(&self, id: &str, req: UpdateUserRequest) -> Result<UpdateOutcome> {
        let mut patch = UserPatch::default();

        if let Some(username) = req.username {
            patch.username = Some(if username.trim().is_empty() {
                None
            } else {
                Some(username)
            });
        }
        if let Some(firstname) = req.firstname {
            require_non_empty("firstname", &firstname)?;
            patch.first_name = Some(firstname);
        }
        if let Some(lastname) = req.lastname {
            require_non_empty("lastname", &lastname)?;
            patch.last_name = Some(lastname);
        }
        if let Some(email) = req.email {
            require_email(&email)?;
            if let Some(owner) = self.store.find_one(UserFilter::by_email(&email)).await? {
                if owner.id != id {
                    return Err(StonksError::Conflict(format!(
                        "A user with email {} already exists",
                        email
                    )));
                }
            }
            patch.email = Some(email);
        }
        if let Some(age) = req.age {
            patch.age = Some(parse_age(age)?);
        }
        if let Some(password) = req.password {
            require_non_empty("password", &password)?;
            patch.password_hash = Some(self.hasher.hash(&password).await?);
        }

        let outcome = self.store.update_by_id(id, patch).await?;
        if outcome.matched_count == 0 {
            return Err(StonksError::NotFound(format!("User {} not found", id)));
        }

        tracing::info!(
            user_id = %id,
            modified = outcome.modified_count,
            "User updated"
        );
        Ok(outcome)
    }

    /// Delete a user
    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        let outcome = self.store.delete_by_id(id).await?;
        if outcome.deleted_count == 0 {
            return Err(StonksError::NotFound(format!("User {} not found", id)));
        }

        tracing::info!(user_id = %id, "User deleted");
        Ok(outcome)
    }

    /// Seed the bootstrap administrator if no user holds its email yet
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<User> {
        require_email(email)?;
        require_non_empty("password", password)?;

        if let Some(existing) = self.store.find_one(UserFilter::by_email(email)).await? {
            if !existing.admin {
                tracing::warn!(
                    user_id = %existing.id,
                    "Bootstrap admin email belongs to a non-admin user"
                );
            }
            return Ok(existing);
        }

        let password_hash = self.hasher.hash(password).await?;
        let admin = self
            .store
            .insert(NewUser {
                username: None,
                first_name: "Admin".to_string(),
                last_name: "Admin".to_string(),
                email: email.to_string(),
                password_hash,
                age: 0,
                admin: true,
            })
            .await?;

        tracing::info!(user_id = %admin.id, "Bootstrap admin created");
        Ok(admin)
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StonksError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_email(email: &str) -> Result<()> {
    require_non_empty("email", email)?;
    if !email.contains('@') {
        return Err(StonksError::BadRequest(format!("Invalid email: {}", email)));
    }
    Ok(())
}

fn parse_age(age: i64) -> Result<u32> {
    u32::try_from(age).map_err(|_| StonksError::BadRequest(format!("Invalid age: {}", age)))
}
