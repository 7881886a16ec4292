//! Identity store: persistence of user records
//!
//! [`UserStore`] is the contract the rest of the service programs against;
//! [`UserRepository`] implements it on SQLite.

use crate::core::error::{Result, StonksError};
use crate::db::filter::UserFilter;
use crate::db::manager::DatabaseManager;
use crate::db::models::{DeleteOutcome, NewUser, UpdateOutcome, User, UserPatch};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{ErrorCode, OptionalExtension, Row};
use std::sync::Arc;
use uuid::Uuid;

/// Persistence contract for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All records matching the filter
    async fn find(&self, filter: UserFilter) -> Result<Vec<User>>;

    /// The first record matching the filter, or `None`
    async fn find_one(&self, filter: UserFilter) -> Result<Option<User>>;

    /// Store a new record. Fails with `Conflict` if the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User>;

    /// Partially update the record with the given identifier
    async fn update_by_id(&self, id: &str, patch: UserPatch) -> Result<UpdateOutcome>;

    /// Remove the record with the given identifier
    async fn delete_by_id(&self, id: &str) -> Result<DeleteOutcome>;
}

const USER_COLUMNS: &str =
    "id, username, first_name, last_name, email, password_hash, age, admin, created_at";

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        password_hash: row.get(5)?,
        age: row.get(6)?,
        admin: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Map a write failure, turning a unique-index violation into `Conflict`
fn map_write_error(err: rusqlite::Error, email: &str) -> StonksError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            StonksError::Conflict(format!("A user with email {} already exists", email))
        }
        _ => StonksError::from(err),
    }
}

/// SQLite-backed user store
pub struct UserRepository {
    db: Arc<DatabaseManager>,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find(&self, filter: UserFilter) -> Result<Vec<User>> {
        self.db
            .execute(move |conn| {
                let (clause, params) = filter.where_clause();
                let sql = format!(
                    "SELECT {} FROM users{} ORDER BY created_at, rowid",
                    USER_COLUMNS, clause
                );
                let mut stmt = conn.prepare(&sql)?;
                let users = stmt
                    .query_map(params.as_slice(), row_to_user)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(users)
            })
            .await
    }

    async fn find_one(&self, filter: UserFilter) -> Result<Option<User>> {
        self.db
            .execute(move |conn| {
                let (clause, params) = filter.where_clause();
                let sql = format!(
                    "SELECT {} FROM users{} ORDER BY created_at, rowid LIMIT 1",
                    USER_COLUMNS, clause
                );
                Ok(conn
                    .query_row(&sql, params.as_slice(), row_to_user)
                    .optional()?)
            })
            .await
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let stored = User {
            id: Uuid::new_v4().to_string(),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            age: user.age,
            admin: user.admin,
            created_at: Utc::now().to_rfc3339(),
        };

        self.db
            .execute(move |conn| {
                conn.execute(
                    &format!("INSERT INTO users ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)", USER_COLUMNS),
                    rusqlite::params![
                        &stored.id,
                        &stored.username,
                        &stored.first_name,
                        &stored.last_name,
                        &stored.email,
                        &stored.password_hash,
                        stored.age,
                        stored.admin,
                        &stored.created_at,
                    ],
                )
                .map_err(|e| map_write_error(e, &stored.email))?;
                Ok(stored)
            })
            .await
    }

    async fn update_by_id(&self, id: &str, patch: UserPatch) -> Result<UpdateOutcome> {
        let id = id.to_string();
        self.db
            .transaction(move |tx| {
                let existing = tx
                    .query_row(
                        &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                        [&id],
                        row_to_user,
                    )
                    .optional()?;

                let Some(mut user) = existing else {
                    return Ok(UpdateOutcome {
                        matched_count: 0,
                        modified_count: 0,
                    });
                };

                if !patch.apply(&mut user) {
                    return Ok(UpdateOutcome {
                        matched_count: 1,
                        modified_count: 0,
                    });
                }

                tx.execute(
                    "UPDATE users SET username = ?, first_name = ?, last_name = ?, email = ?, \
                     password_hash = ?, age = ? WHERE id = ?",
                    rusqlite::params![
                        &user.username,
                        &user.first_name,
                        &user.last_name,
                        &user.email,
                        &user.password_hash,
                        user.age,
                        &user.id,
                    ],
                )
                .map_err(|e| map_write_error(e, &user.email))?;

                Ok(UpdateOutcome {
                    matched_count: 1,
                    modified_count: 1,
                })
            })
            .await
    }

    async fn delete_by_id(&self, id: &str) -> Result<DeleteOutcome> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                let deleted = conn.execute("DELETE FROM users WHERE id = ?", [&id])?;
                Ok(DeleteOutcome {
                    deleted_count: deleted as u64,
                })
            })
            .await
    }
}
