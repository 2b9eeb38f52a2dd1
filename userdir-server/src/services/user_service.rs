//! User directory service layer.
//!
//! Owns the `users` collection: CRUD operations, field validation, and the
//! email-uniqueness protocol. Handlers stay thin and map
//! [`UserServiceError`] variants onto HTTP status codes.

use std::sync::OnceLock;

use regex::Regex;
use shared::models::{CreateUserRequest, UpdateUserRequest, User};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::instrument;

// Length caps count Unicode characters, not bytes.
const MAX_NAME_LENGTH: usize = 50;
const MAX_EMAIL_LENGTH: usize = 100;
const MAX_PHONE_LENGTH: usize = 20;

/// Local part of letters, digits and `+_.-`, then any non-empty domain.
fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9+_.-]+@.+$").expect("valid email regex"))
}

/// A single field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Wire-level field name (`firstName`, `lastName`, `email`, `phone`).
    pub field: &'static str,
    /// Human-readable message for the field.
    pub message: &'static str,
}

#[derive(Debug, Error)]
pub enum UserServiceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),
    #[error("user not found with id: {0}")]
    NotFound(i64),
    #[error("a user with this email address already exists")]
    EmailConflict,
}

impl UserServiceError {
    /// The pre-insert existence check is racy against concurrent writers, so
    /// a unique-constraint violation reported by the store is still a
    /// conflict, not an internal error.
    fn from_db_error(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return UserServiceError::EmailConflict;
            }
        }
        UserServiceError::Database(err)
    }
}

pub type UserServiceResult<T> = Result<T, UserServiceError>;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
        }
    }
}

/// Service for managing user records.
#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish()
    }
}

impl UserService {
    /// Construct a new service bound to the provided connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists all users ordered by ascending id. An empty store yields an
    /// empty list.
    #[instrument(name = "users.list", skip(self), err)]
    pub async fn list_users(&self) -> UserServiceResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, first_name, last_name, email, phone FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Returns the user with the given id.
    ///
    /// # Errors
    /// [`UserServiceError::NotFound`] if no such record exists.
    #[instrument(name = "users.get", skip(self), err)]
    pub async fn get_user(&self, id: i64) -> UserServiceResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, first_name, last_name, email, phone FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::from).ok_or(UserServiceError::NotFound(id))
    }

    /// Creates a new user. Field validation runs first and reports every
    /// violation at once; the uniqueness check runs only on valid input.
    ///
    /// # Errors
    /// [`UserServiceError::Validation`] or [`UserServiceError::EmailConflict`].
    #[instrument(name = "users.create", skip(self, request), err)]
    pub async fn create_user(&self, request: CreateUserRequest) -> UserServiceResult<User> {
        validate_fields(
            &request.first_name,
            &request.last_name,
            &request.email,
            request.phone.as_deref(),
        )?;

        if self.email_exists(&request.email).await? {
            return Err(UserServiceError::EmailConflict);
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (first_name, last_name, email, phone)
             VALUES (?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(&request.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(UserServiceError::from_db_error)?;

        Ok(User {
            id,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
        })
    }

    /// Replaces the four mutable fields of an existing user. The id is
    /// preserved. Changing the email to a value held by a different record
    /// is a conflict; keeping the record's own email never is.
    ///
    /// # Errors
    /// [`UserServiceError::NotFound`] (checked first), then
    /// [`UserServiceError::Validation`], then [`UserServiceError::EmailConflict`].
    #[instrument(name = "users.update", skip(self, request), err)]
    pub async fn update_user(
        &self,
        id: i64,
        request: UpdateUserRequest,
    ) -> UserServiceResult<User> {
        let existing = self.get_user(id).await?;

        validate_fields(
            &request.first_name,
            &request.last_name,
            &request.email,
            request.phone.as_deref(),
        )?;

        if existing.email != request.email && self.email_exists(&request.email).await? {
            return Err(UserServiceError::EmailConflict);
        }

        sqlx::query(
            "UPDATE users SET first_name = ?, last_name = ?, email = ?, phone = ? WHERE id = ?",
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(UserServiceError::from_db_error)?;

        Ok(User {
            id,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
        })
    }

    /// Deletes the user with the given id. Once removed, the id never
    /// resolves again and its email becomes free for new records.
    ///
    /// # Errors
    /// [`UserServiceError::NotFound`] if no such record exists.
    #[instrument(name = "users.delete", skip(self), err)]
    pub async fn delete_user(&self, id: i64) -> UserServiceResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserServiceError::NotFound(id));
        }
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }
}

fn validate_fields(
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: Option<&str>,
) -> Result<(), UserServiceError> {
    let mut violations = Vec::new();

    if first_name.trim().is_empty() {
        violations.push(FieldViolation {
            field: "firstName",
            message: "First name is required",
        });
    } else if first_name.chars().count() > MAX_NAME_LENGTH {
        violations.push(FieldViolation {
            field: "firstName",
            message: "First name must not exceed 50 characters",
        });
    }

    if last_name.trim().is_empty() {
        violations.push(FieldViolation {
            field: "lastName",
            message: "Last name is required",
        });
    } else if last_name.chars().count() > MAX_NAME_LENGTH {
        violations.push(FieldViolation {
            field: "lastName",
            message: "Last name must not exceed 50 characters",
        });
    }

    if email.trim().is_empty() {
        violations.push(FieldViolation {
            field: "email",
            message: "Email is required",
        });
    } else if !email_pattern().is_match(email) {
        violations.push(FieldViolation {
            field: "email",
            message: "Email must be a valid email address",
        });
    } else if email.chars().count() > MAX_EMAIL_LENGTH {
        violations.push(FieldViolation {
            field: "email",
            message: "Email must not exceed 100 characters",
        });
    }

    if let Some(phone) = phone {
        if phone.chars().count() > MAX_PHONE_LENGTH {
            violations.push(FieldViolation {
                field: "phone",
                message: "Phone must not exceed 20 characters",
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(UserServiceError::Validation(violations))
    }
}
