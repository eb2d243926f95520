//! User account. The password hash never leaves the process.

use super::{default_true, RowMeta};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;
use std::str::FromStr;

pub const USER_COLUMNS: &str =
    "id, created_at, updated_at, username, email, password_hash, role, is_active";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    #[serde(flatten)]
    pub meta: RowMeta,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
}

impl User {
    pub fn from_row(row: &PgRow) -> Result<Self, AppError> {
        let raw: String = row.try_get("role")?;
        let role = UserRole::from_str(&raw)
            .map_err(|_| AppError::Internal(format!("unexpected role '{raw}' in store")))?;
        Ok(User {
            meta: RowMeta::from_row(row)?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role,
            is_active: row.try_get("is_active")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// The restricted patch a non-admin may apply to their own account.
#[derive(Debug, Default, Deserialize)]
pub struct UserSelfUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Coarse list filters for `GET /users/`.
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "super::query::default_limit")]
    pub limit: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}
