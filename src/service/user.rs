//! User business logic and credential verification.

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::model::user::{UserCreate, UserRole, UserSelfUpdate, UserUpdate, USER_COLUMNS};
use crate::model::User;
use crate::service::validation;
use crate::sql::{bind_query, BindValue, ConditionSet, QueryBuf};
use sqlx::PgPool;

pub async fn create_user(pool: &PgPool, data: UserCreate) -> Result<User, AppError> {
    if validation::username_exists(pool, &data.username, None).await? {
        return Err(AppError::Conflict(format!(
            "username '{}' already exists",
            data.username
        )));
    }
    if let Some(ref email) = data.email {
        if validation::email_exists(pool, email, None).await? {
            return Err(AppError::Conflict(format!("email '{email}' already exists")));
        }
    }
    let password_hash = hash_password(&data.password)?;
    let row = sqlx::query(&format!(
        "INSERT INTO users (username, email, password_hash, role, is_active) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
    ))
    .bind(&data.username)
    .bind(&data.email)
    .bind(&password_hash)
    .bind(data.role.as_str())
    .bind(data.is_active)
    .fetch_one(pool)
    .await?;
    User::from_row(&row)
}

#[allow(clippy::too_many_arguments)]
pub async fn list_users(
    pool: &PgPool,
    skip: i64,
    limit: i64,
    username: Option<&str>,
    email: Option<&str>,
    role: Option<UserRole>,
    is_active: Option<bool>,
) -> Result<Vec<User>, AppError> {
    let mut cs = ConditionSet::new();
    if let Some(username) = username {
        cs.contains("username", username);
    }
    if let Some(email) = email {
        cs.contains("email", email);
    }
    if let Some(role) = role {
        cs.eq("role", BindValue::Text(role.as_str().to_string()));
    }
    if let Some(active) = is_active {
        cs.eq("is_active", BindValue::Bool(active));
    }
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users{} ORDER BY id LIMIT {limit} OFFSET {skip}",
        cs.where_clause()
    );
    let rows = bind_query(sqlx::query(&sql), cs.params())
        .fetch_all(pool)
        .await?;
    rows.iter().map(User::from_row).collect()
}

pub async fn get_user(pool: &PgPool, id: i64) -> Result<User, AppError> {
    validation::get_user(pool, id).await
}

pub async fn update_user(pool: &PgPool, id: i64, patch: UserUpdate) -> Result<User, AppError> {
    let current = validation::get_user(pool, id).await?;
    if let Some(ref username) = patch.username {
        if *username != current.username
            && validation::username_exists(pool, username, Some(id)).await?
        {
            return Err(AppError::Conflict(format!(
                "username '{username}' already exists"
            )));
        }
    }
    if let Some(ref email) = patch.email {
        if current.email.as_deref() != Some(email.as_str())
            && validation::email_exists(pool, email, Some(id)).await?
        {
            return Err(AppError::Conflict(format!("email '{email}' already exists")));
        }
    }

    let mut q = QueryBuf::new();
    let mut sets: Vec<String> = Vec::new();
    if let Some(username) = patch.username {
        let n = q.push_param(BindValue::Text(username));
        sets.push(format!("username = ${n}"));
    }
    if let Some(email) = patch.email {
        let n = q.push_param(BindValue::Text(email));
        sets.push(format!("email = ${n}"));
    }
    if let Some(password) = patch.password {
        let n = q.push_param(BindValue::Text(hash_password(&password)?));
        sets.push(format!("password_hash = ${n}"));
    }
    if let Some(role) = patch.role {
        let n = q.push_param(BindValue::Text(role.as_str().to_string()));
        sets.push(format!("role = ${n}"));
    }
    if let Some(is_active) = patch.is_active {
        let n = q.push_param(BindValue::Bool(is_active));
        sets.push(format!("is_active = ${n}"));
    }
    if sets.is_empty() {
        return Ok(current);
    }
    sets.push("updated_at = NOW()".to_string());
    let id_param = q.push_param(BindValue::I64(id));
    q.sql = format!(
        "UPDATE users SET {} WHERE id = ${id_param} RETURNING {USER_COLUMNS}",
        sets.join(", ")
    );
    let row = bind_query(sqlx::query(&q.sql), &q.params)
        .fetch_one(pool)
        .await?;
    User::from_row(&row)
}

/// Self-service update: email and password only.
pub async fn update_self(pool: &PgPool, id: i64, patch: UserSelfUpdate) -> Result<User, AppError> {
    update_user(
        pool,
        id,
        UserUpdate {
            email: patch.email,
            password: patch.password,
            ..UserUpdate::default()
        },
    )
    .await
}

pub async fn delete_user(pool: &PgPool, id: i64) -> Result<(), AppError> {
    validation::get_user(pool, id).await?;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_user_active(pool: &PgPool, id: i64, is_active: bool) -> Result<User, AppError> {
    validation::get_user(pool, id).await?;
    let row = sqlx::query(&format!(
        "UPDATE users SET is_active = $1, updated_at = NOW() WHERE id = $2 RETURNING {USER_COLUMNS}"
    ))
    .bind(is_active)
    .bind(id)
    .fetch_one(pool)
    .await?;
    User::from_row(&row)
}

/// Verify username + password. A missing user and a wrong password produce
/// the same message; a disabled account is reported distinctly.
pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> Result<User, AppError> {
    let user = match validation::get_user_by_username(pool, username).await {
        Ok(user) => user,
        Err(AppError::NotFound(_)) => {
            return Err(AppError::Unauthorized("incorrect username or password".into()))
        }
        Err(e) => return Err(e),
    };
    if !verify_password(password, &user.password_hash) {
        return Err(AppError::Unauthorized("incorrect username or password".into()));
    }
    if !user.is_active {
        return Err(AppError::Unauthorized("account disabled".into()));
    }
    Ok(user)
}
