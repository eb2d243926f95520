//! Centralized existence and uniqueness checks.
//!
//! Every entity service routes these checks through here so error messages
//! and status codes stay consistent. The `*_exists` family takes an
//! `exclude_id` so an update that keeps its own unique value is not reported
//! as a conflict with itself.

use crate::error::AppError;
use crate::model::brand::BRAND_COLUMNS;
use crate::model::camera::CAMERA_COLUMNS;
use crate::model::lens::LENS_COLUMNS;
use crate::model::mount::{BRAND_MOUNT_COLUMNS, MOUNT_COLUMNS};
use crate::model::user::USER_COLUMNS;
use crate::model::{Brand, BrandMount, Camera, Lens, Mount, User};
use sqlx::postgres::PgRow;
use sqlx::PgPool;

async fn fetch_one_by<F, T>(
    pool: &PgPool,
    sql: &str,
    bind: &str,
    map: F,
    missing: &str,
) -> Result<T, AppError>
where
    F: Fn(&PgRow) -> Result<T, AppError>,
{
    let row = sqlx::query(sql).bind(bind).fetch_optional(pool).await?;
    match row {
        Some(r) => map(&r),
        None => Err(AppError::NotFound(missing.to_string())),
    }
}

async fn fetch_one_by_id<F, T>(
    pool: &PgPool,
    sql: &str,
    id: i64,
    map: F,
    missing: &str,
) -> Result<T, AppError>
where
    F: Fn(&PgRow) -> Result<T, AppError>,
{
    let row = sqlx::query(sql).bind(id).fetch_optional(pool).await?;
    match row {
        Some(r) => map(&r),
        None => Err(AppError::NotFound(missing.to_string())),
    }
}

async fn count_key(
    pool: &PgPool,
    table: &str,
    column: &str,
    value: &str,
    exclude_id: Option<i64>,
) -> Result<bool, AppError> {
    let count: i64 = match exclude_id {
        Some(id) => {
            sqlx::query_scalar(&format!(
                "SELECT COUNT(*) FROM {table} WHERE {column} = $1 AND id <> $2"
            ))
            .bind(value)
            .bind(id)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE {column} = $1"))
                .bind(value)
                .fetch_one(pool)
                .await?
        }
    };
    Ok(count > 0)
}

// ---- brands ----

pub async fn get_brand(pool: &PgPool, id: i64) -> Result<Brand, AppError> {
    fetch_one_by_id(
        pool,
        &format!("SELECT {BRAND_COLUMNS} FROM brands WHERE id = $1"),
        id,
        Brand::from_row,
        "brand not found",
    )
    .await
}

pub async fn get_brand_by_name(pool: &PgPool, name: &str) -> Result<Brand, AppError> {
    fetch_one_by(
        pool,
        &format!("SELECT {BRAND_COLUMNS} FROM brands WHERE name = $1"),
        name,
        Brand::from_row,
        "brand not found",
    )
    .await
}

pub async fn brand_name_exists(
    pool: &PgPool,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<bool, AppError> {
    count_key(pool, "brands", "name", name, exclude_id).await
}

/// Foreign-key pre-check: a missing target is an invalid reference from the
/// caller's point of view, not a 404.
pub async fn ensure_brand_ref(pool: &PgPool, id: i64) -> Result<(), AppError> {
    match get_brand(pool, id).await {
        Ok(_) => Ok(()),
        Err(AppError::NotFound(_)) => Err(AppError::InvalidReference(format!(
            "brand {id} does not exist"
        ))),
        Err(e) => Err(e),
    }
}

/// Resolve a brand name to its id, for import rows keyed by name.
pub async fn find_brand_id_by_name(pool: &PgPool, name: &str) -> Result<Option<i64>, AppError> {
    let id: Option<i64> = sqlx::query_scalar("SELECT id FROM brands WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

// ---- mounts ----

pub async fn get_mount(pool: &PgPool, id: i64) -> Result<Mount, AppError> {
    fetch_one_by_id(
        pool,
        &format!("SELECT {MOUNT_COLUMNS} FROM mounts WHERE id = $1"),
        id,
        Mount::from_row,
        "mount not found",
    )
    .await
}

pub async fn get_mount_by_name(pool: &PgPool, name: &str) -> Result<Mount, AppError> {
    fetch_one_by(
        pool,
        &format!("SELECT {MOUNT_COLUMNS} FROM mounts WHERE name = $1"),
        name,
        Mount::from_row,
        "mount not found",
    )
    .await
}

pub async fn mount_name_exists(
    pool: &PgPool,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<bool, AppError> {
    count_key(pool, "mounts", "name", name, exclude_id).await
}

pub async fn ensure_mount_ref(pool: &PgPool, id: i64) -> Result<(), AppError> {
    match get_mount(pool, id).await {
        Ok(_) => Ok(()),
        Err(AppError::NotFound(_)) => Err(AppError::InvalidReference(format!(
            "mount {id} does not exist"
        ))),
        Err(e) => Err(e),
    }
}

pub async fn find_mount_id_by_name(pool: &PgPool, name: &str) -> Result<Option<i64>, AppError> {
    let id: Option<i64> = sqlx::query_scalar("SELECT id FROM mounts WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

// ---- brand-mount association ----

pub async fn get_brand_mount(
    pool: &PgPool,
    brand_id: i64,
    mount_id: i64,
) -> Result<BrandMount, AppError> {
    let row = sqlx::query(&format!(
        "SELECT {BRAND_MOUNT_COLUMNS} FROM brand_mounts WHERE brand_id = $1 AND mount_id = $2"
    ))
    .bind(brand_id)
    .bind(mount_id)
    .fetch_optional(pool)
    .await?;
    match row {
        Some(r) => BrandMount::from_row(&r),
        None => Err(AppError::NotFound("brand-mount association not found".into())),
    }
}

pub async fn brand_mount_exists(
    pool: &PgPool,
    brand_id: i64,
    mount_id: i64,
) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM brand_mounts WHERE brand_id = $1 AND mount_id = $2",
    )
    .bind(brand_id)
    .bind(mount_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

// ---- cameras ----

pub async fn get_camera(pool: &PgPool, id: i64) -> Result<Camera, AppError> {
    fetch_one_by_id(
        pool,
        &format!("SELECT {CAMERA_COLUMNS} FROM cameras WHERE id = $1"),
        id,
        Camera::from_row,
        "camera not found",
    )
    .await
}

pub async fn get_camera_by_model(pool: &PgPool, model: &str) -> Result<Camera, AppError> {
    fetch_one_by(
        pool,
        &format!("SELECT {CAMERA_COLUMNS} FROM cameras WHERE model = $1"),
        model,
        Camera::from_row,
        "camera not found",
    )
    .await
}

pub async fn camera_model_exists(
    pool: &PgPool,
    model: &str,
    exclude_id: Option<i64>,
) -> Result<bool, AppError> {
    count_key(pool, "cameras", "model", model, exclude_id).await
}

// ---- lenses ----

pub async fn get_lens(pool: &PgPool, id: i64) -> Result<Lens, AppError> {
    fetch_one_by_id(
        pool,
        &format!("SELECT {LENS_COLUMNS} FROM lenses WHERE id = $1"),
        id,
        Lens::from_row,
        "lens not found",
    )
    .await
}

pub async fn get_lens_by_model(pool: &PgPool, model: &str) -> Result<Lens, AppError> {
    fetch_one_by(
        pool,
        &format!("SELECT {LENS_COLUMNS} FROM lenses WHERE model = $1"),
        model,
        Lens::from_row,
        "lens not found",
    )
    .await
}

pub async fn lens_model_exists(
    pool: &PgPool,
    model: &str,
    exclude_id: Option<i64>,
) -> Result<bool, AppError> {
    count_key(pool, "lenses", "model", model, exclude_id).await
}

// ---- users ----

pub async fn get_user(pool: &PgPool, id: i64) -> Result<User, AppError> {
    fetch_one_by_id(
        pool,
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"),
        id,
        User::from_row,
        "user not found",
    )
    .await
}

pub async fn get_user_by_username(pool: &PgPool, username: &str) -> Result<User, AppError> {
    fetch_one_by(
        pool,
        &format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"),
        username,
        User::from_row,
        "user not found",
    )
    .await
}

pub async fn username_exists(
    pool: &PgPool,
    username: &str,
    exclude_id: Option<i64>,
) -> Result<bool, AppError> {
    count_key(pool, "users", "username", username, exclude_id).await
}

pub async fn email_exists(
    pool: &PgPool,
    email: &str,
    exclude_id: Option<i64>,
) -> Result<bool, AppError> {
    count_key(pool, "users", "email", email, exclude_id).await
}
