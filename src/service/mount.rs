//! Mount business logic, including the brand association sub-resource.

use crate::error::AppError;
use crate::model::brand::BRAND_COLUMNS;
use crate::model::camera::CAMERA_COLUMNS;
use crate::model::lens::LENS_COLUMNS;
use crate::model::mount::{MountCreate, MountUpdate, BRAND_MOUNT_COLUMNS, MOUNT_COLUMNS};
use crate::model::{Brand, BrandMount, Camera, Lens, Mount};
use crate::service::validation;
use crate::sql::{bind_query, BindValue, ConditionSet, QueryBuf};
use sqlx::PgPool;

pub async fn create_mount(pool: &PgPool, data: MountCreate) -> Result<Mount, AppError> {
    if validation::mount_name_exists(pool, &data.name, None).await? {
        return Err(AppError::Conflict(format!(
            "mount name '{}' already exists",
            data.name
        )));
    }
    let row = sqlx::query(&format!(
        "INSERT INTO mounts (name, flange_distance, release_year, description, is_active) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {MOUNT_COLUMNS}"
    ))
    .bind(&data.name)
    .bind(data.flange_distance)
    .bind(data.release_year)
    .bind(&data.description)
    .bind(data.is_active)
    .fetch_one(pool)
    .await?;
    Mount::from_row(&row)
}

pub async fn list_mounts(
    pool: &PgPool,
    skip: i64,
    limit: i64,
    is_active: Option<bool>,
) -> Result<Vec<Mount>, AppError> {
    let mut cs = ConditionSet::new();
    if let Some(active) = is_active {
        cs.eq("is_active", BindValue::Bool(active));
    }
    let sql = format!(
        "SELECT {MOUNT_COLUMNS} FROM mounts{} ORDER BY id LIMIT {limit} OFFSET {skip}",
        cs.where_clause()
    );
    let rows = bind_query(sqlx::query(&sql), cs.params())
        .fetch_all(pool)
        .await?;
    rows.iter().map(Mount::from_row).collect()
}

pub async fn get_mount(pool: &PgPool, id: i64) -> Result<Mount, AppError> {
    validation::get_mount(pool, id).await
}

pub async fn get_mount_by_name(pool: &PgPool, name: &str) -> Result<Mount, AppError> {
    validation::get_mount_by_name(pool, name).await
}

pub async fn update_mount(pool: &PgPool, id: i64, patch: MountUpdate) -> Result<Mount, AppError> {
    let current = validation::get_mount(pool, id).await?;
    if let Some(ref name) = patch.name {
        if *name != current.name && validation::mount_name_exists(pool, name, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "mount name '{name}' already exists"
            )));
        }
    }

    let mut q = QueryBuf::new();
    let mut sets: Vec<String> = Vec::new();
    if let Some(name) = patch.name {
        let n = q.push_param(BindValue::Text(name));
        sets.push(format!("name = ${n}"));
    }
    if let Some(flange_distance) = patch.flange_distance {
        let n = q.push_param(BindValue::F64(flange_distance));
        sets.push(format!("flange_distance = ${n}"));
    }
    if let Some(release_year) = patch.release_year {
        let n = q.push_param(BindValue::I32(release_year));
        sets.push(format!("release_year = ${n}"));
    }
    if let Some(description) = patch.description {
        let n = q.push_param(BindValue::Text(description));
        sets.push(format!("description = ${n}"));
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
        "UPDATE mounts SET {} WHERE id = ${id_param} RETURNING {MOUNT_COLUMNS}",
        sets.join(", ")
    );
    let row = bind_query(sqlx::query(&q.sql), &q.params)
        .fetch_one(pool)
        .await?;
    Mount::from_row(&row)
}

/// Refuses deletion while any camera or lens uses the mount; brand
/// associations are cascaded once the guard passes.
pub async fn delete_mount(pool: &PgPool, id: i64) -> Result<(), AppError> {
    validation::get_mount(pool, id).await?;
    let camera_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM cameras WHERE mount_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if camera_count > 0 {
        return Err(AppError::Conflict(format!(
            "mount is used by {camera_count} cameras; cannot delete"
        )));
    }
    let lens_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lenses WHERE mount_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if lens_count > 0 {
        return Err(AppError::Conflict(format!(
            "mount is used by {lens_count} lenses; cannot delete"
        )));
    }
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM brand_mounts WHERE mount_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM mounts WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn set_mount_active(pool: &PgPool, id: i64, is_active: bool) -> Result<Mount, AppError> {
    validation::get_mount(pool, id).await?;
    let row = sqlx::query(&format!(
        "UPDATE mounts SET is_active = $1, updated_at = NOW() WHERE id = $2 RETURNING {MOUNT_COLUMNS}"
    ))
    .bind(is_active)
    .bind(id)
    .fetch_one(pool)
    .await?;
    Mount::from_row(&row)
}

pub async fn add_brand_to_mount(
    pool: &PgPool,
    mount_id: i64,
    brand_id: i64,
    is_primary: bool,
    compatibility_notes: &str,
) -> Result<BrandMount, AppError> {
    let mount = validation::get_mount(pool, mount_id).await?;
    let brand = validation::get_brand(pool, brand_id).await?;
    if validation::brand_mount_exists(pool, brand_id, mount_id).await? {
        return Err(AppError::Conflict(format!(
            "brand '{}' already supports mount '{}'",
            brand.name, mount.name
        )));
    }
    let row = sqlx::query(&format!(
        "INSERT INTO brand_mounts (brand_id, mount_id, is_primary, compatibility_notes) \
         VALUES ($1, $2, $3, $4) RETURNING {BRAND_MOUNT_COLUMNS}"
    ))
    .bind(brand_id)
    .bind(mount_id)
    .bind(is_primary)
    .bind(compatibility_notes)
    .fetch_one(pool)
    .await?;
    BrandMount::from_row(&row)
}

pub async fn remove_brand_from_mount(
    pool: &PgPool,
    mount_id: i64,
    brand_id: i64,
) -> Result<(), AppError> {
    validation::get_brand_mount(pool, brand_id, mount_id).await?;
    sqlx::query("DELETE FROM brand_mounts WHERE brand_id = $1 AND mount_id = $2")
        .bind(brand_id)
        .bind(mount_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_mount_brands(pool: &PgPool, mount_id: i64) -> Result<Vec<Brand>, AppError> {
    validation::get_mount(pool, mount_id).await?;
    let cols: String = BRAND_COLUMNS
        .split(", ")
        .map(|c| format!("b.{c}"))
        .collect::<Vec<_>>()
        .join(", ");
    let rows = sqlx::query(&format!(
        "SELECT {cols} FROM brands b \
         JOIN brand_mounts bm ON bm.brand_id = b.id \
         WHERE bm.mount_id = $1 ORDER BY b.id"
    ))
    .bind(mount_id)
    .fetch_all(pool)
    .await?;
    rows.iter().map(Brand::from_row).collect()
}

pub async fn list_mount_cameras(pool: &PgPool, mount_id: i64) -> Result<Vec<Camera>, AppError> {
    validation::get_mount(pool, mount_id).await?;
    let rows = sqlx::query(&format!(
        "SELECT {CAMERA_COLUMNS} FROM cameras WHERE mount_id = $1 ORDER BY id"
    ))
    .bind(mount_id)
    .fetch_all(pool)
    .await?;
    rows.iter().map(Camera::from_row).collect()
}

pub async fn list_mount_lenses(pool: &PgPool, mount_id: i64) -> Result<Vec<Lens>, AppError> {
    validation::get_mount(pool, mount_id).await?;
    let rows = sqlx::query(&format!(
        "SELECT {LENS_COLUMNS} FROM lenses WHERE mount_id = $1 ORDER BY id"
    ))
    .bind(mount_id)
    .fetch_all(pool)
    .await?;
    rows.iter().map(Lens::from_row).collect()
}

pub async fn search_mounts(
    pool: &PgPool,
    term: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<Mount>, AppError> {
    let mut cs = ConditionSet::new();
    cs.search(&["name", "description"], term);
    let sql = format!(
        "SELECT {MOUNT_COLUMNS} FROM mounts{} ORDER BY id LIMIT {limit} OFFSET {skip}",
        cs.where_clause()
    );
    let rows = bind_query(sqlx::query(&sql), cs.params())
        .fetch_all(pool)
        .await?;
    rows.iter().map(Mount::from_row).collect()
}
