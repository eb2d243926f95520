//! Brand business logic.

use crate::error::AppError;
use crate::model::brand::{BrandCreate, BrandType, BrandUpdate, BRAND_COLUMNS};
use crate::model::Brand;
use crate::service::validation;
use crate::sql::{bind_query, BindValue, ConditionSet, QueryBuf};
use serde_json::json;
use sqlx::PgPool;

pub async fn create_brand(pool: &PgPool, data: BrandCreate) -> Result<Brand, AppError> {
    if validation::brand_name_exists(pool, &data.name, None).await? {
        return Err(AppError::Conflict(format!(
            "brand name '{}' already exists",
            data.name
        )));
    }
    let row = sqlx::query(&format!(
        "INSERT INTO brands (name, description, website, country, brand_type, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {BRAND_COLUMNS}"
    ))
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.website)
    .bind(&data.country)
    .bind(data.brand_type.as_str())
    .bind(data.is_active)
    .fetch_one(pool)
    .await?;
    Brand::from_row(&row)
}

pub async fn list_brands(
    pool: &PgPool,
    skip: i64,
    limit: i64,
    is_active: Option<bool>,
    brand_type: Option<BrandType>,
) -> Result<Vec<Brand>, AppError> {
    let mut cs = ConditionSet::new();
    if let Some(active) = is_active {
        cs.eq("is_active", BindValue::Bool(active));
    }
    if let Some(t) = brand_type {
        cs.eq("brand_type", BindValue::Text(t.as_str().to_string()));
    }
    let sql = format!(
        "SELECT {BRAND_COLUMNS} FROM brands{} ORDER BY id LIMIT {limit} OFFSET {skip}",
        cs.where_clause()
    );
    let rows = bind_query(sqlx::query(&sql), cs.params())
        .fetch_all(pool)
        .await?;
    rows.iter().map(Brand::from_row).collect()
}

pub async fn get_brand(pool: &PgPool, id: i64) -> Result<Brand, AppError> {
    validation::get_brand(pool, id).await
}

pub async fn get_brand_by_name(pool: &PgPool, name: &str) -> Result<Brand, AppError> {
    validation::get_brand_by_name(pool, name).await
}

pub async fn update_brand(pool: &PgPool, id: i64, patch: BrandUpdate) -> Result<Brand, AppError> {
    let current = validation::get_brand(pool, id).await?;
    if let Some(ref name) = patch.name {
        if *name != current.name && validation::brand_name_exists(pool, name, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "brand name '{name}' already exists"
            )));
        }
    }

    let mut q = QueryBuf::new();
    let mut sets: Vec<String> = Vec::new();
    if let Some(name) = patch.name {
        let n = q.push_param(BindValue::Text(name));
        sets.push(format!("name = ${n}"));
    }
    if let Some(description) = patch.description {
        let n = q.push_param(BindValue::Text(description));
        sets.push(format!("description = ${n}"));
    }
    if let Some(website) = patch.website {
        let n = q.push_param(BindValue::Text(website));
        sets.push(format!("website = ${n}"));
    }
    if let Some(country) = patch.country {
        let n = q.push_param(BindValue::Text(country));
        sets.push(format!("country = ${n}"));
    }
    if let Some(brand_type) = patch.brand_type {
        let n = q.push_param(BindValue::Text(brand_type.as_str().to_string()));
        sets.push(format!("brand_type = ${n}"));
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
        "UPDATE brands SET {} WHERE id = ${id_param} RETURNING {BRAND_COLUMNS}",
        sets.join(", ")
    );
    let row = bind_query(sqlx::query(&q.sql), &q.params)
        .fetch_one(pool)
        .await?;
    Brand::from_row(&row)
}

/// Refuses deletion while any camera or lens still references the brand.
pub async fn delete_brand(pool: &PgPool, id: i64) -> Result<(), AppError> {
    validation::get_brand(pool, id).await?;
    let camera_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM cameras WHERE brand_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
    let lens_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lenses WHERE brand_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if camera_count > 0 || lens_count > 0 {
        return Err(AppError::Conflict(format!(
            "brand is referenced by {camera_count} cameras and {lens_count} lenses; cannot delete"
        )));
    }
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM brand_mounts WHERE brand_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM brands WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn set_brand_active(pool: &PgPool, id: i64, is_active: bool) -> Result<Brand, AppError> {
    validation::get_brand(pool, id).await?;
    let row = sqlx::query(&format!(
        "UPDATE brands SET is_active = $1, updated_at = NOW() WHERE id = $2 RETURNING {BRAND_COLUMNS}"
    ))
    .bind(is_active)
    .bind(id)
    .fetch_one(pool)
    .await?;
    Brand::from_row(&row)
}

pub fn brand_types() -> serde_json::Value {
    json!({
        "brand_types": BrandType::ALL
            .iter()
            .map(|t| json!({ "value": t.as_str(), "label": t.as_str() }))
            .collect::<Vec<_>>()
    })
}
