//! Camera business logic.

use crate::error::AppError;
use crate::model::camera::{
    CameraCreate, CameraUpdate, SensorSize, CAMERA_COLUMNS, CAMERA_SEARCH_FIELDS, CAMERA_SORTABLE,
};
use crate::model::query::{
    check_query_page, parse_enum_list, parse_id_list, CameraQueryParams, QueryResponse,
};
use crate::model::Camera;
use crate::service::validation;
use crate::service::query::{attach_names, envelope, fetch_page, name_lookup, order_clause, PagedQuery};
use crate::sql::{bind_query, BindValue, ConditionSet, QueryBuf};
use sqlx::PgPool;

pub async fn create_camera(pool: &PgPool, data: CameraCreate) -> Result<Camera, AppError> {
    if validation::camera_model_exists(pool, &data.model, None).await? {
        return Err(AppError::Conflict(format!(
            "camera model '{}' already exists",
            data.model
        )));
    }
    validation::ensure_brand_ref(pool, data.brand_id).await?;
    validation::ensure_mount_ref(pool, data.mount_id).await?;
    let row = sqlx::query(&format!(
        "INSERT INTO cameras (brand_id, mount_id, model, series, sensor_size, megapixels, \
         ibis_level, has_hot_shoe, has_built_in_flash, has_wifi, has_bluetooth, release_date, \
         release_price, weight, is_active, description) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
         RETURNING {CAMERA_COLUMNS}"
    ))
    .bind(data.brand_id)
    .bind(data.mount_id)
    .bind(&data.model)
    .bind(&data.series)
    .bind(data.sensor_size.map(|s| s.as_str()))
    .bind(data.megapixels)
    .bind(&data.ibis_level)
    .bind(data.has_hot_shoe)
    .bind(data.has_built_in_flash)
    .bind(data.has_wifi)
    .bind(data.has_bluetooth)
    .bind(data.release_date)
    .bind(data.release_price)
    .bind(data.weight)
    .bind(data.is_active)
    .bind(&data.description)
    .fetch_one(pool)
    .await?;
    Camera::from_row(&row)
}

pub async fn list_cameras(
    pool: &PgPool,
    skip: i64,
    limit: i64,
    is_active: Option<bool>,
    brand_id: Option<i64>,
    mount_id: Option<i64>,
    sensor_size: Option<SensorSize>,
) -> Result<Vec<Camera>, AppError> {
    let mut cs = ConditionSet::new();
    if let Some(active) = is_active {
        cs.eq("is_active", BindValue::Bool(active));
    }
    if let Some(id) = brand_id {
        cs.eq("brand_id", BindValue::I64(id));
    }
    if let Some(id) = mount_id {
        cs.eq("mount_id", BindValue::I64(id));
    }
    if let Some(size) = sensor_size {
        cs.eq("sensor_size", BindValue::Text(size.as_str().to_string()));
    }
    let sql = format!(
        "SELECT {CAMERA_COLUMNS} FROM cameras{} ORDER BY id LIMIT {limit} OFFSET {skip}",
        cs.where_clause()
    );
    let rows = bind_query(sqlx::query(&sql), cs.params())
        .fetch_all(pool)
        .await?;
    rows.iter().map(Camera::from_row).collect()
}

pub async fn get_camera(pool: &PgPool, id: i64) -> Result<Camera, AppError> {
    validation::get_camera(pool, id).await
}

pub async fn get_camera_by_model(pool: &PgPool, model: &str) -> Result<Camera, AppError> {
    validation::get_camera_by_model(pool, model).await
}

pub async fn update_camera(pool: &PgPool, id: i64, patch: CameraUpdate) -> Result<Camera, AppError> {
    let current = validation::get_camera(pool, id).await?;
    if let Some(ref model) = patch.model {
        if *model != current.model && validation::camera_model_exists(pool, model, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "camera model '{model}' already exists"
            )));
        }
    }
    if let Some(brand_id) = patch.brand_id {
        validation::ensure_brand_ref(pool, brand_id).await?;
    }
    if let Some(mount_id) = patch.mount_id {
        validation::ensure_mount_ref(pool, mount_id).await?;
    }

    let mut q = QueryBuf::new();
    let mut sets: Vec<String> = Vec::new();
    if let Some(brand_id) = patch.brand_id {
        let n = q.push_param(BindValue::I64(brand_id));
        sets.push(format!("brand_id = ${n}"));
    }
    if let Some(mount_id) = patch.mount_id {
        let n = q.push_param(BindValue::I64(mount_id));
        sets.push(format!("mount_id = ${n}"));
    }
    if let Some(model) = patch.model {
        let n = q.push_param(BindValue::Text(model));
        sets.push(format!("model = ${n}"));
    }
    if let Some(series) = patch.series {
        let n = q.push_param(BindValue::Text(series));
        sets.push(format!("series = ${n}"));
    }
    if let Some(sensor_size) = patch.sensor_size {
        let n = q.push_param(BindValue::Text(sensor_size.as_str().to_string()));
        sets.push(format!("sensor_size = ${n}"));
    }
    if let Some(megapixels) = patch.megapixels {
        let n = q.push_param(BindValue::F64(megapixels));
        sets.push(format!("megapixels = ${n}"));
    }
    if let Some(ibis_level) = patch.ibis_level {
        let n = q.push_param(BindValue::Text(ibis_level));
        sets.push(format!("ibis_level = ${n}"));
    }
    if let Some(v) = patch.has_hot_shoe {
        let n = q.push_param(BindValue::Bool(v));
        sets.push(format!("has_hot_shoe = ${n}"));
    }
    if let Some(v) = patch.has_built_in_flash {
        let n = q.push_param(BindValue::Bool(v));
        sets.push(format!("has_built_in_flash = ${n}"));
    }
    if let Some(v) = patch.has_wifi {
        let n = q.push_param(BindValue::Bool(v));
        sets.push(format!("has_wifi = ${n}"));
    }
    if let Some(v) = patch.has_bluetooth {
        let n = q.push_param(BindValue::Bool(v));
        sets.push(format!("has_bluetooth = ${n}"));
    }
    if let Some(release_date) = patch.release_date {
        let n = q.push_param(BindValue::Date(release_date));
        sets.push(format!("release_date = ${n}"));
    }
    if let Some(release_price) = patch.release_price {
        let n = q.push_param(BindValue::F64(release_price));
        sets.push(format!("release_price = ${n}"));
    }
    if let Some(weight) = patch.weight {
        let n = q.push_param(BindValue::F64(weight));
        sets.push(format!("weight = ${n}"));
    }
    if let Some(is_active) = patch.is_active {
        let n = q.push_param(BindValue::Bool(is_active));
        sets.push(format!("is_active = ${n}"));
    }
    if let Some(description) = patch.description {
        let n = q.push_param(BindValue::Text(description));
        sets.push(format!("description = ${n}"));
    }
    if sets.is_empty() {
        return Ok(current);
    }
    sets.push("updated_at = NOW()".to_string());
    let id_param = q.push_param(BindValue::I64(id));
    q.sql = format!(
        "UPDATE cameras SET {} WHERE id = ${id_param} RETURNING {CAMERA_COLUMNS}",
        sets.join(", ")
    );
    let row = bind_query(sqlx::query(&q.sql), &q.params)
        .fetch_one(pool)
        .await?;
    Camera::from_row(&row)
}

pub async fn delete_camera(pool: &PgPool, id: i64) -> Result<(), AppError> {
    validation::get_camera(pool, id).await?;
    sqlx::query("DELETE FROM cameras WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_camera_active(pool: &PgPool, id: i64, is_active: bool) -> Result<Camera, AppError> {
    validation::get_camera(pool, id).await?;
    let row = sqlx::query(&format!(
        "UPDATE cameras SET is_active = $1, updated_at = NOW() WHERE id = $2 RETURNING {CAMERA_COLUMNS}"
    ))
    .bind(is_active)
    .bind(id)
    .fetch_one(pool)
    .await?;
    Camera::from_row(&row)
}

pub fn sensor_sizes() -> Vec<&'static str> {
    SensorSize::ALL.iter().map(|s| s.as_str()).collect()
}

fn camera_conditions(params: &CameraQueryParams) -> Result<ConditionSet, AppError> {
    let mut cs = ConditionSet::new();
    if let Some(active) = params.is_active {
        cs.eq("is_active", BindValue::Bool(active));
    }
    if let Some(id) = params.brand_id {
        cs.eq("brand_id", BindValue::I64(id));
    }
    if let Some(ref raw) = params.brand_ids {
        cs.any_i64("brand_id", &parse_id_list(raw)?);
    }
    if let Some(id) = params.mount_id {
        cs.eq("mount_id", BindValue::I64(id));
    }
    if let Some(ref raw) = params.mount_ids {
        cs.any_i64("mount_id", &parse_id_list(raw)?);
    }
    if let Some(size) = params.sensor_size {
        cs.eq("sensor_size", BindValue::Text(size.as_str().to_string()));
    }
    if let Some(ref raw) = params.sensor_sizes {
        let sizes: Vec<SensorSize> = parse_enum_list(raw, "sensor size")?;
        cs.any_text(
            "sensor_size",
            &sizes.iter().map(|s| s.as_str().to_string()).collect::<Vec<_>>(),
        );
    }
    if let Some(v) = params.megapixels_min {
        cs.ge("megapixels", BindValue::F64(v));
    }
    if let Some(v) = params.megapixels_max {
        cs.le("megapixels", BindValue::F64(v));
    }
    if let Some(v) = params.price_min {
        cs.ge("release_price", BindValue::F64(v));
    }
    if let Some(v) = params.price_max {
        cs.le("release_price", BindValue::F64(v));
    }
    if let Some(v) = params.weight_min {
        cs.ge("weight", BindValue::F64(v));
    }
    if let Some(v) = params.weight_max {
        cs.le("weight", BindValue::F64(v));
    }
    if let Some(v) = params.has_wifi {
        cs.eq("has_wifi", BindValue::Bool(v));
    }
    if let Some(v) = params.has_bluetooth {
        cs.eq("has_bluetooth", BindValue::Bool(v));
    }
    if let Some(v) = params.has_hot_shoe {
        cs.eq("has_hot_shoe", BindValue::Bool(v));
    }
    if let Some(v) = params.has_built_in_flash {
        cs.eq("has_built_in_flash", BindValue::Bool(v));
    }
    if let Some(year) = params.release_year_min {
        cs.year_ge("release_date", year);
    }
    if let Some(year) = params.release_year_max {
        cs.year_le("release_date", year);
    }
    if let Some(ref series) = params.series {
        cs.contains("series", series);
    }
    if let Some(ref model) = params.model {
        cs.contains("model", model);
    }
    if let Some(ref term) = params.search {
        cs.search(CAMERA_SEARCH_FIELDS, term);
    }
    Ok(cs)
}

/// Advanced filter/sort/search query with the shared result envelope.
pub async fn query_cameras(
    pool: &PgPool,
    params: CameraQueryParams,
) -> Result<QueryResponse, AppError> {
    check_query_page(params.skip, params.limit)?;
    let plan = PagedQuery {
        table: "cameras",
        columns: CAMERA_COLUMNS,
        conditions: camera_conditions(&params)?,
        order_clause: order_clause(params.sort_by.as_deref(), params.sort_order, CAMERA_SORTABLE),
        skip: params.skip,
        limit: params.limit,
    };
    let (cameras, total) = fetch_page(pool, &plan, Camera::from_row).await?;

    let brand_ids: Vec<i64> = cameras.iter().map(|c| c.brand_id).collect();
    let mount_ids: Vec<i64> = cameras.iter().map(|c| c.mount_id).collect();
    let brand_names = name_lookup(pool, "brands", &brand_ids).await?;
    let mount_names = name_lookup(pool, "mounts", &mount_ids).await?;
    let data = attach_names(cameras, &brand_names, &mount_names, |c| {
        (c.brand_id, c.mount_id)
    })?;
    Ok(envelope(data, total, params.skip, params.limit))
}
