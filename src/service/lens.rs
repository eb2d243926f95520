//! Lens business logic.
//!
//! `lens_type` and `is_constant_aperture` are derived from the focal and
//! aperture bounds on every create and on any update that touches those
//! bounds. Aperture bounds are f-numbers: `max_aperture_min` holds the
//! wide-end value and may not exceed the tele-end `max_aperture_max`.

use crate::error::AppError;
use crate::model::lens::{
    FocusType, LensCreate, LensType, LensUpdate, LENS_COLUMNS, LENS_SEARCH_FIELDS, LENS_SORTABLE,
};
use crate::model::query::{
    check_query_page, parse_enum_list, parse_id_list, LensQueryParams, QueryResponse,
};
use crate::model::Lens;
use crate::service::validation;
use crate::service::query::{attach_names, envelope, fetch_page, name_lookup, order_clause, PagedQuery};
use crate::sql::{bind_query, BindValue, ConditionSet, QueryBuf};
use sqlx::PgPool;

pub fn derive_lens_type(min_focal: f64, max_focal: f64) -> LensType {
    if min_focal == max_focal {
        LensType::Prime
    } else {
        LensType::Zoom
    }
}

pub fn derive_constant_aperture(wide_end: f64, tele_end: Option<f64>) -> bool {
    tele_end == Some(wide_end)
}

fn check_focal_range(min_focal: f64, max_focal: f64) -> Result<(), AppError> {
    if min_focal > max_focal {
        return Err(AppError::InvalidArgument(
            "min focal length cannot exceed max focal length".into(),
        ));
    }
    Ok(())
}

fn check_aperture_range(wide_end: f64, tele_end: Option<f64>) -> Result<(), AppError> {
    if let Some(tele) = tele_end {
        if wide_end > tele {
            return Err(AppError::InvalidArgument(
                "wide-end aperture f-number cannot exceed the tele-end value".into(),
            ));
        }
    }
    Ok(())
}

pub async fn create_lens(pool: &PgPool, data: LensCreate) -> Result<Lens, AppError> {
    if validation::lens_model_exists(pool, &data.model, None).await? {
        return Err(AppError::Conflict(format!(
            "lens model '{}' already exists",
            data.model
        )));
    }
    validation::ensure_brand_ref(pool, data.brand_id).await?;
    validation::ensure_mount_ref(pool, data.mount_id).await?;
    check_focal_range(data.min_focal_length, data.max_focal_length)?;
    check_aperture_range(data.max_aperture_min, data.max_aperture_max)?;

    let lens_type = derive_lens_type(data.min_focal_length, data.max_focal_length);
    let is_constant = derive_constant_aperture(data.max_aperture_min, data.max_aperture_max);

    let row = sqlx::query(&format!(
        "INSERT INTO lenses (brand_id, mount_id, model, series, min_focal_length, \
         max_focal_length, lens_type, max_aperture_min, max_aperture_max, is_constant_aperture, \
         weight, height, diameter, filter_size, focus_type, has_stabilization, \
         min_focus_distance, magnification, release_date, release_price, is_active, description) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
         $18, $19, $20, $21, $22) RETURNING {LENS_COLUMNS}"
    ))
    .bind(data.brand_id)
    .bind(data.mount_id)
    .bind(&data.model)
    .bind(&data.series)
    .bind(data.min_focal_length)
    .bind(data.max_focal_length)
    .bind(lens_type.as_str())
    .bind(data.max_aperture_min)
    .bind(data.max_aperture_max)
    .bind(is_constant)
    .bind(data.weight)
    .bind(data.height)
    .bind(data.diameter)
    .bind(data.filter_size)
    .bind(data.focus_type.as_str())
    .bind(data.has_stabilization)
    .bind(data.min_focus_distance)
    .bind(data.magnification)
    .bind(data.release_date)
    .bind(data.release_price)
    .bind(data.is_active)
    .bind(&data.description)
    .fetch_one(pool)
    .await?;
    Lens::from_row(&row)
}

#[allow(clippy::too_many_arguments)]
pub async fn list_lenses(
    pool: &PgPool,
    skip: i64,
    limit: i64,
    is_active: Option<bool>,
    brand_id: Option<i64>,
    mount_id: Option<i64>,
    lens_type: Option<LensType>,
    focus_type: Option<FocusType>,
    has_stabilization: Option<bool>,
) -> Result<Vec<Lens>, AppError> {
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
    if let Some(t) = lens_type {
        cs.eq("lens_type", BindValue::Text(t.as_str().to_string()));
    }
    if let Some(t) = focus_type {
        cs.eq("focus_type", BindValue::Text(t.as_str().to_string()));
    }
    if let Some(v) = has_stabilization {
        cs.eq("has_stabilization", BindValue::Bool(v));
    }
    let sql = format!(
        "SELECT {LENS_COLUMNS} FROM lenses{} ORDER BY id LIMIT {limit} OFFSET {skip}",
        cs.where_clause()
    );
    let rows = bind_query(sqlx::query(&sql), cs.params())
        .fetch_all(pool)
        .await?;
    rows.iter().map(Lens::from_row).collect()
}

pub async fn get_lens(pool: &PgPool, id: i64) -> Result<Lens, AppError> {
    validation::get_lens(pool, id).await
}

pub async fn get_lens_by_model(pool: &PgPool, model: &str) -> Result<Lens, AppError> {
    validation::get_lens_by_model(pool, model).await
}

pub async fn update_lens(pool: &PgPool, id: i64, patch: LensUpdate) -> Result<Lens, AppError> {
    let current = validation::get_lens(pool, id).await?;
    if let Some(ref model) = patch.model {
        if *model != current.model && validation::lens_model_exists(pool, model, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "lens model '{model}' already exists"
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
    if let Some(v) = patch.min_focal_length {
        let n = q.push_param(BindValue::F64(v));
        sets.push(format!("min_focal_length = ${n}"));
    }
    if let Some(v) = patch.max_focal_length {
        let n = q.push_param(BindValue::F64(v));
        sets.push(format!("max_focal_length = ${n}"));
    }
    if let Some(v) = patch.max_aperture_min {
        let n = q.push_param(BindValue::F64(v));
        sets.push(format!("max_aperture_min = ${n}"));
    }
    if let Some(v) = patch.max_aperture_max {
        let n = q.push_param(BindValue::F64(v));
        sets.push(format!("max_aperture_max = ${n}"));
    }
    if let Some(v) = patch.weight {
        let n = q.push_param(BindValue::F64(v));
        sets.push(format!("weight = ${n}"));
    }
    if let Some(v) = patch.height {
        let n = q.push_param(BindValue::F64(v));
        sets.push(format!("height = ${n}"));
    }
    if let Some(v) = patch.diameter {
        let n = q.push_param(BindValue::F64(v));
        sets.push(format!("diameter = ${n}"));
    }
    if let Some(v) = patch.filter_size {
        let n = q.push_param(BindValue::F64(v));
        sets.push(format!("filter_size = ${n}"));
    }
    if let Some(focus_type) = patch.focus_type {
        let n = q.push_param(BindValue::Text(focus_type.as_str().to_string()));
        sets.push(format!("focus_type = ${n}"));
    }
    if let Some(v) = patch.has_stabilization {
        let n = q.push_param(BindValue::Bool(v));
        sets.push(format!("has_stabilization = ${n}"));
    }
    if let Some(v) = patch.min_focus_distance {
        let n = q.push_param(BindValue::F64(v));
        sets.push(format!("min_focus_distance = ${n}"));
    }
    if let Some(v) = patch.magnification {
        let n = q.push_param(BindValue::F64(v));
        sets.push(format!("magnification = ${n}"));
    }
    if let Some(v) = patch.release_date {
        let n = q.push_param(BindValue::Date(v));
        sets.push(format!("release_date = ${n}"));
    }
    if let Some(v) = patch.release_price {
        let n = q.push_param(BindValue::F64(v));
        sets.push(format!("release_price = ${n}"));
    }
    if let Some(v) = patch.is_active {
        let n = q.push_param(BindValue::Bool(v));
        sets.push(format!("is_active = ${n}"));
    }
    if let Some(description) = patch.description {
        let n = q.push_param(BindValue::Text(description));
        sets.push(format!("description = ${n}"));
    }

    // Re-derive from the effective bounds whenever a bound was patched.
    let min_focal = patch.min_focal_length.unwrap_or(current.min_focal_length);
    let max_focal = patch.max_focal_length.unwrap_or(current.max_focal_length);
    if patch.min_focal_length.is_some() || patch.max_focal_length.is_some() {
        check_focal_range(min_focal, max_focal)?;
        let n = q.push_param(BindValue::Text(
            derive_lens_type(min_focal, max_focal).as_str().to_string(),
        ));
        sets.push(format!("lens_type = ${n}"));
    }
    let wide = patch.max_aperture_min.unwrap_or(current.max_aperture_min);
    let tele = patch.max_aperture_max.or(current.max_aperture_max);
    if patch.max_aperture_min.is_some() || patch.max_aperture_max.is_some() {
        check_aperture_range(wide, tele)?;
        let n = q.push_param(BindValue::Bool(derive_constant_aperture(wide, tele)));
        sets.push(format!("is_constant_aperture = ${n}"));
    }

    if sets.is_empty() {
        return Ok(current);
    }
    sets.push("updated_at = NOW()".to_string());
    let id_param = q.push_param(BindValue::I64(id));
    q.sql = format!(
        "UPDATE lenses SET {} WHERE id = ${id_param} RETURNING {LENS_COLUMNS}",
        sets.join(", ")
    );
    let row = bind_query(sqlx::query(&q.sql), &q.params)
        .fetch_one(pool)
        .await?;
    Lens::from_row(&row)
}

pub async fn delete_lens(pool: &PgPool, id: i64) -> Result<(), AppError> {
    validation::get_lens(pool, id).await?;
    sqlx::query("DELETE FROM lenses WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_lens_active(pool: &PgPool, id: i64, is_active: bool) -> Result<Lens, AppError> {
    validation::get_lens(pool, id).await?;
    let row = sqlx::query(&format!(
        "UPDATE lenses SET is_active = $1, updated_at = NOW() WHERE id = $2 RETURNING {LENS_COLUMNS}"
    ))
    .bind(is_active)
    .bind(id)
    .fetch_one(pool)
    .await?;
    Lens::from_row(&row)
}

pub fn lens_types() -> Vec<&'static str> {
    LensType::ALL.iter().map(|t| t.as_str()).collect()
}

pub fn focus_types() -> Vec<&'static str> {
    FocusType::ALL.iter().map(|t| t.as_str()).collect()
}

pub async fn search_lenses(
    pool: &PgPool,
    term: &str,
    skip: i64,
    limit: i64,
) -> Result<Vec<Lens>, AppError> {
    let mut cs = ConditionSet::new();
    cs.search(LENS_SEARCH_FIELDS, term);
    let sql = format!(
        "SELECT {LENS_COLUMNS} FROM lenses{} ORDER BY id LIMIT {limit} OFFSET {skip}",
        cs.where_clause()
    );
    let rows = bind_query(sqlx::query(&sql), cs.params())
        .fetch_all(pool)
        .await?;
    rows.iter().map(Lens::from_row).collect()
}

fn lens_conditions(params: &LensQueryParams) -> Result<ConditionSet, AppError> {
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
    if let Some(t) = params.lens_type {
        cs.eq("lens_type", BindValue::Text(t.as_str().to_string()));
    }
    if let Some(ref raw) = params.lens_types {
        let types: Vec<LensType> = parse_enum_list(raw, "lens type")?;
        cs.any_text(
            "lens_type",
            &types.iter().map(|t| t.as_str().to_string()).collect::<Vec<_>>(),
        );
    }
    if let Some(t) = params.focus_type {
        cs.eq("focus_type", BindValue::Text(t.as_str().to_string()));
    }
    if let Some(ref raw) = params.focus_types {
        let types: Vec<FocusType> = parse_enum_list(raw, "focus type")?;
        cs.any_text(
            "focus_type",
            &types.iter().map(|t| t.as_str().to_string()).collect::<Vec<_>>(),
        );
    }
    if let Some(v) = params.focal_length_min {
        cs.ge("min_focal_length", BindValue::F64(v));
    }
    if let Some(v) = params.focal_length_max {
        cs.le("max_focal_length", BindValue::F64(v));
    }
    // Both aperture bounds filter on the wide-end f-number column.
    if let Some(v) = params.aperture_min {
        cs.ge("max_aperture_min", BindValue::F64(v));
    }
    if let Some(v) = params.aperture_max {
        cs.le("max_aperture_min", BindValue::F64(v));
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
    if let Some(v) = params.has_stabilization {
        cs.eq("has_stabilization", BindValue::Bool(v));
    }
    if let Some(v) = params.is_constant_aperture {
        cs.eq("is_constant_aperture", BindValue::Bool(v));
    }
    if let Some(v) = params.filter_size_min {
        cs.ge("filter_size", BindValue::F64(v));
    }
    if let Some(v) = params.filter_size_max {
        cs.le("filter_size", BindValue::F64(v));
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
        cs.search(LENS_SEARCH_FIELDS, term);
    }
    Ok(cs)
}

/// Advanced filter/sort/search query with the shared result envelope.
pub async fn query_lenses(pool: &PgPool, params: LensQueryParams) -> Result<QueryResponse, AppError> {
    check_query_page(params.skip, params.limit)?;
    let plan = PagedQuery {
        table: "lenses",
        columns: LENS_COLUMNS,
        conditions: lens_conditions(&params)?,
        order_clause: order_clause(params.sort_by.as_deref(), params.sort_order, LENS_SORTABLE),
        skip: params.skip,
        limit: params.limit,
    };
    let (lenses, total) = fetch_page(pool, &plan, Lens::from_row).await?;

    let brand_ids: Vec<i64> = lenses.iter().map(|l| l.brand_id).collect();
    let mount_ids: Vec<i64> = lenses.iter().map(|l| l.mount_id).collect();
    let brand_names = name_lookup(pool, "brands", &brand_ids).await?;
    let mount_names = name_lookup(pool, "mounts", &mount_ids).await?;
    let data = attach_names(lenses, &brand_names, &mount_names, |l| {
        (l.brand_id, l.mount_id)
    })?;
    Ok(envelope(data, total, params.skip, params.limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_focal_bounds_derive_a_prime() {
        assert_eq!(derive_lens_type(50.0, 50.0), LensType::Prime);
        assert_eq!(derive_lens_type(24.0, 70.0), LensType::Zoom);
    }

    #[test]
    fn equal_aperture_bounds_derive_constant_aperture() {
        assert!(derive_constant_aperture(2.8, Some(2.8)));
        assert!(!derive_constant_aperture(2.8, Some(4.0)));
        assert!(!derive_constant_aperture(2.8, None));
    }

    #[test]
    fn inverted_focal_range_is_rejected() {
        assert!(check_focal_range(100.0, 50.0).is_err());
        assert!(check_focal_range(50.0, 50.0).is_ok());
        assert!(check_focal_range(24.0, 70.0).is_ok());
    }

    #[test]
    fn aperture_wide_end_may_not_exceed_tele_end() {
        // f-numbers: 2.8 at the wide end, 4.0 at the tele end is a normal zoom.
        assert!(check_aperture_range(2.8, Some(4.0)).is_ok());
        assert!(check_aperture_range(2.8, Some(2.8)).is_ok());
        assert!(check_aperture_range(4.0, Some(2.8)).is_err());
        assert!(check_aperture_range(1.4, None).is_ok());
    }
}
