//! Brand endpoints. Reads are public; writes and import are admin-gated.

use crate::auth::AdminUser;
use crate::error::AppError;
use crate::model::brand::{BrandCreate, BrandListParams, BrandUpdate};
use crate::model::query::check_list_page;
use crate::response::message;
use crate::service::{brand as brand_service, import};
use crate::state::AppState;
use axum::extract::multipart::Multipart;
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use std::net::SocketAddr;

pub async fn create_brand(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<BrandCreate>,
) -> Result<impl IntoResponse, AppError> {
    let brand = brand_service::create_brand(&state.pool, body).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

pub async fn list_brands(
    State(state): State<AppState>,
    Query(params): Query<BrandListParams>,
) -> Result<impl IntoResponse, AppError> {
    check_list_page(params.skip, params.limit)?;
    let brands = brand_service::list_brands(
        &state.pool,
        params.skip,
        params.limit,
        params.is_active,
        params.brand_type,
    )
    .await?;
    Ok(Json(brands))
}

pub async fn get_brand(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let brand = brand_service::get_brand(&state.pool, id).await?;
    Ok(Json(brand))
}

pub async fn get_brand_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let brand = brand_service::get_brand_by_name(&state.pool, &name).await?;
    Ok(Json(brand))
}

pub async fn update_brand(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
    Json(body): Json<BrandUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let brand = brand_service::update_brand(&state.pool, id, body).await?;
    Ok(Json(brand))
}

pub async fn delete_brand(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    brand_service::delete_brand(&state.pool, id).await?;
    Ok(message("brand deleted"))
}

pub async fn activate_brand(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let brand = brand_service::set_brand_active(&state.pool, id, true).await?;
    Ok(Json(brand))
}

pub async fn deactivate_brand(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let brand = brand_service::set_brand_active(&state.pool, id, false).await?;
    Ok(Json(brand))
}

pub async fn brand_types() -> impl IntoResponse {
    Json(brand_service::brand_types())
}

pub async fn import_brands(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let bytes = super::read_upload(&mut multipart).await?;
    Ok(Json(import::import_brands(&state.pool, bytes).await))
}

pub async fn brand_template(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let ip = super::client_ip(connect_info.as_ref(), &headers);
    super::serve_template(&state, ip, "brands_template.xlsx").await
}
