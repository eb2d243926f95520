//! Lens endpoints. Reads are public; writes and import are admin-gated.

use crate::auth::AdminUser;
use crate::error::AppError;
use crate::model::lens::{LensCreate, LensListParams, LensUpdate};
use crate::model::query::{check_list_page, LensQueryParams, SearchParams};
use crate::response::message;
use crate::service::{import, lens as lens_service};
use crate::state::AppState;
use axum::extract::multipart::Multipart;
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use std::net::SocketAddr;

pub async fn create_lens(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<LensCreate>,
) -> Result<impl IntoResponse, AppError> {
    let lens = lens_service::create_lens(&state.pool, body).await?;
    Ok((StatusCode::CREATED, Json(lens)))
}

pub async fn list_lenses(
    State(state): State<AppState>,
    Query(params): Query<LensListParams>,
) -> Result<impl IntoResponse, AppError> {
    check_list_page(params.skip, params.limit)?;
    let lenses = lens_service::list_lenses(
        &state.pool,
        params.skip,
        params.limit,
        params.is_active,
        params.brand_id,
        params.mount_id,
        params.lens_type,
        params.focus_type,
        params.has_stabilization,
    )
    .await?;
    Ok(Json(lenses))
}

/// Advanced filter/sort/search endpoint with the paged envelope.
pub async fn query_lenses(
    State(state): State<AppState>,
    Query(params): Query<LensQueryParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = lens_service::query_lenses(&state.pool, params).await?;
    Ok(Json(page))
}

pub async fn get_lens(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let lens = lens_service::get_lens(&state.pool, id).await?;
    Ok(Json(lens))
}

pub async fn get_lens_by_model(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let lens = lens_service::get_lens_by_model(&state.pool, &model).await?;
    Ok(Json(lens))
}

pub async fn update_lens(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
    Json(body): Json<LensUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let lens = lens_service::update_lens(&state.pool, id, body).await?;
    Ok(Json(lens))
}

pub async fn delete_lens(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    lens_service::delete_lens(&state.pool, id).await?;
    Ok(message("lens deleted"))
}

pub async fn activate_lens(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let lens = lens_service::set_lens_active(&state.pool, id, true).await?;
    Ok(Json(lens))
}

pub async fn deactivate_lens(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let lens = lens_service::set_lens_active(&state.pool, id, false).await?;
    Ok(Json(lens))
}

pub async fn lens_types() -> impl IntoResponse {
    Json(lens_service::lens_types())
}

pub async fn focus_types() -> impl IntoResponse {
    Json(lens_service::focus_types())
}

pub async fn search_lenses(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    check_list_page(params.skip, params.limit)?;
    let lenses =
        lens_service::search_lenses(&state.pool, &params.q, params.skip, params.limit).await?;
    Ok(Json(lenses))
}

pub async fn import_lenses(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let bytes = super::read_upload(&mut multipart).await?;
    Ok(Json(import::import_lenses(&state.pool, bytes).await))
}

pub async fn lens_template(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let ip = super::client_ip(connect_info.as_ref(), &headers);
    super::serve_template(&state, ip, "lenses_template.xlsx").await
}
