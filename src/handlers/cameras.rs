//! Camera endpoints. Reads are public; writes and import are admin-gated.

use crate::auth::AdminUser;
use crate::error::AppError;
use crate::model::camera::{CameraCreate, CameraListParams, CameraUpdate};
use crate::model::query::{check_list_page, CameraQueryParams};
use crate::response::message;
use crate::service::{camera as camera_service, import};
use crate::state::AppState;
use axum::extract::multipart::Multipart;
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use std::net::SocketAddr;

pub async fn create_camera(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<CameraCreate>,
) -> Result<impl IntoResponse, AppError> {
    let camera = camera_service::create_camera(&state.pool, body).await?;
    Ok((StatusCode::CREATED, Json(camera)))
}

pub async fn list_cameras(
    State(state): State<AppState>,
    Query(params): Query<CameraListParams>,
) -> Result<impl IntoResponse, AppError> {
    check_list_page(params.skip, params.limit)?;
    let cameras = camera_service::list_cameras(
        &state.pool,
        params.skip,
        params.limit,
        params.is_active,
        params.brand_id,
        params.mount_id,
        params.sensor_size,
    )
    .await?;
    Ok(Json(cameras))
}

/// Advanced filter/sort/search endpoint with the paged envelope.
pub async fn query_cameras(
    State(state): State<AppState>,
    Query(params): Query<CameraQueryParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = camera_service::query_cameras(&state.pool, params).await?;
    Ok(Json(page))
}

pub async fn get_camera(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let camera = camera_service::get_camera(&state.pool, id).await?;
    Ok(Json(camera))
}

pub async fn get_camera_by_model(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let camera = camera_service::get_camera_by_model(&state.pool, &model).await?;
    Ok(Json(camera))
}

pub async fn update_camera(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
    Json(body): Json<CameraUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let camera = camera_service::update_camera(&state.pool, id, body).await?;
    Ok(Json(camera))
}

pub async fn delete_camera(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    camera_service::delete_camera(&state.pool, id).await?;
    Ok(message("camera deleted"))
}

pub async fn activate_camera(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let camera = camera_service::set_camera_active(&state.pool, id, true).await?;
    Ok(Json(camera))
}

pub async fn deactivate_camera(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let camera = camera_service::set_camera_active(&state.pool, id, false).await?;
    Ok(Json(camera))
}

pub async fn sensor_sizes() -> impl IntoResponse {
    Json(camera_service::sensor_sizes())
}

pub async fn import_cameras(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let bytes = super::read_upload(&mut multipart).await?;
    Ok(Json(import::import_cameras(&state.pool, bytes).await))
}

pub async fn camera_template(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let ip = super::client_ip(connect_info.as_ref(), &headers);
    super::serve_template(&state, ip, "cameras_template.xlsx").await
}
