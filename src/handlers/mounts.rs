//! Mount endpoints, including the brand-association sub-resource and the
//! cameras/lenses-by-mount listings.

use crate::auth::AdminUser;
use crate::error::AppError;
use crate::model::mount::{BrandMountCreate, MountCreate, MountListParams, MountUpdate};
use crate::model::query::{check_list_page, SearchParams};
use crate::response::message;
use crate::service::mount as mount_service;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub async fn create_mount(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<MountCreate>,
) -> Result<impl IntoResponse, AppError> {
    let mount = mount_service::create_mount(&state.pool, body).await?;
    Ok((StatusCode::CREATED, Json(mount)))
}

pub async fn list_mounts(
    State(state): State<AppState>,
    Query(params): Query<MountListParams>,
) -> Result<impl IntoResponse, AppError> {
    check_list_page(params.skip, params.limit)?;
    let mounts =
        mount_service::list_mounts(&state.pool, params.skip, params.limit, params.is_active)
            .await?;
    Ok(Json(mounts))
}

pub async fn get_mount(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mount = mount_service::get_mount(&state.pool, id).await?;
    Ok(Json(mount))
}

pub async fn get_mount_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mount = mount_service::get_mount_by_name(&state.pool, &name).await?;
    Ok(Json(mount))
}

pub async fn update_mount(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
    Json(body): Json<MountUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let mount = mount_service::update_mount(&state.pool, id, body).await?;
    Ok(Json(mount))
}

pub async fn delete_mount(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    mount_service::delete_mount(&state.pool, id).await?;
    Ok(message("mount deleted"))
}

pub async fn activate_mount(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mount = mount_service::set_mount_active(&state.pool, id, true).await?;
    Ok(Json(mount))
}

pub async fn deactivate_mount(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mount = mount_service::set_mount_active(&state.pool, id, false).await?;
    Ok(Json(mount))
}

pub async fn add_brand_to_mount(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
    Json(body): Json<BrandMountCreate>,
) -> Result<impl IntoResponse, AppError> {
    let association = mount_service::add_brand_to_mount(
        &state.pool,
        id,
        body.brand_id,
        body.is_primary,
        &body.compatibility_notes,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(association)))
}

pub async fn remove_brand_from_mount(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path((id, brand_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    mount_service::remove_brand_from_mount(&state.pool, id, brand_id).await?;
    Ok(message("brand-mount association removed"))
}

pub async fn list_mount_brands(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let brands = mount_service::list_mount_brands(&state.pool, id).await?;
    Ok(Json(brands))
}

pub async fn list_mount_cameras(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let cameras = mount_service::list_mount_cameras(&state.pool, id).await?;
    Ok(Json(cameras))
}

pub async fn list_mount_lenses(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let lenses = mount_service::list_mount_lenses(&state.pool, id).await?;
    Ok(Json(lenses))
}

pub async fn search_mounts(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, AppError> {
    check_list_page(params.skip, params.limit)?;
    let mounts =
        mount_service::search_mounts(&state.pool, &params.q, params.skip, params.limit).await?;
    Ok(Json(mounts))
}
