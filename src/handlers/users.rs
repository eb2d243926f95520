//! User management. Admin-gated except the `/users/me` self-service pair.

use crate::auth::{AdminUser, CurrentUser};
use crate::error::AppError;
use crate::model::query::check_list_page;
use crate::model::user::{UserCreate, UserListParams, UserSelfUpdate, UserUpdate};
use crate::response::message;
use crate::service::user as user_service;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub async fn create_user(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<UserCreate>,
) -> Result<impl IntoResponse, AppError> {
    let user = user_service::create_user(&state.pool, body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Query(params): Query<UserListParams>,
) -> Result<impl IntoResponse, AppError> {
    check_list_page(params.skip, params.limit)?;
    let users = user_service::list_users(
        &state.pool,
        params.skip,
        params.limit,
        params.username.as_deref(),
        params.email.as_deref(),
        params.role,
        params.is_active,
    )
    .await?;
    Ok(Json(users))
}

pub async fn get_me(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Json(user)
}

pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<UserSelfUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let updated = user_service::update_self(&state.pool, user.meta.id, body).await?;
    Ok(Json(updated))
}

pub async fn get_user(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = user_service::get_user(&state.pool, id).await?;
    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
    Json(body): Json<UserUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let user = user_service::update_user(&state.pool, id, body).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    user_service::delete_user(&state.pool, id).await?;
    Ok(message("user deleted"))
}

pub async fn activate_user(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = user_service::set_user_active(&state.pool, id, true).await?;
    Ok(Json(user))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = user_service::set_user_active(&state.pool, id, false).await?;
    Ok(Json(user))
}
