//! Login, token refresh, and the current-user profile.

use crate::auth::{issue_token, CurrentUser};
use crate::error::AppError;
use crate::model::User;
use crate::state::AppState;
use axum::extract::State;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = crate::service::user::authenticate(&state.pool, &form.username, &form.password).await?;
    let access_token = issue_token(&state.config, &user.username)?;
    tracing::info!(username = %user.username, "login");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        expires_in: state.config.token_ttl_minutes * 60,
        user: Some(user),
    }))
}

/// Re-issue a token for an already-authenticated caller; no password check.
pub async fn refresh(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<TokenResponse>, AppError> {
    let access_token = issue_token(&state.config, &user.username)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        expires_in: state.config.token_ttl_minutes * 60,
        user: None,
    }))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
