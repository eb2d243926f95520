//! Request extractors implementing the auth gates.
//!
//! `CurrentUser` requires a valid, unexpired bearer token for an active
//! account. `AdminUser` additionally requires the admin role.

use crate::auth::token;
use crate::error::AppError;
use crate::model::{User, UserRole};
use crate::service::validation;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

pub struct CurrentUser(pub User);

pub struct AdminUser(pub User);

fn bearer_token(parts: &Parts) -> Option<&str> {
    let auth = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;
    let auth = auth.trim();
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;
        let username = token::decode_subject(&state.config, token)?;
        let user = validation::get_user_by_username(&state.pool, &username)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => {
                    AppError::Unauthorized("could not validate credentials".into())
                }
                other => other,
            })?;
        if !user.is_active {
            return Err(AppError::Unauthorized("account disabled".into()));
        }
        Ok(CurrentUser(user))
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Admin {
            return Err(AppError::Forbidden("admin privileges required".into()));
        }
        Ok(AdminUser(user))
    }
}
