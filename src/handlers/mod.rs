//! HTTP handlers, one module per resource. Shared helpers for uploads,
//! client addressing, and template downloads live here.

pub mod auth;
pub mod brands;
pub mod cameras;
pub mod lenses;
pub mod mounts;
pub mod users;

use crate::error::AppError;
use crate::state::AppState;
use axum::extract::multipart::Multipart;
use axum::extract::ConnectInfo;
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Prefer the proxy-reported address, fall back to the socket peer.
pub(crate) fn client_ip(
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    headers: &HeaderMap,
) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse().ok())
        .or_else(|| connect_info.map(|ci| ci.0.ip()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Serve a static import template, rate-limited per client address.
pub(crate) async fn serve_template(
    state: &AppState,
    ip: IpAddr,
    file_name: &str,
) -> Result<impl IntoResponse, AppError> {
    if state.template_limiter.check_key(&ip).is_err() {
        return Err(AppError::RateLimited(
            "template downloads are limited to 5 per minute".into(),
        ));
    }
    let path = std::path::Path::new(&state.config.template_dir).join(file_name);
    let bytes = tokio::fs::read(&path).await.map_err(|_| {
        AppError::NotFound(format!("template '{file_name}' is not available"))
    })?;
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}

/// Pull the `file` part out of a multipart upload.
pub(crate) async fn read_upload(multipart: &mut Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("could not read upload: {e}")))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(AppError::Validation("multipart field 'file' is required".into()))
}
