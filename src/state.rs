//! Shared application state for all routes.

use crate::config::AppConfig;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use sqlx::PgPool;
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Template downloads are static-file serving; keep abuse off the disk.
pub const TEMPLATE_REQUESTS_PER_MINUTE: u32 = 5;

pub type TemplateLimiter = DefaultKeyedRateLimiter<IpAddr>;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub template_limiter: Arc<TemplateLimiter>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        let quota = Quota::per_minute(
            NonZeroU32::new(TEMPLATE_REQUESTS_PER_MINUTE).expect("quota is nonzero"),
        );
        AppState {
            pool,
            config: Arc::new(config),
            template_limiter: Arc::new(RateLimiter::keyed(quota)),
        }
    }
}
