//! Entity types, request/response DTOs, and query parameter models.

pub mod brand;
pub mod camera;
pub mod lens;
pub mod mount;
pub mod query;
pub mod user;

pub use brand::{Brand, BrandCreate, BrandType, BrandUpdate};
pub use camera::{Camera, CameraCreate, CameraUpdate, SensorSize};
pub use lens::{FocusType, Lens, LensCreate, LensType, LensUpdate};
pub use mount::{BrandMount, BrandMountCreate, Mount, MountCreate, MountUpdate};
pub use user::{User, UserCreate, UserRole, UserSelfUpdate, UserUpdate};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::Row;

/// Server-assigned identity and timestamps, embedded in every entity.
/// `updated_at` is refreshed by every mutating statement.
#[derive(Debug, Clone, Serialize)]
pub struct RowMeta {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RowMeta {
    pub(crate) fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(RowMeta {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

pub(crate) fn default_true() -> bool {
    true
}
