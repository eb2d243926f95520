//! Mount: the physical lens-to-body coupling standard. One-to-many with
//! cameras and lenses, many-to-many with brands via `brand_mounts`.

use super::{default_true, RowMeta};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;

pub const MOUNT_COLUMNS: &str =
    "id, created_at, updated_at, name, flange_distance, release_year, description, is_active";

pub const BRAND_MOUNT_COLUMNS: &str = "brand_id, mount_id, is_primary, compatibility_notes";

#[derive(Debug, Clone, Serialize)]
pub struct Mount {
    #[serde(flatten)]
    pub meta: RowMeta,
    pub name: String,
    pub flange_distance: Option<f64>,
    pub release_year: Option<i32>,
    pub description: Option<String>,
    pub is_active: bool,
}

impl Mount {
    pub fn from_row(row: &PgRow) -> Result<Self, AppError> {
        Ok(Mount {
            meta: RowMeta::from_row(row)?,
            name: row.try_get("name")?,
            flange_distance: row.try_get("flange_distance")?,
            release_year: row.try_get("release_year")?,
            description: row.try_get("description")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct MountCreate {
    pub name: String,
    pub flange_distance: Option<f64>,
    pub release_year: Option<i32>,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct MountUpdate {
    pub name: Option<String>,
    pub flange_distance: Option<f64>,
    pub release_year: Option<i32>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Association row between a brand and a mount it supports.
#[derive(Debug, Clone, Serialize)]
pub struct BrandMount {
    pub brand_id: i64,
    pub mount_id: i64,
    pub is_primary: bool,
    pub compatibility_notes: String,
}

impl BrandMount {
    pub fn from_row(row: &PgRow) -> Result<Self, AppError> {
        Ok(BrandMount {
            brand_id: row.try_get("brand_id")?,
            mount_id: row.try_get("mount_id")?,
            is_primary: row.try_get("is_primary")?,
            compatibility_notes: row.try_get("compatibility_notes")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BrandMountCreate {
    pub brand_id: i64,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub compatibility_notes: String,
}

/// Coarse list filters for `GET /mounts/`.
#[derive(Debug, Deserialize)]
pub struct MountListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "super::query::default_limit")]
    pub limit: i64,
    pub is_active: Option<bool>,
}
