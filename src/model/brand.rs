//! Brand: a camera or lens manufacturer.

use super::{default_true, RowMeta};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;
use std::str::FromStr;

pub const BRAND_COLUMNS: &str =
    "id, created_at, updated_at, name, description, website, country, brand_type, is_active";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandType {
    #[default]
    Camera,
    Lens,
    Accessory,
    Other,
}

impl BrandType {
    pub fn as_str(self) -> &'static str {
        match self {
            BrandType::Camera => "camera",
            BrandType::Lens => "lens",
            BrandType::Accessory => "accessory",
            BrandType::Other => "other",
        }
    }

    pub const ALL: [BrandType; 4] = [
        BrandType::Camera,
        BrandType::Lens,
        BrandType::Accessory,
        BrandType::Other,
    ];
}

impl FromStr for BrandType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "camera" => Ok(BrandType::Camera),
            "lens" => Ok(BrandType::Lens),
            "accessory" => Ok(BrandType::Accessory),
            "other" => Ok(BrandType::Other),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Brand {
    #[serde(flatten)]
    pub meta: RowMeta,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
    pub brand_type: BrandType,
    pub is_active: bool,
}

impl Brand {
    pub fn from_row(row: &PgRow) -> Result<Self, AppError> {
        let raw: String = row.try_get("brand_type")?;
        let brand_type = BrandType::from_str(&raw)
            .map_err(|_| AppError::Internal(format!("unexpected brand_type '{raw}' in store")))?;
        Ok(Brand {
            meta: RowMeta::from_row(row)?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            website: row.try_get("website")?,
            country: row.try_get("country")?,
            brand_type,
            is_active: row.try_get("is_active")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BrandCreate {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub brand_type: BrandType,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct BrandUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
    pub brand_type: Option<BrandType>,
    pub is_active: Option<bool>,
}

/// Coarse list filters for `GET /brands/`.
#[derive(Debug, Deserialize)]
pub struct BrandListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "super::query::default_limit")]
    pub limit: i64,
    pub is_active: Option<bool>,
    pub brand_type: Option<BrandType>,
}
