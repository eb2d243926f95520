//! Camera body.

use super::{default_true, RowMeta};
use crate::error::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;
use std::str::FromStr;

pub const CAMERA_COLUMNS: &str = "id, created_at, updated_at, brand_id, mount_id, model, series, \
     sensor_size, megapixels, ibis_level, has_hot_shoe, has_built_in_flash, has_wifi, \
     has_bluetooth, release_date, release_price, weight, is_active, description";

/// Columns accepted by `sort_by` on the advanced query endpoint. Anything
/// else is ignored and the result falls back to id order.
pub const CAMERA_SORTABLE: &[&str] = &[
    "id",
    "model",
    "series",
    "sensor_size",
    "megapixels",
    "release_date",
    "release_price",
    "weight",
    "brand_id",
    "mount_id",
    "created_at",
    "updated_at",
];

pub const CAMERA_SEARCH_FIELDS: &[&str] = &["model", "series", "description"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorSize {
    MediumFormat,
    FullFrame,
    ApsC,
    M43,
    OneInch,
    Other,
}

impl SensorSize {
    pub fn as_str(self) -> &'static str {
        match self {
            SensorSize::MediumFormat => "medium_format",
            SensorSize::FullFrame => "full_frame",
            SensorSize::ApsC => "aps_c",
            SensorSize::M43 => "m43",
            SensorSize::OneInch => "one_inch",
            SensorSize::Other => "other",
        }
    }

    pub const ALL: [SensorSize; 6] = [
        SensorSize::MediumFormat,
        SensorSize::FullFrame,
        SensorSize::ApsC,
        SensorSize::M43,
        SensorSize::OneInch,
        SensorSize::Other,
    ];
}

impl FromStr for SensorSize {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medium_format" => Ok(SensorSize::MediumFormat),
            "full_frame" => Ok(SensorSize::FullFrame),
            "aps_c" => Ok(SensorSize::ApsC),
            "m43" => Ok(SensorSize::M43),
            "one_inch" => Ok(SensorSize::OneInch),
            "other" => Ok(SensorSize::Other),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Camera {
    #[serde(flatten)]
    pub meta: RowMeta,
    pub brand_id: i64,
    pub mount_id: i64,
    pub model: String,
    pub series: Option<String>,
    pub sensor_size: Option<SensorSize>,
    pub megapixels: Option<f64>,
    pub ibis_level: Option<String>,
    pub has_hot_shoe: bool,
    pub has_built_in_flash: bool,
    pub has_wifi: bool,
    pub has_bluetooth: bool,
    pub release_date: Option<NaiveDate>,
    pub release_price: Option<f64>,
    pub weight: Option<f64>,
    pub is_active: bool,
    pub description: Option<String>,
}

impl Camera {
    pub fn from_row(row: &PgRow) -> Result<Self, AppError> {
        let sensor_size = match row.try_get::<Option<String>, _>("sensor_size")? {
            Some(raw) => Some(SensorSize::from_str(&raw).map_err(|_| {
                AppError::Internal(format!("unexpected sensor_size '{raw}' in store"))
            })?),
            None => None,
        };
        Ok(Camera {
            meta: RowMeta::from_row(row)?,
            brand_id: row.try_get("brand_id")?,
            mount_id: row.try_get("mount_id")?,
            model: row.try_get("model")?,
            series: row.try_get("series")?,
            sensor_size,
            megapixels: row.try_get("megapixels")?,
            ibis_level: row.try_get("ibis_level")?,
            has_hot_shoe: row.try_get("has_hot_shoe")?,
            has_built_in_flash: row.try_get("has_built_in_flash")?,
            has_wifi: row.try_get("has_wifi")?,
            has_bluetooth: row.try_get("has_bluetooth")?,
            release_date: row.try_get("release_date")?,
            release_price: row.try_get("release_price")?,
            weight: row.try_get("weight")?,
            is_active: row.try_get("is_active")?,
            description: row.try_get("description")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CameraCreate {
    pub brand_id: i64,
    pub mount_id: i64,
    pub model: String,
    pub series: Option<String>,
    pub sensor_size: Option<SensorSize>,
    pub megapixels: Option<f64>,
    pub ibis_level: Option<String>,
    #[serde(default = "default_true")]
    pub has_hot_shoe: bool,
    #[serde(default)]
    pub has_built_in_flash: bool,
    #[serde(default = "default_true")]
    pub has_wifi: bool,
    #[serde(default = "default_true")]
    pub has_bluetooth: bool,
    pub release_date: Option<NaiveDate>,
    pub release_price: Option<f64>,
    pub weight: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CameraUpdate {
    pub brand_id: Option<i64>,
    pub mount_id: Option<i64>,
    pub model: Option<String>,
    pub series: Option<String>,
    pub sensor_size: Option<SensorSize>,
    pub megapixels: Option<f64>,
    pub ibis_level: Option<String>,
    pub has_hot_shoe: Option<bool>,
    pub has_built_in_flash: Option<bool>,
    pub has_wifi: Option<bool>,
    pub has_bluetooth: Option<bool>,
    pub release_date: Option<NaiveDate>,
    pub release_price: Option<f64>,
    pub weight: Option<f64>,
    pub is_active: Option<bool>,
    pub description: Option<String>,
}

/// Coarse list filters for `GET /cameras/`.
#[derive(Debug, Deserialize)]
pub struct CameraListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "super::query::default_limit")]
    pub limit: i64,
    pub is_active: Option<bool>,
    pub brand_id: Option<i64>,
    pub mount_id: Option<i64>,
    pub sensor_size: Option<SensorSize>,
}
