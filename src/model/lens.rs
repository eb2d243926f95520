//! Lens. `lens_type` and `is_constant_aperture` are derived from the focal
//! and aperture bounds, never accepted from input.

use super::{default_true, RowMeta};
use crate::error::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::Row;
use std::str::FromStr;

pub const LENS_COLUMNS: &str = "id, created_at, updated_at, brand_id, mount_id, model, series, \
     min_focal_length, max_focal_length, lens_type, max_aperture_min, max_aperture_max, \
     is_constant_aperture, weight, height, diameter, filter_size, focus_type, \
     has_stabilization, min_focus_distance, magnification, release_date, release_price, \
     is_active, description";

pub const LENS_SORTABLE: &[&str] = &[
    "id",
    "model",
    "series",
    "min_focal_length",
    "max_focal_length",
    "max_aperture_min",
    "max_aperture_max",
    "filter_size",
    "weight",
    "release_date",
    "release_price",
    "brand_id",
    "mount_id",
    "created_at",
    "updated_at",
];

pub const LENS_SEARCH_FIELDS: &[&str] = &["model", "series", "description"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensType {
    Zoom,
    Prime,
}

impl LensType {
    pub fn as_str(self) -> &'static str {
        match self {
            LensType::Zoom => "zoom",
            LensType::Prime => "prime",
        }
    }

    pub const ALL: [LensType; 2] = [LensType::Zoom, LensType::Prime];
}

impl FromStr for LensType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zoom" => Ok(LensType::Zoom),
            "prime" => Ok(LensType::Prime),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusType {
    #[default]
    Auto,
    Manual,
}

impl FocusType {
    pub fn as_str(self) -> &'static str {
        match self {
            FocusType::Auto => "auto",
            FocusType::Manual => "manual",
        }
    }

    pub const ALL: [FocusType; 2] = [FocusType::Auto, FocusType::Manual];
}

impl FromStr for FocusType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(FocusType::Auto),
            "manual" => Ok(FocusType::Manual),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Lens {
    #[serde(flatten)]
    pub meta: RowMeta,
    pub brand_id: i64,
    pub mount_id: i64,
    pub model: String,
    pub series: Option<String>,
    pub min_focal_length: f64,
    pub max_focal_length: f64,
    pub lens_type: LensType,
    pub max_aperture_min: f64,
    pub max_aperture_max: Option<f64>,
    pub is_constant_aperture: bool,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub diameter: Option<f64>,
    pub filter_size: Option<f64>,
    pub focus_type: FocusType,
    pub has_stabilization: bool,
    pub min_focus_distance: Option<f64>,
    pub magnification: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub release_price: Option<f64>,
    pub is_active: bool,
    pub description: Option<String>,
}

impl Lens {
    pub fn from_row(row: &PgRow) -> Result<Self, AppError> {
        let lens_type_raw: String = row.try_get("lens_type")?;
        let lens_type = LensType::from_str(&lens_type_raw).map_err(|_| {
            AppError::Internal(format!("unexpected lens_type '{lens_type_raw}' in store"))
        })?;
        let focus_type_raw: String = row.try_get("focus_type")?;
        let focus_type = FocusType::from_str(&focus_type_raw).map_err(|_| {
            AppError::Internal(format!("unexpected focus_type '{focus_type_raw}' in store"))
        })?;
        Ok(Lens {
            meta: RowMeta::from_row(row)?,
            brand_id: row.try_get("brand_id")?,
            mount_id: row.try_get("mount_id")?,
            model: row.try_get("model")?,
            series: row.try_get("series")?,
            min_focal_length: row.try_get("min_focal_length")?,
            max_focal_length: row.try_get("max_focal_length")?,
            lens_type,
            max_aperture_min: row.try_get("max_aperture_min")?,
            max_aperture_max: row.try_get("max_aperture_max")?,
            is_constant_aperture: row.try_get("is_constant_aperture")?,
            weight: row.try_get("weight")?,
            height: row.try_get("height")?,
            diameter: row.try_get("diameter")?,
            filter_size: row.try_get("filter_size")?,
            focus_type,
            has_stabilization: row.try_get("has_stabilization")?,
            min_focus_distance: row.try_get("min_focus_distance")?,
            magnification: row.try_get("magnification")?,
            release_date: row.try_get("release_date")?,
            release_price: row.try_get("release_price")?,
            is_active: row.try_get("is_active")?,
            description: row.try_get("description")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LensCreate {
    pub brand_id: i64,
    pub mount_id: i64,
    pub model: String,
    pub series: Option<String>,
    pub min_focal_length: f64,
    pub max_focal_length: f64,
    pub max_aperture_min: f64,
    pub max_aperture_max: Option<f64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub diameter: Option<f64>,
    pub filter_size: Option<f64>,
    #[serde(default)]
    pub focus_type: FocusType,
    #[serde(default)]
    pub has_stabilization: bool,
    pub min_focus_distance: Option<f64>,
    pub magnification: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub release_price: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LensUpdate {
    pub brand_id: Option<i64>,
    pub mount_id: Option<i64>,
    pub model: Option<String>,
    pub series: Option<String>,
    pub min_focal_length: Option<f64>,
    pub max_focal_length: Option<f64>,
    pub max_aperture_min: Option<f64>,
    pub max_aperture_max: Option<f64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub diameter: Option<f64>,
    pub filter_size: Option<f64>,
    pub focus_type: Option<FocusType>,
    pub has_stabilization: Option<bool>,
    pub min_focus_distance: Option<f64>,
    pub magnification: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub release_price: Option<f64>,
    pub is_active: Option<bool>,
    pub description: Option<String>,
}

/// Coarse list filters for `GET /lenses/`.
#[derive(Debug, Deserialize)]
pub struct LensListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "super::query::default_limit")]
    pub limit: i64,
    pub is_active: Option<bool>,
    pub brand_id: Option<i64>,
    pub mount_id: Option<i64>,
    pub lens_type: Option<LensType>,
    pub focus_type: Option<FocusType>,
    pub has_stabilization: Option<bool>,
}
