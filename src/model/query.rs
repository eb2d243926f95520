//! Advanced query parameters for the camera and lens query endpoints, plus
//! the shared result envelope.
//!
//! Pagination bounds are enforced at the boundary (422), never clamped.
//! Comma-separated id/enum lists arrive as strings and are parsed into typed
//! lists here before anything reaches the engine.

use crate::error::AppError;
use crate::model::camera::SensorSize;
use crate::model::lens::{FocusType, LensType};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Advanced query endpoints page at most this many rows.
pub const QUERY_LIMIT_MAX: i64 = 100;
/// Coarse list endpoints allow larger pages.
pub const LIST_LIMIT_MAX: i64 = 1000;

pub(crate) fn default_limit() -> i64 {
    100
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Reject out-of-range pagination on the advanced query endpoints.
pub fn check_query_page(skip: i64, limit: i64) -> Result<(), AppError> {
    if skip < 0 {
        return Err(AppError::Validation("skip must be >= 0".into()));
    }
    if !(1..=QUERY_LIMIT_MAX).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {QUERY_LIMIT_MAX}"
        )));
    }
    Ok(())
}

/// Reject out-of-range pagination on the coarse list endpoints.
pub fn check_list_page(skip: i64, limit: i64) -> Result<(), AppError> {
    if skip < 0 {
        return Err(AppError::Validation("skip must be >= 0".into()));
    }
    if !(1..=LIST_LIMIT_MAX).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {LIST_LIMIT_MAX}"
        )));
    }
    Ok(())
}

pub fn parse_id_list(raw: &str) -> Result<Vec<i64>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| AppError::Validation(format!("invalid id '{s}' in list")))
        })
        .collect()
}

pub fn parse_enum_list<T: FromStr>(raw: &str, what: &str) -> Result<Vec<T>, AppError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            T::from_str(s).map_err(|_| AppError::Validation(format!("invalid {what} '{s}' in list")))
        })
        .collect()
}

/// Free-text search parameters for the coarse search endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// Result envelope for the advanced query endpoints. `total` ignores
/// pagination; rows are denormalized with `brand_name` and `mount_name`.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub data: Vec<serde_json::Value>,
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
    pub has_more: bool,
}

pub fn has_more(skip: i64, limit: i64, total: i64) -> bool {
    skip + limit < total
}

#[derive(Debug, Default, Deserialize)]
pub struct CameraQueryParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: SortOrder,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub brand_id: Option<i64>,
    pub brand_ids: Option<String>,
    pub mount_id: Option<i64>,
    pub mount_ids: Option<String>,
    pub sensor_size: Option<SensorSize>,
    pub sensor_sizes: Option<String>,
    pub megapixels_min: Option<f64>,
    pub megapixels_max: Option<f64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub weight_min: Option<f64>,
    pub weight_max: Option<f64>,
    pub has_wifi: Option<bool>,
    pub has_bluetooth: Option<bool>,
    pub has_hot_shoe: Option<bool>,
    pub has_built_in_flash: Option<bool>,
    pub release_year_min: Option<i32>,
    pub release_year_max: Option<i32>,
    pub series: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LensQueryParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: SortOrder,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub brand_id: Option<i64>,
    pub brand_ids: Option<String>,
    pub mount_id: Option<i64>,
    pub mount_ids: Option<String>,
    pub lens_type: Option<LensType>,
    pub lens_types: Option<String>,
    pub focus_type: Option<FocusType>,
    pub focus_types: Option<String>,
    pub focal_length_min: Option<f64>,
    pub focal_length_max: Option<f64>,
    pub aperture_min: Option<f64>,
    pub aperture_max: Option<f64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub weight_min: Option<f64>,
    pub weight_max: Option<f64>,
    pub has_stabilization: Option<bool>,
    pub is_constant_aperture: Option<bool>,
    pub filter_size_min: Option<f64>,
    pub filter_size_max: Option<f64>,
    pub release_year_min: Option<i32>,
    pub release_year_max: Option<i32>,
    pub series: Option<String>,
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_page_bounds_are_strict() {
        assert!(check_query_page(0, 1).is_ok());
        assert!(check_query_page(0, 100).is_ok());
        assert!(check_query_page(-1, 10).is_err());
        assert!(check_query_page(0, 0).is_err());
        assert!(check_query_page(0, 101).is_err());
    }

    #[test]
    fn id_lists_parse_and_reject_junk() {
        assert_eq!(parse_id_list("1,2, 3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_id_list("7").unwrap(), vec![7]);
        assert!(parse_id_list("1,x,3").is_err());
    }

    #[test]
    fn enum_lists_parse_by_wire_name() {
        let sizes: Vec<SensorSize> =
            parse_enum_list("full_frame,aps_c", "sensor size").unwrap();
        assert_eq!(sizes, vec![SensorSize::FullFrame, SensorSize::ApsC]);
        assert!(parse_enum_list::<SensorSize>("full_frame,bogus", "sensor size").is_err());
    }

    #[test]
    fn has_more_flips_at_the_page_boundary() {
        assert!(has_more(0, 2, 3));
        assert!(!has_more(2, 2, 3));
        assert!(!has_more(0, 3, 3));
    }
}
