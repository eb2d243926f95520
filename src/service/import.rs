//! Spreadsheet import: an .xlsx payload becomes entity rows, one outcome per
//! data row. Rows are processed independently; a bad row fails alone and the
//! report carries aggregate counts plus per-row detail. Header names are the
//! localized column titles used by the published templates; brand and mount
//! columns hold human-readable names that are resolved to ids per row.

use crate::model::brand::BrandType;
use crate::model::camera::SensorSize;
use crate::model::lens::FocusType;
use crate::model::{BrandCreate, CameraCreate, LensCreate};
use crate::service::{brand, camera, lens, validation};
use calamine::{Data, Reader, Xlsx};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use std::io::Cursor;
use std::str::FromStr;

const BRAND_HEADERS: &[(&str, &str)] = &[
    ("品牌名称", "name"),
    ("国家", "country"),
    ("官方网站", "website"),
    ("品牌描述", "description"),
    ("品牌类型", "brand_type"),
    ("是否激活", "is_active"),
];

const CAMERA_HEADERS: &[(&str, &str)] = &[
    ("品牌", "brand_name"),
    ("卡口", "mount_name"),
    ("型号", "model"),
    ("系列", "series"),
    ("传感器尺寸", "sensor_size"),
    ("像素", "megapixels"),
    ("防抖", "ibis_level"),
    ("热靴", "has_hot_shoe"),
    ("内置闪光灯", "has_built_in_flash"),
    ("WiFi", "has_wifi"),
    ("蓝牙", "has_bluetooth"),
    ("发布日期", "release_date"),
    ("价格", "release_price"),
    ("重量", "weight"),
    ("描述", "description"),
];

const LENS_HEADERS: &[(&str, &str)] = &[
    ("品牌", "brand_name"),
    ("卡口", "mount_name"),
    ("型号", "model"),
    ("系列", "series"),
    ("最小焦距", "min_focal_length"),
    ("最大焦距", "max_focal_length"),
    ("最大光圈", "max_aperture_min"),
    ("最小光圈", "max_aperture_max"),
    ("防抖", "has_stabilization"),
    ("对焦方式", "focus_type"),
    ("最近对焦距离", "min_focus_distance"),
    ("重量", "weight"),
    ("长度", "height"),
    ("滤镜口径", "filter_size"),
    ("发布日期", "release_date"),
    ("价格", "release_price"),
    ("描述", "description"),
];

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub total: usize,
    pub success: usize,
    pub failure: usize,
}

#[derive(Debug, Serialize)]
pub struct RowOutcome {
    pub row: usize,
    pub item: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ImportSummary>,
    pub results: Vec<RowOutcome>,
}

impl ImportReport {
    fn failed(message: impl Into<String>) -> Self {
        ImportReport {
            success: false,
            message: Some(message.into()),
            summary: None,
            results: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum CellValue {
    Text(String),
    Number(f64),
    Flag(bool),
    Date(NaiveDate),
}

impl CellValue {
    fn text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Flag(b) => b.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
            _ => None,
        }
    }
}

fn cell_value(data: &Data) -> Option<CellValue> {
    match data {
        Data::Empty => None,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(CellValue::Text(trimmed.to_string()))
            }
        }
        Data::Float(f) => Some(CellValue::Number(*f)),
        Data::Int(i) => Some(CellValue::Number(*i as f64)),
        Data::Bool(b) => Some(CellValue::Flag(*b)),
        Data::DateTime(dt) => dt.as_datetime().map(|d| CellValue::Date(d.date())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
        Data::Error(_) => None,
    }
}

/// Feature-flag cells: the "yes/true/1/是/有/支持" family is true.
fn truthy_flag(v: &CellValue) -> bool {
    match v {
        CellValue::Flag(b) => *b,
        CellValue::Number(n) => *n == 1.0,
        CellValue::Text(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "是" | "yes" | "true" | "1" | "有" | "支持"
        ),
        CellValue::Date(_) => false,
    }
}

/// Active-flag cells accept "激活" instead of the feature markers.
fn truthy_active(v: &CellValue) -> bool {
    match v {
        CellValue::Flag(b) => *b,
        CellValue::Number(n) => *n == 1.0,
        CellValue::Text(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "是" | "yes" | "true" | "1" | "激活"
        ),
        CellValue::Date(_) => false,
    }
}

fn parse_brand_type_cell(raw: &str) -> Result<BrandType, String> {
    let mapped = match raw {
        "相机" => "camera",
        "镜头" => "lens",
        "配件" => "accessory",
        other => other,
    };
    BrandType::from_str(&mapped.to_lowercase())
        .map_err(|_| format!("unrecognized brand type '{raw}'"))
}

fn parse_focus_type_cell(raw: &str) -> Result<FocusType, String> {
    let mapped = match raw {
        "自动" => "auto",
        "手动" => "manual",
        other => other,
    };
    FocusType::from_str(&mapped.to_lowercase())
        .map_err(|_| format!("unrecognized focus type '{raw}'"))
}

type RowMap = HashMap<&'static str, CellValue>;

/// Map sheet column indexes to field names using the localized header row.
fn header_map(header: &[Data], mapping: &[(&str, &'static str)]) -> HashMap<usize, &'static str> {
    let mut out = HashMap::new();
    for (idx, cell) in header.iter().enumerate() {
        if let Some(CellValue::Text(title)) = cell_value(cell) {
            if let Some((_, field)) = mapping.iter().find(|(label, _)| *label == title) {
                out.insert(idx, *field);
            }
        }
    }
    out
}

fn collect_fields(row: &[Data], columns: &HashMap<usize, &'static str>) -> RowMap {
    let mut out = RowMap::new();
    for (idx, cell) in row.iter().enumerate() {
        if let Some(field) = columns.get(&idx) {
            if let Some(value) = cell_value(cell) {
                out.insert(field, value);
            }
        }
    }
    out
}

fn sheet_rows(bytes: Vec<u8>) -> Result<Vec<Vec<Data>>, String> {
    let mut workbook =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| format!("could not read spreadsheet: {e}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| "spreadsheet has no sheets".to_string())?
        .map_err(|e| format!("could not read sheet: {e}"))?;
    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
    if rows.len() < 2 {
        return Err("spreadsheet has no data rows".to_string());
    }
    Ok(rows)
}

// Row-level failures carry (item label, message) so one bad row never aborts
// the batch.
type RowError = (String, String);

async fn resolve_refs(
    pool: &PgPool,
    fields: &RowMap,
    item: &str,
) -> Result<(i64, i64), RowError> {
    let brand_name = fields
        .get("brand_name")
        .map(|v| v.text())
        .ok_or_else(|| (item.to_string(), "brand column is empty".to_string()))?;
    let mount_name = fields
        .get("mount_name")
        .map(|v| v.text())
        .ok_or_else(|| (item.to_string(), "mount column is empty".to_string()))?;
    let brand_id = validation::find_brand_id_by_name(pool, &brand_name)
        .await
        .map_err(|e| (item.to_string(), e.to_string()))?
        .ok_or_else(|| (item.to_string(), format!("unknown brand: {brand_name}")))?;
    let mount_id = validation::find_mount_id_by_name(pool, &mount_name)
        .await
        .map_err(|e| (item.to_string(), e.to_string()))?
        .ok_or_else(|| (item.to_string(), format!("unknown mount: {mount_name}")))?;
    Ok((brand_id, mount_id))
}

fn required_number(fields: &RowMap, field: &str, label: &str, item: &str) -> Result<f64, RowError> {
    fields
        .get(field)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| (item.to_string(), format!("{label} must be a number")))
}

async fn import_brand_row(pool: &PgPool, fields: &RowMap) -> Result<String, RowError> {
    let name = match fields.get("name").map(|v| v.text()) {
        Some(n) if !n.is_empty() => n,
        _ => return Err(("unknown".to_string(), "brand name must not be empty".to_string())),
    };
    let brand_type = match fields.get("brand_type") {
        Some(v) => parse_brand_type_cell(&v.text()).map_err(|e| (name.clone(), e))?,
        None => BrandType::default(),
    };
    let data = BrandCreate {
        name: name.clone(),
        description: fields.get("description").map(|v| v.text()),
        website: fields.get("website").map(|v| v.text()),
        country: fields.get("country").map(|v| v.text()),
        brand_type,
        is_active: fields.get("is_active").map(truthy_active).unwrap_or(true),
    };
    brand::create_brand(pool, data)
        .await
        .map_err(|e| (name.clone(), e.to_string()))?;
    Ok(name)
}

async fn import_camera_row(pool: &PgPool, fields: &RowMap) -> Result<String, RowError> {
    let model = match fields.get("model").map(|v| v.text()) {
        Some(m) if !m.is_empty() => m,
        _ => return Err(("unknown".to_string(), "camera model must not be empty".to_string())),
    };
    let (brand_id, mount_id) = resolve_refs(pool, fields, &model).await?;
    let sensor_size = match fields.get("sensor_size") {
        Some(v) => {
            let raw = v.text();
            Some(
                SensorSize::from_str(&raw.to_lowercase())
                    .map_err(|_| (model.clone(), format!("unrecognized sensor size '{raw}'")))?,
            )
        }
        None => None,
    };
    let data = CameraCreate {
        brand_id,
        mount_id,
        model: model.clone(),
        series: fields.get("series").map(|v| v.text()),
        sensor_size,
        megapixels: fields.get("megapixels").and_then(|v| v.as_f64()),
        ibis_level: fields.get("ibis_level").map(|v| v.text()),
        has_hot_shoe: fields.get("has_hot_shoe").map(truthy_flag).unwrap_or(true),
        has_built_in_flash: fields
            .get("has_built_in_flash")
            .map(truthy_flag)
            .unwrap_or(false),
        has_wifi: fields.get("has_wifi").map(truthy_flag).unwrap_or(true),
        has_bluetooth: fields.get("has_bluetooth").map(truthy_flag).unwrap_or(true),
        release_date: fields.get("release_date").and_then(|v| v.as_date()),
        release_price: fields.get("release_price").and_then(|v| v.as_f64()),
        weight: fields.get("weight").and_then(|v| v.as_f64()),
        is_active: true,
        description: fields.get("description").map(|v| v.text()),
    };
    camera::create_camera(pool, data)
        .await
        .map_err(|e| (model.clone(), e.to_string()))?;
    Ok(model)
}

async fn import_lens_row(pool: &PgPool, fields: &RowMap) -> Result<String, RowError> {
    let model = match fields.get("model").map(|v| v.text()) {
        Some(m) if !m.is_empty() => m,
        _ => return Err(("unknown".to_string(), "lens model must not be empty".to_string())),
    };
    let (brand_id, mount_id) = resolve_refs(pool, fields, &model).await?;
    let focus_type = match fields.get("focus_type") {
        Some(v) => parse_focus_type_cell(&v.text()).map_err(|e| (model.clone(), e))?,
        None => FocusType::default(),
    };
    let data = LensCreate {
        brand_id,
        mount_id,
        model: model.clone(),
        series: fields.get("series").map(|v| v.text()),
        min_focal_length: required_number(fields, "min_focal_length", "min focal length", &model)?,
        max_focal_length: required_number(fields, "max_focal_length", "max focal length", &model)?,
        max_aperture_min: required_number(fields, "max_aperture_min", "max aperture", &model)?,
        max_aperture_max: fields.get("max_aperture_max").and_then(|v| v.as_f64()),
        weight: fields.get("weight").and_then(|v| v.as_f64()),
        height: fields.get("height").and_then(|v| v.as_f64()),
        diameter: None,
        filter_size: fields.get("filter_size").and_then(|v| v.as_f64()),
        focus_type,
        has_stabilization: fields
            .get("has_stabilization")
            .map(truthy_flag)
            .unwrap_or(false),
        min_focus_distance: fields.get("min_focus_distance").and_then(|v| v.as_f64()),
        magnification: None,
        release_date: fields.get("release_date").and_then(|v| v.as_date()),
        release_price: fields.get("release_price").and_then(|v| v.as_f64()),
        is_active: true,
        description: fields.get("description").map(|v| v.text()),
    };
    lens::create_lens(pool, data)
        .await
        .map_err(|e| (model.clone(), e.to_string()))?;
    Ok(model)
}

macro_rules! run_import {
    ($pool:expr, $bytes:expr, $mapping:expr, $required_field:expr, $required_label:expr, $row_fn:ident) => {{
        let rows = match sheet_rows($bytes) {
            Ok(rows) => rows,
            Err(message) => return ImportReport::failed(message),
        };
        let columns = header_map(&rows[0], $mapping);
        if !columns.values().any(|f| *f == $required_field) {
            return ImportReport::failed(format!("missing required column: {}", $required_label));
        }
        let mut success = 0usize;
        let mut failure = 0usize;
        let mut results = Vec::with_capacity(rows.len() - 1);
        for (index, row) in rows.iter().enumerate().skip(1) {
            // Report rows the way a spreadsheet user counts them: header is row 1.
            let row_num = index + 1;
            let fields = collect_fields(row, &columns);
            match $row_fn($pool, &fields).await {
                Ok(item) => {
                    success += 1;
                    results.push(RowOutcome {
                        row: row_num,
                        item,
                        status: "success",
                        message: None,
                    });
                }
                Err((item, message)) => {
                    failure += 1;
                    results.push(RowOutcome {
                        row: row_num,
                        item,
                        status: "failure",
                        message: Some(message),
                    });
                }
            }
        }
        ImportReport {
            success: true,
            message: None,
            summary: Some(ImportSummary {
                total: rows.len() - 1,
                success,
                failure,
            }),
            results,
        }
    }};
}

pub async fn import_brands(pool: &PgPool, bytes: Vec<u8>) -> ImportReport {
    run_import!(pool, bytes, BRAND_HEADERS, "name", "品牌名称", import_brand_row)
}

pub async fn import_cameras(pool: &PgPool, bytes: Vec<u8>) -> ImportReport {
    run_import!(pool, bytes, CAMERA_HEADERS, "model", "型号", import_camera_row)
}

pub async fn import_lenses(pool: &PgPool, bytes: Vec<u8>) -> ImportReport {
    run_import!(pool, bytes, LENS_HEADERS, "model", "型号", import_lens_row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_normalization_accepts_the_documented_families() {
        for raw in ["是", "yes", "TRUE", "1", "有", "支持"] {
            assert!(truthy_flag(&CellValue::Text(raw.to_string())), "{raw}");
        }
        for raw in ["否", "no", "false", "0", "无"] {
            assert!(!truthy_flag(&CellValue::Text(raw.to_string())), "{raw}");
        }
        assert!(truthy_active(&CellValue::Text("激活".to_string())));
        assert!(!truthy_flag(&CellValue::Text("激活".to_string())));
        assert!(truthy_flag(&CellValue::Number(1.0)));
        assert!(!truthy_flag(&CellValue::Number(0.0)));
    }

    #[test]
    fn header_map_resolves_localized_titles() {
        let header = vec![
            Data::String("品牌".to_string()),
            Data::String("卡口".to_string()),
            Data::String("型号".to_string()),
            Data::String("unrelated".to_string()),
        ];
        let columns = header_map(&header, CAMERA_HEADERS);
        assert_eq!(columns.get(&0), Some(&"brand_name"));
        assert_eq!(columns.get(&1), Some(&"mount_name"));
        assert_eq!(columns.get(&2), Some(&"model"));
        assert_eq!(columns.get(&3), None);
    }

    #[test]
    fn numeric_cells_render_as_clean_text() {
        assert_eq!(CellValue::Number(85.0).text(), "85");
        assert_eq!(CellValue::Number(1.8).text(), "1.8");
    }

    #[test]
    fn brand_type_cells_accept_localized_and_wire_names() {
        assert_eq!(parse_brand_type_cell("相机").unwrap(), BrandType::Camera);
        assert_eq!(parse_brand_type_cell("镜头").unwrap(), BrandType::Lens);
        assert_eq!(parse_brand_type_cell("Accessory").unwrap(), BrandType::Accessory);
        assert!(parse_brand_type_cell("胶卷").is_err());
    }

    #[test]
    fn collect_fields_skips_empty_cells() {
        let header = vec![
            Data::String("型号".to_string()),
            Data::String("系列".to_string()),
        ];
        let columns = header_map(&header, CAMERA_HEADERS);
        let row = vec![Data::String("EOS R5".to_string()), Data::Empty];
        let fields = collect_fields(&row, &columns);
        assert_eq!(fields.get("model"), Some(&CellValue::Text("EOS R5".to_string())));
        assert!(!fields.contains_key("series"));
    }
}
