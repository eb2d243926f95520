//! Generic filter/sort/search/paginate engine shared by cameras and lenses.
//!
//! The caller supplies a [`ConditionSet`] plus sort and page bounds; the
//! engine runs the count query and the page query off the same conditions and
//! denormalizes each row with its brand and mount names, batch-resolved with
//! one IN-query per related table.

use crate::error::AppError;
use crate::model::query::{has_more, QueryResponse, SortOrder};
use crate::sql::{bind_query, bind_scalar, ConditionSet, QueryBuf};
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};

pub struct PagedQuery {
    pub table: &'static str,
    pub columns: &'static str,
    pub conditions: ConditionSet,
    pub order_clause: String,
    pub skip: i64,
    pub limit: i64,
}

/// Build the ORDER BY clause. Unknown sort fields are ignored rather than
/// rejected; the page falls back to id order.
pub fn order_clause(sort_by: Option<&str>, order: SortOrder, sortable: &[&str]) -> String {
    match sort_by {
        Some(field) if sortable.contains(&field) => {
            format!(" ORDER BY {} {}", field, order.as_sql())
        }
        _ => " ORDER BY id".to_string(),
    }
}

pub async fn fetch_page<T>(
    pool: &PgPool,
    plan: &PagedQuery,
    map: fn(&PgRow) -> Result<T, AppError>,
) -> Result<(Vec<T>, i64), AppError> {
    let count_sql = format!(
        "SELECT COUNT(*) FROM {}{}",
        plan.table,
        plan.conditions.where_clause()
    );
    let total: i64 = bind_scalar(sqlx::query_scalar(&count_sql), plan.conditions.params())
        .fetch_one(pool)
        .await?;

    let page_sql = format!(
        "SELECT {} FROM {}{}{} LIMIT {} OFFSET {}",
        plan.columns,
        plan.table,
        plan.conditions.where_clause(),
        plan.order_clause,
        plan.limit,
        plan.skip
    );
    tracing::debug!(sql = %page_sql, "query");
    let rows = bind_query(sqlx::query(&page_sql), plan.conditions.params())
        .fetch_all(pool)
        .await?;
    let items = rows.iter().map(map).collect::<Result<Vec<_>, _>>()?;
    Ok((items, total))
}

/// Batch-resolve ids to names from a lookup table (brands or mounts).
pub async fn name_lookup(
    pool: &PgPool,
    table: &str,
    ids: &[i64],
) -> Result<HashMap<i64, String>, AppError> {
    let unique: HashSet<i64> = ids.iter().copied().collect();
    if unique.is_empty() {
        return Ok(HashMap::new());
    }
    let mut q = QueryBuf::new();
    let placeholders: Vec<String> = unique
        .iter()
        .map(|id| format!("${}", q.push_param(crate::sql::BindValue::I64(*id))))
        .collect();
    q.sql = format!(
        "SELECT id, name FROM {table} WHERE id IN ({})",
        placeholders.join(", ")
    );
    let rows = bind_query(sqlx::query(&q.sql), &q.params)
        .fetch_all(pool)
        .await?;
    let mut out = HashMap::with_capacity(rows.len());
    for row in &rows {
        use sqlx::Row;
        out.insert(row.try_get::<i64, _>("id")?, row.try_get::<String, _>("name")?);
    }
    Ok(out)
}

/// Serialize each item and splice in `brand_name` / `mount_name`.
pub fn attach_names<T, F>(
    items: Vec<T>,
    brand_names: &HashMap<i64, String>,
    mount_names: &HashMap<i64, String>,
    keys_of: F,
) -> Result<Vec<Value>, AppError>
where
    T: Serialize,
    F: Fn(&T) -> (i64, i64),
{
    items
        .into_iter()
        .map(|item| {
            let (brand_id, mount_id) = keys_of(&item);
            let mut value = serde_json::to_value(&item)
                .map_err(|e| AppError::Internal(format!("serialization failed: {e}")))?;
            if let Value::Object(ref mut map) = value {
                map.insert(
                    "brand_name".to_string(),
                    brand_names
                        .get(&brand_id)
                        .cloned()
                        .map(Value::String)
                        .unwrap_or(Value::Null),
                );
                map.insert(
                    "mount_name".to_string(),
                    mount_names
                        .get(&mount_id)
                        .cloned()
                        .map(Value::String)
                        .unwrap_or(Value::Null),
                );
            }
            Ok(value)
        })
        .collect()
}

pub fn envelope(data: Vec<Value>, total: i64, skip: i64, limit: i64) -> QueryResponse {
    QueryResponse {
        data,
        total,
        skip,
        limit,
        has_more: has_more(skip, limit, total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SORTABLE: &[&str] = &["id", "model", "release_price"];

    #[test]
    fn known_sort_fields_order_the_page() {
        assert_eq!(
            order_clause(Some("release_price"), SortOrder::Desc, SORTABLE),
            " ORDER BY release_price DESC"
        );
        assert_eq!(
            order_clause(Some("model"), SortOrder::Asc, SORTABLE),
            " ORDER BY model ASC"
        );
    }

    #[test]
    fn unknown_sort_fields_fall_back_to_id_order() {
        assert_eq!(
            order_clause(Some("no_such_column"), SortOrder::Desc, SORTABLE),
            " ORDER BY id"
        );
        assert_eq!(order_clause(None, SortOrder::Asc, SORTABLE), " ORDER BY id");
    }

    #[test]
    fn attach_names_splices_resolved_names_and_nulls_for_misses() {
        #[derive(Serialize)]
        struct Item {
            brand_id: i64,
            mount_id: i64,
        }
        let brands = HashMap::from([(1, "Canon".to_string())]);
        let mounts = HashMap::new();
        let values = attach_names(
            vec![Item {
                brand_id: 1,
                mount_id: 9,
            }],
            &brands,
            &mounts,
            |i| (i.brand_id, i.mount_id),
        )
        .unwrap();
        assert_eq!(values[0]["brand_name"], "Canon");
        assert_eq!(values[0]["mount_name"], Value::Null);
    }
}
