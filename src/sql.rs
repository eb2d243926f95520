//! Parameterized SQL assembly for statements whose shape depends on input:
//! partial updates and the filter engine's WHERE clauses.
//!
//! Static statements (inserts, lookups by key) are written inline in the
//! services and bind their values directly.

use chrono::NaiveDate;
use sqlx::postgres::PgArguments;
use sqlx::query::{Query, QueryScalar};
use sqlx::Postgres;

/// A value queued for binding to a positional placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    I64(i64),
    I32(i32),
    F64(f64),
    Bool(bool),
    Text(String),
    Date(NaiveDate),
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    pub fn new() -> Self {
        QueryBuf::default()
    }

    /// Queue a value and return its 1-based placeholder number.
    pub fn push_param(&mut self, v: BindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

pub fn bind_query<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [BindValue],
) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        query = match p {
            BindValue::I64(n) => query.bind(*n),
            BindValue::I32(n) => query.bind(*n),
            BindValue::F64(n) => query.bind(*n),
            BindValue::Bool(b) => query.bind(*b),
            BindValue::Text(s) => query.bind(s.as_str()),
            BindValue::Date(d) => query.bind(*d),
        };
    }
    query
}

pub fn bind_scalar<'q, O>(
    mut query: QueryScalar<'q, Postgres, O, PgArguments>,
    params: &'q [BindValue],
) -> QueryScalar<'q, Postgres, O, PgArguments> {
    for p in params {
        query = match p {
            BindValue::I64(n) => query.bind(*n),
            BindValue::I32(n) => query.bind(*n),
            BindValue::F64(n) => query.bind(*n),
            BindValue::Bool(b) => query.bind(*b),
            BindValue::Text(s) => query.bind(s.as_str()),
            BindValue::Date(d) => query.bind(*d),
        };
    }
    query
}

/// Collects conjunctive WHERE conditions together with their bind values.
/// The same set drives both the page query and the count query, so the two
/// can never disagree about which rows match.
#[derive(Debug, Default)]
pub struct ConditionSet {
    conds: Vec<String>,
    params: Vec<BindValue>,
}

impl ConditionSet {
    pub fn new() -> Self {
        ConditionSet::default()
    }

    fn push(&mut self, v: BindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }

    pub fn eq(&mut self, col: &str, v: BindValue) {
        let n = self.push(v);
        self.conds.push(format!("{col} = ${n}"));
    }

    pub fn ge(&mut self, col: &str, v: BindValue) {
        let n = self.push(v);
        self.conds.push(format!("{col} >= ${n}"));
    }

    pub fn le(&mut self, col: &str, v: BindValue) {
        let n = self.push(v);
        self.conds.push(format!("{col} <= ${n}"));
    }

    /// IN over integer ids. An empty list matches nothing.
    pub fn any_i64(&mut self, col: &str, vals: &[i64]) {
        if vals.is_empty() {
            self.conds.push("1 = 0".to_string());
            return;
        }
        let placeholders: Vec<String> = vals
            .iter()
            .map(|v| {
                let n = self.push(BindValue::I64(*v));
                format!("${n}")
            })
            .collect();
        self.conds.push(format!("{col} IN ({})", placeholders.join(", ")));
    }

    /// IN over text values (enum members bound as their wire strings).
    pub fn any_text(&mut self, col: &str, vals: &[String]) {
        if vals.is_empty() {
            self.conds.push("1 = 0".to_string());
            return;
        }
        let placeholders: Vec<String> = vals
            .iter()
            .map(|v| {
                let n = self.push(BindValue::Text(v.clone()));
                format!("${n}")
            })
            .collect();
        self.conds.push(format!("{col} IN ({})", placeholders.join(", ")));
    }

    /// Case-insensitive substring match.
    pub fn contains(&mut self, col: &str, term: &str) {
        let n = self.push(BindValue::Text(format!("%{term}%")));
        self.conds.push(format!("{col} ILIKE ${n}"));
    }

    /// Free-text search: one bound pattern OR-ed across the given columns.
    pub fn search(&mut self, cols: &[&str], term: &str) {
        let n = self.push(BindValue::Text(format!("%{term}%")));
        let parts: Vec<String> = cols.iter().map(|c| format!("{c} ILIKE ${n}")).collect();
        self.conds.push(format!("({})", parts.join(" OR ")));
    }

    pub fn year_ge(&mut self, col: &str, year: i32) {
        let n = self.push(BindValue::I32(year));
        self.conds.push(format!("EXTRACT(YEAR FROM {col}) >= ${n}"));
    }

    pub fn year_le(&mut self, col: &str, year: i32) {
        let n = self.push(BindValue::I32(year));
        self.conds.push(format!("EXTRACT(YEAR FROM {col}) <= ${n}"));
    }

    pub fn is_empty(&self) -> bool {
        self.conds.is_empty()
    }

    pub fn where_clause(&self) -> String {
        if self.conds.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conds.join(" AND "))
        }
    }

    pub fn params(&self) -> &[BindValue] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_produces_no_where_clause() {
        let cs = ConditionSet::new();
        assert!(cs.is_empty());
        assert_eq!(cs.where_clause(), "");
    }

    #[test]
    fn placeholders_are_numbered_in_push_order() {
        let mut cs = ConditionSet::new();
        cs.eq("is_active", BindValue::Bool(true));
        cs.ge("release_price", BindValue::F64(100.0));
        cs.le("release_price", BindValue::F64(200.0));
        assert_eq!(
            cs.where_clause(),
            " WHERE is_active = $1 AND release_price >= $2 AND release_price <= $3"
        );
        assert_eq!(cs.params().len(), 3);
    }

    #[test]
    fn id_sets_expand_to_in_lists() {
        let mut cs = ConditionSet::new();
        cs.any_i64("brand_id", &[3, 5, 8]);
        assert_eq!(cs.where_clause(), " WHERE brand_id IN ($1, $2, $3)");
        assert_eq!(
            cs.params(),
            &[BindValue::I64(3), BindValue::I64(5), BindValue::I64(8)]
        );
    }

    #[test]
    fn empty_id_set_matches_nothing() {
        let mut cs = ConditionSet::new();
        cs.any_i64("brand_id", &[]);
        assert_eq!(cs.where_clause(), " WHERE 1 = 0");
        assert!(cs.params().is_empty());
    }

    #[test]
    fn search_binds_one_pattern_across_columns() {
        let mut cs = ConditionSet::new();
        cs.search(&["model", "series", "description"], "EF");
        assert_eq!(
            cs.where_clause(),
            " WHERE (model ILIKE $1 OR series ILIKE $1 OR description ILIKE $1)"
        );
        assert_eq!(cs.params(), &[BindValue::Text("%EF%".to_string())]);
    }

    #[test]
    fn year_bounds_extract_from_the_date_column() {
        let mut cs = ConditionSet::new();
        cs.year_ge("release_date", 2015);
        cs.year_le("release_date", 2020);
        assert_eq!(
            cs.where_clause(),
            " WHERE EXTRACT(YEAR FROM release_date) >= $1 AND EXTRACT(YEAR FROM release_date) <= $2"
        );
    }
}
