//! `query_core::QueryOptions` → `sea_orm::Condition` + ordering.
//!
//! Field names resolve only through a per-entity [`FieldMap`], and every value
//! is coerced and bound as a statement parameter. Nothing from the query
//! string is spliced into SQL text.
//!
//! Composition:
//! - atoms of one field are OR-ed
//! - values of one atom are AND-ed; a range `[v0, v1, .., vn]` becomes
//!   `col >= v0 AND col <= v1 AND .. AND col <= vn`
//! - an upper bound given as a bare date covers that whole day, so
//!   `col <= 2022-01-02` is lowered to `col < 2022-01-03T00:00:00Z`
//! - fields are AND-ed

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use query_core::{
    FieldRegistry, FieldType, FilterField, FilterSpecification, Operator, QueryOptions, SortOrder,
    SortSpecification,
};
use sea_orm::{
    sea_query::{Expr, Order, SimpleExpr},
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder,
};
use thiserror::Error;

#[derive(Clone)]
pub struct Field<E: EntityTrait> {
    pub col: E::Column,
    pub kind: FieldType,
    pub filterable: bool,
}

/// API field name → column, declared type and capabilities.
#[derive(Clone)]
pub struct FieldMap<E: EntityTrait> {
    map: HashMap<String, Field<E>>,
    tiebreaker: Option<String>,
}

impl<E: EntityTrait> Default for FieldMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> FieldMap<E> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            tiebreaker: None,
        }
    }

    /// Filterable and sortable field.
    pub fn insert(mut self, api_name: impl Into<String>, col: E::Column, kind: FieldType) -> Self {
        self.map.insert(
            api_name.into().to_lowercase(),
            Field {
                col,
                kind,
                filterable: true,
            },
        );
        self
    }

    /// Sortable only; never offered to the filter parser.
    pub fn insert_sort_only(
        mut self,
        api_name: impl Into<String>,
        col: E::Column,
        kind: FieldType,
    ) -> Self {
        self.map.insert(
            api_name.into().to_lowercase(),
            Field {
                col,
                kind,
                filterable: false,
            },
        );
        self
    }

    /// Secondary sort key appended after the requested one, normally the primary key.
    pub fn with_tiebreaker(mut self, api_name: impl Into<String>) -> Self {
        self.tiebreaker = Some(api_name.into().to_lowercase());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field<E>> {
        self.map.get(&name.to_lowercase())
    }

    /// The parser-side allow-list for this entity.
    pub fn filter_registry(&self) -> FieldRegistry {
        self.map
            .iter()
            .filter(|(_, f)| f.filterable)
            .map(|(name, f)| (name.clone(), f.kind))
            .collect()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LowerError {
    #[error("unknown filter field: {0}")]
    UnknownField(String),

    #[error("cannot sort by '{0}'")]
    UnknownSortField(String),

    #[error("invalid {kind} value for '{field}': '{value}'")]
    InvalidValue {
        field: String,
        kind: FieldType,
        value: String,
    },

    #[error("filter on '{0}' has no values")]
    EmptyAtom(String),
}

pub type LowerResult<T> = Result<T, LowerError>;

/* ---------- coercion ---------- */

/// Converts a raw query value into a bindable value of the declared type.
pub fn coerce(kind: FieldType, raw: &str) -> Option<sea_orm::Value> {
    match kind {
        FieldType::String => Some(sea_orm::Value::String(Some(Box::new(raw.to_owned())))),
        FieldType::Integer => raw
            .trim()
            .parse::<i64>()
            .ok()
            .map(|i| sea_orm::Value::BigInt(Some(i))),
        FieldType::Date => {
            parse_datetime(raw).map(|dt| sea_orm::Value::ChronoDateTimeUtc(Some(Box::new(dt))))
        }
    }
}

/// RFC 3339, `YYYY-MM-DD HH:MM:SS`, or a bare date (midnight UTC).
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

/// Midnight after `raw` when it is a bare date on a date field.
fn next_midnight(kind: FieldType, raw: &str) -> Option<sea_orm::Value> {
    if !matches!(kind, FieldType::Date) {
        return None;
    }
    let day = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()?;
    let next = day.succ_opt()?.and_hms_opt(0, 0, 0)?.and_utc();
    Some(sea_orm::Value::ChronoDateTimeUtc(Some(Box::new(next))))
}

/* ---------- predicate ---------- */

/// Range atoms are split into `>=` / `<=` bounds before reaching here.
fn compare<C: ColumnTrait>(col: C, op: Operator, v: sea_orm::Value) -> SimpleExpr {
    let e = Expr::col(col);
    match op {
        Operator::Eq => e.eq(v),
        Operator::Ne => e.ne(v),
        Operator::Lt => e.lt(v),
        Operator::Le => e.lte(v),
        Operator::Gt => e.gt(v),
        Operator::Ge | Operator::Between => e.gte(v),
    }
}

fn atom_to_condition<E>(atom: &FilterField, field: &Field<E>) -> LowerResult<Condition>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    if atom.values.is_empty() {
        return Err(LowerError::EmptyAtom(atom.field.clone()));
    }

    let mut all = Condition::all();
    for (idx, raw) in atom.values.iter().enumerate() {
        let op = match atom.operator {
            Operator::Between if idx == 0 => Operator::Ge,
            Operator::Between => Operator::Le,
            op => op,
        };
        let (op, value) = match (op, next_midnight(atom.declared_type, raw)) {
            (Operator::Le, Some(next)) => (Operator::Lt, next),
            _ => {
                let value = coerce(atom.declared_type, raw).ok_or_else(|| {
                    LowerError::InvalidValue {
                        field: atom.field.clone(),
                        kind: atom.declared_type,
                        value: raw.clone(),
                    }
                })?;
                (op, value)
            }
        };
        all = all.add(compare(field.col, op, value));
    }
    Ok(all)
}

/// Lowers the whole filter specification into one condition.
/// An empty specification yields an empty (always true) condition.
pub fn filters_to_condition<E>(
    filters: &FilterSpecification,
    fmap: &FieldMap<E>,
) -> LowerResult<Condition>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let mut all = Condition::all();
    for (name, atoms) in filters.iter() {
        let field = fmap
            .get(name)
            .filter(|f| f.filterable)
            .ok_or_else(|| LowerError::UnknownField(name.to_owned()))?;

        let mut any = Condition::any();
        for atom in atoms {
            any = any.add(atom_to_condition(atom, field)?);
        }
        all = all.add(any);
    }
    Ok(all)
}

fn sea_order(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

/* ---------- Select extensions ---------- */

pub trait QueryOptionsExt<E: EntityTrait>: Sized {
    fn apply_filters(self, filters: &FilterSpecification, fmap: &FieldMap<E>)
        -> LowerResult<Self>;

    fn apply_sort(self, sort: &SortSpecification, fmap: &FieldMap<E>) -> LowerResult<Self>;

    /// Filters and ordering in one step.
    fn apply_query_options(self, opts: &QueryOptions, fmap: &FieldMap<E>) -> LowerResult<Self> {
        self.apply_filters(opts.filters(), fmap)?
            .apply_sort(opts.sort(), fmap)
    }
}

impl<E> QueryOptionsExt<E> for sea_orm::Select<E>
where
    E: EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    fn apply_filters(
        self,
        filters: &FilterSpecification,
        fmap: &FieldMap<E>,
    ) -> LowerResult<Self> {
        if filters.is_empty() {
            return Ok(self);
        }
        let cond = filters_to_condition(filters, fmap)?;
        tracing::trace!(atoms = filters.atom_count(), "lowered filter specification");
        Ok(self.filter(cond))
    }

    fn apply_sort(self, sort: &SortSpecification, fmap: &FieldMap<E>) -> LowerResult<Self> {
        let field = fmap
            .get(&sort.field)
            .ok_or_else(|| LowerError::UnknownSortField(sort.field.clone()))?;
        let order = sea_order(sort.order);
        let mut query = self.order_by(field.col, order.clone());

        if let Some(tb) = fmap.tiebreaker.as_deref() {
            if tb != sort.field.to_lowercase() {
                if let Some(tb_field) = fmap.get(tb) {
                    query = query.order_by(tb_field.col, order);
                }
            }
        }
        Ok(query)
    }
}
