use std::collections::BTreeMap;

use crate::error::{QueryError, QueryResult};
use crate::field::{FieldRegistry, FieldType};
use crate::operator::{Operator, OperatorRegistry};
use crate::params::QueryParams;

/// Splits an operator prefix from its value, and range bounds from each other.
pub const VALUE_SEPARATOR: char = ':';

/// One parsed filter occurrence for a single field.
///
/// `values` is never empty. Point comparisons carry one value; a `Between`
/// atom carries every `:`-separated part of the raw value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterField {
    pub field: String,
    pub operator: Operator,
    pub values: Vec<String>,
    pub declared_type: FieldType,
}

impl FilterField {
    pub fn point(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
        declared_type: FieldType,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            values: vec![value.into()],
            declared_type,
        }
    }

    pub fn between(field: impl Into<String>, values: Vec<String>, declared_type: FieldType) -> Self {
        Self {
            field: field.into(),
            operator: Operator::Between,
            values,
            declared_type,
        }
    }

    pub fn is_range(&self) -> bool {
        self.operator.is_range()
    }
}

/// Field name to its atoms, in the order they appeared in the query.
///
/// Atoms under one field are alternatives (OR). Values inside one atom are
/// conjunctive (AND). Distinct fields are AND-ed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSpecification {
    fields: BTreeMap<String, Vec<FilterField>>,
}

impl FilterSpecification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, atom: FilterField) {
        self.fields.entry(atom.field.clone()).or_default().push(atom);
    }

    pub fn get(&self, field: &str) -> Option<&[FilterField]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<FilterField>> {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FilterField])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total number of atoms across all fields.
    pub fn atom_count(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    pub fn ensure_within(&self, max_atoms: usize) -> QueryResult<()> {
        let count = self.atom_count();
        if count > max_atoms {
            return Err(QueryError::TooManyFilters {
                count,
                max: max_atoms,
            });
        }
        Ok(())
    }
}

/// Builds a [`FilterSpecification`] from raw query parameters.
///
/// Parameters whose name is not in `fields` are skipped, as are empty values.
/// This never fails: the filter surface is forgiving by contract.
pub fn parse_filters(
    params: &QueryParams,
    fields: &FieldRegistry,
    operators: &OperatorRegistry,
) -> FilterSpecification {
    let mut spec = FilterSpecification::new();
    for (name, raw) in params.iter() {
        let Some(ty) = fields.declared_type(name) else {
            continue;
        };
        if let Some(atom) = parse_value(name, raw, ty, operators) {
            spec.push(atom);
        }
    }
    spec
}

/// Parses one raw value into an atom.
///
/// - `5` is `= 5`
/// - `gte:5` is `>= 5`; everything after the first separator is the value,
///   so `gte:2022-01-01 10:00:00` keeps its time part
/// - `a:b[:c...]` with an unknown prefix is a range over every part
pub fn parse_value(
    field: &str,
    raw: &str,
    declared_type: FieldType,
    operators: &OperatorRegistry,
) -> Option<FilterField> {
    if raw.is_empty() {
        return None;
    }

    let Some((head, rest)) = raw.split_once(VALUE_SEPARATOR) else {
        return Some(FilterField::point(field, Operator::Eq, raw, declared_type));
    };

    let atom = match operators.resolve(head) {
        Some(op) => FilterField::point(field, op, rest, declared_type),
        None => FilterField::between(
            field,
            raw.split(VALUE_SEPARATOR).map(str::to_owned).collect(),
            declared_type,
        ),
    };
    Some(atom)
}
