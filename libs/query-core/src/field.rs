use std::collections::BTreeMap;
use std::fmt;

/// Declared value type of a filterable field. Drives how raw values are
/// coerced when a filter is lowered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Integer,
    Date,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allow-list of filterable field names and their declared types.
///
/// One registry per entity. Lookups never fail: a name that is not
/// registered yields `None`, and the parser drops it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldRegistry {
    fields: BTreeMap<String, FieldType>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.insert(name, ty);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: FieldType) {
        self.fields.insert(name.into(), ty);
    }

    pub fn declared_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, FieldType)> for FieldRegistry {
    fn from_iter<I: IntoIterator<Item = (N, FieldType)>>(iter: I) -> Self {
        let mut reg = Self::new();
        for (name, ty) in iter {
            reg.insert(name, ty);
        }
        reg
    }
}
