use std::collections::HashMap;
use std::fmt;

/// Comparison applied by one filter atom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Range over two or more values, AND-combined.
    Between,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Between => "between",
        }
    }

    pub fn is_range(self) -> bool {
        matches!(self, Operator::Between)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Allow-list of operator prefix tokens (`eq`, `gte`, ...).
///
/// A token that does not resolve is not an error: the parser reads the whole
/// value as a range instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorRegistry {
    tokens: HashMap<String, Operator>,
}

impl OperatorRegistry {
    pub fn empty() -> Self {
        Self {
            tokens: HashMap::new(),
        }
    }

    pub fn standard() -> Self {
        Self::empty()
            .with_token("eq", Operator::Eq)
            .with_token("neq", Operator::Ne)
            .with_token("lt", Operator::Lt)
            .with_token("lte", Operator::Le)
            .with_token("gt", Operator::Gt)
            .with_token("gte", Operator::Ge)
    }

    /// Registers a point-comparison token. `Between` is the fallback for
    /// unresolved prefixes and cannot be bound to a token.
    pub fn with_token(mut self, token: impl Into<String>, op: Operator) -> Self {
        if !op.is_range() {
            self.tokens.insert(token.into(), op);
        }
        self
    }

    pub fn resolve(&self, token: &str) -> Option<Operator> {
        self.tokens.get(token).copied()
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
