//! Backend-agnostic query result model.
//!
//! Both backends produce the same shape: an ordered variable list and
//! one row of optional values per solution. Rendering decisions (prefix
//! shortening, output format) are left to the caller so the model stays
//! independent of the terminal.

/// A single binding cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A named node, stored as the full IRI
    Iri(String),
    /// A blank node label (without the `_:` marker)
    Blank(String),
    /// A literal, stored as its native text form
    Literal(String),
}

/// Uniform result set: variable names in projection order plus one
/// row per solution, each row aligned with `vars` (`None` = unbound).
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub vars: Vec<String>,
    pub rows: Vec<Vec<Option<Value>>>,
}

impl QueryResult {
    /// An empty result set with no projected variables.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of result rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the result has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
