//! Rows returned by a statement.

use serde::{Deserialize, Serialize};

/// One row: a value per column, in column order.
pub type Row = Vec<serde_json::Value>;

/// The rows returned by a statement and the names of their columns.
///
/// Column names come from the statement's result description, so they are known even when no
/// row is returned. Names are not unique: `SELECT 1 AS n, 2 AS n` has two columns called `n`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        ResultSet { columns, rows }
    }

    pub fn empty() -> Self {
        ResultSet::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}
