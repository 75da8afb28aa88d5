//! The introspected shape of a database namespace.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping from a table name to its column names, in declaration order.
///
/// Tables keep the order in which they were first seen, which is the catalog order when the
/// map is built by introspection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaMap(pub IndexMap<String, Vec<String>>);

impl SchemaMap {
    pub fn empty() -> Self {
        SchemaMap(IndexMap::new())
    }

    /// Group `(table, column)` rows into a map. Rows must already be ordered by table and then
    /// by column position; the order is kept as is.
    pub fn from_rows<T, C>(rows: impl IntoIterator<Item = (T, C)>) -> Self
    where
        T: Into<String>,
        C: Into<String>,
    {
        let mut schema = SchemaMap::empty();
        for (table, column) in rows {
            schema.push_column(table, column);
        }
        schema
    }

    /// Append a column to the end of a table's column list.
    pub fn push_column(&mut self, table: impl Into<String>, column: impl Into<String>) {
        self.0.entry(table.into()).or_default().push(column.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn columns(&self, table: &str) -> Option<&[String]> {
        self.0.get(table).map(Vec::as_slice)
    }

    /// Render one `table(col1, col2, ...)` line per table.
    /// An empty map renders to an empty string.
    pub fn render(&self) -> String {
        self.0
            .iter()
            .map(|(table, columns)| format!("{table}({})", columns.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
