//! Tabular input model.
//!
//! The engine never reads files itself. Whatever loads the orders and time
//! entries exports hands them over as a [`Table`]: a header row plus rows of
//! text cells, in the same shape as the CSV they came from.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A fully materialised input table.
///
/// # Example
///
/// ```
/// use tip_pool_engine::models::Table;
///
/// let table = Table::new(
///     vec!["Opened", "Tip", "Gratuity"],
///     vec![vec!["01/10/2024 12:30", "100", "20"]],
/// );
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.column_index("Tip"), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Column headers, in file order.
    pub columns: Vec<String>,
    /// Data rows; each cell lines up with the header at the same position.
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table from anything string-like.
    pub fn new<C, R, S>(columns: Vec<C>, rows: Vec<R>) -> Self
    where
        C: Into<String>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, matching headers with surrounding whitespace ignored.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.trim() == name)
    }

    /// Resolves every required column up front.
    ///
    /// Returns the column positions in the order requested, or
    /// `MissingColumn` for the first one that is absent. Callers run this
    /// before touching any row so a bad export never yields partial totals.
    pub fn require_columns(&self, table: &str, names: &[&str]) -> EngineResult<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| EngineError::MissingColumn {
                        table: table.to_string(),
                        column: name.to_string(),
                    })
            })
            .collect()
    }

    /// Text of a cell, trimmed. Ragged rows read as blank past their end.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|c| c.trim())
            .unwrap_or("")
    }
}
