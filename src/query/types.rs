//! Result set types for the dashboard.
//!
//! Defines the structures used to represent a finished query's output.

use std::time::Duration;

/// A row of cells, aligned positionally with the header.
pub type Row = Vec<String>;

/// Header and rows of a successfully completed query.
///
/// Values are kept as the strings the engine wrote; no type coercion happens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    /// Column names, in output order.
    pub header: Vec<String>,

    /// Rows of data. Every row has `header.len()` cells.
    pub rows: Vec<Row>,

    /// Wall time from submission until the result was parsed.
    pub execution_time: Duration,
}

impl ResultSet {
    /// Creates a result set with the given header and rows.
    pub fn with_data(header: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            header,
            rows,
            execution_time: Duration::ZERO,
        }
    }

    /// Sets the execution time.
    pub fn with_execution_time(mut self, duration: Duration) -> Self {
        self.execution_time = duration;
        self
    }

    /// Returns true if the result has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Short summary such as `2 rows in 3.4s`.
    pub fn summary(&self) -> String {
        let noun = if self.row_count() == 1 { "row" } else { "rows" };
        format!(
            "{} {} in {:.1}s",
            self.row_count(),
            noun,
            self.execution_time.as_secs_f64()
        )
    }
}
