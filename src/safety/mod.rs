//! Read-only guard for report SQL.
//!
//! Report queries are run verbatim against the analytics engine, so every
//! configured statement is parsed and classified before the service starts.
//! Only statements that cannot modify data are accepted.

mod parser;

pub use parser::{classify_sql, ensure_read_only};

use std::fmt;

/// The kind of SQL statement detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Explain,
    Insert,
    Update,
    Delete,
    Merge,
    /// CREATE, DROP, ALTER, TRUNCATE, GRANT and friends.
    Ddl,
    /// Anything else the parser understood.
    Other,
}

impl StatementKind {
    /// Returns true if running the statement cannot change any data.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Select | Self::Explain)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Explain => write!(f, "EXPLAIN"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Merge => write!(f, "MERGE"),
            Self::Ddl => write!(f, "DDL"),
            Self::Other => write!(f, "non-query"),
        }
    }
}
