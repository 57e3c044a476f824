//! Result artifact download and parsing.

use tracing::debug;

use super::csv::parse_result_bytes;
use super::types::ResultSet;
use crate::error::Result;
use crate::storage::{ObjectStore, ResultLocation};

/// Downloads result artifacts and parses them into result sets.
pub struct ResultFetcher<'a> {
    store: &'a dyn ObjectStore,
}

impl<'a> ResultFetcher<'a> {
    /// Creates a new result fetcher.
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self { store }
    }

    /// Fetches the object at `location` and parses it.
    ///
    /// Storage failures surface as `Retrieval` errors and malformed content
    /// as `Parse` errors.
    pub async fn fetch(&self, location: &ResultLocation) -> Result<ResultSet> {
        let data = self.store.get_object(location).await?;
        let result = parse_result_bytes(&data)?;
        debug!(
            "Parsed {} columns and {} rows from {}",
            result.column_count(),
            result.row_count(),
            location
        );
        Ok(result)
    }
}
