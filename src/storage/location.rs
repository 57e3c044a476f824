//! Storage locators for query result artifacts.

use crate::error::{DashboardError, Result};
use std::fmt;

/// URL scheme the engine uses for output locations.
pub const S3_SCHEME: &str = "s3://";

/// Bucket and key of a result artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLocation {
    pub bucket: String,
    pub key: String,
}

impl ResultLocation {
    /// Creates a location from its parts.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parses an output location such as `s3://bucket/path/to/result.csv`.
    ///
    /// The scheme is stripped and the rest is split on the first `/`: the
    /// bucket is everything before it, the key everything after.
    pub fn parse(location: &str) -> Result<Self> {
        let stripped = location.strip_prefix(S3_SCHEME).ok_or_else(|| {
            DashboardError::retrieval(format!(
                "Invalid result location '{location}': expected an {S3_SCHEME} URL"
            ))
        })?;

        let (bucket, key) = stripped.split_once('/').ok_or_else(|| {
            DashboardError::retrieval(format!(
                "Invalid result location '{location}': no object key"
            ))
        })?;

        if bucket.is_empty() {
            return Err(DashboardError::retrieval(format!(
                "Invalid result location '{location}': empty bucket name"
            )));
        }
        if key.is_empty() {
            return Err(DashboardError::retrieval(format!(
                "Invalid result location '{location}': no object key"
            )));
        }

        Ok(Self::new(bucket, key))
    }
}

impl fmt::Display for ResultLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{S3_SCHEME}{}/{}", self.bucket, self.key)
    }
}
