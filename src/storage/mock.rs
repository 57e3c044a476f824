//! In-memory object store for testing.

use super::{ObjectStore, ResultLocation};
use crate::error::{DashboardError, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// An object store backed by a map, keyed by `s3://bucket/key`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    objects: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object at the given `s3://` location.
    pub fn with_object(mut self, location: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.objects.insert(location.into(), body.into());
        self
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get_object(&self, location: &ResultLocation) -> Result<Vec<u8>> {
        self.objects
            .get(&location.to_string())
            .cloned()
            .ok_or_else(|| {
                DashboardError::retrieval(format!(
                    "Failed to read {location}: NoSuchKey: The specified key does not exist."
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_existing_object() {
        let store = MemoryStore::new().with_object("s3://b/k.csv", "\"a\"\n\"1\"");
        let body = store
            .get_object(&ResultLocation::new("b", "k.csv"))
            .await
            .unwrap();
        assert_eq!(body, b"\"a\"\n\"1\"");
    }

    #[tokio::test]
    async fn test_missing_object_is_retrieval_error() {
        let store = MemoryStore::new();
        let err = store
            .get_object(&ResultLocation::new("b", "missing.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Retrieval(_)));
        assert!(err.to_string().contains("s3://b/missing.csv"));
    }
}
