//! Object storage abstraction for the dashboard.
//!
//! Result artifacts are read through the `ObjectStore` trait so the S3
//! client and the in-memory test store can be used interchangeably.

mod location;
mod mock;
mod s3;

pub use location::{ResultLocation, S3_SCHEME};
pub use mock::MemoryStore;
pub use s3::S3Store;

use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface for object stores.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Downloads the full content of the object at `location`.
    async fn get_object(&self, location: &ResultLocation) -> Result<Vec<u8>>;
}
