//! Query execution and result retrieval.
//!
//! The runner drives a query to a terminal state; the fetcher turns the
//! resulting artifact into a header and rows.

pub mod csv;
pub mod fetcher;
pub mod runner;
pub mod types;

pub use fetcher::ResultFetcher;
pub use runner::{PollPolicy, QueryRunner};
pub use types::{ResultSet, Row};
