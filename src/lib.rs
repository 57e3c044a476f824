//! athena-dashboard - An HTML dashboard for a fixed set of Athena reports.
//!
//! This library exposes the core modules for use by the binary and in
//! integration tests.

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod query;
pub mod report;
pub mod safety;
pub mod server;
pub mod storage;
