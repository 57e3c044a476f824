//! Integration tests for the dashboard.

pub mod athena_test;
pub mod report_cycle_test;
pub mod server_test;
