//! CLI command implementations.

pub mod jobs;
pub mod notify_test;
pub mod run;
pub mod schemas;
