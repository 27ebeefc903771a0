//! Upstream EMY data source.
//!
//! This module handles:
//! - The HTTP client for the EMY endpoint
//! - Re-indexing the `emy` mapping into an ordered list
//! - A local mock upstream for testing

pub mod client;
pub mod mock;
pub mod types;

pub use client::EmyClient;
pub use mock::{MockResponse, MockUpstream};
pub use types::{extract_records, EmyRecord, EMY_FIELD};
