//! SatLens Client - Analysis backend port and HTTP adapter
//!
//! This crate defines the port the session state machines talk to,
//! along with the reqwest-based implementation of the HTTP contract.

pub mod http;
pub mod ports;

// Re-export main types
pub use http::{ApiClient, ClientConfig};
pub use ports::AnalysisBackend;
