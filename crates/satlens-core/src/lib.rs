//! SatLens Core - Domain models, errors, and configuration
//!
//! This crate contains the data model shared by the API client, the
//! upload/chat session state machines, and the CLI.

pub mod config;
pub mod error;
pub mod models;

pub use error::{Result, SatlensError};
