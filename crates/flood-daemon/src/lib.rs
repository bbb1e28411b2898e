//! Flood Daemon library
//!
//! This module provides the core components for the flood prediction daemon:
//! - Prediction invoker (external process runner and output validator)
//! - REST API handlers
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod invoker;
pub mod server;

pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError};
pub use invoker::{InvokeError, PredictionInvoker, ProcessResult};
pub use server::Server;
