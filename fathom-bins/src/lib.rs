//! Fathom Bins - Replay Harness for the Price Estimators
//!
//! Columnar tape inputs (in-memory fixtures or memory-mapped files), the
//! deterministic replay driver that merges trades and evaluations in time
//! order, and shared CLI/logging bootstrap for the binaries.

pub mod column;
pub mod common;
pub mod replay;

// Re-export error types
pub use anyhow::{Error, Result};
