//! homebeat - A single-host liveness monitor
//!
//! This library provides the core functionality for persisting periodic
//! heartbeat timestamps, detecting outages across process restarts, and
//! answering on-demand status queries with live host metrics over Discord.

pub mod cli;
pub mod config;
pub mod core;
pub mod detector;
pub mod dispatcher;
pub mod formatting;
pub mod gateway;
pub mod notification;
pub mod recorder;
pub mod store;
pub mod system;

// Re-export core types for convenience
pub use core::*;
