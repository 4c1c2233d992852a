//! # SessionGate Shared
//!
//! Configuration structures and common types shared across the SessionGate
//! backend crates.

pub mod config;
pub mod types;
