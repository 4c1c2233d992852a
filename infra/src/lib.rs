//! # SessionGate Infrastructure
//!
//! Infrastructure layer for the SessionGate backend: MySQL implementations
//! of the core persistence traits and the bcrypt credential verifier.

pub mod auth;
pub mod database;
