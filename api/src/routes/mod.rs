//! Route handlers for the HTTP surface.

pub mod auth;
