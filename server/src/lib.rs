//! Talking heads asset and log server library.
//!
//! This module exposes the server components for use in tests and binaries.

pub mod assets;
pub mod config;
pub mod logs;
pub mod routes;
pub mod scrub;
