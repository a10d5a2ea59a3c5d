//! gridfolio-server: HTTP API and command line for gridfolio.
//!
//! Serves portfolio statistics and grid-search optimization as JSON over
//! HTTP, or computes them once from the command line. Configuration comes
//! from an optional TOML file.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
