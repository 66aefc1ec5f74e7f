//! Command line interface module
//!
//! This module provides argument parsing, configuration assembly and the runner
//! that starts the inspection server.

pub mod args;
pub mod config;
pub mod runner;

pub use args::Args;
pub use config::{ClientConfig, ServerConfig};
pub use runner::Runner;
