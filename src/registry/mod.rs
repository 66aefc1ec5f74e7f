//! Registry module for Docker registry interactions
//!
//! This module provides address normalization, token retrieval and client logic
//! for reading manifests and blobs through the Docker Registry HTTP API v2.

pub mod address;
pub mod auth;
pub mod client;
pub mod operations;
pub mod tar_utils;

pub use address::ImageReference;
pub use auth::TokenProvider;
pub use client::{RegistryClient, RegistryClientBuilder};
