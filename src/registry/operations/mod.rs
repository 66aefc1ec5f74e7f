//! Registry operations module - Internal modular organization
//!
//! This module splits the registry conversation by resource while
//! [`RegistryClient`](crate::registry::RegistryClient) keeps the public API.

pub mod blob_operations;
pub mod manifest_operations;

pub use blob_operations::BlobOperations;
pub use manifest_operations::ManifestOperations;
