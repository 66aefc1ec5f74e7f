//! Image Inspector Library
//!
//! This file serves as the library root for the image-inspector crate,
//! organizing and exposing the modules that answer image metadata questions
//! straight from a container registry.

pub mod api;
pub mod cli;
pub mod error;
pub mod image;
pub mod logging;
pub mod registry;
pub mod server;

pub use error::{RegistryError, Result};
pub use image::{LayerSummary, Manifest, OsRelease, Platform};
pub use logging::Logger;
pub use registry::{ImageReference, RegistryClient, RegistryClientBuilder};
