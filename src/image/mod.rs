//! Image metadata documents
//!
//! Types for the registry documents this service reads ([`Manifest`],
//! [`ManifestIndex`]) and for the results it derives from them: the
//! deduplicated [`LayerSummary`] and the [`OsRelease`] identity record.

pub mod manifest;
pub mod os_release;

pub use manifest::{
    LayerSummary, Layer, Manifest, ManifestIndex, ManifestIndexEntry, Platform, parse_manifest,
};
pub use os_release::OsRelease;
