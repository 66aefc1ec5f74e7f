//! In-memory layer tarball scanning
//!
//! This module provides [`TarUtils`] for locating the os-release file inside a
//! downloaded layer blob. Blobs may be gzip-compressed or plain tar.

use crate::error::{RegistryError, Result};
use crate::image::os_release::{OS_RELEASE_READ_LIMIT, OsRelease, is_os_release_path};
use crate::logging::Logger;
use flate2::read::GzDecoder;
use std::io::Read;
use tar::Archive;

/// Tar processing utilities for layer blobs
pub struct TarUtils;

impl TarUtils {
    /// Check for the gzip magic number
    pub fn is_gzipped(data: &[u8]) -> bool {
        data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
    }

    /// Open a blob as a tar archive, gunzipping on the fly when needed
    pub fn open_archive(data: &[u8]) -> Archive<Box<dyn Read + '_>> {
        let reader: Box<dyn Read + '_> = if Self::is_gzipped(data) {
            Box::new(GzDecoder::new(data))
        } else {
            Box::new(data)
        };
        Archive::new(reader)
    }

    /// Scan a layer blob for the first entry at an os-release path.
    ///
    /// Returns `Ok(None)` when the layer holds no such file, including when the
    /// tar stream cannot be decoded (that condition only ends this layer's
    /// scan). A matching entry that fails to parse is an error, including a
    /// link, whose body is empty.
    pub fn find_os_release(data: &[u8], digest: &str, output: &Logger) -> Result<Option<OsRelease>> {
        let mut archive = Self::open_archive(data);

        let entries = match archive.entries() {
            Ok(entries) => entries,
            Err(e) => {
                output.warning(&format!("Failed to read tar stream for {}: {}", digest, e));
                return Ok(None);
            }
        };

        for entry_result in entries {
            let mut entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    output.warning(&format!("Failed to read tar stream for {}: {}", digest, e));
                    return Ok(None);
                }
            };

            let path = match entry.path() {
                Ok(path) => path.to_string_lossy().to_string(),
                Err(e) => {
                    output.warning(&format!("Failed to read entry path in {}: {}", digest, e));
                    return Ok(None);
                }
            };

            output.debug(&format!("Found file {} in layer {}", path, digest));

            if !is_os_release_path(&path) {
                continue;
            }

            let mut window = Vec::new();
            (&mut entry)
                .take(OS_RELEASE_READ_LIMIT)
                .read_to_end(&mut window)
                .map_err(|e| RegistryError::Parse(format!("Failed to read {}: {}", path, e)))?;

            return OsRelease::parse(&window).map(Some);
        }

        Ok(None)
    }
}
