//! `os-release` parsing
//!
//! Only the leading [`OS_RELEASE_READ_LIMIT`] bytes of the file are ever handed to
//! the parser, so keys past that window are not seen.

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};

/// Paths (as stored in layer tarballs) that hold the OS identity file
pub const OS_RELEASE_PATHS: [&str; 2] = ["etc/os-release", "usr/lib/os-release"];

/// Number of leading bytes read from an os-release file
pub const OS_RELEASE_READ_LIMIT: u64 = 512;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsRelease {
    pub pretty_name: String,
    pub name: String,
    pub version_id: String,
    pub id: String,
    pub home_url: String,
}

impl OsRelease {
    /// Parse the leading window of an os-release file.
    ///
    /// Fails with [`RegistryError::Parse`] when the window is empty or no `ID`
    /// value was found in it.
    pub fn parse(window: &[u8]) -> Result<Self> {
        if window.is_empty() {
            return Err(RegistryError::Parse("os-release file is empty".to_string()));
        }

        let text = String::from_utf8_lossy(window);
        let mut release = OsRelease::default();

        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = unquote(value.trim()).to_string();

            match key {
                "PRETTY_NAME" => release.pretty_name = value,
                "NAME" => release.name = value,
                "VERSION_ID" => release.version_id = value,
                "ID" => release.id = value,
                "HOME_URL" => release.home_url = value,
                _ => {}
            }
        }

        if release.id.is_empty() {
            return Err(RegistryError::Parse("os-release ID not found".to_string()));
        }

        Ok(release)
    }
}

pub fn is_os_release_path(path: &str) -> bool {
    OS_RELEASE_PATHS.contains(&path)
}

// Strips at most one leading and one trailing double quote.
fn unquote(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ubuntu() {
        let content = b"PRETTY_NAME=\"Ubuntu 22.04\"\nNAME=\"Ubuntu\"\nVERSION_ID=\"22.04\"\nID=ubuntu\nHOME_URL=\"https://www.ubuntu.com/\"\nID_LIKE=debian\n";
        let release = OsRelease::parse(content).unwrap();
        assert_eq!(release.id, "ubuntu");
        assert_eq!(release.pretty_name, "Ubuntu 22.04");
        assert_eq!(release.name, "Ubuntu");
        assert_eq!(release.version_id, "22.04");
        assert_eq!(release.home_url, "https://www.ubuntu.com/");
    }

    #[test]
    fn test_missing_id_is_parse_error() {
        let content = b"PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\nNAME=\"Debian GNU/Linux\"\n";
        assert!(matches!(OsRelease::parse(content), Err(RegistryError::Parse(_))));
    }

    #[test]
    fn test_empty_window_is_parse_error() {
        assert!(matches!(OsRelease::parse(b""), Err(RegistryError::Parse(_))));
    }

    #[test]
    fn test_value_whitespace_and_crlf() {
        let content = b"ID=  alpine  \r\nVERSION_ID=3.19.1\r\n";
        let release = OsRelease::parse(content).unwrap();
        assert_eq!(release.id, "alpine");
        assert_eq!(release.version_id, "3.19.1");
    }

    #[test]
    fn test_value_split_on_first_equals() {
        let content = b"ID=fedora\nHOME_URL=\"https://example.org/?a=b\"\n";
        let release = OsRelease::parse(content).unwrap();
        assert_eq!(release.home_url, "https://example.org/?a=b");
    }

    #[test]
    fn test_only_one_quote_layer_removed() {
        assert_eq!(unquote("\"\"nested\"\""), "\"nested\"");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("\"open"), "open");
    }

    #[test]
    fn test_comments_and_unknown_keys_ignored() {
        let content = b"# comment line\nVARIANT=Container\nID=rhel\n";
        let release = OsRelease::parse(content).unwrap();
        assert_eq!(release.id, "rhel");
        assert!(release.pretty_name.is_empty());
    }

    #[test]
    fn test_os_release_paths() {
        assert!(is_os_release_path("etc/os-release"));
        assert!(is_os_release_path("usr/lib/os-release"));
        assert!(!is_os_release_path("etc/lsb-release"));
        assert!(!is_os_release_path("/etc/os-release"));
    }
}
