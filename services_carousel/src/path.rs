//! Carousel object references
//!
//! Engine references use `/` as the separator and may start with a root
//! marker (`~` or `DSM:`). Normalized references are relative to the
//! content root and never contain `.` or `..`.

use crate::CarouselError;
use std::path::PathBuf;

/// Prefixes meaning "resolve from the carousel root"
pub const ROOT_MARKERS: [&str; 2] = ["DSM:", "~"];

const SEPARATOR: char = '/';

/// Normalized carousel reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselPath {
    segments: Vec<String>,
}

impl CarouselPath {
    /// Parses an engine reference
    ///
    /// A root marker is removed together with at most one following
    /// separator. Empty and `.` segments are dropped; `..` is rejected.
    pub fn parse(raw: &str) -> Result<Self, CarouselError> {
        let mut rest = raw;
        if let Some(marker) = ROOT_MARKERS.iter().find(|m| rest.starts_with(**m)) {
            rest = &rest[marker.len()..];
            rest = rest.strip_prefix(SEPARATOR).unwrap_or(rest);
        }

        let mut segments = Vec::new();
        for segment in rest.split(SEPARATOR) {
            match segment {
                "" | "." => continue,
                ".." => {
                    return Err(CarouselError::PathInvalid {
                        path: raw.to_string(),
                    })
                }
                other => segments.push(other.to_string()),
            }
        }

        Ok(Self { segments })
    }

    /// Returns the normalized segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns true if the reference names the carousel root itself
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Converts to a host path relative to the content root
    pub fn to_host_relative(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}
