//! # Carousel Content Service
//!
//! Resolves engine object references to byte payloads.
//!
//! ## Philosophy
//!
//! - **Carousel semantics over local storage**: A broadcast carousel delivers
//!   objects eventually; a missing object may simply not have arrived yet.
//!   The local backing store is synchronous but keeps that contract.
//! - **Two kinds of absence**: "not arrived" and "no such directory" are
//!   distinct results, even though a local directory tree reports both the
//!   same way underneath.
//! - **Errors are values**: The engine owns retry policy; the store never aborts.
//!
//! ## Non-Goals
//!
//! - Carousel timing, versioning, or retransmission
//! - Caching (every fetch reads the backing store)

mod path;

pub use path::{CarouselPath, ROOT_MARKERS};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Carousel lookup failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CarouselError {
    /// The containing directory exists but the object has not arrived
    #[error("Object not found: {path}")]
    NotFound { path: String },

    /// The containing directory does not exist (or the reference is malformed)
    #[error("Invalid object path: {path}")]
    PathInvalid { path: String },
}

impl CarouselError {
    /// Returns the engine reference that failed
    pub fn path(&self) -> &str {
        match self {
            CarouselError::NotFound { path } | CarouselError::PathInvalid { path } => path,
        }
    }

    /// Returns true if the object may still arrive later
    pub fn is_retryable(&self) -> bool {
        matches!(self, CarouselError::NotFound { .. })
    }
}

/// Object store the engine reads content from
///
/// The seam where a real carousel receiver would plug in.
pub trait ContentStore {
    /// Returns true if the object currently resolves; never fails
    fn probe(&self, path: &str) -> bool;

    /// Reads the whole object
    fn fetch(&self, path: &str) -> Result<Vec<u8>, CarouselError>;
}

/// Carousel emulated by a local directory tree
#[derive(Debug, Clone)]
pub struct LocalCarousel {
    root: PathBuf,
}

impl LocalCarousel {
    /// Creates a carousel rooted at `root`
    ///
    /// The directory does not have to exist yet; lookups simply fail until it does.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the content root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Points the carousel at a different content root
    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = root.into();
    }

    /// Resolves an engine reference to a host path under the content root
    pub fn resolve(&self, path: &str) -> Result<PathBuf, CarouselError> {
        let parsed = CarouselPath::parse(path)?;
        Ok(self.root.join(parsed.to_host_relative()))
    }

    fn classify_missing(&self, raw: &str, host_path: &Path) -> CarouselError {
        let directory_exists = self.root.is_dir()
            && (host_path.is_dir() || host_path.parent().is_some_and(Path::is_dir));
        if directory_exists {
            CarouselError::NotFound {
                path: raw.to_string(),
            }
        } else {
            CarouselError::PathInvalid {
                path: raw.to_string(),
            }
        }
    }
}

impl ContentStore for LocalCarousel {
    fn probe(&self, path: &str) -> bool {
        match self.resolve(path) {
            Ok(host_path) => host_path.is_file(),
            Err(_) => false,
        }
    }

    fn fetch(&self, path: &str) -> Result<Vec<u8>, CarouselError> {
        let host_path = self.resolve(path)?;
        match fs::read(&host_path) {
            Ok(bytes) => {
                debug!(path, bytes = bytes.len(), "carousel fetch");
                Ok(bytes)
            }
            Err(err) => {
                let error = self.classify_missing(path, &host_path);
                if err.kind() != io::ErrorKind::NotFound {
                    debug!(path, error = %err, "carousel read failed");
                }
                debug!(path, retryable = error.is_retryable(), "carousel miss");
                Err(error)
            }
        }
    }
}
