//! # Host Configuration
//!
//! JSON configuration for the host daemon. Every section has defaults, so a
//! partial file (or none at all) is valid. The content root and font
//! selection are re-applied from here on every engine reboot.

use graphics_rasterizer::{Color, FontCatalog, REFERENCE_FONT};
use input_types::GatePolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid frame size {width}x{height}")]
    InvalidFrame { width: u32, height: u32 },
}

/// Top-level host configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Directory standing in for the broadcast carousel
    pub content_root: PathBuf,
    /// Interval the pump resumes at after the engine stops it
    pub default_wait_ms: u32,
    pub frame: FrameConfig,
    pub fonts: FontConfig,
    pub receiver: ReceiverConfig,
    /// Service URL to channel index
    pub services: BTreeMap<String, u32>,
    /// Channel the receiver is tuned to, if any
    pub current_service: Option<u32>,
    pub input: InputConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("carousel"),
            default_wait_ms: 100,
            frame: FrameConfig::default(),
            fonts: FontConfig::default(),
            receiver: ReceiverConfig::default(),
            services: BTreeMap::new(),
            current_service: None,
            input: InputConfig::default(),
        }
    }
}

/// Presentation area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub width: u32,
    pub height: u32,
    /// Opaque background as `[r, g, b]`
    pub background: [u8; 3],
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: 720,
            height: 576,
            background: [0, 0, 0],
        }
    }
}

/// Font fallback order and the families present on this host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub reference: String,
    pub secondary: Option<String>,
    pub installed: Vec<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            reference: REFERENCE_FONT.to_string(),
            secondary: None,
            installed: Vec::new(),
        }
    }
}

/// Identity reported to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    pub id: String,
    pub version: String,
    /// Feature strings the engine may query
    pub features: Vec<String>,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            id: "IBH".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            features: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Keep the historical, unreachable register-5 gate
    pub legacy_register5_gate: bool,
}

impl HostConfig {
    /// Loads and validates a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parses and validates JSON config text
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: HostConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let FrameConfig { width, height, .. } = self.frame;
        if width == 0 || height == 0 || width > 8192 || height > 8192 {
            return Err(ConfigError::InvalidFrame { width, height });
        }
        Ok(())
    }

    pub fn background(&self) -> Color {
        let [r, g, b] = self.frame.background;
        Color::rgb(r, g, b)
    }

    pub fn font_catalog(&self) -> FontCatalog {
        FontCatalog::new(
            self.fonts.reference.clone(),
            self.fonts.secondary.clone(),
            self.fonts.installed.clone(),
        )
    }

    pub fn gate_policy(&self) -> GatePolicy {
        if self.input.legacy_register5_gate {
            GatePolicy::Legacy
        } else {
            GatePolicy::Corrected
        }
    }
}
