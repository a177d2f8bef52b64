//! # Lineup configuration
//!
//! Field geometry, clamp windows, per-role field defaults and the starting renderer.
//!
//! ```rust
//! use lineup_core::config::LineupConfig;
//!
//! let config = LineupConfig::default();
//! let flat = LineupConfig::planar_only();
//! ```

mod env;

pub use env::{LINEUP_CONFIG_PATH_ENV, load_from_env};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ConfigError;
use crate::field::{ClampRange, FieldGeometry};
use crate::placement::RoleDefaults;
use crate::render::RendererKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LineupConfig {
    /// World dimensions for the volumetric view
    #[validate]
    pub geometry: FieldGeometry,
    /// Clamp window for drag commits (default [2, 98])
    #[validate]
    pub drag_clamp: ClampRange,
    /// Clamp window for click-to-place (default [0, 100])
    #[validate]
    pub place_clamp: ClampRange,
    /// Coordinates used by move-to-field
    #[validate]
    pub field_defaults: RoleDefaults,
    /// Renderer shown first
    pub initial_renderer: RendererKind,
}

impl Default for LineupConfig {
    fn default() -> Self {
        Self {
            geometry: FieldGeometry::default(),
            drag_clamp: ClampRange::DRAG,
            place_clamp: ClampRange::PERCENT,
            field_defaults: RoleDefaults::default(),
            initial_renderer: RendererKind::Volumetric,
        }
    }
}

impl LineupConfig {
    /// Starts on the flat overlay (hosts without a graphics context).
    pub fn planar_only() -> Self {
        Self { initial_renderer: RendererKind::Planar, ..Self::default() }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: LineupConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        let config = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), "lineup config loaded");
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ========== Tests ==========
