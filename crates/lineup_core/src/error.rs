use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Validation failures raised by placement operations.
///
/// These never leave the store in a partially written state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    #[error("Formation size mismatch: template has {expected} slots, squad has {found} players")]
    FormationSizeMismatch { expected: usize, found: usize },

    #[error("Duplicate player in squad: {0}")]
    DuplicatePlayer(String),

    #[error("Unknown formation '{name}' for squad size {squad_size}")]
    UnknownFormation { name: String, squad_size: usize },

    #[error("Invalid placement record: {0}")]
    InvalidRecord(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Graphics context could not be created or was lost.
    ContextLost,
    /// Scene assets failed to load.
    AssetLoad,
    /// Anything else the scene backend reports.
    Backend,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FaultKind::ContextLost => write!(f, "context lost"),
            FaultKind::AssetLoad => write!(f, "asset load"),
            FaultKind::Backend => write!(f, "backend"),
        }
    }
}

/// Failure reported by the volumetric renderer.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Rendering fault ({kind}): {message}")]
pub struct RenderingFault {
    pub kind: FaultKind,
    pub message: String,
}

impl RenderingFault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

#[derive(Error, Debug)]
pub enum LineupError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Rendering(#[from] RenderingFault),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LineupError {
    /// Whether the surrounding team-creation flow can carry on with its prior state.
    pub fn is_recoverable(&self) -> bool {
        match self {
            LineupError::Placement(_) => true,
            LineupError::Rendering(_) => true,
            LineupError::Config(ConfigError::Io { .. }) => true,
            LineupError::Config(_) => false,
            LineupError::Serialization(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, LineupError>;
