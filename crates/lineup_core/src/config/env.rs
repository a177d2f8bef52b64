use std::env;

use super::LineupConfig;
use crate::error::ConfigError;

pub const LINEUP_CONFIG_PATH_ENV: &str = "LINEUP_CONFIG_PATH";

/// Loads the file named by `LINEUP_CONFIG_PATH`; unset or blank means defaults.
pub fn load_from_env() -> Result<LineupConfig, ConfigError> {
    let Ok(path) = env::var(LINEUP_CONFIG_PATH_ENV) else {
        return Ok(LineupConfig::default());
    };
    resolve(&path)
}

fn resolve(path: &str) -> Result<LineupConfig, ConfigError> {
    let path = path.trim();
    if path.is_empty() {
        return Ok(LineupConfig::default());
    }
    LineupConfig::load(path)
}

impl LineupConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        load_from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_blank_path_uses_defaults() {
        assert_eq!(resolve("   ").unwrap(), LineupConfig::default());
    }

    #[test]
    fn test_path_is_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"initial_renderer": "planar"}}"#).unwrap();
        let padded = format!("  {}  ", file.path().display());

        let cfg = resolve(&padded).unwrap();
        assert_eq!(cfg, LineupConfig::planar_only());
    }
}
