use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::bencode::DEFAULT_MAX_DEPTH;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_PATH: &str = "rusbit.toml";

/// Largest `max_depth` a config file may ask for. Deeper nesting limits
/// would let adversarial input exhaust the decoder's stack.
pub const MAX_DEPTH_CEILING: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deepest list/dict nesting the decoder accepts.
    pub max_depth: usize,
    /// Print one line per piece hash in `info`.
    pub show_piece_hashes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            show_piece_hashes: true,
        }
    }
}

impl Config {
    /// Loads `path` if given, otherwise `rusbit.toml` if it exists, otherwise defaults.
    /// An explicitly requested file that doesn't exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = fs::read_to_string(&config_path)
            .map_err(|e| format!("reading {}: {}", config_path.display(), e))?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| format!("parsing {}: {}", config_path.display(), e))?;
        if config.max_depth > MAX_DEPTH_CEILING {
            return Err(format!(
                "{}: max_depth {} exceeds the limit of {}",
                config_path.display(),
                config.max_depth,
                MAX_DEPTH_CEILING
            )
            .into());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "max_depth = 8\nshow_piece_hashes = false\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config, Config { max_depth: 8, show_piece_hashes: false });
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(&path, "max_depth = 16\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.max_depth, 16);
        assert!(config.show_piece_hashes);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_rejects_max_depth_above_ceiling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.toml");
        fs::write(&path, "max_depth = 100000000\n").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("max_depth"));

        fs::write(&path, format!("max_depth = {}\n", MAX_DEPTH_CEILING)).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap().max_depth, MAX_DEPTH_CEILING);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "max_depth = \"deep\"\n").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_default_roundtrips_through_toml() {
        let text = toml::to_string(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
