//! Locates and loads the engine configuration.
//!
//! `$TORUS_CONFIG` names an explicit file, which must exist. Without it the
//! engine looks for `torus-config.yaml` in the working directory and falls
//! back to defaults (plus environment overrides) when that file is absent.

use std::path::{Path, PathBuf};

use torus_core::config::TorusConfig;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "torus-config.yaml";

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "TORUS_CONFIG";

/// A resolved configuration and where it came from.
#[derive(Debug)]
pub struct LoadedConfig {
    /// The configuration, with overrides applied.
    pub config: TorusConfig,
    /// The file that was read, or looked for.
    pub path: PathBuf,
    /// Whether `path` existed and was read.
    pub found: bool,
}

/// Resolve and load the configuration.
///
/// `lookup` reads environment variables (normally `std::env::var`);
/// `default_path` is used when `$TORUS_CONFIG` is unset or blank.
pub fn load_config(
    default_path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<LoadedConfig, EngineError> {
    let explicit = lookup(CONFIG_PATH_ENV)
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    match explicit {
        Some(path) if !path.exists() => Err(EngineError::ConfigNotFound { path }),
        Some(path) => read(path, &lookup),
        None if default_path.exists() => read(default_path.to_path_buf(), &lookup),
        None => {
            let mut config = TorusConfig::default();
            config.simulation.apply_overrides(&lookup);
            Ok(LoadedConfig {
                config,
                path: default_path.to_path_buf(),
                found: false,
            })
        }
    }
}

fn read(
    path: PathBuf,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<LoadedConfig, EngineError> {
    let config = TorusConfig::from_file_with(&path, lookup)?;
    Ok(LoadedConfig {
        config,
        path,
        found: true,
    })
}
