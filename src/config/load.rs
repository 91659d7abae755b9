use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::PrepConfig;

/// A loaded configuration file with its associated directory.
///
/// Paths in the config are relative to the config file location,
/// so we need to track where the config was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration
    pub config: PrepConfig,
    /// The directory containing the config file
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Load a config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: PrepConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        if config.version != 1 {
            anyhow::bail!(
                "unsupported config version {} in {}",
                config.version,
                path.display()
            );
        }

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Resolve the configured source directory relative to the config file.
    pub fn resolve_source_dir(&self) -> Option<PathBuf> {
        self.config
            .source_dir
            .as_ref()
            .map(|dir| self.config_dir.join(dir))
    }

    /// Resolve the configured output directory relative to the config file.
    pub fn resolve_output_dir(&self) -> Option<PathBuf> {
        self.config
            .output_dir
            .as_ref()
            .map(|dir| self.config_dir.join(dir))
    }

    /// Compile the include filter, if any.
    pub fn include_pattern(&self) -> Result<Option<glob::Pattern>> {
        self.config
            .include
            .as_deref()
            .map(|p| {
                glob::Pattern::new(p).with_context(|| format!("invalid include pattern: {}", p))
            })
            .transpose()
    }
}
