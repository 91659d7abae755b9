use std::collections::BTreeMap;

use serde::Deserialize;

/// PNG compression level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// A fixed crop rectangle for one asset, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Tint settings for monochrome particle textures.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TintConfig {
    /// Tint colour as "RRGGBB" (a leading '#' is accepted)
    pub color: String,
    /// Exponent applied to the normalised luminance before it becomes alpha
    pub gamma: f32,
}

impl Default for TintConfig {
    fn default() -> Self {
        Self {
            color: "ffffff".to_string(),
            gamma: 1.0,
        }
    }
}

/// spriteprep configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Default source directory
    pub source_dir: Option<String>,
    /// Default destination directory
    pub output_dir: Option<String>,
    /// Transparent border kept around trimmed content
    pub margin: u32,
    /// Stem suffix identifying primary sprites that have masks ("" = any file)
    pub primary_suffix: String,
    /// Stem suffix that replaces `primary_suffix` to name the mask ("" disables masks)
    pub mask_suffix: String,
    /// Only process files whose relative path matches this glob pattern
    pub include: Option<String>,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Per-asset crop rectangles keyed by relative file path
    pub crops: BTreeMap<String, CropRect>,
    /// Tint settings
    pub tint: TintConfig,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            version: 1,
            source_dir: None,
            output_dir: None,
            margin: 1,
            primary_suffix: String::new(),
            mask_suffix: "_mask".to_string(),
            include: None,
            compress: None,
            crops: BTreeMap::new(),
            tint: TintConfig::default(),
        }
    }
}
