use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

use crate::error::PrepError;
use crate::sprite::is_supported_image;

/// Filename convention linking a sprite to its companion mask.
///
/// The mask of `<base><primary_suffix>.<ext>` is `<base><mask_suffix>.<ext>`
/// in the same directory. An empty `mask_suffix` disables pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskPairing {
    pub primary_suffix: String,
    pub mask_suffix: String,
}

impl MaskPairing {
    pub fn new(primary_suffix: impl Into<String>, mask_suffix: impl Into<String>) -> Self {
        Self {
            primary_suffix: primary_suffix.into(),
            mask_suffix: mask_suffix.into(),
        }
    }

    /// Where the mask of `primary` would live, if its name follows the convention
    pub fn mask_path_for(&self, primary: &Path) -> Option<PathBuf> {
        self.swap_suffix(primary, &self.primary_suffix, &self.mask_suffix)
    }

    /// Where the sprite owning `mask` would live, if its name follows the convention
    pub fn primary_path_for(&self, mask: &Path) -> Option<PathBuf> {
        self.swap_suffix(mask, &self.mask_suffix, &self.primary_suffix)
    }

    /// True if `path` is the mask of another existing file
    pub fn is_mask(&self, path: &Path) -> bool {
        self.primary_path_for(path)
            .is_some_and(|primary| primary != path && primary.is_file())
    }

    fn swap_suffix(&self, path: &Path, from: &str, to: &str) -> Option<PathBuf> {
        if self.mask_suffix.is_empty() {
            return None;
        }

        let stem = path.file_stem()?.to_str()?;
        let base = stem.strip_suffix(from)?;

        let mut name = format!("{}{}", base, to);
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            name.push('.');
            name.push_str(ext);
        }

        Some(path.with_file_name(name))
    }
}

/// One input file and where its output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Path relative to the source directory, '/'-separated
    pub name: String,
    pub source: PathBuf,
    pub dest: PathBuf,
    /// Companion mask, only set when the file exists
    pub mask: Option<PathBuf>,
    pub mask_dest: Option<PathBuf>,
}

/// Enumerate the images under `source` and pair each with its output path.
///
/// `source` may be a directory (walked recursively) or a single file. Output
/// paths mirror the relative layout under `dest`. Mask files are attached to
/// their sprite rather than listed as jobs of their own. Jobs are sorted by
/// name.
pub fn collect_jobs(
    source: &Path,
    dest: &Path,
    pairing: Option<&MaskPairing>,
    include: Option<&glob::Pattern>,
) -> Result<Vec<Job>> {
    if !source.exists() {
        return Err(PrepError::InputNotFound(source.to_path_buf()).into());
    }

    let (base, mut paths) = if source.is_dir() {
        let mut paths = Vec::new();
        collect_from_directory(source, &mut paths)?;
        (source.to_path_buf(), paths)
    } else {
        let base = source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        (base, vec![source.to_path_buf()])
    };
    paths.sort();

    let mut jobs = Vec::new();
    for path in paths {
        if !is_supported_image(&path) {
            continue;
        }
        if pairing.is_some_and(|p| p.is_mask(&path)) {
            debug!("{} is a mask, attaching it to its sprite", path.display());
            continue;
        }

        let relative = path.strip_prefix(&base).unwrap_or(path.as_path()).to_path_buf();
        if let Some(pattern) = include
            && !pattern.matches_path(&relative)
        {
            continue;
        }

        let mask = pairing
            .and_then(|p| p.mask_path_for(&path))
            .filter(|m| *m != path && m.is_file());
        let mask_dest = mask
            .as_ref()
            .map(|m| dest.join(m.strip_prefix(&base).unwrap_or(m.as_path())));

        jobs.push(Job {
            name: relative_name(&relative),
            dest: dest.join(&relative),
            source: path,
            mask,
            mask_dest,
        });
    }

    if jobs.is_empty() {
        return Err(PrepError::NoImages.into());
    }

    Ok(jobs)
}

fn collect_from_directory(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();

        if path.is_file() {
            paths.push(path);
        } else if path.is_dir() {
            collect_from_directory(&path, paths)?;
        }
    }

    Ok(())
}

fn relative_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
