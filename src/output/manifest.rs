use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::batch::TrimRecord;
use crate::error::PrepError;

#[derive(Serialize)]
struct Manifest<'a> {
    meta: Meta,
    sprites: Vec<ManifestSprite<'a>>,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestSprite<'a> {
    name: &'a str,
    trimmed: bool,
    source_size: Size,
    /// Kept region in source pixels
    bounds: Frame,
    mask: bool,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct Frame {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// Write the trim manifest, one entry per trimmed sprite
pub fn write_manifest(records: &[TrimRecord], path: &Path) -> Result<()> {
    let output = Manifest {
        meta: Meta {
            app: "spriteprep",
            version: env!("CARGO_PKG_VERSION"),
        },
        sprites: records.iter().map(record_to_json).collect(),
    };

    let content = serde_json::to_string_pretty(&output)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| PrepError::OutputWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, content).map_err(|e| PrepError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

fn record_to_json(record: &TrimRecord) -> ManifestSprite<'_> {
    let bounds = &record.bounds;

    ManifestSprite {
        name: &record.name,
        trimmed: !bounds.is_full(record.source_width, record.source_height),
        source_size: Size {
            w: record.source_width,
            h: record.source_height,
        },
        bounds: Frame {
            x: bounds.col_start,
            y: bounds.row_start,
            w: bounds.width(),
            h: bounds.height(),
        },
        mask: record.has_mask,
    }
}
