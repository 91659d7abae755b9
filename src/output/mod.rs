mod format;
mod manifest;

pub use format::save_image;
pub use manifest::write_manifest;

/// File name of the trim manifest written next to trimmed sprites
pub const MANIFEST_FILE: &str = "trim.json";
