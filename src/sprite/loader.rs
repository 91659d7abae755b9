use std::path::Path;

use anyhow::Result;
use image::{DynamicImage, ImageReader};
use log::debug;

use crate::error::PrepError;

/// Raster formats that can carry an alpha channel
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "gif", "bmp", "webp", "tga", "tif", "tiff"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode an image file, keeping its native pixel layout
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let img = ImageReader::open(path)
        .map_err(|e| PrepError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .with_guessed_format()
        .map_err(|e| PrepError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| PrepError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?;

    debug!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("laser.png")));
        assert!(is_supported_image(Path::new("bullets/laser.PNG")));
        assert!(is_supported_image(Path::new("sheet.webp")));
        assert!(!is_supported_image(Path::new("portrait.jpg")));
        assert!(!is_supported_image(Path::new("pattern.txt")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn test_load_image_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        let mut img = RgbaImage::new(3, 3);
        img.put_pixel(1, 1, Rgba([255, 0, 0, 128]));
        img.save(&path).unwrap();

        let loaded = load_image(&path).unwrap();

        assert_eq!(loaded.color(), image::ColorType::Rgba8);
        assert_eq!(loaded.to_rgba8().get_pixel(1, 1)[3], 128);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(&dir.path().join("missing.png")).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PrepError>(),
            Some(PrepError::ImageLoad { .. })
        ));
    }
}
