use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::{DynamicImage, ImageFormat};

use crate::cli::CompressionLevel;
use crate::error::PrepError;

/// Save an image in the format implied by `path`'s extension.
///
/// Parent directories are created as needed. PNG output is run through
/// oxipng when `compress` is set; other formats ignore it.
pub fn save_image(
    img: &DynamicImage,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    let format = ImageFormat::from_path(path).map_err(|e| PrepError::ImageSave {
        path: path.to_path_buf(),
        source: e,
    })?;

    // Encode in memory first so compression can work on the whole file
    let mut encoded = Cursor::new(Vec::new());
    img.write_to(&mut encoded, format)
        .map_err(|e| PrepError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    let output_data = match compress {
        Some(level) if format == ImageFormat::Png => {
            let opts = match level {
                CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
                CompressionLevel::Max => oxipng::Options::max_compression(),
            };
            oxipng::optimize_from_memory(&encoded.into_inner(), &opts).map_err(|e| {
                PrepError::PngCompress {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            })?
        }
        _ => encoded.into_inner(),
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| PrepError::OutputWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, output_data).map_err(|e| PrepError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn dot() -> DynamicImage {
        let mut img = RgbaImage::new(4, 3);
        img.put_pixel(2, 1, Rgba([10, 20, 30, 40]));
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lasers/red/laser.png");

        save_image(&dot(), &path, None).unwrap();

        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded, dot());
    }

    #[test]
    fn test_save_compressed_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("laser.png");

        save_image(&dot(), &path, Some(CompressionLevel::Level(1))).unwrap();

        let reloaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(reloaded.get_pixel(2, 1), &Rgba([10, 20, 30, 40]));
    }

    #[test]
    fn test_save_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let err = save_image(&dot(), &dir.path().join("laser.xyz"), None).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PrepError>(),
            Some(PrepError::ImageSave { .. })
        ));
    }
}
