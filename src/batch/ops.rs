use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;
use image::imageops::FilterType;
use log::debug;
use rayon::prelude::*;

use super::Job;
use crate::cli::{CompressionLevel, TintColor};
use crate::config::CropRect;
use crate::output::save_image;
use crate::sprite::{
    BoundingBox, crop_region, load_image, resize_by_scale, slice_sheet, tint, trim_with_mask,
};

/// What was done to one trimmed sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimRecord {
    pub name: String,
    pub bounds: BoundingBox,
    pub source_width: u32,
    pub source_height: u32,
    pub has_mask: bool,
}

/// Trim one sprite (and its mask, if the job has one) and write the result.
pub fn trim_file(job: &Job, margin: u32, compress: Option<CompressionLevel>) -> Result<TrimRecord> {
    let primary = load_image(&job.source)?;
    let mask = job.mask.as_deref().map(load_image).transpose()?;

    let trimmed = trim_with_mask(&primary, mask.as_ref(), margin)
        .with_context(|| format!("failed to trim {}", job.source.display()))?;

    save_image(&trimmed.primary, &job.dest, compress)?;
    if let (Some(mask), Some(mask_dest)) = (&trimmed.mask, &job.mask_dest) {
        save_image(mask, mask_dest, compress)?;
    }

    let bounds = trimmed.bounds;
    debug!(
        "{}: {}x{} -> {}x{}",
        job.name,
        trimmed.source_width,
        trimmed.source_height,
        bounds.width(),
        bounds.height()
    );

    Ok(TrimRecord {
        name: job.name.clone(),
        bounds,
        source_width: trimmed.source_width,
        source_height: trimmed.source_height,
        has_mask: trimmed.mask.is_some(),
    })
}

/// Keep only the jobs that have an entry in the crop table.
///
/// Also returns the table keys that matched no job.
pub fn match_crops(
    jobs: Vec<Job>,
    crops: &BTreeMap<String, CropRect>,
) -> (Vec<Job>, Vec<String>) {
    let unmatched = crops
        .keys()
        .filter(|name| !jobs.iter().any(|job| &job.name == *name))
        .cloned()
        .collect();

    let matched = jobs
        .into_iter()
        .filter(|job| crops.contains_key(&job.name))
        .collect();

    (matched, unmatched)
}

/// Cut a job's rectangle out of its image, optionally rescale, and write it.
pub fn crop_file(
    job: &Job,
    rect: &CropRect,
    resize: Option<(f32, FilterType)>,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    let img = load_image(&job.source)?;
    let cropped = crop_region(&img, rect, &job.name)?;

    let output = match resize {
        Some((scale, filter)) => resize_by_scale(&cropped, scale, filter),
        None => cropped,
    };

    save_image(&output, &job.dest, compress)
}

/// Tint one monochrome texture and write it.
pub fn tint_file(
    job: &Job,
    color: TintColor,
    gamma: f32,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    let img = load_image(&job.source)?;
    let tinted = tint(&img, color, gamma)?;
    save_image(&DynamicImage::ImageRgba8(tinted), &job.dest, compress)
}

/// Slice a sheet into tiles under `dest_dir`; returns the number of tiles written.
pub fn slice_file(
    sheet: &Path,
    dest_dir: &Path,
    tile_width: u32,
    tile_height: u32,
    skip_empty: bool,
    compress: Option<CompressionLevel>,
) -> Result<usize> {
    let img = load_image(sheet)?;
    let tiles = slice_sheet(&img, tile_width, tile_height, skip_empty)
        .with_context(|| format!("failed to slice {}", sheet.display()))?;

    let stem = sheet
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("tile");

    tiles
        .par_iter()
        .map(|tile| save_image(&tile.image, &dest_dir.join(tile.file_name(stem)), compress))
        .collect::<Result<()>>()?;

    Ok(tiles.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{MaskPairing, collect_jobs};
    use crate::error::{ErrorKind, classify};
    use image::{GrayImage, Luma, Rgba, RgbaImage};

    fn write_sprite(path: &Path) {
        let mut img = RgbaImage::new(10, 10);
        for y in 3..6 {
            for x in 2..8 {
                img.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }
        img.save(path).unwrap();
    }

    #[test]
    fn test_trim_file_with_mask() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_sprite(&src.path().join("laser.png"));
        GrayImage::from_pixel(10, 10, Luma([200]))
            .save(src.path().join("laser_mask.png"))
            .unwrap();

        let pairing = MaskPairing::new("", "_mask");
        let jobs = collect_jobs(src.path(), out.path(), Some(&pairing), None).unwrap();
        assert_eq!(jobs.len(), 1);

        let record = trim_file(&jobs[0], 1, None).unwrap();

        assert!(record.has_mask);
        assert_eq!((record.bounds.width(), record.bounds.height()), (8, 6));
        let sprite = image::open(out.path().join("laser.png")).unwrap();
        let mask = image::open(out.path().join("laser_mask.png")).unwrap();
        assert_eq!((sprite.width(), sprite.height()), (8, 6));
        assert_eq!((mask.width(), mask.height()), (8, 6));
    }

    #[test]
    fn test_trim_file_mask_mismatch_is_invalid_input() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_sprite(&src.path().join("laser.png"));
        GrayImage::new(9, 10)
            .save(src.path().join("laser_mask.png"))
            .unwrap();

        let pairing = MaskPairing::new("", "_mask");
        let jobs = collect_jobs(src.path(), out.path(), Some(&pairing), None).unwrap();
        let err = trim_file(&jobs[0], 1, None).unwrap_err();

        assert_eq!(classify(&err), ErrorKind::InvalidInput);
        assert!(!out.path().join("laser.png").exists());
    }

    #[test]
    fn test_trim_file_transparent_is_degenerate() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        RgbaImage::new(6, 6)
            .save(src.path().join("empty.png"))
            .unwrap();

        let jobs = collect_jobs(src.path(), out.path(), None, None).unwrap();
        let err = trim_file(&jobs[0], 1, None).unwrap_err();

        assert_eq!(classify(&err), ErrorKind::DegenerateImage);
    }

    #[test]
    fn test_match_crops() {
        let job = |name: &str| Job {
            name: name.to_string(),
            source: Path::new("src").join(name),
            dest: Path::new("out").join(name),
            mask: None,
            mask_dest: None,
        };
        let rect = CropRect {
            x: 0,
            y: 0,
            width: 4,
            height: 4,
        };
        let crops: BTreeMap<_, _> = [
            ("reimu.png".to_string(), rect),
            ("sanae.png".to_string(), rect),
        ]
        .into_iter()
        .collect();

        let (matched, unmatched) = match_crops(vec![job("reimu.png"), job("bg.png")], &crops);

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "reimu.png");
        assert_eq!(unmatched, vec!["sanae.png".to_string()]);
    }

    #[test]
    fn test_crop_file_with_resize() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        RgbaImage::new(40, 40)
            .save(src.path().join("reimu.png"))
            .unwrap();

        let jobs = collect_jobs(src.path(), out.path(), None, None).unwrap();
        let rect = CropRect {
            x: 4,
            y: 8,
            width: 20,
            height: 30,
        };
        crop_file(&jobs[0], &rect, Some((0.5, FilterType::Nearest)), None).unwrap();

        let cropped = image::open(out.path().join("reimu.png")).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (10, 15));
    }

    #[test]
    fn test_tint_file() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        GrayImage::from_pixel(2, 2, Luma([255]))
            .save(src.path().join("spark.png"))
            .unwrap();

        let jobs = collect_jobs(src.path(), out.path(), None, None).unwrap();
        let color = TintColor { r: 0, g: 128, b: 255 };
        tint_file(&jobs[0], color, 1.0, None).unwrap();

        let tinted = image::open(out.path().join("spark.png")).unwrap().into_rgba8();
        assert_eq!(tinted.get_pixel(1, 1), &Rgba([0, 128, 255, 255]));
    }

    #[test]
    fn test_slice_file() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let sheet = src.path().join("fairy.png");
        RgbaImage::from_pixel(64, 32, Rgba([1, 1, 1, 255]))
            .save(&sheet)
            .unwrap();

        let count = slice_file(&sheet, out.path(), 32, 16, false, None).unwrap();

        assert_eq!(count, 4);
        assert!(out.path().join("fairy_1_1.png").is_file());
        assert!(!out.path().join("fairy_2_0.png").exists());
    }
}
