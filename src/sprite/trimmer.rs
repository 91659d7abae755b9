use image::DynamicImage;

use super::{AlphaPlane, BoundingBox, Trimmed};
use crate::error::PrepError;

/// Transparent rows/columns kept next to the content on each trimmed side
pub const DEFAULT_MARGIN: u32 = 1;

/// Count how many lines to remove from *both* ends of an axis of length `len`.
///
/// Lines are consumed pairwise from the outside in and the scan stops as soon
/// as either end reaches content, so the narrower transparent border bounds
/// the trim. `margin` lines are then handed back.
fn symmetric_trim(len: u32, margin: u32, is_empty: impl Fn(u32) -> bool) -> u32 {
    let mut i = 0;
    while i < len / 2 && is_empty(i) && is_empty(len - 1 - i) {
        i += 1;
    }
    i.saturating_sub(margin)
}

/// Compute the symmetric trim bounds of an alpha plane.
///
/// Rows are trimmed first; the column pass only looks at the rows that
/// survived the row pass.
pub fn find_trim_bounds(alpha: &AlphaPlane, margin: u32) -> Result<BoundingBox, PrepError> {
    let (width, height) = (alpha.width(), alpha.height());

    if alpha.is_fully_transparent() {
        return Err(PrepError::FullyTransparent { width, height });
    }

    let rows = symmetric_trim(height, margin, |y| alpha.row_is_empty(y, 0..width));
    let (row_start, row_end) = (rows, height - rows);

    let cols = symmetric_trim(width, margin, |x| {
        alpha.col_is_empty(x, row_start..row_end)
    });

    Ok(BoundingBox {
        row_start,
        row_end,
        col_start: cols,
        col_end: width - cols,
    })
}

/// Trim transparent borders from a sprite and crop its mask identically.
///
/// The mask may have any pixel layout but must match the sprite's size. The
/// inputs are left untouched.
pub fn trim_with_mask(
    primary: &DynamicImage,
    mask: Option<&DynamicImage>,
    margin: u32,
) -> Result<Trimmed, PrepError> {
    let (width, height) = (primary.width(), primary.height());

    if let Some(mask) = mask
        && (mask.width() != width || mask.height() != height)
    {
        return Err(PrepError::DimensionMismatch {
            width,
            height,
            mask_width: mask.width(),
            mask_height: mask.height(),
        });
    }

    let alpha = AlphaPlane::from_image(primary)?;
    let bounds = find_trim_bounds(&alpha, margin)?;

    Ok(Trimmed {
        primary: bounds.crop(primary),
        mask: mask.map(|m| bounds.crop(m)),
        bounds,
        source_width: width,
        source_height: height,
    })
}
