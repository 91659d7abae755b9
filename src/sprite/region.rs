use image::DynamicImage;

use crate::config::CropRect;
use crate::error::PrepError;

/// Cut a fixed rectangle out of an image.
///
/// The rectangle must be non-empty and lie entirely inside the image; `name`
/// is only used for the error message.
pub fn crop_region(
    img: &DynamicImage,
    rect: &CropRect,
    name: &str,
) -> Result<DynamicImage, PrepError> {
    let (width, height) = (img.width(), img.height());

    let fits = rect.width > 0
        && rect.height > 0
        && rect.x.checked_add(rect.width).is_some_and(|right| right <= width)
        && rect.y.checked_add(rect.height).is_some_and(|bottom| bottom <= height);

    if !fits {
        return Err(PrepError::RegionOutOfBounds {
            name: name.to_string(),
            x: rect.x,
            y: rect.y,
            region_width: rect.width,
            region_height: rect.height,
            width,
            height,
        });
    }

    Ok(img.crop_imm(rect.x, rect.y, rect.width, rect.height))
}
