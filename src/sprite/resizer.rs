use image::DynamicImage;
use image::imageops::FilterType;

/// Resize an image by a scale factor
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn resize_by_scale(img: &DynamicImage, scale: f32, filter: FilterType) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    let new_width = (w as f32 * scale).round() as u32;
    let new_height = (h as f32 * scale).round() as u32;
    img.resize_exact(new_width.max(1), new_height.max(1), filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_resize_half() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(64, 30));
        let resized = resize_by_scale(&img, 0.5, FilterType::Nearest);
        assert_eq!((resized.width(), resized.height()), (32, 15));
    }

    #[test]
    fn test_resize_never_collapses() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(3, 3));
        let resized = resize_by_scale(&img, 0.01, FilterType::Triangle);
        assert_eq!((resized.width(), resized.height()), (1, 1));
    }
}
