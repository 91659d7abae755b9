use image::{DynamicImage, Rgba, RgbaImage};

use crate::cli::TintColor;
use crate::error::PrepError;

/// Turn a monochrome texture into a solid-colour sprite whose alpha follows
/// the source brightness.
///
/// Every output pixel has the tint's RGB. Its alpha is the source luminance,
/// normalised and raised to `gamma`, scaled by the source alpha. Colour
/// sources are reduced to luminance first.
pub fn tint(img: &DynamicImage, color: TintColor, gamma: f32) -> Result<RgbaImage, PrepError> {
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(PrepError::InvalidGamma(gamma));
    }

    let src = img.to_luma_alpha8();
    let mut out = RgbaImage::new(src.width(), src.height());

    for (dst, px) in out.pixels_mut().zip(src.pixels()) {
        let [luma, alpha] = px.0;
        *dst = Rgba([color.r, color.g, color.b, tinted_alpha(luma, alpha, gamma)]);
    }

    Ok(out)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn tinted_alpha(luma: u8, alpha: u8, gamma: f32) -> u8 {
    let intensity = (f32::from(luma) / 255.0).powf(gamma);
    (intensity * f32::from(alpha)).round().clamp(0.0, 255.0) as u8
}
