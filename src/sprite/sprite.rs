use std::ops::Range;

use image::DynamicImage;

use crate::error::PrepError;

/// Half-open row/column ranges kept after trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// First kept row
    pub row_start: u32,
    /// One past the last kept row
    pub row_end: u32,
    /// First kept column
    pub col_start: u32,
    /// One past the last kept column
    pub col_end: u32,
}

impl BoundingBox {
    /// Box covering a whole image
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            row_start: 0,
            row_end: height,
            col_start: 0,
            col_end: width,
        }
    }

    pub fn width(&self) -> u32 {
        self.col_end - self.col_start
    }

    pub fn height(&self) -> u32 {
        self.row_end - self.row_start
    }

    /// Returns true if the box keeps every pixel of a `width`x`height` image
    pub fn is_full(&self, width: u32, height: u32) -> bool {
        *self == Self::full(width, height)
    }

    /// Copy the boxed region out of `image`
    pub fn crop(&self, image: &DynamicImage) -> DynamicImage {
        image.crop_imm(self.col_start, self.row_start, self.width(), self.height())
    }
}

/// Alpha samples of an image, row-major
#[derive(Debug, Clone)]
pub struct AlphaPlane {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl AlphaPlane {
    /// Extract the alpha channel of an 8-bit image with alpha.
    ///
    /// Only `Rgba8` and `LumaA8` images qualify; anything else (no alpha, or a
    /// wider sample type) is rejected.
    pub fn from_image(image: &DynamicImage) -> Result<Self, PrepError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(PrepError::EmptyImage);
        }

        let data = match image {
            DynamicImage::ImageRgba8(buf) => buf.pixels().map(|p| p[3]).collect(),
            DynamicImage::ImageLumaA8(buf) => buf.pixels().map(|p| p[1]).collect(),
            other => {
                return Err(PrepError::MissingAlpha {
                    color: format!("{:?}", other.color()),
                });
            }
        };

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Alpha at `(x, y)`; panics outside the plane
    pub fn get(&self, x: u32, y: u32) -> u8 {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside {}x{} alpha plane",
            x,
            y,
            self.width,
            self.height
        );
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// True if every pixel of row `y` within `cols` is fully transparent
    pub fn row_is_empty(&self, y: u32, mut cols: Range<u32>) -> bool {
        cols.all(|x| self.get(x, y) == 0)
    }

    /// True if every pixel of column `x` within `rows` is fully transparent
    pub fn col_is_empty(&self, x: u32, mut rows: Range<u32>) -> bool {
        rows.all(|y| self.get(x, y) == 0)
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.data.iter().all(|&a| a == 0)
    }
}

/// A sprite and its optional companion mask, both cropped to `bounds`
#[derive(Debug, Clone)]
pub struct Trimmed {
    pub primary: DynamicImage,
    pub mask: Option<DynamicImage>,
    /// Bounds in the coordinates of the source image
    pub bounds: BoundingBox,
    /// Width before trimming
    pub source_width: u32,
    /// Height before trimming
    pub source_height: u32,
}

impl Trimmed {
    /// Returns true if anything was actually removed
    pub fn was_trimmed(&self) -> bool {
        !self.bounds.is_full(self.source_width, self.source_height)
    }
}
