use image::DynamicImage;

use super::AlphaPlane;
use crate::error::PrepError;

/// One cell of a sliced sprite sheet
#[derive(Debug, Clone)]
pub struct Tile {
    /// Grid row, counted from the top
    pub row: u32,
    /// Grid column, counted from the left
    pub col: u32,
    pub image: DynamicImage,
}

impl Tile {
    /// Output file name for this tile, e.g. `fairy_0_3.png`
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}_{}_{}.png", stem, self.row, self.col)
    }

    fn is_empty(&self) -> bool {
        AlphaPlane::from_image(&self.image)
            .map(|alpha| alpha.is_fully_transparent())
            .unwrap_or(false)
    }
}

/// Slice a sheet into uniform tiles in row-major order.
///
/// Pixels to the right of the last full column or below the last full row
/// are dropped. With `skip_empty`, fully transparent tiles are left out; the
/// remaining tiles keep their grid position.
pub fn slice_sheet(
    sheet: &DynamicImage,
    tile_width: u32,
    tile_height: u32,
    skip_empty: bool,
) -> Result<Vec<Tile>, PrepError> {
    let (width, height) = (sheet.width(), sheet.height());

    if tile_width == 0 || tile_height == 0 || tile_width > width || tile_height > height {
        return Err(PrepError::InvalidTileSize {
            tile_width,
            tile_height,
            width,
            height,
        });
    }

    let cols = width / tile_width;
    let rows = height / tile_height;

    let mut tiles = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let tile = Tile {
                row,
                col,
                image: sheet.crop_imm(col * tile_width, row * tile_height, tile_width, tile_height),
            };
            if skip_empty && tile.is_empty() {
                continue;
            }
            tiles.push(tile);
        }
    }

    Ok(tiles)
}
