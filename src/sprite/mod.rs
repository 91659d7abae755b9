mod loader;
mod region;
mod resizer;
mod sheet;
mod sprite;
mod tint;
mod trimmer;

pub use loader::{SUPPORTED_EXTENSIONS, is_supported_image, load_image};
pub use region::crop_region;
pub use resizer::resize_by_scale;
pub use sheet::{Tile, slice_sheet};
pub use sprite::{AlphaPlane, BoundingBox, Trimmed};
pub use tint::tint;
pub use trimmer::{DEFAULT_MARGIN, find_trim_bounds, trim_with_mask};
