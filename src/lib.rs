pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod sprite;

pub use batch::{BatchReport, Job, MaskPairing, collect_jobs, run_batch};
pub use cli::{CliArgs, Command, CommonArgs};
pub use error::{ErrorKind, PrepError};
pub use sprite::{BoundingBox, Trimmed, find_trim_bounds, trim_with_mask};
