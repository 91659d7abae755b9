mod collect;
mod ops;
mod runner;

pub use collect::{Job, MaskPairing, collect_jobs};
pub use ops::{TrimRecord, crop_file, match_crops, slice_file, tint_file, trim_file};
pub use runner::{BatchReport, Failure, run_batch};
