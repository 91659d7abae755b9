mod args;

pub use args::{
    CliArgs, Command, CommonArgs, CompressionLevel, CropArgs, ResizeFilter, SliceArgs, TintArgs,
    TintColor, TrimArgs,
};
