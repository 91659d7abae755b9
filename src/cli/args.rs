use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spriteprep")]
#[command(version, about = "Sprite preprocessing for 2D game assets", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Strip transparent borders symmetrically, keeping companion masks in sync
    Trim(TrimArgs),
    /// Cut fixed rectangles from the config's crop table (portraits)
    Crop(CropArgs),
    /// Slice a sprite sheet into uniform tiles
    Slice(SliceArgs),
    /// Convert monochrome textures into alpha-tinted sprites
    Tint(TintArgs),
}

impl Command {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Command::Trim(args) => &args.common,
            Command::Crop(args) => &args.common,
            Command::Slice(args) => &args.common,
            Command::Tint(args) => &args.common,
        }
    }
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Load settings from a spriteprep JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TrimArgs {
    /// Directory of sprites to trim [default: config source_dir]
    pub source: Option<PathBuf>,

    /// Directory to write trimmed sprites to [default: config output_dir]
    pub dest: Option<PathBuf>,

    /// Keep N pixels of transparent border next to the content [default: 1]
    #[arg(long)]
    pub margin: Option<u32>,

    /// Stem suffix that names a sprite's mask, e.g. laser.png -> laser_mask.png [default: _mask]
    #[arg(long)]
    pub mask_suffix: Option<String>,

    /// Stem suffix of sprites that own a mask; replaced by the mask suffix [default: none]
    #[arg(long)]
    pub primary_suffix: Option<String>,

    /// Ignore companion masks and trim every image on its own
    #[arg(long)]
    pub no_mask: bool,

    /// Only trim files whose relative path matches this glob pattern
    #[arg(long, value_name = "PATTERN")]
    pub include: Option<String>,

    /// Write trim.json with the bounds of every trimmed sprite
    #[arg(long)]
    pub manifest: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
pub struct CropArgs {
    /// Directory of source images [default: config source_dir]
    pub source: Option<PathBuf>,

    /// Directory to write cropped images to [default: config output_dir]
    pub dest: Option<PathBuf>,

    /// Resize crops by scale factor (e.g., 0.5 for half size)
    #[arg(long, value_name = "FACTOR")]
    pub resize_scale: Option<f32>,

    /// Resize filter algorithm [default: lanczos3]
    #[arg(long, value_enum)]
    pub resize_filter: Option<ResizeFilter>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SliceArgs {
    /// Sprite sheet to slice
    pub sheet: PathBuf,

    /// Directory to write tiles to
    pub dest: PathBuf,

    /// Tile width in pixels
    #[arg(long, value_name = "PIXELS")]
    pub tile_width: u32,

    /// Tile height in pixels [default: tile width]
    #[arg(long, value_name = "PIXELS")]
    pub tile_height: Option<u32>,

    /// Skip fully transparent tiles
    #[arg(long)]
    pub skip_empty: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Clone)]
pub struct TintArgs {
    /// Directory of monochrome textures [default: config source_dir]
    pub source: Option<PathBuf>,

    /// Directory to write tinted sprites to [default: config output_dir]
    pub dest: Option<PathBuf>,

    /// Tint colour as RRGGBB [default: ffffff]
    #[arg(long, value_name = "RRGGBB")]
    pub color: Option<TintColor>,

    /// Exponent applied to brightness before it becomes alpha [default: 1.0]
    #[arg(long)]
    pub gamma: Option<f32>,

    /// Only tint files whose relative path matches this glob pattern
    #[arg(long, value_name = "PATTERN")]
    pub include: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Resize filter algorithm
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq, Hash)]
pub enum ResizeFilter {
    /// Nearest neighbor (best for pixel art)
    #[value(name = "nearest")]
    Nearest,
    /// Bilinear interpolation
    #[value(name = "triangle")]
    Triangle,
    /// Cubic interpolation (bicubic)
    #[value(name = "catmull-rom", alias = "bicubic")]
    CatmullRom,
    /// Gaussian filter
    #[value(name = "gaussian")]
    Gaussian,
    /// Lanczos with window 3 (highest quality)
    #[default]
    #[value(name = "lanczos3")]
    Lanczos3,
}

impl ResizeFilter {
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            ResizeFilter::Nearest => image::imageops::FilterType::Nearest,
            ResizeFilter::Triangle => image::imageops::FilterType::Triangle,
            ResizeFilter::CatmullRom => image::imageops::FilterType::CatmullRom,
            ResizeFilter::Gaussian => image::imageops::FilterType::Gaussian,
            ResizeFilter::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}

/// An opaque RGB tint colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TintColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for TintColor {
    fn default() -> Self {
        TintColor {
            r: 255,
            g: 255,
            b: 255,
        }
    }
}

impl std::str::FromStr for TintColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("tint colour must be RRGGBB, got '{}'", s));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_e| format!("invalid hex digits in tint colour '{}'", s))
        };

        Ok(TintColor {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level_parse() {
        assert_eq!("max".parse::<CompressionLevel>(), Ok(CompressionLevel::Max));
        assert_eq!("4".parse::<CompressionLevel>(), Ok(CompressionLevel::Level(4)));
        assert!("7".parse::<CompressionLevel>().is_err());
        assert!("fast".parse::<CompressionLevel>().is_err());
    }

    #[test]
    fn test_tint_color_parse() {
        assert_eq!(
            "#ff8800".parse::<TintColor>(),
            Ok(TintColor {
                r: 255,
                g: 136,
                b: 0
            })
        );
        assert_eq!("00FF10".parse::<TintColor>().map(|c| c.g), Ok(255));
        assert!("fff".parse::<TintColor>().is_err());
        assert!("gg0000".parse::<TintColor>().is_err());
    }

    #[test]
    fn test_parse_trim_command() {
        let cli = CliArgs::try_parse_from([
            "spriteprep",
            "trim",
            "raw/lasers",
            "out/lasers",
            "--margin",
            "2",
            "--mask-suffix",
            ".alpha",
            "--manifest",
            "--compress",
        ])
        .unwrap();

        let Command::Trim(args) = &cli.command else {
            panic!("expected trim command");
        };
        assert_eq!(args.source, Some(PathBuf::from("raw/lasers")));
        assert_eq!(args.margin, Some(2));
        assert_eq!(args.mask_suffix.as_deref(), Some(".alpha"));
        assert!(args.manifest);
        assert_eq!(cli.command.common().compress, Some(CompressionLevel::Level(2)));
    }

    #[test]
    fn test_parse_slice_requires_tile_width() {
        assert!(CliArgs::try_parse_from(["spriteprep", "slice", "sheet.png", "out"]).is_err());

        let cli = CliArgs::try_parse_from([
            "spriteprep",
            "slice",
            "sheet.png",
            "out",
            "--tile-width",
            "32",
            "-v",
        ])
        .unwrap();
        let Command::Slice(args) = cli.command else {
            panic!("expected slice command");
        };
        assert_eq!(args.tile_width, 32);
        assert_eq!(args.tile_height, None);
        assert!(args.common.verbose);
    }
}
