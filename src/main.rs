use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use spriteprep::batch::{
    MaskPairing, collect_jobs, crop_file, match_crops, run_batch, slice_file, tint_file, trim_file,
};
use spriteprep::cli::{
    CliArgs, Command, CommonArgs, CompressionLevel, CropArgs, ResizeFilter, SliceArgs, TintArgs,
    TintColor, TrimArgs,
};
use spriteprep::config::{CompressConfig, LoadedConfig};
use spriteprep::output::{MANIFEST_FILE, write_manifest};

#[allow(clippy::print_stderr)]
fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            // Use eprintln instead of error! because logger may not be initialized
            // (e.g., config loading fails before logger init)
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns false when the command finished but some files failed
fn run() -> Result<bool> {
    let cli = CliArgs::parse();
    let common = cli.command.common().clone();

    let loaded_config = if let Some(config_path) = &common.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };
    let compress = merge_compress(&common, loaded_config.as_ref())?;

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(if common.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("spriteprep v{}", env!("CARGO_PKG_VERSION"));

    let config = loaded_config.as_ref();
    let ok = match &cli.command {
        Command::Trim(args) => run_trim(args, config, compress)?,
        Command::Crop(args) => run_crop(args, config, compress)?,
        Command::Slice(args) => run_slice(args, compress)?,
        Command::Tint(args) => run_tint(args, config, compress)?,
    };

    info!("Done!");

    Ok(ok)
}

fn run_trim(
    args: &TrimArgs,
    config: Option<&LoadedConfig>,
    compress: Option<CompressionLevel>,
) -> Result<bool> {
    let (source, dest) = resolve_dirs(args.source.as_ref(), args.dest.as_ref(), config)?;

    // CLI > config > default
    let margin = args
        .margin
        .or_else(|| config.map(|lc| lc.config.margin))
        .unwrap_or(spriteprep::sprite::DEFAULT_MARGIN);

    let pairing = if args.no_mask {
        None
    } else {
        let primary_suffix = args
            .primary_suffix
            .clone()
            .or_else(|| config.map(|lc| lc.config.primary_suffix.clone()))
            .unwrap_or_default();
        let mask_suffix = args
            .mask_suffix
            .clone()
            .or_else(|| config.map(|lc| lc.config.mask_suffix.clone()))
            .unwrap_or_else(|| "_mask".to_string());
        Some(MaskPairing::new(primary_suffix, mask_suffix))
    };

    let include = merge_include(args.include.as_deref(), config)?;

    let jobs = collect_jobs(&source, &dest, pairing.as_ref(), include.as_ref())?;
    info!(
        "Trimming {} sprites ({} with masks), margin {}",
        jobs.len(),
        jobs.iter().filter(|j| j.mask.is_some()).count(),
        margin
    );

    let report = run_batch(&jobs, |job| trim_file(job, margin, compress));
    report.log_summary("Trimmed");

    if args.manifest {
        let path = dest.join(MANIFEST_FILE);
        write_manifest(&report.completed, &path)?;
        info!("Generated {}", path.display());
    }

    Ok(report.is_success())
}

fn run_crop(
    args: &CropArgs,
    config: Option<&LoadedConfig>,
    compress: Option<CompressionLevel>,
) -> Result<bool> {
    let crops = match config {
        Some(lc) if !lc.config.crops.is_empty() => &lc.config.crops,
        _ => anyhow::bail!("crop needs a config file (-c) with a non-empty \"crops\" table"),
    };
    let (source, dest) = resolve_dirs(args.source.as_ref(), args.dest.as_ref(), config)?;

    let resize = args.resize_scale.map(|scale| {
        let filter = args.resize_filter.unwrap_or(ResizeFilter::Lanczos3);
        (scale, filter.to_image_filter())
    });
    if let Some((scale, _)) = resize
        && !(scale.is_finite() && scale > 0.0)
    {
        anyhow::bail!("resize scale must be positive, got {}", scale);
    }

    let jobs = collect_jobs(&source, &dest, None, None)?;
    let (jobs, unmatched) = match_crops(jobs, crops);
    for name in &unmatched {
        warn!("No image found for crop entry '{}'", name);
    }
    info!("Cropping {} images", jobs.len());

    let report = run_batch(&jobs, |job| match crops.get(&job.name) {
        Some(rect) => crop_file(job, rect, resize, compress),
        None => Ok(()),
    });
    report.log_summary("Cropped");

    Ok(report.is_success())
}

fn run_slice(args: &SliceArgs, compress: Option<CompressionLevel>) -> Result<bool> {
    let tile_height = args.tile_height.unwrap_or(args.tile_width);

    let count = slice_file(
        &args.sheet,
        &args.dest,
        args.tile_width,
        tile_height,
        args.skip_empty,
        compress,
    )?;
    info!(
        "Wrote {} tiles of {}x{} to {}",
        count,
        args.tile_width,
        tile_height,
        args.dest.display()
    );

    Ok(true)
}

fn run_tint(
    args: &TintArgs,
    config: Option<&LoadedConfig>,
    compress: Option<CompressionLevel>,
) -> Result<bool> {
    let (source, dest) = resolve_dirs(args.source.as_ref(), args.dest.as_ref(), config)?;

    let color = match (args.color, config) {
        (Some(color), _) => color,
        (None, Some(lc)) => lc
            .config
            .tint
            .color
            .parse::<TintColor>()
            .map_err(|e| anyhow::anyhow!("{} in config file", e))?,
        (None, None) => TintColor::default(),
    };
    let gamma = args
        .gamma
        .or_else(|| config.map(|lc| lc.config.tint.gamma))
        .unwrap_or(1.0);

    let include = merge_include(args.include.as_deref(), config)?;
    let jobs = collect_jobs(&source, &dest, None, include.as_ref())?;
    info!("Tinting {} textures, gamma {}", jobs.len(), gamma);

    let report = run_batch(&jobs, |job| tint_file(job, color, gamma, compress));
    report.log_summary("Tinted");

    Ok(report.is_success())
}

/// Source and destination: CLI > config. Both are required.
fn resolve_dirs(
    source: Option<&PathBuf>,
    dest: Option<&PathBuf>,
    config: Option<&LoadedConfig>,
) -> Result<(PathBuf, PathBuf)> {
    let source = source
        .cloned()
        .or_else(|| config.and_then(LoadedConfig::resolve_source_dir))
        .context("no source directory given (argument or config source_dir)")?;
    let dest = dest
        .cloned()
        .or_else(|| config.and_then(LoadedConfig::resolve_output_dir))
        .context("no destination directory given (argument or config output_dir)")?;

    if same_dir(&source, &dest) {
        anyhow::bail!(
            "destination {} must differ from the source directory",
            dest.display()
        );
    }

    Ok((source, dest))
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Include filter: CLI > config
fn merge_include(
    cli: Option<&str>,
    config: Option<&LoadedConfig>,
) -> Result<Option<glob::Pattern>> {
    match (cli, config) {
        (Some(pattern), _) => glob::Pattern::new(pattern)
            .map(Some)
            .with_context(|| format!("invalid include pattern: {}", pattern)),
        (None, Some(lc)) => lc.include_pattern(),
        (None, None) => Ok(None),
    }
}

/// Compress: CLI option overrides config
fn merge_compress(
    common: &CommonArgs,
    config: Option<&LoadedConfig>,
) -> Result<Option<CompressionLevel>> {
    if common.compress.is_some() {
        return Ok(common.compress);
    }

    match config.and_then(|lc| lc.config.compress.as_ref()) {
        Some(CompressConfig::Level(n)) if *n <= 6 => Ok(Some(CompressionLevel::Level(*n))),
        Some(CompressConfig::Max(s)) if s.eq_ignore_ascii_case("max") => {
            Ok(Some(CompressionLevel::Max))
        }
        Some(other) => Err(anyhow::anyhow!(
            "invalid compress value {:?} in config file. Valid values: 0-6, \"max\"",
            other
        )),
        None => Ok(None),
    }
}
