//! Command-line tool that stitches a front (dorsal) and a back (ventral)
//! acquisition into one whole-brain NIFTI volume.

use clap::Parser;
use nifti::NiftiType;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nifti_stitch::{
    BitDepthConverter, MergeError, Sample, SlabMerger, Volume, VolumeIoError, VolumeLoader,
    VolumeSaver,
};

/// Marker token in the front file name; everything before it names the
/// sample.
const FRONT_MARKER: &str = "front";

/// Suffix appended to the sample name for the merged whole-brain output.
const OUTPUT_SUFFIX: &str = "wb_16bit.nii.gz";

/// Merge front (dorsal) and back (ventral) NIFTI volumes into one.
#[derive(Parser)]
#[command(name = "nifti-stitch", version, about)]
struct Cli {
    /// Front (dorsal) volume path
    #[arg(short = 'f', long, value_name = "PATH")]
    front: PathBuf,

    /// Back (ventral) volume path
    #[arg(short = 'b', long, value_name = "PATH")]
    back: PathBuf,

    /// Output folder path (defaults to the front volume's folder)
    #[arg(short = 'o', long, value_name = "PATH")]
    out_path: Option<PathBuf>,

    /// Shift of the fusion slice, in slices
    #[arg(
        short = 'm',
        long,
        default_value_t = 0,
        value_name = "SLICES",
        allow_negative_numbers = true
    )]
    middle_shift: isize,

    /// Thickness of the transition band, in slices
    #[arg(short = 't', long, default_value_t = 10, value_name = "SLICES")]
    thickness: usize,

    /// Truncate the back volume to 8 bit before merging
    #[arg(short = 'c', long)]
    convert: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum StitchError {
    #[error(transparent)]
    Io(#[from] VolumeIoError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("unsupported front datatype {0:?}; expected Uint8 or Uint16")]
    UnsupportedDatatype(NiftiType),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => {
            info!("done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), StitchError> {
    let out_path = derive_output_path(&cli.front, cli.out_path.as_deref());

    if cli.convert {
        let front = VolumeLoader::load::<u8>(&cli.front)?;
        info!("front volume loaded");
        let back = VolumeLoader::load::<u16>(&cli.back)?;
        info!("back volume loaded");
        info!("truncating back volume to 8 bit...");
        let back = BitDepthConverter::convert_to_8bit(&back);
        return merge_and_save(&front, &back, cli, &out_path);
    }

    match VolumeLoader::peek_datatype(&cli.front)? {
        NiftiType::Uint8 => stitch::<u8>(cli, &out_path),
        NiftiType::Uint16 => stitch::<u16>(cli, &out_path),
        other => Err(StitchError::UnsupportedDatatype(other)),
    }
}

fn stitch<T: Sample>(cli: &Cli, out_path: &Path) -> Result<(), StitchError> {
    let front = VolumeLoader::load::<T>(&cli.front)?;
    info!("front volume loaded");
    let back = VolumeLoader::load::<T>(&cli.back)?;
    info!("back volume loaded");
    merge_and_save(&front, &back, cli, out_path)
}

fn merge_and_save<T: Sample>(
    front: &Volume<T>,
    back: &Volume<T>,
    cli: &Cli,
    out_path: &Path,
) -> Result<(), StitchError> {
    info!("merging volumes...");
    let merged = SlabMerger::merge(front, back, cli.middle_shift, cli.thickness)?;
    VolumeSaver::save(&merged, out_path)?;
    info!("output saved to {}", out_path.display());
    Ok(())
}

/// Derive the output file path from the front file name: the part before
/// the `front` marker plus the whole-brain suffix, placed in `out_dir` or
/// beside the front file.
fn derive_output_path(front: &Path, out_dir: Option<&Path>) -> PathBuf {
    let file_name = front.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let sample_name = file_name.split(FRONT_MARKER).next().unwrap_or_default();
    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => front.parent().unwrap_or_else(|| Path::new("")).to_path_buf(),
    };
    dir.join(format!("{sample_name}{OUTPUT_SUFFIX}"))
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "nifti_stitch=debug"
    } else {
        "nifti_stitch=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_defaults_to_front_folder() {
        let out = derive_output_path(Path::new("/data/brain_front_16bit.nii.gz"), None);
        assert_eq!(out, Path::new("/data/brain_wb_16bit.nii.gz"));
    }

    #[test]
    fn output_path_uses_explicit_folder() {
        let out = derive_output_path(
            Path::new("/data/brain_front_16bit.nii.gz"),
            Some(Path::new("/out")),
        );
        assert_eq!(out, Path::new("/out/brain_wb_16bit.nii.gz"));
    }

    #[test]
    fn file_name_without_marker_keeps_whole_stem() {
        let out = derive_output_path(Path::new("/data/brain.nii.gz"), None);
        assert_eq!(out, Path::new("/data/brain.nii.gzwb_16bit.nii.gz"));
    }
}
