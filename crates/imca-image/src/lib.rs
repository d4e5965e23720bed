//! Image side of imca runs.
//!
//! - [`discretize`] - reduces a source image to a weapon grid and palette
//! - [`PngFrameStore`] - a [`FrameStore`](rhizome_imca_rps::FrameStore) of palette-painted PNGs
//! - [`export_gif`], [`export_ffmpeg`] - animations of a frame directory
//! - [`tile_frames`] - repeated mosaics of a frame directory
//! - [`run_image`] - discretize, then drive a [`Controller`] into the output directory

use std::path::{Path, PathBuf};

use image::DynamicImage;
use rhizome_imca_rps::{Controller, RunConfig, RunDecider, RunObserver, RunSummary};
use tracing::info;

mod animation;
mod error;
mod frames;
mod palette;
mod tile;

pub use animation::{Playback, export_ffmpeg, export_gif, ffmpeg_command, gif_path};
pub use error::ImagingError;
pub use frames::{PngFrameStore, frame_path, list_frames};
pub use palette::{Color, Discretized, Palette, discretize};
pub use tile::{tile_frames, tile_image, tiled_dir};

/// Opens the source image of a run.
pub fn load_source(path: &Path) -> Result<DynamicImage, ImagingError> {
    image::open(path).map_err(|source| ImagingError::Source {
        path: path.to_path_buf(),
        source,
    })
}

/// Result of [`run_image`].
#[derive(Debug, Clone)]
pub struct ImageRun {
    /// Directory the frames were written to.
    pub output_dir: PathBuf,
    /// Palette the frames are painted with.
    pub palette: Palette,
    /// What the controller did.
    pub summary: RunSummary,
}

/// Runs a configuration end to end.
///
/// The configuration is validated and the source decoded before anything is
/// written, so a bad source never leaves an output directory behind.
pub fn run_image<D, O>(config: &RunConfig, decider: D, observer: O) -> Result<ImageRun, ImagingError>
where
    D: RunDecider,
    O: RunObserver,
{
    config.validate()?;
    let source = load_source(&config.source)?;
    let Discretized { grid, palette } = discretize(&source, config.weapons)?;
    let output_dir = config.output_dir()?;
    info!(
        source = %config.source.display(),
        width = grid.width(),
        height = grid.height(),
        weapons = config.weapons,
        output = %output_dir.display(),
        "discretized source"
    );

    let store = PngFrameStore::new(&output_dir, palette.clone());
    let summary = Controller::new(config, store, decider, observer)?.run(grid)?;
    Ok(ImageRun {
        output_dir,
        palette,
        summary,
    })
}
