//! Tiling frames into repeated mosaics.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use image::imageops;
use rhizome_imca_rps::frame_digits;
use tracing::info;

use crate::error::ImagingError;
use crate::frames::{frame_path, list_frames};

/// Returns the directory tiled frames of `dir` are written to.
pub fn tiled_dir(dir: &Path, x: u32, y: u32) -> PathBuf {
    dir.join(format!("tiled_{x}_{y}"))
}

/// Repeats one image `x` times horizontally and `y` times vertically.
pub fn tile_image(image: &RgbImage, x: u32, y: u32) -> RgbImage {
    let (w, h) = image.dimensions();
    let mut out = RgbImage::new(w * x, h * y);
    for ty in 0..y {
        for tx in 0..x {
            imageops::replace(&mut out, image, (tx * w) as i64, (ty * h) as i64);
        }
    }
    out
}

/// Tiles every numbered frame of `dir` into `tiled_{x}_{y}/`.
///
/// Output frames are renumbered from 0 in frame order and zero-padded to the
/// digit count of the last index. Fails if the target directory exists unless
/// `overwrite` is set. Returns the target directory.
pub fn tile_frames(dir: &Path, x: u32, y: u32, overwrite: bool) -> Result<PathBuf, ImagingError> {
    let frames = list_frames(dir)?;
    if frames.is_empty() {
        return Err(ImagingError::NoFrames {
            dir: dir.to_path_buf(),
        });
    }

    let target = tiled_dir(dir, x, y);
    if target.try_exists()? {
        if !overwrite {
            return Err(ImagingError::AlreadyExists { path: target });
        }
        fs::remove_dir_all(&target)?;
    }
    fs::create_dir_all(&target)?;

    let digits = frame_digits(frames.len() as u64 - 1);
    for (i, path) in frames.values().enumerate() {
        let image = image::open(path)?.to_rgb8();
        tile_image(&image, x, y).save(frame_path(&target, i as u64, digits))?;
    }

    info!(dir = %target.display(), frames = frames.len(), x, y, "tiled frames");
    Ok(target)
}
