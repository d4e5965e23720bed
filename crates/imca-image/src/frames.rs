//! Numbered PNG frames on disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rhizome_imca_rps::{FrameStore, StoreError, WeaponGrid};
use tracing::debug;

use crate::palette::Palette;

/// Returns the path of frame `frame`, zero-padded to `digits` characters.
pub fn frame_path(dir: &Path, frame: u64, digits: usize) -> PathBuf {
    dir.join(format!("{frame:0digits$}.png"))
}

/// Lists the numbered frames of a directory, sorted by number.
///
/// A frame is any `.png` file whose stem parses as a number (`7.png`,
/// `0007.png`). Other entries are ignored. When two files share a number the
/// first in lexical order wins.
pub fn list_frames(dir: &Path) -> std::io::Result<BTreeMap<u64, PathBuf>> {
    let mut frames = BTreeMap::new();
    for (n, path) in frame_files(dir)? {
        frames.entry(n).or_insert(path);
    }
    Ok(frames)
}

/// Every numbered `.png` file of a directory, in lexical order of path.
fn frame_files(dir: &Path) -> std::io::Result<Vec<(u64, PathBuf)>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.path());
        }
    }
    names.sort();

    let mut files = Vec::new();
    for path in names {
        let number = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|_| path.extension().is_some_and(|e| e == "png"))
            .and_then(|s| s.parse::<u64>().ok());
        match number {
            Some(n) => files.push((n, path)),
            None => debug!(path = %path.display(), "ignoring non-frame file"),
        }
    }
    Ok(files)
}

/// Frame store writing palette-painted PNGs into one directory.
#[derive(Debug, Clone)]
pub struct PngFrameStore {
    dir: PathBuf,
    palette: Palette,
}

impl PngFrameStore {
    /// Creates a store for `dir`. Nothing is touched until the first write.
    pub fn new(dir: impl Into<PathBuf>, palette: Palette) -> Self {
        Self {
            dir: dir.into(),
            palette,
        }
    }

    /// Returns the frame directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the palette frames are painted with.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

impl FrameStore for PngFrameStore {
    fn exists(&self) -> Result<bool, StoreError> {
        Ok(self.dir.try_exists()?)
    }

    fn create(&mut self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if self.dir.try_exists()? {
            fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }

    fn frame_numbers(&self) -> Result<Vec<u64>, StoreError> {
        Ok(list_frames(&self.dir)?.into_keys().collect())
    }

    fn load(&self, frame: u64) -> Result<WeaponGrid, StoreError> {
        let frames = list_frames(&self.dir)?;
        let path = frames.get(&frame).ok_or_else(|| StoreError::Malformed {
            frame,
            reason: "no such frame".to_string(),
        })?;
        let image = image::open(path).map_err(|e| StoreError::Malformed {
            frame,
            reason: e.to_string(),
        })?;
        Ok(self.palette.index(&image.to_rgb8()))
    }

    fn save(&mut self, frame: u64, digits: usize, grid: &WeaponGrid) -> Result<(), StoreError> {
        let path = frame_path(&self.dir, frame, digits);
        self.palette
            .paint(grid)
            .save(&path)
            .map_err(|e| StoreError::Codec(e.to_string()))?;
        debug!(frame, path = %path.display(), "wrote frame");
        Ok(())
    }

    fn repad(&mut self, digits: usize) -> Result<(), StoreError> {
        let frames = list_frames(&self.dir)?;
        // Shadowed duplicates would collide with the renamed frames.
        for (n, path) in frame_files(&self.dir)? {
            if frames.get(&n) != Some(&path) {
                fs::remove_file(&path)?;
                debug!(frame = n, path = %path.display(), "removed duplicate frame");
            }
        }
        for (n, path) in frames {
            let padded = frame_path(&self.dir, n, digits);
            if path != padded {
                fs::rename(&path, &padded)?;
                debug!(frame = n, from = %path.display(), to = %padded.display(), "renamed frame");
            }
        }
        Ok(())
    }
}
