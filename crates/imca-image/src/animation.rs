//! Assembling stored frames into animations.
//!
//! ```text
//! forward:  0 1 2 3
//! pulse:    0 1 2 3 2 1     (loops back to 0)
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use tracing::info;

use crate::error::ImagingError;
use crate::frames::list_frames;

/// Frame sequence of a GIF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Playback {
    /// Frames in ascending order.
    #[default]
    Forward,
    /// Frames forward then backward, without repeating the ends.
    Pulse,
}

impl Playback {
    /// Expands `n` frames into the sequence of indices to encode.
    pub fn sequence(self, n: usize) -> Vec<usize> {
        let forward = 0..n;
        match self {
            Playback::Forward => forward.collect(),
            Playback::Pulse => forward
                .clone()
                .chain((1..n.saturating_sub(1)).rev())
                .collect(),
        }
    }
}

/// Returns `<dir>.gif` next to a frame directory.
pub fn gif_path(dir: &Path) -> PathBuf {
    let mut name = dir.as_os_str().to_owned();
    name.push(".gif");
    PathBuf::from(name)
}

/// Encodes the numbered frames of `dir` as a looping GIF.
///
/// # Arguments
/// * `dir` - Directory of numbered frames
/// * `path` - Output file path
/// * `frame_delay_ms` - Delay between frames in milliseconds
/// * `playback` - Forward or pulse sequence
pub fn export_gif(
    dir: &Path,
    path: &Path,
    frame_delay_ms: u16,
    playback: Playback,
) -> Result<usize, ImagingError> {
    let frames: Vec<PathBuf> = list_frames(dir)?.into_values().collect();
    if frames.is_empty() {
        return Err(ImagingError::NoFrames {
            dir: dir.to_path_buf(),
        });
    }
    let images = frames
        .iter()
        .map(|p| -> Result<_, ImagingError> { Ok(image::open(p)?.to_rgba8()) })
        .collect::<Result<Vec<_>, _>>()?;

    let file = BufWriter::new(File::create(path)?);
    let mut encoder = GifEncoder::new(file);
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(frame_delay_ms as u32, 1);
    let sequence = playback.sequence(images.len());
    for &i in &sequence {
        encoder.encode_frame(Frame::from_parts(images[i].clone(), 0, 0, delay))?;
    }

    info!(path = %path.display(), frames = sequence.len(), "wrote gif");
    Ok(sequence.len())
}

/// Builds the `ffmpeg` invocation encoding `dir/%0{digits}d.png` into `path`.
pub fn ffmpeg_command(dir: &Path, digits: usize, path: &Path) -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-y")
        .arg("-loglevel")
        .arg("error")
        .arg("-i")
        .arg(dir.join(format!("%0{digits}d.png")))
        .arg(path);
    cmd
}

/// Encodes frames with an external `ffmpeg`.
///
/// Requires ffmpeg in PATH. The pattern only matches frames sharing one
/// zero-padding width.
pub fn export_ffmpeg(dir: &Path, digits: usize, path: &Path) -> Result<(), ImagingError> {
    let output = ffmpeg_command(dir, digits, path).output().map_err(|e| {
        ImagingError::Encoder(format!("failed to run ffmpeg: {e}. Is ffmpeg installed?"))
    })?;

    if !output.status.success() {
        return Err(ImagingError::Encoder(format!(
            "ffmpeg failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    info!(path = %path.display(), "wrote animation with ffmpeg");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_frames(dir: &Path, n: u8) {
        for i in 0..n {
            RgbImage::from_pixel(3, 2, Rgb([i * 40, 0, 0]))
                .save(dir.join(format!("{i:02}.png")))
                .unwrap();
        }
    }

    #[test]
    fn test_forward_sequence() {
        assert_eq!(Playback::Forward.sequence(3), vec![0, 1, 2]);
        assert!(Playback::Forward.sequence(0).is_empty());
    }

    #[test]
    fn test_pulse_sequence() {
        assert_eq!(Playback::Pulse.sequence(4), vec![0, 1, 2, 3, 2, 1]);
        assert_eq!(Playback::Pulse.sequence(2), vec![0, 1]);
        assert_eq!(Playback::Pulse.sequence(1), vec![0]);
    }

    #[test]
    fn test_gif_path() {
        assert_eq!(gif_path(Path::new("out/run-a")), Path::new("out/run-a.gif"));
    }

    #[test]
    fn test_export_gif() {
        let tmp = tempfile::tempdir().unwrap();
        let frames = tmp.path().join("frames");
        std::fs::create_dir(&frames).unwrap();
        write_frames(&frames, 4);

        let out = tmp.path().join("anim.gif");
        assert_eq!(export_gif(&frames, &out, 50, Playback::Pulse).unwrap(), 6);
        assert!(std::fs::metadata(&out).unwrap().len() > 0);
    }

    #[test]
    fn test_export_gif_without_frames() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("anim.gif");
        assert!(matches!(
            export_gif(tmp.path(), &out, 50, Playback::Forward),
            Err(ImagingError::NoFrames { .. })
        ));
    }

    #[test]
    fn test_ffmpeg_command_pattern() {
        let cmd = ffmpeg_command(Path::new("run"), 3, Path::new("run.gif"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(cmd.get_program(), "ffmpeg");
        assert!(args.contains(&"run/%03d.png".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("run.gif"));
    }
}
