//! End-to-end runs against PNG frames on disk.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use rhizome_imca_image::{ImagingError, ffmpeg_command, list_frames, run_image};
use rhizome_imca_rps::{AbortReason, Policy, RunConfig, RunError, frame_digits};

const COLORS: [[u8; 3]; 5] = [
    [20, 30, 200],
    [220, 40, 40],
    [40, 200, 60],
    [240, 240, 20],
    [10, 10, 10],
];

fn write_source(dir: &Path) -> PathBuf {
    let path = dir.join("mosaic.png");
    RgbImage::from_fn(7, 5, |x, y| Rgb(COLORS[((x * 7 + y * 3) % 5) as usize]))
        .save(&path)
        .unwrap();
    path
}

fn config(source: &Path, root: &Path, iterations: u64) -> RunConfig {
    RunConfig {
        iterations,
        loss_threshold: 1,
        output_root: root.to_path_buf(),
        ..RunConfig::new(source)
    }
}

fn pixels(path: &Path) -> Vec<u8> {
    image::open(path).unwrap().to_rgb8().into_raw()
}

#[test]
fn test_fresh_run_writes_numbered_frames() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_source(tmp.path());
    let config = config(&source, &tmp.path().join("out"), 4);

    let run = run_image(&config, Policy::ABORT, ()).unwrap();
    assert_eq!(run.summary.frames_written, 5);
    assert!(!run.summary.resumed);
    assert_eq!(
        run.output_dir.file_name().unwrap().to_string_lossy(),
        "rps-Src_mosaic-Lvl_3-Rng_0_1-TH_1_1-Ref_1-NhS_01010101-NhO_01234567-wXY_1_1"
    );

    let frames = list_frames(&run.output_dir).unwrap();
    assert_eq!(frames.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    for path in frames.values() {
        let img = image::open(path).unwrap();
        assert_eq!((img.width(), img.height()), (7, 5));
    }
}

#[test]
fn test_resumed_run_matches_uninterrupted() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_source(tmp.path());

    let full = run_image(&config(&source, &tmp.path().join("full"), 6), Policy::ABORT, ()).unwrap();

    let part_root = tmp.path().join("part");
    run_image(&config(&source, &part_root, 3), Policy::ABORT, ()).unwrap();
    let resumed = run_image(&config(&source, &part_root, 6), Policy::FILL_UP, ()).unwrap();
    assert!(resumed.summary.resumed);
    assert_eq!(resumed.summary.first_iteration, 4);
    assert_eq!(resumed.summary.frames_written, 3);

    for n in 0..=6 {
        let name = format!("{n}.png");
        assert_eq!(
            pixels(&full.output_dir.join(&name)),
            pixels(&resumed.output_dir.join(&name)),
            "frame {n}"
        );
    }
}

#[test]
fn test_extending_past_digit_boundary_pads_every_frame_alike() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_source(tmp.path());
    let config = config(&source, tmp.path(), 5);

    run_image(&config, Policy::ABORT, ()).unwrap();
    run_image(&config, Policy::EXTEND, ()).unwrap();
    let run = run_image(&config, Policy::EXTEND, ()).unwrap();
    assert_eq!(run.summary.target, 15);

    let mut names: Vec<String> = fs::read_dir(&run.output_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    let expected: Vec<String> = (0..=15).map(|n| format!("{n:02}.png")).collect();
    assert_eq!(names, expected);

    // The encoder pattern covers every frame, frame 0 included.
    let digits = frame_digits(run.summary.target);
    let gif = run.output_dir.with_extension("gif");
    let cmd = ffmpeg_command(&run.output_dir, digits, &gif);
    let pattern = run.output_dir.join("%02d.png");
    assert!(cmd.get_args().any(|a| a == pattern.as_os_str()));
    assert!(run.output_dir.join("00.png").is_file());
}

#[test]
fn test_resume_skips_corrupt_latest_frame() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_source(tmp.path());

    let full = run_image(&config(&source, &tmp.path().join("full"), 5), Policy::ABORT, ()).unwrap();

    let part_root = tmp.path().join("part");
    let part = run_image(&config(&source, &part_root, 3), Policy::ABORT, ()).unwrap();
    fs::write(part.output_dir.join("3.png"), b"truncated").unwrap();

    let resumed = run_image(&config(&source, &part_root, 5), Policy::FILL_UP, ()).unwrap();
    assert_eq!(resumed.summary.first_iteration, 3);
    assert_eq!(
        pixels(&full.output_dir.join("5.png")),
        pixels(&resumed.output_dir.join("5.png"))
    );
}

#[test]
fn test_abort_leaves_frames_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_source(tmp.path());
    let config = config(&source, tmp.path(), 2);

    let run = run_image(&config, Policy::ABORT, ()).unwrap();
    let before: Vec<_> = list_frames(&run.output_dir)
        .unwrap()
        .values()
        .map(|p| fs::read(p).unwrap())
        .collect();

    let err = run_image(&config, Policy::ABORT, ()).unwrap_err();
    assert!(matches!(
        err,
        ImagingError::Run(RunError::Aborted(AbortReason::ExistingOutput))
    ));

    let after: Vec<_> = list_frames(&run.output_dir)
        .unwrap()
        .values()
        .map(|p| fs::read(p).unwrap())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_overwrite_starts_over() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_source(tmp.path());

    let first = run_image(&config(&source, tmp.path(), 4), Policy::ABORT, ()).unwrap();
    let second = run_image(&config(&source, tmp.path(), 2), Policy::OVERWRITE, ()).unwrap();
    assert_eq!(first.output_dir, second.output_dir);
    assert!(!second.summary.resumed);

    let frames = list_frames(&second.output_dir).unwrap();
    assert_eq!(frames.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
}

#[test]
fn test_missing_source_creates_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("out");
    let config = config(&tmp.path().join("missing.png"), &root, 3);

    assert!(matches!(
        run_image(&config, Policy::ABORT, ()),
        Err(ImagingError::Source { .. })
    ));
    assert!(!root.exists());
}

#[test]
fn test_invalid_config_creates_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let source = write_source(tmp.path());
    let root = tmp.path().join("out");
    let config = RunConfig {
        neighbor_seed: "01x".to_string(),
        ..config(&source, &root, 3)
    };

    assert!(matches!(
        run_image(&config, Policy::ABORT, ()),
        Err(ImagingError::Config(_))
    ));
    assert!(!root.exists());
}
