//! imca command line.
//!
//! Commands:
//! - run: discretize an image and run the automaton, resuming earlier output
//! - pulse: encode a frame directory as a forward-then-backward GIF
//! - tile: tile the frames of a directory

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rhizome_imca_image::{
    ImagingError, Playback, export_ffmpeg, export_gif, gif_path, run_image, tile_frames,
};
use rhizome_imca_rps::{RunError, TracingObserver, frame_digits};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

mod args;
mod prompt;

use args::{Animate, Cli, Commands, RunArgs};
use prompt::PromptDecider;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    match cli.command {
        Commands::Run(args) => run(&args),
        Commands::Pulse {
            dir,
            output,
            delay_ms,
        } => {
            let output = output.unwrap_or_else(|| pulse_path(&dir));
            export_gif(&dir, &output, delay_ms, Playback::Pulse)
                .with_context(|| format!("encoding {}", output.display()))?;
            Ok(())
        }
        Commands::Tile {
            dir,
            x,
            y,
            overwrite,
            gif,
            delay_ms,
        } => {
            let tiled = tile_frames(&dir, x, y, overwrite)
                .with_context(|| format!("tiling {}", dir.display()))?;
            if gif {
                let output = gif_path(&tiled);
                export_gif(&tiled, &output, delay_ms, Playback::Forward)
                    .with_context(|| format!("encoding {}", output.display()))?;
            }
            Ok(())
        }
    }
}

fn run(args: &RunArgs) -> Result<()> {
    let config = args.to_config()?;
    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let decider = PromptDecider::new(
        io::stdin().lock(),
        io::stdout(),
        args.on_existing.fixed(),
        args.resume.fixed(),
    );
    let observer = TracingObserver::new(config.weapons);

    let run = match run_image(&config, decider, observer) {
        Ok(run) => run,
        Err(ImagingError::Run(RunError::Aborted(reason))) => {
            info!(%reason, "aborted");
            return Ok(());
        }
        Err(e) => return Err(e).context("run failed"),
    };

    let dir = &run.output_dir;
    let output = gif_path(dir);
    let animated = match args.animate {
        Animate::None => return Ok(()),
        Animate::Gif => export_gif(dir, &output, args.delay_ms, Playback::Forward).map(|_| ()),
        Animate::Pulse => export_gif(dir, &output, args.delay_ms, Playback::Pulse).map(|_| ()),
        Animate::Ffmpeg => export_ffmpeg(dir, frame_digits(run.summary.target), &output),
    };
    if let Err(e) = animated {
        error!(error = %e, "animation failed; frames are kept");
    }
    Ok(())
}

/// `<dir>-pulse.gif` next to a frame directory.
fn pulse_path(dir: &Path) -> PathBuf {
    let mut name = dir.as_os_str().to_owned();
    name.push("-pulse.gif");
    PathBuf::from(name)
}
