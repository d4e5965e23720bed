//! Command line arguments.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rhizome_imca_rps::{
    ExistingOutput, ResumeChoice, RunConfig, ThresholdMode, Traversal, UpdateMode, WeaponRange,
    Wrap,
};

#[derive(Parser)]
#[command(name = "imca")]
#[command(version)]
#[command(about = "Rock-paper-scissors cellular automata over images")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discretize an image and run the automaton on it
    Run(RunArgs),

    /// Encode a frame directory as a forward-then-backward GIF
    Pulse {
        /// Directory of numbered frames
        dir: PathBuf,

        /// Output file (default: <dir>-pulse.gif)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Delay between frames in milliseconds
        #[arg(long, default_value = "100")]
        delay_ms: u16,
    },

    /// Tile every frame of a directory into tiled_<x>_<y>/
    Tile {
        /// Directory of numbered frames
        dir: PathBuf,

        /// Horizontal repetitions
        #[arg(short, default_value = "2")]
        x: u32,

        /// Vertical repetitions
        #[arg(short, default_value = "2")]
        y: u32,

        /// Replace an existing tiled directory
        #[arg(long)]
        overwrite: bool,

        /// Also encode the tiled frames as a GIF
        #[arg(long)]
        gif: bool,

        /// Delay between GIF frames in milliseconds
        #[arg(long, default_value = "100")]
        delay_ms: u16,
    },
}

/// Answer to an existing output directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnExisting {
    Ask,
    Overwrite,
    Resume,
    Abort,
}

impl OnExisting {
    pub fn fixed(self) -> Option<ExistingOutput> {
        match self {
            OnExisting::Ask => None,
            OnExisting::Overwrite => Some(ExistingOutput::Overwrite),
            OnExisting::Resume => Some(ExistingOutput::Resume),
            OnExisting::Abort => Some(ExistingOutput::Abort),
        }
    }
}

/// How a resumed run picks its new target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnResume {
    Ask,
    Extend,
    Fill,
    Abort,
}

impl OnResume {
    pub fn fixed(self) -> Option<ResumeChoice> {
        match self {
            OnResume::Ask => None,
            OnResume::Extend => Some(ResumeChoice::Extend),
            OnResume::Fill => Some(ResumeChoice::FillUp),
            OnResume::Abort => Some(ResumeChoice::Abort),
        }
    }
}

/// Animation written after a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Animate {
    None,
    Gif,
    Pulse,
    Ffmpeg,
}

#[derive(Args)]
pub struct RunArgs {
    /// Source image
    #[arg(required_unless_present = "config")]
    pub source: Option<PathBuf>,

    /// Read the run configuration from a JSON file; the other run flags are ignored
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Prefix of the output directory name
    #[arg(long, default_value = "rps")]
    pub name: String,

    /// Directory the output directory is created in
    #[arg(long, default_value = ".")]
    pub output_root: PathBuf,

    /// Number of iterations
    #[arg(short = 'n', long, default_value = "100")]
    pub iterations: u64,

    /// Number of weapons (palette colors)
    #[arg(short = 'w', long, default_value = "3")]
    pub weapons: u32,

    /// Weapons before the own one that are defended against
    #[arg(long, default_value = "0")]
    pub wr_pre: u32,

    /// Weapons after the own one that are defended against
    #[arg(long, default_value = "1")]
    pub wr_post: u32,

    /// Losses needed to convert a cell
    #[arg(short = 't', long, default_value = "2")]
    pub loss_threshold: u32,

    /// Use iteration % loss-threshold as the threshold
    #[arg(long)]
    pub cycle_threshold: bool,

    /// Do not wrap around the left and right borders
    #[arg(long)]
    pub no_wrap_x: bool,

    /// Do not wrap around the top and bottom borders
    #[arg(long)]
    pub no_wrap_y: bool,

    /// Enabled neighbors in compass order from top-left, e.g. 01010101
    #[arg(long, default_value = "01010101")]
    pub nh_seed: String,

    /// Visitation slot of each compass direction, e.g. 01234567
    #[arg(long, default_value = "01234567")]
    pub nh_order: String,

    /// Update cells in place instead of from a snapshot
    #[arg(long)]
    pub in_place: bool,

    /// Visit cells row by row instead of column by column
    #[arg(long)]
    pub row_major: bool,

    /// Log sweep progress every this many percent of cells
    #[arg(long)]
    pub log_dist: Option<u32>,

    /// What to do when the output directory exists
    #[arg(long, value_enum, default_value = "ask")]
    pub on_existing: OnExisting,

    /// How to continue a resumed run
    #[arg(long, value_enum, default_value = "ask")]
    pub resume: OnResume,

    /// Animation to write after the run
    #[arg(long, value_enum, default_value = "none")]
    pub animate: Animate,

    /// Delay between GIF frames in milliseconds
    #[arg(long, default_value = "100")]
    pub delay_ms: u16,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

impl RunArgs {
    /// Builds the run configuration from a JSON file or the flags.
    pub fn to_config(&self) -> Result<RunConfig> {
        if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let mut config: RunConfig = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            if let Some(source) = &self.source {
                config.source = source.clone();
            }
            return Ok(config);
        }

        Ok(RunConfig {
            name: self.name.clone(),
            source: self.source.clone().unwrap_or_default(),
            output_root: self.output_root.clone(),
            iterations: self.iterations,
            weapons: self.weapons,
            weapon_range: WeaponRange::new(self.wr_pre, self.wr_post),
            loss_threshold: self.loss_threshold,
            threshold_mode: if self.cycle_threshold {
                ThresholdMode::Cycling
            } else {
                ThresholdMode::Fixed
            },
            wrap: Wrap {
                x: !self.no_wrap_x,
                y: !self.no_wrap_y,
            },
            neighbor_seed: self.nh_seed.clone(),
            neighbor_order: self.nh_order.clone(),
            update_mode: if self.in_place {
                UpdateMode::InPlace
            } else {
                UpdateMode::Snapshot
            },
            traversal: if self.row_major {
                Traversal::RowMajor
            } else {
                Traversal::ColumnMajor
            },
            progress_percent: self.log_dist,
        })
    }
}
