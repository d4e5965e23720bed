//! Drives a run: initialization, resume, sweeps and frame persistence.
//!
//! The controller owns the grid for the whole run. Storage, human decisions
//! and progress reporting are injected through [`FrameStore`],
//! [`RunDecider`] and [`RunObserver`], so a run can be driven entirely from
//! tests.

use tracing::{debug, info, warn};

use crate::automaton::{RockPaperScissors, RpsRule};
use crate::config::RunConfig;
use crate::error::{AbortReason, RunError, StoreError};
use crate::grid::WeaponGrid;

/// Persistent storage for the frames of one run.
///
/// Frame `n` is the grid after `n` sweeps; frame 0 is the discretized source.
pub trait FrameStore {
    /// Returns true if the output location already exists.
    fn exists(&self) -> Result<bool, StoreError>;

    /// Creates an empty output location.
    fn create(&mut self) -> Result<(), StoreError>;

    /// Deletes the output location and everything in it.
    fn clear(&mut self) -> Result<(), StoreError>;

    /// Lists the numbers of stored frames.
    ///
    /// Entries whose names are not frame numbers are skipped.
    fn frame_numbers(&self) -> Result<Vec<u64>, StoreError>;

    /// Loads a stored frame.
    fn load(&self, frame: u64) -> Result<WeaponGrid, StoreError>;

    /// Stores a frame, its number zero-padded to `digits` characters.
    fn save(&mut self, frame: u64, digits: usize, grid: &WeaponGrid) -> Result<(), StoreError>;

    /// Renames every stored frame so its number is zero-padded to `digits`
    /// characters, the width [`save`](Self::save) is about to use.
    fn repad(&mut self, digits: usize) -> Result<(), StoreError>;
}

/// What to do when the output location already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingOutput {
    /// Delete it and start from frame 0.
    Overwrite,
    /// Continue from the latest stored frame.
    Resume,
    /// Stop without touching anything.
    Abort,
}

/// How to continue a run that already has `completed` iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeChoice {
    /// Run the requested number of iterations on top: `completed + requested`.
    Extend,
    /// Run until the requested total is reached.
    FillUp,
    /// Stop without touching anything.
    Abort,
}

/// Answers the questions a run asks before it starts sweeping.
pub trait RunDecider {
    /// Called when the output location already exists.
    fn existing_output(&mut self, location: &str) -> ExistingOutput;

    /// Called when resuming, with the latest stored iteration and the
    /// iteration count requested by the configuration.
    fn resume(&mut self, completed: u64, requested: u64) -> ResumeChoice;
}

/// A decider with fixed answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Answer to [`RunDecider::existing_output`].
    pub existing: ExistingOutput,
    /// Answer to [`RunDecider::resume`].
    pub resume: ResumeChoice,
}

impl Policy {
    /// Refuses to touch existing output.
    pub const ABORT: Self = Self {
        existing: ExistingOutput::Abort,
        resume: ResumeChoice::Abort,
    };

    /// Continues existing output up to the requested total.
    pub const FILL_UP: Self = Self {
        existing: ExistingOutput::Resume,
        resume: ResumeChoice::FillUp,
    };

    /// Continues existing output with the requested number of extra iterations.
    pub const EXTEND: Self = Self {
        existing: ExistingOutput::Resume,
        resume: ResumeChoice::Extend,
    };

    /// Replaces existing output.
    pub const OVERWRITE: Self = Self {
        existing: ExistingOutput::Overwrite,
        resume: ResumeChoice::Abort,
    };
}

impl RunDecider for Policy {
    fn existing_output(&mut self, _location: &str) -> ExistingOutput {
        self.existing
    }

    fn resume(&mut self, _completed: u64, _requested: u64) -> ResumeChoice {
        self.resume
    }
}

/// Progress callbacks. Every method defaults to doing nothing.
pub trait RunObserver {
    /// The run is about to sweep from `first` to `target` inclusive.
    fn run_started(&mut self, _first: u64, _target: u64) {}

    /// A sweep is starting.
    fn sweep_started(&mut self, _iteration: u64, _target: u64, _loss_threshold: u32) {}

    /// `done` of `total` cells of the current sweep are finished.
    ///
    /// Called in steps of the configured progress percentage.
    fn cells_progress(&mut self, _done: usize, _total: usize) {}

    /// A frame was persisted.
    fn frame_saved(&mut self, _frame: u64, _grid: &WeaponGrid) {}

    /// The target iteration was reached.
    fn run_finished(&mut self, _summary: &RunSummary) {}
}

impl RunObserver for () {}

impl<O: RunObserver + ?Sized> RunObserver for &mut O {
    fn run_started(&mut self, first: u64, target: u64) {
        (**self).run_started(first, target);
    }

    fn sweep_started(&mut self, iteration: u64, target: u64, loss_threshold: u32) {
        (**self).sweep_started(iteration, target, loss_threshold);
    }

    fn cells_progress(&mut self, done: usize, total: usize) {
        (**self).cells_progress(done, total);
    }

    fn frame_saved(&mut self, frame: u64, grid: &WeaponGrid) {
        (**self).frame_saved(frame, grid);
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        (**self).run_finished(summary);
    }
}

/// Forwards run events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver {
    weapons: u32,
}

impl TracingObserver {
    /// Creates an observer that also logs a weapon census of every frame.
    pub fn new(weapons: u32) -> Self {
        Self { weapons }
    }
}

impl RunObserver for TracingObserver {
    fn run_started(&mut self, first: u64, target: u64) {
        info!(first, target, "starting run");
    }

    fn sweep_started(&mut self, iteration: u64, target: u64, loss_threshold: u32) {
        info!(iteration, target, loss_threshold, "sweep");
    }

    fn cells_progress(&mut self, done: usize, total: usize) {
        debug!(done, total, "cells");
    }

    fn frame_saved(&mut self, frame: u64, grid: &WeaponGrid) {
        if self.weapons > 0 {
            info!(frame, census = ?grid.census(self.weapons), "frame saved");
        } else {
            info!(frame, "frame saved");
        }
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        info!(
            target = summary.target,
            frames = summary.frames_written,
            "run finished"
        );
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Iteration the run started sweeping from (1 for a fresh run).
    pub first_iteration: u64,
    /// Final iteration, possibly extended by a resume decision.
    pub target: u64,
    /// Frames persisted during this run, including frame 0 of a fresh run.
    pub frames_written: u64,
    /// Whether the run continued stored frames.
    pub resumed: bool,
}

/// Number of decimal digits in `n`, at least 1.
///
/// Frame file names are zero-padded to the digit count of the target iteration.
pub fn frame_digits(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Mutable state of a run between sweeps.
#[derive(Debug, Clone)]
pub struct RunState {
    /// The grid after `iteration` sweeps.
    pub grid: WeaponGrid,
    /// Sweeps completed so far.
    pub iteration: u64,
    /// Final iteration.
    pub target: u64,
}

/// Runs a configured automaton against a frame store.
pub struct Controller<'a, S, D, O> {
    config: &'a RunConfig,
    rule: RpsRule,
    store: S,
    decider: D,
    observer: O,
}

impl<'a, S, D, O> Controller<'a, S, D, O>
where
    S: FrameStore,
    D: RunDecider,
    O: RunObserver,
{
    /// Creates a controller, validating the configuration.
    pub fn new(config: &'a RunConfig, store: S, decider: D, observer: O) -> Result<Self, RunError> {
        let rule = config.validate()?;
        Ok(Self {
            config,
            rule,
            store,
            decider,
            observer,
        })
    }

    /// Returns the frame store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the controller, returning the frame store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs to completion.
    ///
    /// `initial` is the discretized source grid. It becomes frame 0 of a fresh
    /// run and fixes the dimensions every resumed frame must match.
    pub fn run(&mut self, initial: WeaponGrid) -> Result<RunSummary, RunError> {
        if !initial.within(self.rule.weapons) {
            warn!(weapons = self.rule.weapons, "initial grid holds out-of-range weapons");
        }

        let (state, resumed, mut frames_written) = match self.prepare(initial)? {
            Prepared::Fresh(state) => (state, false, 1),
            Prepared::Resumed(state) => (state, true, 0),
        };

        let first = state.iteration + 1;
        let target = state.target;
        let digits = frame_digits(target);
        if resumed {
            // All frames of a run share the width of its final target.
            self.store.repad(digits)?;
        }
        self.observer.run_started(first, target);

        let mut rps = RockPaperScissors::new(state.grid, self.rule)
            .with_mode(self.config.update_mode)
            .with_traversal(self.config.traversal);
        let total = rps.grid().len();
        let batch = progress_batch(total, self.config.progress_percent);

        for iteration in first..=target {
            let threshold = self.config.threshold_at(iteration);
            self.observer.sweep_started(iteration, target, threshold);

            let observer = &mut self.observer;
            rps.step_with_progress(threshold, |done| {
                if let Some(batch) = batch {
                    if done % batch == 0 || done == total {
                        observer.cells_progress(done, total);
                    }
                }
            });

            self.store.save(iteration, digits, rps.grid())?;
            frames_written += 1;
            self.observer.frame_saved(iteration, rps.grid());
        }

        let summary = RunSummary {
            first_iteration: first,
            target,
            frames_written,
            resumed,
        };
        self.observer.run_finished(&summary);
        Ok(summary)
    }

    fn prepare(&mut self, initial: WeaponGrid) -> Result<Prepared, RunError> {
        if self.store.exists()? {
            let location = self.config.output_dir_name()?;
            match self.decider.existing_output(&location) {
                ExistingOutput::Abort => {
                    return Err(RunError::Aborted(AbortReason::ExistingOutput));
                }
                ExistingOutput::Resume => return self.resume(&initial).map(Prepared::Resumed),
                ExistingOutput::Overwrite => {
                    info!(location, "overwriting existing output");
                    self.store.clear()?;
                }
            }
        }

        self.store.create()?;
        let target = self.config.iterations;
        self.store.save(0, frame_digits(target), &initial)?;
        self.observer.frame_saved(0, &initial);
        Ok(Prepared::Fresh(RunState {
            grid: initial,
            iteration: 0,
            target,
        }))
    }

    /// Finds the latest loadable frame and decides the new target.
    fn resume(&mut self, initial: &WeaponGrid) -> Result<RunState, RunError> {
        let mut frames = self.store.frame_numbers()?;
        frames.sort_unstable_by(|a, b| b.cmp(a));

        let (completed, grid) = frames
            .into_iter()
            .find_map(|frame| match self.store.load(frame) {
                Ok(grid)
                    if grid.width() == initial.width() && grid.height() == initial.height() =>
                {
                    Some((frame, grid))
                }
                Ok(grid) => {
                    warn!(
                        frame,
                        width = grid.width(),
                        height = grid.height(),
                        "skipping frame with mismatched dimensions"
                    );
                    None
                }
                Err(e) => {
                    warn!(frame, error = %e, "skipping unreadable frame");
                    None
                }
            })
            .ok_or(RunError::NoResumableFrame)?;

        let requested = self.config.iterations;
        let target = match self.decider.resume(completed, requested) {
            ResumeChoice::Extend => completed + requested,
            ResumeChoice::FillUp => requested.max(completed),
            ResumeChoice::Abort => return Err(RunError::Aborted(AbortReason::Resume)),
        };
        info!(completed, target, "resuming");

        Ok(RunState {
            grid,
            iteration: completed,
            target,
        })
    }
}

enum Prepared {
    Fresh(RunState),
    Resumed(RunState),
}

/// Cells per progress report, or `None` when progress is not reported.
fn progress_batch(total: usize, percent: Option<u32>) -> Option<usize> {
    let percent = percent.filter(|&p| p > 0)? as usize;
    Some((total * percent.min(100) / 100).max(1))
}
