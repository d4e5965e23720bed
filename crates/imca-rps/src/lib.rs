//! Rock-paper-scissors cellular automaton over discretized images.
//!
//! Each cell of a grid holds a *weapon*, an index into a circular alphabet of
//! `W` weapons. Every sweep, each cell is attacked by its enabled neighbors in
//! a configurable order; a cell that loses `loss_threshold` skirmishes adopts
//! the weapon of the neighbor that beat it last.
//!
//! - [`survives`] - the dominance rule
//! - [`NeighborSeed`], [`NeighborOrder`], [`Wrap`] - who attacks, in what order, across which borders
//! - [`RpsRule`] - the per-cell update
//! - [`RockPaperScissors`] - full-grid sweeps in snapshot or in-place mode
//! - [`RunConfig`] - validated run configuration and output naming
//! - [`Controller`] - runs, resumes and persists frames through a [`FrameStore`]
//!
//! # Example
//!
//! ```
//! use rhizome_imca_rps::{NeighborSeed, RockPaperScissors, RpsRule, WeaponGrid, WeaponRange};
//!
//! let rule = RpsRule::new(3, WeaponRange::classic()).with_seed(NeighborSeed::MOORE);
//! let grid = WeaponGrid::from_rows(&[[0u8, 1, 2], [2, 0, 1], [1, 2, 0]]).unwrap();
//!
//! let mut rps = RockPaperScissors::new(grid, rule);
//! rps.steps(10, 2);
//! assert!(rps.grid().within(3));
//! ```

mod automaton;
mod config;
mod controller;
mod error;
mod grid;
mod neighborhood;
mod weapon;

pub use automaton::{RockPaperScissors, RpsRule, UpdateMode};
pub use config::{RunConfig, ThresholdMode};
pub use controller::{
    Controller, ExistingOutput, FrameStore, Policy, ResumeChoice, RunDecider, RunObserver,
    RunState, RunSummary, TracingObserver, frame_digits,
};
pub use error::{AbortReason, ConfigError, OrderError, RunError, SeedError, StoreError};
pub use grid::{Traversal, WeaponGrid};
pub use neighborhood::{Direction, NUM_NEIGHBORS, NeighborOrder, NeighborSeed, Wrap};
pub use weapon::{MAX_WEAPONS, Weapon, WeaponRange, survives};
