//! Run configuration.

use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::automaton::{RpsRule, UpdateMode};
use crate::error::ConfigError;
use crate::grid::Traversal;
use crate::neighborhood::{NeighborOrder, NeighborSeed, Wrap};
use crate::weapon::{MAX_WEAPONS, WeaponRange};

/// How the loss threshold evolves over a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ThresholdMode {
    /// The base threshold applies to every iteration.
    #[default]
    Fixed,
    /// Iteration `i` uses `i % base`, which reaches 0 every `base` iterations.
    Cycling,
}

impl ThresholdMode {
    /// Returns the threshold for `iteration` given a positive `base`.
    pub fn threshold(self, base: u32, iteration: u64) -> u32 {
        match self {
            ThresholdMode::Fixed => base,
            ThresholdMode::Cycling => (iteration % base as u64) as u32,
        }
    }
}

/// Everything that defines a run.
///
/// Two runs with equal configurations write to the same output directory,
/// which is how an interrupted run is found again.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunConfig {
    /// Prefix of the output directory name.
    pub name: String,
    /// Image the initial grid is discretized from.
    pub source: PathBuf,
    /// Directory the output directory is created in.
    pub output_root: PathBuf,
    /// Number of iterations to run.
    pub iterations: u64,
    /// Size of the weapon alphabet.
    pub weapons: u32,
    /// Defendable neighborhood on the weapon circle.
    pub weapon_range: WeaponRange,
    /// Losses needed to convert a cell.
    pub loss_threshold: u32,
    /// Whether the threshold is fixed or cycles with the iteration.
    pub threshold_mode: ThresholdMode,
    /// Border policy.
    pub wrap: Wrap,
    /// Neighbor seed string, e.g. `"01010101"`.
    pub neighbor_seed: String,
    /// Neighbor order string, e.g. `"01234567"`.
    pub neighbor_order: String,
    /// Snapshot or in-place sweeps.
    pub update_mode: UpdateMode,
    /// Cell visitation order within a sweep.
    pub traversal: Traversal,
    /// Report sweep progress every this many percent of cells.
    pub progress_percent: Option<u32>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            name: "rps".to_string(),
            source: PathBuf::new(),
            output_root: PathBuf::from("."),
            iterations: 100,
            weapons: 3,
            weapon_range: WeaponRange::classic(),
            loss_threshold: 2,
            threshold_mode: ThresholdMode::Fixed,
            wrap: Wrap::BOTH,
            neighbor_seed: "01010101".to_string(),
            neighbor_order: "01234567".to_string(),
            update_mode: UpdateMode::Snapshot,
            traversal: Traversal::ColumnMajor,
            progress_percent: None,
        }
    }
}

impl RunConfig {
    /// Creates a default configuration for a source image.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Checks the configuration and resolves the interaction rule.
    pub fn validate(&self) -> Result<RpsRule, ConfigError> {
        if self.weapons == 0 {
            return Err(ConfigError::NoWeapons);
        }
        if self.weapons > MAX_WEAPONS {
            return Err(ConfigError::TooManyWeapons {
                weapons: self.weapons,
            });
        }
        if !self.weapon_range.fits(self.weapons) {
            return Err(ConfigError::RangeOutOfBounds {
                pre: self.weapon_range.pre,
                post: self.weapon_range.post,
                weapons: self.weapons,
            });
        }
        if self.loss_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }

        Ok(RpsRule {
            weapons: self.weapons,
            range: self.weapon_range,
            seed: NeighborSeed::parse(&self.neighbor_seed)?,
            order: NeighborOrder::parse(&self.neighbor_order)?,
            wrap: self.wrap,
        })
    }

    /// Returns the loss threshold in effect for `iteration`.
    pub fn threshold_at(&self, iteration: u64) -> u32 {
        self.threshold_mode.threshold(self.loss_threshold, iteration)
    }

    /// Returns the output directory name for this configuration.
    ///
    /// Seed and order appear in resolved form, so equivalent spellings
    /// (`"1"` and `"10000000"`) share a directory.
    pub fn output_dir_name(&self) -> Result<String, ConfigError> {
        let rule = self.validate()?;
        let source = self
            .source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(format!(
            "{name}-Src_{source}-Lvl_{lvl}-Rng_{pre}_{post}-TH_{th}_{fixed}-Ref_{snapshot}-NhS_{seed}-NhO_{order}-wXY_{wx}_{wy}",
            name = self.name,
            lvl = self.weapons,
            pre = self.weapon_range.pre,
            post = self.weapon_range.post,
            th = self.loss_threshold,
            fixed = (self.threshold_mode == ThresholdMode::Fixed) as u8,
            snapshot = self.update_mode.is_snapshot() as u8,
            seed = rule.seed,
            order = rule.order,
            wx = self.wrap.x as u8,
            wy = self.wrap.y as u8,
        ))
    }

    /// Returns the full output directory path.
    pub fn output_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.output_root.join(self.output_dir_name()?))
    }
}
