//! The per-cell update rule and full-grid sweeps.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::RunError;
use crate::grid::{Traversal, WeaponGrid};
use crate::neighborhood::{Direction, NeighborOrder, NeighborSeed, Wrap};
use crate::weapon::{Weapon, WeaponRange, survives};

/// Resolved, validated interaction rule shared by every cell of a run.
///
/// Build one with [`RunConfig::validate`](crate::RunConfig::validate), or
/// directly with [`RpsRule::new`] when the parts are already known to be valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RpsRule {
    /// Size of the weapon alphabet.
    pub weapons: u32,
    /// Defendable neighborhood on the weapon circle.
    pub range: WeaponRange,
    /// Directions allowed to attack.
    pub seed: NeighborSeed,
    /// Sequence in which directions attack.
    pub order: NeighborOrder,
    /// Border policy.
    pub wrap: Wrap,
}

impl RpsRule {
    /// Creates a rule with compass order, orthogonal attackers and wrapping borders.
    pub fn new(weapons: u32, range: WeaponRange) -> Self {
        Self {
            weapons,
            range,
            seed: NeighborSeed::default(),
            order: NeighborOrder::default(),
            wrap: Wrap::default(),
        }
    }

    /// Sets the attacking directions.
    pub fn with_seed(mut self, seed: NeighborSeed) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the attack order.
    pub fn with_order(mut self, order: NeighborOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets the border policy.
    pub fn with_wrap(mut self, wrap: Wrap) -> Self {
        self.wrap = wrap;
        self
    }

    /// Returns the neighbor coordinate in `direction`, or `None` if that
    /// neighbor is disabled by the seed or lies beyond a non-wrapping border.
    pub fn attacker(
        &self,
        grid: &WeaponGrid,
        x: usize,
        y: usize,
        direction: Direction,
    ) -> Option<(usize, usize)> {
        if !self.seed.is_enabled(direction) {
            return None;
        }
        let (dx, dy) = direction.offset();
        let nx = step_axis(x, dx, grid.width(), self.wrap.x)?;
        let ny = step_axis(y, dy, grid.height(), self.wrap.y)?;
        Some((nx, ny))
    }

    /// Computes the next weapon of the cell at `(x, y)`, reading only `grid`.
    ///
    /// Attackers are visited in [`NeighborOrder`] sequence. Every attack the
    /// cell does not survive counts as a loss; once the losses reach
    /// `loss_threshold` the cell takes the weapon of that attacker and no later
    /// attacker is consulted. A threshold of 0 makes the first loss decisive.
    pub fn update_cell(&self, grid: &WeaponGrid, x: usize, y: usize, loss_threshold: u32) -> Weapon {
        let own = grid.get(x, y);
        let mut losses = 0u32;

        for &direction in self.order.sequence() {
            let Some((nx, ny)) = self.attacker(grid, x, y, direction) else {
                continue;
            };
            let enemy = grid.get(nx, ny);
            if !survives(own, enemy, self.weapons, self.range) {
                losses += 1;
                if losses >= loss_threshold {
                    return enemy;
                }
            }
        }

        own
    }
}

/// Moves one step along an axis, wrapping or stopping at the border.
fn step_axis(pos: usize, delta: i32, len: usize, wrap: bool) -> Option<usize> {
    match delta {
        0 => Some(pos),
        -1 if pos > 0 => Some(pos - 1),
        -1 if wrap => Some(len - 1),
        1 if pos + 1 < len => Some(pos + 1),
        1 if wrap => Some(0),
        _ => None,
    }
}

/// Where a sweep reads neighbor weapons from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UpdateMode {
    /// Read from a frozen copy of the pre-sweep grid.
    ///
    /// Every cell sees the same state, so the result does not depend on
    /// the visitation order.
    #[default]
    Snapshot,
    /// Read from the grid being written.
    ///
    /// Cells visited later see the updates of cells visited earlier, so the
    /// result depends on the visitation order. This is intentional.
    InPlace,
}

impl UpdateMode {
    /// Returns true for [`UpdateMode::Snapshot`].
    pub fn is_snapshot(self) -> bool {
        matches!(self, UpdateMode::Snapshot)
    }
}

/// Rock-paper-scissors cellular automaton over a weapon grid.
///
/// # Example
///
/// ```
/// use rhizome_imca_rps::{RockPaperScissors, RpsRule, WeaponGrid, WeaponRange};
///
/// let grid = WeaponGrid::from_rows(&[[0u8, 1], [2, 0]]).unwrap();
/// let mut rps = RockPaperScissors::new(grid, RpsRule::new(3, WeaponRange::classic()));
/// rps.step(2);
/// assert_eq!(rps.grid().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct RockPaperScissors {
    grid: WeaponGrid,
    rule: RpsRule,
    mode: UpdateMode,
    traversal: Traversal,
}

impl RockPaperScissors {
    /// Creates an automaton in snapshot mode with column-major traversal.
    pub fn new(grid: WeaponGrid, rule: RpsRule) -> Self {
        Self {
            grid,
            rule,
            mode: UpdateMode::default(),
            traversal: Traversal::default(),
        }
    }

    /// Sets the update mode.
    pub fn with_mode(mut self, mode: UpdateMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the visitation order used by [`step`](Self::step).
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Returns the current grid.
    pub fn grid(&self) -> &WeaponGrid {
        &self.grid
    }

    /// Consumes the automaton, returning the grid.
    pub fn into_grid(self) -> WeaponGrid {
        self.grid
    }

    /// Returns the rule.
    pub fn rule(&self) -> &RpsRule {
        &self.rule
    }

    /// Returns the update mode.
    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    /// Advances every cell once, using the configured traversal.
    pub fn step(&mut self, loss_threshold: u32) {
        self.step_with_progress(loss_threshold, |_| {});
    }

    /// Like [`step`](Self::step), calling `progress` with the number of cells
    /// finished after each cell.
    pub fn step_with_progress(&mut self, loss_threshold: u32, progress: impl FnMut(usize)) {
        let coords: Vec<_> = self
            .traversal
            .coords(self.grid.width(), self.grid.height())
            .collect();
        self.sweep(&coords, loss_threshold, progress);
    }

    /// Advances every cell once, visiting cells in the given order.
    ///
    /// `order` must list every coordinate of the grid exactly once.
    pub fn step_in_order(
        &mut self,
        order: &[(usize, usize)],
        loss_threshold: u32,
    ) -> Result<(), RunError> {
        let (width, height) = (self.grid.width(), self.grid.height());
        let mut seen = vec![false; width * height];
        let is_permutation = order.len() == seen.len()
            && order.iter().all(|&(x, y)| {
                x < width && y < height && !std::mem::replace(&mut seen[y * width + x], true)
            });
        if !is_permutation {
            return Err(RunError::InvalidTraversal { cells: seen.len() });
        }
        self.sweep(order, loss_threshold, |_| {});
        Ok(())
    }

    /// Advances `n` sweeps with a constant threshold.
    pub fn steps(&mut self, n: usize, loss_threshold: u32) {
        for _ in 0..n {
            self.step(loss_threshold);
        }
    }

    fn sweep(&mut self, order: &[(usize, usize)], loss_threshold: u32, mut progress: impl FnMut(usize)) {
        match self.mode {
            UpdateMode::Snapshot => {
                let snapshot = self.grid.clone();
                for (done, &(x, y)) in order.iter().enumerate() {
                    let next = self.rule.update_cell(&snapshot, x, y, loss_threshold);
                    self.grid.set(x, y, next);
                    progress(done + 1);
                }
            }
            UpdateMode::InPlace => {
                for (done, &(x, y)) in order.iter().enumerate() {
                    let next = self.rule.update_cell(&self.grid, x, y, loss_threshold);
                    self.grid.set(x, y, next);
                    progress(done + 1);
                }
            }
        }
    }
}
