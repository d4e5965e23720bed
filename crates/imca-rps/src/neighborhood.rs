//! Which neighbors may attack a cell, and in which order.
//!
//! Neighbors are indexed in compass order starting at the top-left corner:
//!
//! ```text
//! ┌───┬───┬───┐
//! │ 0 │ 1 │ 2 │
//! ├───┼───┼───┤
//! │ 7 │ · │ 3 │
//! ├───┼───┼───┤
//! │ 6 │ 5 │ 4 │
//! └───┴───┴───┘
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{OrderError, SeedError};

/// Number of neighbors around a cell.
pub const NUM_NEIGHBORS: usize = 8;

/// One of the eight neighbor directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Top-left (-X, -Y).
    TopLeft,
    /// Top (-Y).
    Top,
    /// Top-right (+X, -Y).
    TopRight,
    /// Right (+X).
    Right,
    /// Bottom-right (+X, +Y).
    BottomRight,
    /// Bottom (+Y).
    Bottom,
    /// Bottom-left (-X, +Y).
    BottomLeft,
    /// Left (-X).
    Left,
}

impl Direction {
    /// All directions in compass (index) order.
    pub const ALL: [Direction; NUM_NEIGHBORS] = [
        Direction::TopLeft,
        Direction::Top,
        Direction::TopRight,
        Direction::Right,
        Direction::BottomRight,
        Direction::Bottom,
        Direction::BottomLeft,
        Direction::Left,
    ];

    /// Returns the direction for a compass index in `0..8`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the compass index of this direction.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the `(dx, dy)` offset to the neighbor.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::TopLeft => (-1, -1),
            Direction::Top => (0, -1),
            Direction::TopRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::BottomRight => (1, 1),
            Direction::Bottom => (0, 1),
            Direction::BottomLeft => (-1, 1),
            Direction::Left => (-1, 0),
        }
    }
}

/// Which directions are allowed to attack.
///
/// Parsed from a string of digits in compass order, e.g. `"01010101"`
/// enables the four orthogonal neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NeighborSeed {
    enabled: [bool; NUM_NEIGHBORS],
}

impl NeighborSeed {
    /// Every neighbor may attack.
    pub const MOORE: Self = Self {
        enabled: [true; NUM_NEIGHBORS],
    };

    /// Only orthogonal neighbors may attack (`"01010101"`).
    pub const VON_NEUMANN: Self = Self {
        enabled: [false, true, false, true, false, true, false, true],
    };

    /// Creates a seed from explicit flags in compass order.
    pub const fn new(enabled: [bool; NUM_NEIGHBORS]) -> Self {
        Self { enabled }
    }

    /// Decodes a seed string.
    ///
    /// Only the first eight characters are used; missing trailing positions
    /// are disabled. `0` disables a direction, any other digit enables it.
    pub fn parse(s: &str) -> Result<Self, SeedError> {
        let mut enabled = [false; NUM_NEIGHBORS];
        for (position, c) in s.chars().take(NUM_NEIGHBORS).enumerate() {
            let digit = c
                .to_digit(10)
                .ok_or(SeedError::NotADigit { position, found: c })?;
            enabled[position] = digit != 0;
        }
        Ok(Self { enabled })
    }

    /// Returns true if the direction may attack.
    pub fn is_enabled(&self, direction: Direction) -> bool {
        self.enabled[direction.index()]
    }

    /// Returns the flags in compass order.
    pub fn flags(&self) -> [bool; NUM_NEIGHBORS] {
        self.enabled
    }
}

impl Default for NeighborSeed {
    fn default() -> Self {
        Self::VON_NEUMANN
    }
}

impl std::fmt::Display for NeighborSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &on in &self.enabled {
            write!(f, "{}", on as u8)?;
        }
        Ok(())
    }
}

/// The sequence in which directions attack a cell.
///
/// Stored as slot → direction: `sequence()[0]` attacks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NeighborOrder {
    sequence: [Direction; NUM_NEIGHBORS],
}

impl NeighborOrder {
    /// Compass order, `"01234567"`.
    pub const COMPASS: Self = Self {
        sequence: Direction::ALL,
    };

    /// Decodes an order string.
    ///
    /// Character `i` is the slot (`0..=7`) at which direction `i` attacks.
    /// Directions past the end of the string take the lowest free slots, in
    /// ascending direction order. Slots may not repeat.
    ///
    /// # Example
    ///
    /// ```
    /// use rhizome_imca_rps::{Direction, NeighborOrder};
    ///
    /// // Top-left attacks second, top attacks first, the rest follow.
    /// let order = NeighborOrder::parse("10").unwrap();
    /// assert_eq!(order.sequence()[0], Direction::Top);
    /// assert_eq!(order.sequence()[1], Direction::TopLeft);
    /// assert_eq!(order.sequence()[2], Direction::TopRight);
    /// ```
    pub fn parse(s: &str) -> Result<Self, OrderError> {
        let len = s.chars().count();
        if len > NUM_NEIGHBORS {
            return Err(OrderError::TooLong { len });
        }

        let mut slots: [Option<Direction>; NUM_NEIGHBORS] = [None; NUM_NEIGHBORS];
        for (position, c) in s.chars().enumerate() {
            let slot = c
                .to_digit(10)
                .ok_or(OrderError::NotADigit { position, found: c })?;
            let entry = slots
                .get_mut(slot as usize)
                .ok_or(OrderError::SlotOutOfRange { position, slot })?;
            if entry.is_some() {
                return Err(OrderError::DuplicateSlot { position, slot });
            }
            *entry = Some(Direction::ALL[position]);
        }

        // Back-fill the remaining directions into the lowest free slots.
        let mut remaining = Direction::ALL[len..].iter();
        for entry in slots.iter_mut().filter(|e| e.is_none()) {
            *entry = remaining.next().copied();
        }

        let mut sequence = Direction::ALL;
        for (dst, src) in sequence.iter_mut().zip(slots) {
            // Every slot is filled: `len` explicit entries plus `8 - len` back-filled.
            if let Some(direction) = src {
                *dst = direction;
            }
        }
        Ok(Self { sequence })
    }

    /// Returns the directions in attack order.
    pub fn sequence(&self) -> &[Direction; NUM_NEIGHBORS] {
        &self.sequence
    }
}

impl Default for NeighborOrder {
    fn default() -> Self {
        Self::COMPASS
    }
}

impl std::fmt::Display for NeighborOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for direction in &self.sequence {
            write!(f, "{}", direction.index())?;
        }
        Ok(())
    }
}

/// Neighbor lookup policy at the grid border, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wrap {
    /// Neighbors wrap around the left and right edges.
    pub x: bool,
    /// Neighbors wrap around the top and bottom edges.
    pub y: bool,
}

impl Wrap {
    /// Toroidal grid.
    pub const BOTH: Self = Self { x: true, y: true };
    /// Bounded grid.
    pub const NONE: Self = Self { x: false, y: false };
}

impl Default for Wrap {
    fn default() -> Self {
        Self::BOTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_offsets_cover_moore() {
        let mut offsets: Vec<_> = Direction::ALL.iter().map(|d| d.offset()).collect();
        offsets.sort();
        offsets.dedup();
        assert_eq!(offsets.len(), 8);
        assert!(!offsets.contains(&(0, 0)));
    }

    #[test]
    fn test_direction_index_roundtrip() {
        for (i, d) in Direction::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
            assert_eq!(Direction::from_index(i), Some(*d));
        }
        assert_eq!(Direction::from_index(8), None);
    }

    #[test]
    fn test_seed_default_string() {
        let seed = NeighborSeed::parse("01010101").unwrap();
        assert_eq!(seed, NeighborSeed::VON_NEUMANN);
        assert_eq!(seed.to_string(), "01010101");
    }

    #[test]
    fn test_seed_padded_with_zeros() {
        let seed = NeighborSeed::parse("11").unwrap();
        assert_eq!(seed.to_string(), "11000000");
        assert!(seed.is_enabled(Direction::TopLeft));
        assert!(!seed.is_enabled(Direction::Left));
    }

    #[test]
    fn test_seed_truncated() {
        let seed = NeighborSeed::parse("1000000111").unwrap();
        assert_eq!(seed.to_string(), "10000001");
    }

    #[test]
    fn test_seed_nonzero_digit_enables() {
        let seed = NeighborSeed::parse("09").unwrap();
        assert!(seed.is_enabled(Direction::Top));
    }

    #[test]
    fn test_seed_rejects_non_digit() {
        assert_eq!(
            NeighborSeed::parse("01x"),
            Err(SeedError::NotADigit {
                position: 2,
                found: 'x'
            })
        );
    }

    #[test]
    fn test_order_identity() {
        let order = NeighborOrder::parse("01234567").unwrap();
        assert_eq!(order, NeighborOrder::COMPASS);
        assert_eq!(order.to_string(), "01234567");
    }

    #[test]
    fn test_order_empty_is_compass() {
        assert_eq!(NeighborOrder::parse("").unwrap(), NeighborOrder::COMPASS);
    }

    #[test]
    fn test_order_reversed() {
        let order = NeighborOrder::parse("76543210").unwrap();
        assert_eq!(order.sequence()[0], Direction::Left);
        assert_eq!(order.sequence()[7], Direction::TopLeft);
        assert_eq!(order.to_string(), "76543210");
    }

    #[test]
    fn test_order_backfill() {
        // TL -> slot 3, T -> slot 0; TR..L fill slots 1, 2, 4, 5, 6, 7.
        let order = NeighborOrder::parse("30").unwrap();
        assert_eq!(order.to_string(), "12304567");
    }

    #[test]
    fn test_order_slot_is_position_not_direction() {
        // Direction i is placed at slot s[i]; the visit sequence is the inverse.
        let order = NeighborOrder::parse("12345670").unwrap();
        assert_eq!(order.sequence()[0], Direction::Left);
        assert_eq!(order.sequence()[1], Direction::TopLeft);
    }

    #[test]
    fn test_order_rejects_duplicates() {
        assert_eq!(
            NeighborOrder::parse("0120"),
            Err(OrderError::DuplicateSlot {
                position: 3,
                slot: 0
            })
        );
    }

    #[test]
    fn test_order_rejects_out_of_range() {
        assert_eq!(
            NeighborOrder::parse("08"),
            Err(OrderError::SlotOutOfRange {
                position: 1,
                slot: 8
            })
        );
    }

    #[test]
    fn test_order_rejects_too_long() {
        assert_eq!(
            NeighborOrder::parse("012345670"),
            Err(OrderError::TooLong { len: 9 })
        );
    }

    #[test]
    fn test_order_rejects_non_digit() {
        assert!(matches!(
            NeighborOrder::parse("0a"),
            Err(OrderError::NotADigit { position: 1, .. })
        ));
    }

    #[test]
    fn test_order_is_permutation() {
        for s in ["", "7", "07", "5301", "1032547", "76543210"] {
            let order = NeighborOrder::parse(s).unwrap();
            let mut seen = [false; NUM_NEIGHBORS];
            for d in order.sequence() {
                assert!(!seen[d.index()], "{s}: {d:?} visited twice");
                seen[d.index()] = true;
            }
        }
    }
}
