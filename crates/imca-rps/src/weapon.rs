//! Weapons and the circular dominance rule.
//!
//! Weapons are indices into a fixed alphabet of `W` colors arranged on a
//! circle. A weapon repels attacks from itself and from the `pre` weapons
//! before it and the `post` weapons after it; every other weapon defeats it.
//!
//! ```text
//! W = 5, range = (1, 2), own = 0
//!
//!        4 ─ 0 ─ 1 ─ 2    3
//!       pre own  post     loses
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A cell state: the index of a weapon in `[0, W)`.
pub type Weapon = u8;

/// Largest supported alphabet, so that every index fits a [`Weapon`].
pub const MAX_WEAPONS: u32 = 256;

/// How many neighboring weapons on the circle a weapon can repel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeaponRange {
    /// Weapons immediately preceding this one.
    pub pre: u32,
    /// Weapons immediately following this one.
    pub post: u32,
}

impl WeaponRange {
    /// Creates a new range.
    pub const fn new(pre: u32, post: u32) -> Self {
        Self { pre, post }
    }

    /// Classic rock-paper-scissors: each weapon ties with the one after it.
    pub const fn classic() -> Self {
        Self::new(0, 1)
    }

    /// Returns true if both sides stay below `weapons`.
    pub fn fits(&self, weapons: u32) -> bool {
        self.pre < weapons && self.post < weapons
    }

    /// Returns true if every weapon on the circle is defendable.
    pub fn covers_all(&self, weapons: u32) -> bool {
        self.pre + self.post + 1 >= weapons
    }
}

impl From<(u32, u32)> for WeaponRange {
    fn from((pre, post): (u32, u32)) -> Self {
        Self::new(pre, post)
    }
}

/// Returns true if `own` survives an attack by `enemy`.
///
/// `own` survives itself, the `range.pre` weapons before it and the
/// `range.post` weapons after it, all taken modulo `weapons`.
///
/// # Panics
///
/// Panics if `weapons` is zero.
///
/// # Example
///
/// ```
/// use rhizome_imca_rps::{survives, WeaponRange};
///
/// // Rock (0), paper (1), scissors (2); paper is the defendable successor of rock.
/// let range = WeaponRange::classic();
/// assert!(survives(0, 1, 3, range));
/// assert!(!survives(0, 2, 3, range));
/// ```
pub fn survives(own: Weapon, enemy: Weapon, weapons: u32, range: WeaponRange) -> bool {
    if own == enemy {
        return true;
    }

    let own = own as u32;
    let enemy = enemy as u32 % weapons;

    for k in 0..range.pre {
        if (own + weapons - 1 - k % weapons) % weapons == enemy {
            return true;
        }
    }

    for k in 0..range.post {
        if (own + 1 + k) % weapons == enemy {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_weapon_survives() {
        for w in 1..=6u32 {
            for own in 0..w as Weapon {
                assert!(survives(own, own, w, WeaponRange::new(0, 0)));
            }
        }
    }

    #[test]
    fn test_classic_cycle() {
        // 0 survives 1, 1 survives 2, 2 survives 0; the reverse loses.
        let range = WeaponRange::classic();
        assert!(survives(0, 1, 3, range));
        assert!(survives(1, 2, 3, range));
        assert!(survives(2, 0, 3, range));

        assert!(!survives(1, 0, 3, range));
        assert!(!survives(2, 1, 3, range));
        assert!(!survives(0, 2, 3, range));
    }

    #[test]
    fn test_pre_range_wraps() {
        let range = WeaponRange::new(2, 0);
        // Predecessors of 0 in an alphabet of 5 are 4 and 3.
        assert!(survives(0, 4, 5, range));
        assert!(survives(0, 3, 5, range));
        assert!(!survives(0, 2, 5, range));
        assert!(!survives(0, 1, 5, range));
    }

    #[test]
    fn test_post_range_wraps() {
        let range = WeaponRange::new(0, 2);
        assert!(survives(4, 0, 5, range));
        assert!(survives(4, 1, 5, range));
        assert!(!survives(4, 2, 5, range));
        assert!(!survives(4, 3, 5, range));
    }

    #[test]
    fn test_zero_range_loses_to_everything_else() {
        let range = WeaponRange::new(0, 0);
        for enemy in 1..4 {
            assert!(!survives(0, enemy, 4, range));
        }
    }

    #[test]
    fn test_full_coverage() {
        let range = WeaponRange::new(2, 2);
        assert!(range.covers_all(5));
        for own in 0..5 {
            for enemy in 0..5 {
                assert!(survives(own, enemy, 5, range));
            }
        }
    }

    #[test]
    fn test_single_weapon_alphabet() {
        assert!(survives(0, 0, 1, WeaponRange::new(0, 0)));
    }

    #[test]
    fn test_range_fits() {
        assert!(WeaponRange::new(2, 2).fits(3));
        assert!(!WeaponRange::new(3, 0).fits(3));
        assert!(!WeaponRange::new(0, 3).fits(3));
    }
}
