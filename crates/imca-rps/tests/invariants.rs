//! Properties of the dominance rule and of full-grid sweeps.

use proptest::prelude::*;
use rhizome_imca_rps::{
    NeighborOrder, NeighborSeed, RockPaperScissors, RpsRule, UpdateMode, WeaponGrid,
    WeaponRange, Wrap, survives,
};

/// A random grid together with a rule that fits it.
fn grid_and_rule() -> impl Strategy<Value = (WeaponGrid, RpsRule)> {
    (1u32..=6, 1usize..=6, 1usize..=6)
        .prop_flat_map(|(weapons, width, height)| {
            (
                Just(weapons),
                Just(width),
                Just(height),
                prop::collection::vec(0..weapons as u8, width * height),
                0..weapons,
                0..weapons,
                any::<[bool; 8]>(),
                any::<bool>(),
                any::<bool>(),
                Just("01234567".chars().collect::<Vec<char>>()).prop_shuffle(),
            )
        })
        .prop_map(|(weapons, width, height, cells, pre, post, seed, wx, wy, order)| {
            let grid = WeaponGrid::from_cells(width, height, cells).unwrap();
            let order: String = order.into_iter().collect();
            let rule = RpsRule::new(weapons, WeaponRange::new(pre, post))
                .with_seed(NeighborSeed::new(seed))
                .with_order(NeighborOrder::parse(&order).unwrap())
                .with_wrap(Wrap { x: wx, y: wy });
            (grid, rule)
        })
}

proptest! {
    #[test]
    fn same_weapon_always_survives(weapons in 1u32..=256, own in any::<u8>(), pre in 0u32..8, post in 0u32..8) {
        let own = (own as u32 % weapons) as u8;
        prop_assert!(survives(own, own, weapons, WeaponRange::new(pre, post)));
    }

    #[test]
    fn full_coverage_survives_everything(weapons in 1u32..=32, own in any::<u8>(), enemy in any::<u8>(), split in 0u32..32) {
        let own = (own as u32 % weapons) as u8;
        let enemy = (enemy as u32 % weapons) as u8;
        let pre = split % weapons;
        let post = weapons - 1 - pre;
        prop_assert!(survives(own, enemy, weapons, WeaponRange::new(pre, post)));
    }

    #[test]
    fn survival_matches_circular_distance(weapons in 1u32..=16, own in any::<u8>(), enemy in any::<u8>(), pre in 0u32..16, post in 0u32..16) {
        let pre = pre % weapons;
        let post = post % weapons;
        let own = (own as u32 % weapons) as u8;
        let enemy = (enemy as u32 % weapons) as u8;
        let ahead = (enemy as u32 + weapons - own as u32) % weapons;
        let behind = (own as u32 + weapons - enemy as u32) % weapons;
        let expected = ahead == 0 || (ahead >= 1 && ahead <= post) || (behind >= 1 && behind <= pre);
        prop_assert_eq!(survives(own, enemy, weapons, WeaponRange::new(pre, post)), expected);
    }

    #[test]
    fn snapshot_sweep_ignores_visitation_order(
        (grid, rule) in grid_and_rule(),
        threshold in 0u32..4,
        shuffle in any::<u64>(),
    ) {
        let mut coords: Vec<_> = (0..grid.width())
            .flat_map(|x| (0..grid.height()).map(move |y| (x, y)))
            .collect();
        let mut reference = RockPaperScissors::new(grid.clone(), rule);
        reference.step_in_order(&coords, threshold).unwrap();

        // Deterministic Fisher-Yates driven by the generated value.
        let mut state = shuffle | 1;
        for i in (1..coords.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state % (i as u64 + 1)) as usize;
            coords.swap(i, j);
        }
        let mut shuffled = RockPaperScissors::new(grid, rule).with_mode(UpdateMode::Snapshot);
        shuffled.step_in_order(&coords, threshold).unwrap();

        prop_assert_eq!(reference.grid(), shuffled.grid());
    }

    #[test]
    fn in_place_sweep_is_deterministic((grid, rule) in grid_and_rule(), threshold in 0u32..4) {
        let run = || {
            let mut rps = RockPaperScissors::new(grid.clone(), rule).with_mode(UpdateMode::InPlace);
            rps.steps(3, threshold);
            rps.into_grid()
        };
        prop_assert_eq!(run(), run());
    }

    #[test]
    fn sweeps_stay_in_alphabet((grid, rule) in grid_and_rule(), threshold in 0u32..4) {
        let mut rps = RockPaperScissors::new(grid, rule);
        rps.steps(3, threshold);
        prop_assert!(rps.grid().within(rule.weapons));
    }

    #[test]
    fn order_with_repeat_is_rejected(s in "[0-7]{0,7}", at in 0usize..8) {
        let mut chars: Vec<char> = s.chars().collect();
        if let Some(&c) = chars.first() {
            let at = at.min(chars.len());
            chars.insert(at, c);
            let repeated: String = chars.into_iter().collect();
            prop_assert!(NeighborOrder::parse(&repeated).is_err());
        }
    }

    #[test]
    fn order_backfill_is_lowest_free_slots(s in "[0-7]{0,8}") {
        if let Ok(order) = NeighborOrder::parse(&s) {
            let given: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();
            let free: Vec<u32> = (0..8).filter(|slot| !given.contains(slot)).collect();
            // Direction `given.len() + k` sits in the k-th lowest free slot.
            for (k, &slot) in free.iter().enumerate() {
                prop_assert_eq!(order.sequence()[slot as usize].index(), given.len() + k);
            }
            for (direction, &slot) in given.iter().enumerate() {
                prop_assert_eq!(order.sequence()[slot as usize].index(), direction);
            }
        }
    }
}

#[test]
fn corner_without_wrap_keeps_own_weapon() {
    let grid = WeaponGrid::from_rows(&[[1u8, 0, 0], [0, 0, 0], [0, 0, 0]]).unwrap();
    let rule = RpsRule::new(3, WeaponRange::classic())
        .with_seed(NeighborSeed::parse("10000001").unwrap())
        .with_order(NeighborOrder::parse("01234567").unwrap())
        .with_wrap(Wrap::NONE);
    for threshold in 0..=8 {
        assert_eq!(rule.update_cell(&grid, 0, 0, threshold), 1);
    }
}
