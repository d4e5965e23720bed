#![no_main]

use libfuzzer_sys::fuzz_target;
use rhizome_imca_rps::NeighborOrder;

fuzz_target!(|data: &str| {
    // A resolved order visits every direction exactly once.
    if let Ok(order) = NeighborOrder::parse(data) {
        let mut seen = [false; 8];
        for direction in order.sequence() {
            assert!(!seen[direction.index()]);
            seen[direction.index()] = true;
        }
    }
});
