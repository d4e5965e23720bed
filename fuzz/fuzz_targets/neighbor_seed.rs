#![no_main]

use libfuzzer_sys::fuzz_target;
use rhizome_imca_rps::NeighborSeed;

fuzz_target!(|data: &str| {
    // A seed that parses must print back as exactly eight digits.
    if let Ok(seed) = NeighborSeed::parse(data) {
        let text = seed.to_string();
        assert_eq!(text.len(), 8);
        assert_eq!(NeighborSeed::parse(&text).ok(), Some(seed));
    }
});
