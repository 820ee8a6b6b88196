//! Fuzz target for `k=v;k=v` payload parsing.
//!
//! Anything that parses must format back into a payload that parses to the
//! same map.

#![no_main]
use caliper_measure::key_value::{format, parse_line_data, parse_pairs};
use libfuzzer_sys::fuzz_target;

const MAX_INPUT_SIZE: usize = 16 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_SIZE {
        return;
    }
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(pairs) = parse_pairs(s) {
        for (key, value) in &pairs {
            assert!(!key.contains(';') && !value.contains(';'));
        }
    }

    if let Ok(lines) = parse_line_data(s) {
        let formatted = format(&lines);
        let reparsed = parse_line_data(&formatted).expect("formatted line data must parse");
        assert_eq!(lines, reparsed, "round trip through {formatted:?}");
    }
});
