//! # Common Helper Tests
//!
//! Bit selection, ceiling log2, coordinate types and error messages.

use nbfgen_core::common::{
    ConfigError, Coord, NbfError, ParseError, PhysicalLocation, clog2, is_power_of_two,
    select_bits,
};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case(1, 0)]
#[case(2, 1)]
#[case(3, 2)]
#[case(4, 2)]
#[case(5, 3)]
#[case(16, 4)]
#[case(32, 5)]
#[case(33, 6)]
fn clog2_rounds_up(#[case] n: u64, #[case] expected: u32) {
    assert_eq!(clog2(n), expected);
}

#[test]
fn power_of_two_detection() {
    for n in [1u64, 2, 4, 8, 16, 1 << 20] {
        assert!(is_power_of_two(n), "{n}");
    }
    for n in [0u64, 3, 5, 6, 12, 24] {
        assert!(!is_power_of_two(n), "{n}");
    }
}

#[test]
fn select_bits_extracts_fields() {
    assert_eq!(select_bits(0xDEAD_BEEF, 0, 8), 0xEF);
    assert_eq!(select_bits(0xDEAD_BEEF, 8, 8), 0xBE);
    assert_eq!(select_bits(0xDEAD_BEEF, 28, 4), 0xD);
    assert_eq!(select_bits(0xDEAD_BEEF, 4, 0), 0);
}

proptest! {
    #[test]
    fn clog2_is_tight(n in 2u64..(1 << 40)) {
        let k = clog2(n);
        prop_assert!(1u64 << k >= n);
        prop_assert!(1u64 << (k - 1) < n);
    }

    #[test]
    fn select_bits_splits_and_rejoins(value in any::<u32>(), low in 0u32..32) {
        let value = u64::from(value);
        let lo = select_bits(value, 0, low);
        let hi = select_bits(value, low, 32 - low);
        prop_assert_eq!(lo | (hi << low), value);
    }
}

#[test]
fn coord_offset_and_display() {
    let c = Coord::new(16, 8).offset(3, 1);
    assert_eq!(c, Coord::new(19, 9));
    assert_eq!(c.to_string(), "(19, 9)");
}

#[test]
fn physical_location_accessors() {
    let loc = PhysicalLocation::new(16, 7, 0x40);
    assert_eq!(loc.x(), 16);
    assert_eq!(loc.y(), 7);
    assert_eq!(loc.coord, Coord::new(16, 7));
}

#[test]
fn unsupported_hash_message_names_the_column_count() {
    let err = NbfError::from(ConfigError::UnsupportedHash { num_tiles_x: 3 });
    let msg = err.to_string();
    assert!(msg.contains("hash function not supported"), "{msg}");
    assert!(msg.contains("num_tiles_x = 3"), "{msg}");
}

#[test]
fn bad_token_message_carries_line_and_token() {
    let err = ParseError::BadToken {
        line: 7,
        token: "GG".to_string(),
    };
    assert_eq!(err.to_string(), "line 7: malformed byte token 'GG'");
}

#[test]
fn config_file_message_names_the_path() {
    let err = NbfError::ConfigFile {
        path: "machine.json".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    };
    assert_eq!(err.to_string(), "could not load configuration 'machine.json': missing");
}
