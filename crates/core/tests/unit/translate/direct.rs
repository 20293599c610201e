//! # Block-Memory Layout Tests

use nbfgen_core::common::{Coord, PhysicalLocation};
use nbfgen_core::topology::derive_coordinates;
use nbfgen_core::translate::{BlockMemMap, DramMap};
use rstest::rstest;

use crate::common::harness::small_block_mem_config;

const POD: Coord = Coord::new(16, 8);

fn map() -> BlockMemMap {
    BlockMemMap::new(&derive_coordinates(&small_block_mem_config()))
}

#[test]
fn test_capacity_is_ways_sets_block() {
    assert_eq!(map().bank_capacity(), 2 * 8 * 4);
}

#[rstest]
#[case::first_word(0, PhysicalLocation::new(16, 7, 0))]
#[case::end_of_first_bank(63, PhysicalLocation::new(16, 7, 63))]
#[case::second_bank(64, PhysicalLocation::new(17, 7, 0))]
#[case::last_top_bank(3 * 64 + 5, PhysicalLocation::new(19, 7, 5))]
#[case::first_bottom_bank(4 * 64, PhysicalLocation::new(16, 10, 0))]
#[case::last_bottom_bank(8 * 64 - 1, PhysicalLocation::new(19, 10, 63))]
fn test_bank_placement(#[case] offset: u64, #[case] expected: PhysicalLocation) {
    assert_eq!(map().locate(offset, POD), Some(expected));
}

#[test]
fn test_beyond_both_rows_is_unmapped() {
    assert_eq!(map().locate(8 * 64, POD), None);
    assert_eq!(map().locate(u64::from(u32::MAX), POD), None);
}

#[test]
fn test_bank_past_last_column_is_unmapped() {
    let far = Coord::new(u32::MAX, u32::MAX - 1);
    assert_eq!(map().locate(64, far), None);
    assert_eq!(map().locate(4 * 64, far), None);
    assert_eq!(map().locate(0, far), Some(PhysicalLocation::new(u32::MAX, u32::MAX - 2, 0)));
}
