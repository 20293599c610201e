//! Hardware DRAM address hash.
//!
//! The vcache interleaving splits a DRAM offset into four contiguous fields,
//! least significant first:
//!
//! | field          | width                      | use                          |
//! |----------------|----------------------------|------------------------------|
//! | `block_offset` | `clog2(block_size)`        | kept in the EPA              |
//! | `column`       | `clog2(num_tiles_x)`       | vcache column in the pod     |
//! | `row`          | `clog2(2 * num_vcache_rows)` | parity picks top or bottom |
//! | `index`        | remaining bits             | EPA above the block offset   |
//!
//! Even rows go to the top vcaches (`pod_y - 1 - row / 2`), odd rows to the
//! bottom vcaches (`pod_y + num_tiles_y + row / 2`).

use super::DramMap;
use crate::common::{Coord, PhysicalLocation, select_bits};
use crate::topology::{DerivedTopology, HashFields};

/// A DRAM offset split into its hash fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashedAddress {
    /// Byte offset inside the cache block.
    pub block_offset: u64,
    /// Vcache column.
    pub column: u64,
    /// Vcache row selector.
    pub row: u64,
    /// Index inside the vcache.
    pub index: u64,
}

/// DRAM layout of the hashed (DRAM enabled) mode.
#[derive(Clone, Debug)]
pub struct HashedMap {
    fields: HashFields,
    num_tiles_y: u32,
}

impl HashedMap {
    /// Creates the map for a topology.
    ///
    /// The tile-column count must already be known to be a power of two.
    pub const fn new(topology: &DerivedTopology) -> Self {
        Self {
            fields: topology.fields,
            num_tiles_y: topology.num_tiles_y,
        }
    }

    /// Field widths in use.
    pub const fn fields(&self) -> HashFields {
        self.fields
    }

    /// Number of offsets the hash can address.
    pub const fn capacity(&self) -> u64 {
        1u64 << self.fields.total()
    }

    /// Splits an offset into its hash fields.
    pub const fn decompose(&self, offset: u64) -> HashedAddress {
        let f = &self.fields;
        HashedAddress {
            block_offset: select_bits(offset, 0, f.block),
            column: select_bits(offset, f.column_low(), f.column),
            row: select_bits(offset, f.row_low(), f.row),
            index: select_bits(offset, f.index_low(), f.index),
        }
    }

    /// Reassembles an offset from its hash fields.
    pub const fn compose(&self, addr: &HashedAddress) -> u64 {
        let f = &self.fields;
        addr.block_offset
            | (addr.column << f.column_low())
            | (addr.row << f.row_low())
            | (addr.index << f.index_low())
    }

    /// Row of the vcache selected by `row`, relative to a pod whose first tile
    /// row is `pod_y`.
    ///
    /// Returns `None` if a top vcache would sit above row zero, or a bottom
    /// vcache past the last representable row.
    pub const fn bank_y(&self, row: u64, pod_y: u32) -> Option<u32> {
        let half = (row / 2) as u32;
        if row % 2 == 0 {
            pod_y.checked_sub(1 + half)
        } else {
            match pod_y.checked_add(self.num_tiles_y) {
                Some(below) => below.checked_add(half),
                None => None,
            }
        }
    }
}

impl DramMap for HashedMap {
    fn name(&self) -> &'static str {
        "hashed"
    }

    fn locate(&self, offset: u64, pod: Coord) -> Option<PhysicalLocation> {
        if offset >= self.capacity() {
            return None;
        }
        let addr = self.decompose(offset);
        let y = self.bank_y(addr.row, pod.y)?;
        let epa = addr.block_offset | (addr.index << self.fields.block);
        let x = pod.x.checked_add(addr.column as u32)?;
        Some(PhysicalLocation::new(x, y, epa))
    }
}
