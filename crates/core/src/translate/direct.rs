//! Block-memory DRAM layout.
//!
//! With DRAM disabled each vcache holds `bank_capacity` consecutive offsets.
//! Banks `0..num_tiles_x` are the top row of the pod, banks
//! `num_tiles_x..2 * num_tiles_x` the bottom row; nothing else is backed.

use super::DramMap;
use crate::common::{Coord, PhysicalLocation};
use crate::topology::DerivedTopology;

/// DRAM layout of the non-hashed (DRAM disabled) mode.
#[derive(Clone, Debug)]
pub struct BlockMemMap {
    capacity: u64,
    num_tiles_x: u32,
    num_tiles_y: u32,
}

impl BlockMemMap {
    /// Creates the map for a topology.
    pub const fn new(topology: &DerivedTopology) -> Self {
        Self {
            capacity: if topology.bank_capacity == 0 { 1 } else { topology.bank_capacity },
            num_tiles_x: topology.num_tiles_x,
            num_tiles_y: topology.num_tiles_y,
        }
    }

    /// Offsets held by one bank.
    pub const fn bank_capacity(&self) -> u64 {
        self.capacity
    }
}

impl DramMap for BlockMemMap {
    fn name(&self) -> &'static str {
        "block-mem"
    }

    fn locate(&self, offset: u64, pod: Coord) -> Option<PhysicalLocation> {
        let bank = offset / self.capacity;
        let epa = offset % self.capacity;
        let cols = u64::from(self.num_tiles_x);
        if bank >= 2 * cols {
            return None;
        }
        let x = pod.x.checked_add((bank % cols) as u32)?;
        let y = if bank < cols {
            pod.y.checked_sub(1)?
        } else {
            pod.y.checked_add(self.num_tiles_y)?
        };
        Some(PhysicalLocation::new(x, y, epa))
    }
}
