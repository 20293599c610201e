//! Mesh coordinates and network physical addresses.
//!
//! This module defines strong types for the two halves of a network physical
//! address (NPA) so tile coordinates and intra-node offsets are never mixed:
//! 1. **Coordinates:** `Coord` names a node on the mesh.
//! 2. **Locations:** `PhysicalLocation` is a coordinate plus an EPA.

use std::fmt;

/// A node coordinate on the mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Coord {
    /// Creates a coordinate.
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate offset by `(dx, dy)`.
    #[inline]
    pub const fn offset(self, dx: u32, dy: u32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A destination register or memory cell on the mesh.
///
/// The EPA (effective physical address) is the word offset inside the node at
/// `coord`; its meaning depends on the node type (tile CSR, icache, vcache
/// bank, BlackParrot config bus).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysicalLocation {
    /// Destination node.
    pub coord: Coord,
    /// Offset inside the destination node.
    pub epa: u64,
}

impl PhysicalLocation {
    /// Creates a location from raw coordinates and an EPA.
    #[inline]
    pub const fn new(x: u32, y: u32, epa: u64) -> Self {
        Self {
            coord: Coord::new(x, y),
            epa,
        }
    }

    /// Destination column.
    #[inline]
    pub const fn x(&self) -> u32 {
        self.coord.x
    }

    /// Destination row.
    #[inline]
    pub const fn y(&self) -> u32 {
        self.coord.y
    }
}

impl fmt::Display for PhysicalLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{:#x}", self.coord, self.epa)
    }
}
