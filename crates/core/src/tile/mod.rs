//! Manycore tile configuration.
//!
//! The boot sequencer does not know how tiles are programmed; it drives the
//! [`TileConfigurator`] trait once per pod and lets the implementation append
//! its own writes to the script. This module provides:
//! 1. **Interface:** The `TileConfigurator` trait.
//! 2. **Tile CSRs:** The EPA map of the tile control registers.
//! 3. **Manycore helpers:** `ManycoreTiles`, the stock implementation.
//! 4. **Program loading:** `TileProgram`, the ELF image run by the tile group.

/// Stock tile helpers for the manycore pod.
pub mod manycore;

/// Tile program loader.
pub mod program;

pub use manycore::ManycoreTiles;
pub use program::TileProgram;

use crate::boot::BootScript;
use crate::common::Coord;
use crate::translate::AddressTranslator;

/// Tile control registers (word EPAs inside a tile).
pub mod csr {
    /// Freeze; writing `0` releases the tile.
    pub const FREEZE: u64 = 0x2000;
    /// Tile group origin column.
    pub const TGO_X: u64 = 0x2001;
    /// Tile group origin row.
    pub const TGO_Y: u64 = 0x2002;
    /// Initial program counter.
    pub const PC_INIT: u64 = 0x2003;
    /// DRAM enable; writing `0` turns remote DRAM accesses into block-memory accesses.
    pub const DRAM_ENABLE: u64 = 0x2004;
}

/// Per-pod tile configuration driven by the boot sequencer.
///
/// Every method receives the coordinate of the pod's first tile and appends
/// its commands to `script`. Implementations must not emit fences: the fence
/// placement of a boot script is owned by the sequencer.
pub trait TileConfigurator {
    /// Coordinates of the tiles of the tile group in the pod.
    fn tile_group(&self, pod: Coord) -> Vec<Coord>;

    /// Writes the tile group origin into every tile of the group.
    fn configure_tile_group(&self, script: &mut BootScript, pod: Coord);

    /// Loads the instruction caches of the tile group.
    fn init_icache(&self, script: &mut BootScript, pod: Coord);

    /// Loads the data memories of the tile group.
    fn init_dmem(&self, script: &mut BootScript, pod: Coord);

    /// Seeds the program counter of every tile of the group.
    fn set_pc_init(&self, script: &mut BootScript, pod: Coord);

    /// Points every vcache of the pod at its DRAM side (west or east).
    ///
    /// `pod_column` is the pod's column index in the machine.
    fn init_vcache_wh_dest(&self, script: &mut BootScript, pod: Coord, pod_column: u32);

    /// Turns off DRAM accesses in every tile of the group.
    fn disable_dram(&self, script: &mut BootScript, pod: Coord);

    /// Initializes the vcache tags for block-memory operation.
    fn init_vcache(&self, script: &mut BootScript, pod: Coord);

    /// Stripes the tile program's DRAM sections over the pod.
    fn init_dram(&self, script: &mut BootScript, pod: Coord, translator: &AddressTranslator);
}
