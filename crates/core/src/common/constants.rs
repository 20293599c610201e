//! Fixed hardware constants.
//!
//! This module collects the address map constants shared by the translator,
//! the tile helpers and the boot sequencer. It includes:
//! 1. **Address windows:** DRAM and DMEM windows of the manycore EVA space.
//! 2. **BlackParrot registers:** Config-bus and bridge register offsets.
//! 3. **NBF sentinels:** The reserved coordinate used by fence and finish.

/// First word of the DRAM window in the manycore EVA space (byte `0x8000_0000`).
pub const DRAM_EVA_BASE_WORD: u64 = 0x2000_0000;

/// First byte of the DRAM window.
pub const DRAM_EVA_BASE_BYTE: u64 = DRAM_EVA_BASE_WORD << 2;

/// First byte of the tile data memory window.
pub const DMEM_BASE_BYTE: u64 = 0x1000;

/// Size of the tile data memory window in bytes.
pub const DMEM_SIZE_BYTES: u64 = 0x1000;

/// Bytes per image word.
pub const WORD_BYTES: u64 = 4;

/// Initial program counter of the BlackParrot core.
pub const BP_RESET_PC: u32 = 0x8000_0000;

/// BlackParrot config-bus register block.
pub mod bp_cfg {
    /// Base address of the config bus.
    pub const BASE: u64 = 0x2000;
    /// Core freeze.
    pub const FREEZE: u64 = BASE + 0x0008;
    /// Next program counter.
    pub const NPC: u64 = BASE + 0x0010;
    /// Host I/O mask.
    pub const HIO_MASK: u64 = BASE + 0x0038;
    /// Instruction cache mode.
    pub const ICACHE_MODE: u64 = BASE + 0x0208;
    /// Data cache mode.
    pub const DCACHE_MODE: u64 = BASE + 0x0408;
}

/// BlackParrot-to-manycore bridge register block.
pub mod bp_bridge {
    /// Base address of the bridge registers.
    pub const BASE: u64 = 0x4000;
    /// Offset of the BlackParrot image inside manycore DRAM.
    pub const DRAM_OFFSET: u64 = BASE;
    /// Pod that holds the BlackParrot image.
    pub const DRAM_POD: u64 = BASE + 0x0008;
    /// Coordinate of the host node.
    pub const HOST_CORD: u64 = BASE + 0x0018;
}

/// Reserved coordinate (all ones in the NBF x/y fields).
pub const NBF_RESERVED_CORD: u32 = 0xff;
