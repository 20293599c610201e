//! Network boot format generator for a BlackParrot core on the manycore mesh.
//!
//! This crate turns a BlackParrot memory image (and optionally a tile program)
//! into the ordered command list that loads and starts it:
//! 1. **Image:** Parsing of Verilog-style memory dumps into word images.
//! 2. **Translation:** The vcache DRAM hash and the block-memory fallback layout.
//! 3. **Boot:** The fixed-order boot state machine with its fence barriers.
//! 4. **Tiles:** Manycore tile helpers and the tile program loader.
//! 5. **Output:** NBF text rendering and run statistics.

/// Common types, constants and errors.
pub mod common;
/// Run configuration (defaults, JSON structures, validation).
pub mod config;
/// Memory images and the memory-dump parser.
pub mod image;
/// Derived coordinates and hash field widths.
pub mod topology;
/// DRAM address translation.
pub mod translate;
/// Boot commands, scripts and the boot sequencer.
pub mod boot;
/// Manycore tile helpers and tile program loading.
pub mod tile;
/// NBF text output.
pub mod writer;
/// Boot script statistics.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Boot script entry point with the stock tile helpers.
pub use crate::boot::generate;
/// Boot script types.
pub use crate::boot::{BootCommand, BootScript, BootSequencer, BootStage, ImageSource};
/// Umbrella error type.
pub use crate::common::NbfError;
