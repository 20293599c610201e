//! Error types for boot script generation.
//!
//! Every failure in this crate is fatal to the run; the recoverable condition
//! (an image word outside the modeled DRAM window) is a warning, not an error.
//! The taxonomy is:
//! 1. **Configuration errors:** Topologies the address hash cannot express.
//! 2. **Parse errors:** Malformed memory images.
//! 3. **Program errors:** Tile program ELF files that cannot be loaded.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Topology configurations that cannot produce a boot script.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// DRAM hashing requires a power-of-two number of tile columns.
    #[error("hash function not supported for num_tiles_x = {num_tiles_x} (must be a power of two)")]
    UnsupportedHash {
        /// The rejected tile-column count.
        num_tiles_x: u32,
    },

    /// A geometry parameter that must be non-zero was zero.
    #[error("invalid geometry: {field} must be non-zero")]
    ZeroGeometry {
        /// Name of the offending configuration field.
        field: &'static str,
    },

    /// The EPA width cannot hold the addresses the generator emits.
    #[error("addr_width {addr_width} is outside the supported range 2..=32")]
    AddrWidth {
        /// The rejected width.
        addr_width: u32,
    },

    /// A coordinate field width is outside `1..=30`.
    #[error("nbf.{axis}_cord_width {width} is outside the supported range 1..=30")]
    CordWidth {
        /// `"x"` or `"y"`.
        axis: &'static str,
        /// The rejected width.
        width: u32,
    },

    /// The mesh extends past what the coordinate field can address.
    #[error("mesh {axis} coordinate {last} does not fit in {width} bits")]
    CoordinateRange {
        /// `"x"` or `"y"`.
        axis: &'static str,
        /// Largest coordinate the topology uses on this axis.
        last: u64,
        /// Configured field width.
        width: u32,
    },

    /// A value written to a 32-bit bridge register does not fit.
    #[error("{field} = {value:#x} does not fit in a 32-bit bridge register")]
    BridgeValue {
        /// Name of the offending configuration field.
        field: &'static str,
        /// The rejected value.
        value: u64,
    },

    /// The tile group does not fit inside a pod.
    #[error(
        "tile group {tg_dim_x}x{tg_dim_y} at ({tgo_x}, {tgo_y}) exceeds the {num_tiles_x}x{num_tiles_y} pod"
    )]
    TileGroupOutOfPod {
        /// Tile group origin column.
        tgo_x: u32,
        /// Tile group origin row.
        tgo_y: u32,
        /// Tile group width.
        tg_dim_x: u32,
        /// Tile group height.
        tg_dim_y: u32,
        /// Pod width.
        num_tiles_x: u32,
        /// Pod height.
        num_tiles_y: u32,
    },
}

/// Failures while reading a memory image.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The image file could not be read.
    #[error("could not read memory image '{}': {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A byte token was not exactly two hexadecimal digits.
    #[error("line {line}: malformed byte token '{token}'")]
    BadToken {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A word would be stored beyond the last word address.
    #[error("line {line}: word address overflows the address space")]
    AddressOverflow {
        /// 1-based line number.
        line: usize,
    },

    /// An `@` line did not carry a hexadecimal address.
    #[error("line {line}: malformed address '{text}'")]
    BadAddress {
        /// 1-based line number.
        line: usize,
        /// The text after `@`.
        text: String,
    },
}

/// Failures while loading a tile program ELF.
#[derive(Debug, Error)]
pub enum ProgramError {
    /// The program file could not be read.
    #[error("could not read tile program '{}': {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file is not a loadable ELF object.
    #[error("tile program is not a valid ELF file: {0}")]
    Elf(#[from] object::read::Error),
}

/// Umbrella error for a boot script generation run.
#[derive(Debug, Error)]
pub enum NbfError {
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// See [`ParseError`].
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// See [`ProgramError`].
    #[error(transparent)]
    Program(#[from] ProgramError),
    /// The configuration file could not be read or parsed.
    #[error("could not load configuration '{}': {source}", path.display())]
    ConfigFile {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O or JSON error.
        #[source]
        source: io::Error,
    },
    /// The rendered script could not be written out.
    #[error("could not write boot script: {0}")]
    Output(#[from] io::Error),
}
