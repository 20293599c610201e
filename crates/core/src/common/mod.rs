//! Common types shared by every stage of the generator.
//!
//! This module provides:
//! 1. **Address Types:** Mesh coordinates and physical locations.
//! 2. **Bit Utilities:** Field extraction and ceiling log2.
//! 3. **Constants:** The manycore and BlackParrot address maps.
//! 4. **Error Handling:** Configuration, parse and program errors.

/// Coordinate and physical location types.
pub mod addr;

/// Bit-field extraction and logarithm helpers.
pub mod bits;

/// Fixed address-map constants.
pub mod constants;

/// Error types.
pub mod error;

pub use addr::{Coord, PhysicalLocation};
pub use bits::{clog2, is_power_of_two, select_bits};
pub use error::{ConfigError, NbfError, ParseError, ProgramError};
