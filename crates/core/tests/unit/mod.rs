//! # Unit Tests
//!
//! Tests grouped by generator module, from the bit helpers up to the
//! complete boot script.

/// Bit helpers, coordinates and error messages.
pub mod common;






/// Manycore tile helpers and tile program splitting.
pub mod tile;
