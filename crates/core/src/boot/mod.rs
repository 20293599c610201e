//! BlackParrot boot sequence.
//!
//! This module builds the ordered command list that loads and starts a
//! BlackParrot program on the manycore. It provides:
//! 1. **Commands:** `BootCommand` and the `BootStage` enumeration.
//! 2. **Scripts:** `BootScript`, the in-memory command list with stage ranges.
//! 3. **Sequencing:** `BootSequencer`, the fixed-order state machine.
//! 4. **Entry point:** `generate`, which wires the stock tile helpers in.

/// Boot commands and stages.
pub mod command;

/// In-memory boot script.
pub mod script;

/// Boot sequence state machine.
pub mod sequencer;

pub use command::{BootCommand, BootStage};
pub use script::BootScript;
pub use sequencer::{BootSequencer, ImageSource};

use crate::common::NbfError;
use crate::config::Config;
use crate::tile::{ManycoreTiles, TileProgram};
use crate::topology::derive_coordinates;

/// Generates the boot script of a run with the stock manycore tile helpers.
///
/// # Errors
///
/// Returns [`NbfError::Config`] before any command is built if the
/// configuration is rejected, and [`NbfError::Parse`] if the memory image is
/// malformed.
pub fn generate(
    config: &Config,
    image: &ImageSource,
    program: Option<TileProgram>,
) -> Result<BootScript, NbfError> {
    config.validate()?;
    let topology = derive_coordinates(config);
    let tiles = ManycoreTiles::new(config, &topology, program);
    let sequencer = BootSequencer::new(config, topology, &tiles)?;
    sequencer.run(image)
}
