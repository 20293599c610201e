//! DRAM address translation.
//!
//! Maps a word address of the manycore DRAM window onto the vcache bank that
//! backs it. Two layouts exist and one is picked per run:
//!
//! - `HashedMap`: DRAM enabled; addresses are interleaved across the top and
//!   bottom vcache rows by the hardware hash.
//! - `BlockMemMap`: DRAM disabled; every vcache is a flat block memory and the
//!   window is laid out bank after bank.

/// Hardware address hash.
pub mod hashed;

/// Flat block-memory layout.
pub mod direct;

pub use direct::BlockMemMap;
pub use hashed::{HashedAddress, HashedMap};

use tracing::warn;

use crate::common::constants::DRAM_EVA_BASE_WORD;
use crate::common::{ConfigError, Coord, PhysicalLocation, is_power_of_two};
use crate::image::MemoryImage;
use crate::topology::DerivedTopology;

/// Layout of the DRAM window over the vcache banks of one pod.
pub trait DramMap: Send + Sync {
    /// Short name of the layout, used in logs.
    fn name(&self) -> &'static str;

    /// Locates a DRAM offset (words from the start of the window) for the pod
    /// whose first tile is at `pod`.
    ///
    /// # Returns
    ///
    /// The destination bank and EPA, or `None` if the offset falls outside
    /// the modeled window.
    fn locate(&self, offset: u64, pod: Coord) -> Option<PhysicalLocation>;
}

/// Result of translating one image word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Translation {
    /// The word lands in a vcache bank.
    Mapped(PhysicalLocation),
    /// The word lies outside the modeled DRAM window.
    OutOfRange,
}

/// Writes produced by striping an image over one pod.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stripe {
    /// Located writes in ascending source address order.
    pub writes: Vec<(PhysicalLocation, u32)>,
    /// Source word addresses that fell outside the window.
    pub out_of_range: Vec<u64>,
}

/// Translator selected once per run from the topology.
pub struct AddressTranslator {
    map: Box<dyn DramMap + Send + Sync>,
}

impl std::fmt::Debug for AddressTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressTranslator")
            .field("map", &self.map.name())
            .finish()
    }
}

impl AddressTranslator {
    /// Builds the translator for a topology.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedHash`] when DRAM hashing is enabled
    /// and the tile-column count is not a power of two.
    pub fn new(topology: &DerivedTopology) -> Result<Self, ConfigError> {
        let map: Box<dyn DramMap + Send + Sync> = if topology.dram_enabled {
            if !is_power_of_two(u64::from(topology.num_tiles_x)) {
                return Err(ConfigError::UnsupportedHash {
                    num_tiles_x: topology.num_tiles_x,
                });
            }
            Box::new(HashedMap::new(topology))
        } else {
            Box::new(BlockMemMap::new(topology))
        };
        Ok(Self { map })
    }

    /// Name of the selected layout.
    pub fn layout(&self) -> &'static str {
        self.map.name()
    }

    /// Translates a word address of the manycore EVA space.
    pub fn translate(&self, word_addr: u64, pod: Coord) -> Translation {
        word_addr
            .checked_sub(DRAM_EVA_BASE_WORD)
            .and_then(|offset| self.map.locate(offset, pod))
            .map_or(Translation::OutOfRange, Translation::Mapped)
    }

    /// Translates every word of `image` for one pod, in ascending address order.
    ///
    /// Out-of-range words are logged and collected; they never abort the run.
    pub fn stripe(&self, image: &MemoryImage, pod: Coord) -> Stripe {
        let mut stripe = Stripe::default();
        for (addr, value) in image {
            match self.translate(addr, pod) {
                Translation::Mapped(loc) => stripe.writes.push((loc, value)),
                Translation::OutOfRange => {
                    warn!(layout = self.layout(), "DRAM data out of range at {addr:#x}");
                    stripe.out_of_range.push(addr);
                }
            }
        }
        stripe
    }
}
