//! Tile program loader.
//!
//! Reads the RISC-V ELF run by the manycore tile group and splits its
//! allocated sections into the two windows the boot script can reach:
//! 1. **DMEM:** Bytes `0x1000..0x2000`, loaded into every tile's data memory.
//! 2. **DRAM:** Bytes from `0x8000_0000`, loaded into the icaches and striped over the vcaches.
//!
//! Both images are keyed by word address (byte address / 4) and assembled
//! little-endian.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use object::{Object, ObjectSection, SectionKind};
use tracing::debug;

use crate::common::ProgramError;
use crate::common::constants::{DMEM_BASE_BYTE, DMEM_SIZE_BYTES, DRAM_EVA_BASE_BYTE, WORD_BYTES};
use crate::image::MemoryImage;

/// A tile program split into its DMEM and DRAM images.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileProgram {
    /// Entry point (byte address).
    pub entry: u64,
    /// Words in the DMEM window.
    pub dmem: MemoryImage,
    /// Words in the DRAM window.
    pub dram: MemoryImage,
}

impl TileProgram {
    /// Reads and splits an ELF file.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError::Io`] if the file cannot be read and
    /// [`ProgramError::Elf`] if it is not an ELF object.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProgramError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ProgramError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let program = Self::from_elf_bytes(&bytes)?;
        debug!(
            path = %path.display(),
            dmem_words = program.dmem.len(),
            dram_words = program.dram.len(),
            "loaded tile program"
        );
        Ok(program)
    }

    /// Splits an in-memory ELF image.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError::Elf`] if the bytes are not an ELF object.
    pub fn from_elf_bytes(bytes: &[u8]) -> Result<Self, ProgramError> {
        let file = object::File::parse(bytes)?;
        let mut words: BTreeMap<u64, u32> = BTreeMap::new();

        for section in file.sections() {
            if !is_loadable(section.kind()) || section.address() == 0 {
                continue;
            }
            let data = section.data()?;
            let base = section.address();
            for (offset, byte) in data.iter().enumerate() {
                let addr = base + offset as u64;
                let lane = (addr % WORD_BYTES) * 8;
                *words.entry(addr / WORD_BYTES).or_insert(0) |= u32::from(*byte) << lane;
            }
        }

        Ok(Self::from_words(file.entry(), words))
    }

    /// Splits a word map (word address to value) into the DMEM and DRAM images.
    pub fn from_words(entry: u64, words: impl IntoIterator<Item = (u64, u32)>) -> Self {
        let dmem_words = (DMEM_BASE_BYTE / WORD_BYTES)..((DMEM_BASE_BYTE + DMEM_SIZE_BYTES) / WORD_BYTES);
        let dram_base_word = DRAM_EVA_BASE_BYTE / WORD_BYTES;

        let mut program = Self {
            entry,
            ..Self::default()
        };
        for (word, value) in words {
            if dmem_words.contains(&word) {
                let _ = program.dmem.insert(word, value);
            } else if word >= dram_base_word {
                let _ = program.dram.insert(word, value);
            } else {
                debug!("tile program word {word:#x} is outside DMEM and DRAM");
            }
        }
        program
    }
}

/// Sections that occupy memory and carry initial contents.
const fn is_loadable(kind: SectionKind) -> bool {
    matches!(
        kind,
        SectionKind::Text
            | SectionKind::Data
            | SectionKind::ReadOnlyData
            | SectionKind::ReadOnlyString
            | SectionKind::Tls
    )
}
