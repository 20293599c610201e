//! Memory-dump parser.
//!
//! The input is the Verilog-style hex dump produced for the BlackParrot
//! program:
//!
//! ```text
//! @00000000
//! 13 05 00 00 93 05
//! 00 00
//! ```
//!
//! An `@` line moves the current word; every other line carries byte tokens,
//! least-significant byte first, two hex digits each. Four tokens make one word and a word may span
//! lines. A partial word left at the end of an `@` block is zero-extended.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::MemoryImage;
use crate::common::ParseError;
use crate::common::constants::WORD_BYTES;
use crate::config::AtAddressing;

/// Little-endian word accumulator.
#[derive(Debug, Default)]
struct WordAccumulator {
    bytes: [u8; 4],
    count: usize,
}

impl WordAccumulator {
    /// Adds the next (more significant) byte; returns the word when complete.
    fn push(&mut self, byte: u8) -> Option<u32> {
        self.bytes[self.count] = byte;
        self.count += 1;
        if self.count == self.bytes.len() {
            Some(self.take())
        } else {
            None
        }
    }

    /// Returns the partial word, zero-extended, if any bytes are pending.
    fn flush(&mut self) -> Option<u32> {
        (self.count > 0).then(|| self.take())
    }

    fn take(&mut self) -> u32 {
        let word = u32::from_le_bytes(self.bytes);
        *self = Self::default();
        word
    }
}

/// Parser state for one image.
struct ImageBuilder {
    image: MemoryImage,
    base: u64,
    addressing: AtAddressing,
    /// Next word to store; `None` once the last word address has been used.
    word_index: Option<u64>,
    acc: WordAccumulator,
}

impl ImageBuilder {
    fn new(base: u64, addressing: AtAddressing) -> Self {
        Self {
            image: MemoryImage::new(),
            base,
            addressing,
            word_index: Some(0),
            acc: WordAccumulator::default(),
        }
    }

    fn store(&mut self, line: usize, word: u32) -> Result<(), ParseError> {
        let addr = self
            .word_index
            .and_then(|index| self.base.checked_add(index))
            .ok_or(ParseError::AddressOverflow { line })?;
        let _ = self.image.insert(addr, word);
        self.word_index = self.word_index.and_then(|index| index.checked_add(1));
        Ok(())
    }

    fn end_block(&mut self, line: usize) -> Result<(), ParseError> {
        match self.acc.flush() {
            Some(word) => self.store(line, word),
            None => Ok(()),
        }
    }

    fn set_address(&mut self, line: usize, text: &str) -> Result<(), ParseError> {
        let addr = u64::from_str_radix(text, 16).map_err(|_| ParseError::BadAddress {
            line,
            text: text.to_string(),
        })?;
        self.end_block(line)?;
        self.word_index = Some(match self.addressing {
            AtAddressing::Byte => addr / WORD_BYTES,
            AtAddressing::Word => addr,
        });
        Ok(())
    }

    fn push_tokens(&mut self, line: usize, text: &str) -> Result<(), ParseError> {
        for token in text.split_whitespace() {
            let byte = parse_byte(token).ok_or_else(|| ParseError::BadToken {
                line,
                token: token.to_string(),
            })?;
            if let Some(word) = self.acc.push(byte) {
                self.store(line, word)?;
            }
        }
        Ok(())
    }

    /// `line` is the last line of the input; a pending partial word belongs to it.
    fn finish(mut self, line: usize) -> Result<MemoryImage, ParseError> {
        self.end_block(line)?;
        Ok(self.image)
    }
}

/// Exactly two hex digits.
fn parse_byte(token: &str) -> Option<u8> {
    if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(token, 16).ok()
}

/// Parses a memory dump held in memory.
///
/// # Arguments
///
/// * `text` - The dump.
/// * `base` - Word address added to every stored word.
/// * `addressing` - Unit of the `@` addresses.
///
/// # Errors
///
/// Returns [`ParseError::BadToken`] or [`ParseError::BadAddress`] on the first
/// malformed line, and [`ParseError::AddressOverflow`] if a word would be stored
/// past the end of the address space.
pub fn parse_mem_str(
    text: &str,
    base: u64,
    addressing: AtAddressing,
) -> Result<MemoryImage, ParseError> {
    let mut builder = ImageBuilder::new(base, addressing);
    let mut last_line = 0;
    for (idx, raw) in text.lines().enumerate() {
        last_line = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(addr) = line.strip_prefix('@') {
            builder.set_address(idx + 1, addr.trim())?;
        } else {
            builder.push_tokens(idx + 1, line)?;
        }
    }
    builder.finish(last_line)
}

/// Reads and parses a memory dump file.
///
/// The whole file is read before parsing starts.
///
/// # Errors
///
/// Returns [`ParseError::Io`] if the file cannot be read, otherwise the errors
/// of [`parse_mem_str`].
pub fn read_mem_file(
    path: impl AsRef<Path>,
    base: u64,
    addressing: AtAddressing,
) -> Result<MemoryImage, ParseError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = parse_mem_str(&text, base, addressing)?;
    debug!(path = %path.display(), words = image.len(), "parsed memory image");
    Ok(image)
}
