//! Program memory images.
//!
//! A [`MemoryImage`] maps word addresses to 32-bit values. It is built once
//! (by the text parser or the tile program loader), never mutated afterwards,
//! and always iterated in ascending address order so generated scripts are
//! reproducible.

use std::collections::BTreeMap;
use std::collections::btree_map;

/// Text memory-dump parser.
pub mod parser;

pub use parser::{parse_mem_str, read_mem_file};

/// Word-addressed program image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryImage {
    words: BTreeMap<u64, u32>,
}

impl MemoryImage {
    /// Creates an empty image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` at `word_addr`, returning the previous value if any.
    pub fn insert(&mut self, word_addr: u64, value: u32) -> Option<u32> {
        self.words.insert(word_addr, value)
    }

    /// Value stored at `word_addr`.
    pub fn get(&self, word_addr: u64) -> Option<u32> {
        self.words.get(&word_addr).copied()
    }

    /// Number of stored words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if no word is stored.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates `(word_addr, value)` pairs in ascending address order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.words.iter(),
        }
    }

    /// Lowest and highest stored word address.
    pub fn span(&self) -> Option<(u64, u64)> {
        let first = self.words.keys().next()?;
        let last = self.words.keys().next_back()?;
        Some((*first, *last))
    }
}

/// Ascending iterator over a [`MemoryImage`].
#[derive(Debug)]
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, u64, u32>,
}

impl Iterator for Iter<'_> {
    type Item = (u64, u32);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(a, v)| (*a, *v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a MemoryImage {
    type Item = (u64, u32);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(u64, u32)> for MemoryImage {
    fn from_iter<I: IntoIterator<Item = (u64, u32)>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

impl Extend<(u64, u32)> for MemoryImage {
    fn extend<I: IntoIterator<Item = (u64, u32)>>(&mut self, iter: I) {
        self.words.extend(iter);
    }
}
