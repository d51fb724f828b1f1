//! Word-frequency dictionary with ranked prefix completion.
//!
//! Words are Latin-1 byte strings folded to lowercase before storage. The
//! dictionary persists itself as "weighted text" (every word repeated once
//! per occurrence, newline-terminated) compressed with the Huffman codec;
//! re-importing the text recovers the exact frequencies by counting repeats.

#[cfg(test)]
mod tests;

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, debug_span};

use crate::huffman::{self, HuffmanError};
use crate::latin1;
use crate::tstree::{NodeId, TernarySearchTree, TreeError};

/// Shorter words are rejected by [`Dictionary::add`].
pub const MIN_WORD_LEN: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("word too short ({0} bytes, at least {MIN_WORD_LEN} required)")]
    WordTooShort(usize),

    #[error("byte 0x{0:02X} is not a letter")]
    NotALetter(u8),

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("codec error: {0}")]
    Codec(#[from] HuffmanError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("out of memory reserving {0} bytes")]
    OutOfMemory(usize),
}

/// One ranked completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub word: Vec<u8>,
    pub count: u32,
}

impl Completion {
    /// The word as a Rust string (Latin-1 decoded).
    pub fn text(&self) -> String {
        latin1::decode(&self.word)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    tree: TernarySearchTree,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.tree.key_count()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Record one occurrence of `word`. Every byte must be a Latin-1 letter,
    /// the same alphabet [`import_weighted_text`](Self::import_weighted_text)
    /// splits on.
    pub fn add(&mut self, word: &[u8]) -> Result<NodeId, DictError> {
        if word.len() < MIN_WORD_LEN {
            return Err(DictError::WordTooShort(word.len()));
        }
        if let Some(&byte) = word.iter().find(|&&b| !latin1::is_alpha(b)) {
            return Err(DictError::NotALetter(byte));
        }
        let mut folded = word.to_vec();
        latin1::fold_lowercase(&mut folded);
        Ok(self.tree.insert(&folded)?)
    }

    /// How many times `word` was added (case-insensitive), 0 if never.
    pub fn frequency(&self, word: &[u8]) -> u32 {
        let mut folded = word.to_vec();
        latin1::fold_lowercase(&mut folded);
        self.tree
            .get(&folded)
            .map_or(0, |id| self.tree.node(id).count())
    }

    /// The `limit` most frequent words starting with `prefix`, most frequent
    /// first. Equal frequencies keep traversal order. `limit == 0` means no
    /// limit. An unknown prefix yields an empty list.
    pub fn most_used(
        &self,
        prefix: Option<&[u8]>,
        limit: usize,
    ) -> Result<Vec<Completion>, DictError> {
        let mut folded = prefix.unwrap_or_default().to_vec();
        latin1::fold_lowercase(&mut folded);
        let _span = debug_span!("most_used", prefix_len = folded.len(), limit).entered();

        let limit = if limit == 0 {
            self.tree.key_count() + 1
        } else {
            limit
        };
        let iter = match self.tree.keys_with_prefix(&folded) {
            Ok(iter) => iter,
            Err(TreeError::PrefixNotFound) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        // Kept sorted by descending count.
        let mut ranked: Vec<(NodeId, u32)> = Vec::new();
        let reserve = limit.min(self.tree.key_count());
        ranked
            .try_reserve(reserve)
            .map_err(|_| DictError::OutOfMemory(reserve))?;
        for id in iter {
            let count = self.tree.node(id).count();
            let pos = ranked.partition_point(|&(_, c)| c >= count);
            if pos < limit {
                if ranked.len() == limit {
                    ranked.pop();
                }
                ranked.insert(pos, (id, count));
            }
        }

        let mut result = Vec::new();
        result
            .try_reserve_exact(ranked.len())
            .map_err(|_| DictError::OutOfMemory(ranked.len()))?;
        for (id, count) in ranked {
            result.push(Completion {
                word: self.tree.node_key(id),
                count,
            });
        }
        debug!(found = result.len());
        Ok(result)
    }

    /// Every word repeated once per recorded occurrence, each followed by
    /// `\n`.
    pub fn export_weighted_text(&self) -> Result<Vec<u8>, DictError> {
        let _span = debug_span!("export_weighted_text", words = self.len()).entered();

        let mut total: usize = 0;
        for id in self.tree.keys_with_prefix(b"")? {
            let node = self.tree.node(id);
            total = (node.depth() + 1)
                .checked_mul(node.count() as usize)
                .and_then(|n| total.checked_add(n))
                .ok_or(DictError::OutOfMemory(usize::MAX))?;
        }

        let mut out = Vec::new();
        out.try_reserve_exact(total)
            .map_err(|_| DictError::OutOfMemory(total))?;
        for id in self.tree.keys_with_prefix(b"")? {
            let node = self.tree.node(id);
            let start = out.len();
            out.resize(start + node.depth(), 0);
            self.tree.node_key_into(id, &mut out[start..]);
            out.push(b'\n');
            let end = out.len();
            for _ in 1..node.count() {
                out.extend_from_within(start..end);
            }
        }
        debug!(bytes = out.len());
        Ok(out)
    }

    /// Add every alphabetic run of at least two letters found in `text`.
    /// Inverse of [`export_weighted_text`](Self::export_weighted_text).
    pub fn import_weighted_text(&mut self, text: &[u8]) -> Result<(), DictError> {
        let added = self.add_text(text)?;
        debug!(added, "imported weighted text");
        Ok(())
    }

    /// Learn the words of free-form text. Single letters, digits and
    /// punctuation are skipped. Returns the number of words added.
    pub fn add_text(&mut self, text: &[u8]) -> Result<usize, DictError> {
        let mut added = 0;
        for word in words(text) {
            self.add(word)?;
            added += 1;
        }
        Ok(added)
    }

    /// Compress the vocabulary to `path`. Writes a sibling `.tmp` file first
    /// and renames it over `path`, so a failed save leaves the old file.
    pub fn save(&self, path: &Path) -> Result<(), DictError> {
        let text = self.export_weighted_text()?;
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        huffman::write(&tmp, &text)?;
        fs::rename(&tmp, path)?;
        debug!(path = %path.display(), words = self.len(), "saved dictionary");
        Ok(())
    }

    /// Load a dictionary file, returning an empty dictionary if the file
    /// doesn't exist.
    pub fn open(path: &Path) -> Result<Self, DictError> {
        let mut dict = Self::new();
        match huffman::read(path) {
            Ok(text) => dict.import_weighted_text(&text)?,
            Err(HuffmanError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(dict)
    }

    /// Add the words stored in a dictionary file to this one.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), DictError> {
        let text = huffman::read(path)?;
        self.import_weighted_text(&text)
    }
}

/// Maximal alphabetic runs of at least [`MIN_WORD_LEN`] bytes.
fn words(text: &[u8]) -> impl Iterator<Item = &[u8]> {
    text.split(|&b| !latin1::is_alpha(b))
        .filter(|run| run.len() >= MIN_WORD_LEN)
}
