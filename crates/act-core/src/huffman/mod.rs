//! Huffman codec with a self-describing `HUFF` container.
//!
//! Layout (integers little-endian):
//!
//! | Offset | Size | Field |
//! |---|---|---|
//! | 0 | 4 | Magic `"HUFF"` |
//! | 4 | 4 | Uncompressed length; 0 means the file ends here |
//! | 8 | bit-packed | For each byte value 0..=255: 8-bit code length, then the code bits if nonzero |
//! | after table | bit-packed | Codes of the payload bytes, in order |
//!
//! Bits are packed LSB-first and codes are emitted root-to-leaf. The last
//! byte is zero-padded.

mod bit_io;
mod code;
mod decode_tree;

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::{debug, debug_span, warn};

use crate::settings::settings;
use bit_io::{BitReader, BitWriter};
use code::{histogram, CodeTable};
use decode_tree::DecodeTree;

pub const MAGIC: &[u8; 4] = b"HUFF";
pub const HEADER_SIZE: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum HuffmanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected HUFF)")]
    InvalidMagic,

    #[error("payload of {0} bytes exceeds the 4 GiB format limit")]
    PayloadTooLarge(usize),

    #[error("requested length {requested} exceeds the {available} bytes given")]
    InvalidLength { requested: usize, available: usize },

    #[error("out of memory reserving {0} bytes")]
    OutOfMemory(usize),

    #[error("unexpected end of compressed data")]
    UnexpectedEof,

    #[error("corrupt code table")]
    CorruptTree,

    #[error("corrupt compressed stream")]
    CorruptStream,
}

/// How much of the input buffer to compress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadLen {
    /// The first `n` bytes.
    Exact(usize),
    /// Up to the first NUL byte, or the whole buffer if there is none.
    UntilNul,
}

impl PayloadLen {
    fn apply(self, data: &[u8]) -> Result<&[u8], HuffmanError> {
        match self {
            PayloadLen::Exact(n) => data.get(..n).ok_or(HuffmanError::InvalidLength {
                requested: n,
                available: data.len(),
            }),
            PayloadLen::UntilNul => {
                let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
                Ok(&data[..end])
            }
        }
    }
}

/// Compress `data` into `writer`, returning the writer once flushed.
pub fn encode<W: Write>(writer: W, data: &[u8]) -> Result<W, HuffmanError> {
    let _span = debug_span!("huffman_encode", len = data.len()).entered();
    let len = u32::try_from(data.len()).map_err(|_| HuffmanError::PayloadTooLarge(data.len()))?;

    let mut out = BitWriter::new(writer, settings().codec.buffer_size);
    out.write_bytes(MAGIC)?;
    out.write_bytes(&len.to_le_bytes())?;
    if data.is_empty() {
        return Ok(out.finish()?);
    }

    let table = CodeTable::build(&histogram(data));
    debug!(symbols = table.symbol_count(), "built code table");

    for code in table.iter() {
        out.write_bits(u64::from(code.len()), 8)?;
        out.write_code(code)?;
    }
    for &b in data {
        out.write_code(table.get(b))?;
    }
    Ok(out.finish()?)
}

/// Decompress one `HUFF` container from `reader`.
pub fn decode<R: Read>(reader: R) -> Result<Vec<u8>, HuffmanError> {
    let _span = debug_span!("huffman_decode").entered();
    let mut input = BitReader::new(reader, settings().codec.buffer_size);

    let mut header = [0u8; HEADER_SIZE];
    for b in header.iter_mut() {
        *b = match input.read_bits(8) {
            Ok(v) => v as u8,
            Err(HuffmanError::UnexpectedEof) => return Err(HuffmanError::InvalidHeader),
            Err(e) => return Err(e),
        };
    }
    if &header[..4] != MAGIC {
        return Err(HuffmanError::InvalidMagic);
    }
    let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
    debug!(len, "read header");
    if len == 0 {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| HuffmanError::OutOfMemory(len))?;

    let tree = DecodeTree::read_from(&mut input).inspect_err(|e| warn!(%e, "bad code table"))?;
    for _ in 0..len {
        let symbol = tree
            .decode_symbol(&mut input)
            .inspect_err(|e| warn!(%e, decoded = out.len(), "bad payload"))?;
        out.push(symbol);
    }
    Ok(out)
}

/// In-memory form of [`encode`].
pub fn to_bytes(data: &[u8]) -> Result<Vec<u8>, HuffmanError> {
    encode(Vec::new(), data)
}

/// In-memory form of [`decode`].
pub fn from_bytes(bytes: &[u8]) -> Result<Vec<u8>, HuffmanError> {
    decode(bytes)
}

/// Compress `data` into a new file at `path`.
///
/// Not atomic: a failure part-way leaves a truncated file behind.
pub fn write(path: &Path, data: &[u8]) -> Result<(), HuffmanError> {
    write_with_len(path, data, PayloadLen::Exact(data.len()))
}

/// Compress `data` up to its first NUL byte.
pub fn write_terminated(path: &Path, data: &[u8]) -> Result<(), HuffmanError> {
    write_with_len(path, data, PayloadLen::UntilNul)
}

pub fn write_with_len(path: &Path, data: &[u8], len: PayloadLen) -> Result<(), HuffmanError> {
    let payload = len.apply(data)?;
    let file = File::create(path)?;
    encode(file, payload)?;
    debug!(path = %path.display(), len = payload.len(), "wrote compressed file");
    Ok(())
}

/// Decompress the file at `path`.
pub fn read(path: &Path) -> Result<Vec<u8>, HuffmanError> {
    let file = File::open(path)?;
    decode(file)
}
