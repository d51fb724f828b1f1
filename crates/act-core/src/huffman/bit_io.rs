//! Buffered bit-granular reader and writer.
//!
//! Bits are packed LSB-first: the first bit written lands in bit 0 of the
//! first byte. Whole bytes move through a fixed-size file buffer that is
//! flushed or refilled with block I/O only when full or exhausted.

use std::io::{self, Read, Write};

use super::code::Code;
use super::HuffmanError;

fn mask(n: u32) -> u64 {
    (1u64 << n) - 1
}

pub(super) struct BitWriter<W: Write> {
    inner: W,
    buf: Vec<u8>,
    capacity: usize,
    /// Pending bits, lowest first.
    acc: u64,
    nbits: u32,
}

impl<W: Write> BitWriter<W> {
    pub(super) fn new(inner: W, capacity: usize) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(capacity),
            capacity,
            acc: 0,
            nbits: 0,
        }
    }

    /// Append the low `n` bits of `value` (`n <= 32`).
    pub(super) fn write_bits(&mut self, value: u64, n: u32) -> io::Result<()> {
        debug_assert!(n <= 32);
        self.acc |= (value & mask(n)) << self.nbits;
        self.nbits += n;
        while self.nbits >= 8 {
            self.push_byte(self.acc as u8)?;
            self.acc >>= 8;
            self.nbits -= 8;
        }
        Ok(())
    }

    pub(super) fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        for &b in bytes {
            self.write_bits(u64::from(b), 8)?;
        }
        Ok(())
    }

    /// Append a code root-to-leaf.
    pub(super) fn write_code(&mut self, code: &Code) -> io::Result<()> {
        for (chunk, n) in code.chunks() {
            self.write_bits(u64::from(chunk), n)?;
        }
        Ok(())
    }

    /// Pad the last partial byte with zeros, flush everything and hand back
    /// the underlying writer.
    pub(super) fn finish(mut self) -> io::Result<W> {
        if self.nbits > 0 {
            self.push_byte(self.acc as u8)?;
            self.acc = 0;
            self.nbits = 0;
        }
        self.flush_buffer()?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn push_byte(&mut self, byte: u8) -> io::Result<()> {
        self.buf.push(byte);
        if self.buf.len() >= self.capacity {
            self.flush_buffer()?;
        }
        Ok(())
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            self.inner.write_all(&self.buf)?;
            self.buf.clear();
        }
        Ok(())
    }
}

pub(super) struct BitReader<R: Read> {
    inner: R,
    buf: Vec<u8>,
    pos: usize,
    filled: usize,
    /// Unconsumed bits, lowest first.
    acc: u64,
    nbits: u32,
}

impl<R: Read> BitReader<R> {
    pub(super) fn new(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            buf: vec![0; capacity],
            pos: 0,
            filled: 0,
            acc: 0,
            nbits: 0,
        }
    }

    /// Consume `n` bits (`n <= 32`), lowest first.
    pub(super) fn read_bits(&mut self, n: u32) -> Result<u64, HuffmanError> {
        debug_assert!(n <= 32);
        while self.nbits < n {
            self.load_byte()?;
        }
        let value = self.acc & mask(n);
        self.acc >>= n;
        self.nbits -= n;
        Ok(value)
    }

    pub(super) fn read_bit(&mut self) -> Result<usize, HuffmanError> {
        Ok(self.read_bits(1)? as usize)
    }

    fn load_byte(&mut self) -> Result<(), HuffmanError> {
        if self.pos == self.filled {
            self.filled = loop {
                match self.inner.read(&mut self.buf) {
                    Ok(0) => return Err(HuffmanError::UnexpectedEof),
                    Ok(n) => break n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                }
            };
            self.pos = 0;
        }
        self.acc |= u64::from(self.buf[self.pos]) << self.nbits;
        self.pos += 1;
        self.nbits += 8;
        Ok(())
    }
}
