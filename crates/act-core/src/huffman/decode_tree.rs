//! Decode side: prefix tree rebuilt from the code table in the file header.

use std::io::Read;

use super::bit_io::BitReader;
use super::code::NUM_SYMBOLS;
use super::HuffmanError;

/// A full binary tree over 256 leaves has 255 internal nodes.
const MAX_NODES: usize = NUM_SYMBOLS - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Empty,
    Node(u16),
    Leaf(u8),
}

pub(super) struct DecodeTree {
    /// Index 0 is the root; each node has a bit-0 and a bit-1 slot.
    nodes: Vec<[Slot; 2]>,
}

impl DecodeTree {
    /// Read the 256-entry code table: for every symbol an 8-bit length,
    /// followed by that many code bits when the length is nonzero.
    pub(super) fn read_from<R: Read>(input: &mut BitReader<R>) -> Result<Self, HuffmanError> {
        let mut tree = Self {
            nodes: vec![[Slot::Empty; 2]],
        };
        for symbol in 0..=u8::MAX {
            let len = input.read_bits(8)? as usize;
            if len != 0 {
                tree.insert(symbol, len, input)?;
            }
        }
        Ok(tree)
    }

    fn insert<R: Read>(
        &mut self,
        symbol: u8,
        len: usize,
        input: &mut BitReader<R>,
    ) -> Result<(), HuffmanError> {
        let mut node = 0;
        for _ in 1..len {
            let bit = input.read_bit()?;
            node = match self.nodes[node][bit] {
                Slot::Empty => {
                    let id = self.push_node()?;
                    self.nodes[node][bit] = Slot::Node(id);
                    usize::from(id)
                }
                Slot::Node(id) => usize::from(id),
                Slot::Leaf(_) => return Err(HuffmanError::CorruptTree),
            };
        }
        let bit = input.read_bit()?;
        match self.nodes[node][bit] {
            Slot::Empty => {
                self.nodes[node][bit] = Slot::Leaf(symbol);
                Ok(())
            }
            Slot::Node(_) | Slot::Leaf(_) => Err(HuffmanError::CorruptTree),
        }
    }

    fn push_node(&mut self) -> Result<u16, HuffmanError> {
        if self.nodes.len() >= MAX_NODES {
            return Err(HuffmanError::CorruptTree);
        }
        let id = self.nodes.len() as u16;
        self.nodes.push([Slot::Empty; 2]);
        Ok(id)
    }

    /// Follow bits from the root until a leaf.
    pub(super) fn decode_symbol<R: Read>(
        &self,
        input: &mut BitReader<R>,
    ) -> Result<u8, HuffmanError> {
        let mut node = 0;
        loop {
            match self.nodes[node][input.read_bit()?] {
                Slot::Leaf(symbol) => return Ok(symbol),
                Slot::Node(id) => node = usize::from(id),
                Slot::Empty => return Err(HuffmanError::CorruptStream),
            }
        }
    }

    #[cfg(test)]
    pub(super) fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
