//! Encode side: frequency tree construction and the per-symbol code table.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

pub(super) const NUM_SYMBOLS: usize = 256;

/// Longest possible code: a fully skewed tree over 256 leaves.
const MAX_CODE_BITS: usize = NUM_SYMBOLS - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    /// Bit 0.
    Low,
    /// Bit 1.
    High,
}

#[derive(Debug, Clone, Copy)]
struct Parent {
    index: usize,
    branch: Branch,
}

/// Bit sequence for one symbol, stored root-to-leaf, LSB-first per byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Code {
    len: u8,
    bits: [u8; NUM_SYMBOLS / 8],
}

impl Code {
    const EMPTY: Code = Code {
        len: 0,
        bits: [0; NUM_SYMBOLS / 8],
    };

    /// Bit length; 0 means the symbol does not occur.
    pub(super) fn len(&self) -> u8 {
        self.len
    }

    #[cfg(test)]
    pub(super) fn bit(&self, i: usize) -> bool {
        (self.bits[i / 8] >> (i % 8)) & 1 != 0
    }

    /// Chunks of up to 8 bits in stream order.
    pub(super) fn chunks(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        let len = usize::from(self.len);
        self.bits[..len.div_ceil(8)]
            .iter()
            .enumerate()
            .map(move |(i, &byte)| (byte, (len - i * 8).min(8) as u32))
    }

    fn from_path(root_to_leaf: impl Iterator<Item = Branch>) -> Self {
        let mut code = Self::EMPTY;
        for (i, branch) in root_to_leaf.enumerate() {
            debug_assert!(i < MAX_CODE_BITS);
            if branch == Branch::High {
                code.bits[i / 8] |= 1 << (i % 8);
            }
            code.len += 1;
        }
        code
    }
}

pub(super) fn histogram(data: &[u8]) -> [u64; NUM_SYMBOLS] {
    let mut freqs = [0u64; NUM_SYMBOLS];
    for &b in data {
        freqs[usize::from(b)] += 1;
    }
    freqs
}

pub(super) struct CodeTable {
    codes: Box<[Code; NUM_SYMBOLS]>,
}

impl CodeTable {
    /// Build Huffman codes for every symbol with a nonzero frequency.
    ///
    /// A single distinct symbol still gets a 1-bit code through a synthetic
    /// root.
    pub(super) fn build(freqs: &[u64; NUM_SYMBOLS]) -> Self {
        // Leaves 0..256, then internal nodes in creation order. `None` marks
        // the root and absent symbols.
        let mut parents: Vec<Option<Parent>> = vec![None; NUM_SYMBOLS];
        parents.reserve(NUM_SYMBOLS - 1);

        let mut heap: BinaryHeap<Reverse<(u64, usize)>> = freqs
            .iter()
            .enumerate()
            .filter(|(_, &freq)| freq != 0)
            .map(|(symbol, &freq)| Reverse((freq, symbol)))
            .collect();

        if heap.len() == 1 {
            if let Some(Reverse((_, leaf))) = heap.pop() {
                let index = parents.len();
                parents.push(None);
                parents[leaf] = Some(Parent {
                    index,
                    branch: Branch::Low,
                });
            }
        }
        while heap.len() > 1 {
            let (Some(Reverse((low_freq, low))), Some(Reverse((high_freq, high)))) =
                (heap.pop(), heap.pop())
            else {
                break;
            };
            let index = parents.len();
            parents.push(None);
            parents[low] = Some(Parent {
                index,
                branch: Branch::Low,
            });
            parents[high] = Some(Parent {
                index,
                branch: Branch::High,
            });
            heap.push(Reverse((low_freq + high_freq, index)));
        }

        let mut codes = Box::new([Code::EMPTY; NUM_SYMBOLS]);
        let mut path: Vec<Branch> = Vec::with_capacity(MAX_CODE_BITS);
        for (symbol, code) in codes.iter_mut().enumerate() {
            if freqs[symbol] == 0 {
                continue;
            }
            path.clear();
            let mut cur = parents[symbol];
            while let Some(parent) = cur {
                path.push(parent.branch);
                cur = parents[parent.index];
            }
            *code = Code::from_path(path.iter().rev().copied());
        }

        Self { codes }
    }

    pub(super) fn get(&self, symbol: u8) -> &Code {
        &self.codes[usize::from(symbol)]
    }

    /// Codes for symbols 0..=255 in order.
    pub(super) fn iter(&self) -> impl Iterator<Item = &Code> {
        self.codes.iter()
    }

    pub(super) fn symbol_count(&self) -> usize {
        self.codes.iter().filter(|c| c.len != 0).count()
    }
}
