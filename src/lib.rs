//! Word completion engine: a frequency-ranked ternary search tree dictionary
//! persisted through a Huffman-compressed container.
//!
//! This crate re-exports `act_core` and adds process-level setup shared by
//! front-ends.

mod trace_init;

pub use act_core::{dict, huffman, latin1, settings, tstree};
pub use act_core::dict::{Completion, DictError, Dictionary};
pub use act_core::huffman::HuffmanError;
pub use trace_init::init_tracing;
