pub mod dict;
pub mod huffman;
pub mod latin1;
pub mod settings;
pub mod tstree;
