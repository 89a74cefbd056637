#![deny(unsafe_code)]
//! Indexed map export.
//!
//! Maps a texturized RGBA image onto its palette, encodes an 8-bit indexed
//! PNG and splices the `waLV` level record in right after `IHDR`, which is
//! the form the game accepts as an imported map.

pub mod chunk;
pub mod encode;

pub use chunk::{parse_chunks, splice_walv, write_chunks, Chunk};
pub use encode::{encode_indexed, index_pixels};
