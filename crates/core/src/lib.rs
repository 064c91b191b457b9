//! huffman-core: Huffman coding over fixed-width entities
//!
//! This library compresses a byte stream by treating it as a sequence of
//! 1, 2, 4 or 8-byte entities, building an optimal prefix-code tree over
//! their frequencies, and storing tree plus payload in a compact
//! self-describing layout.
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `bitio`: bit access, fixed-width integers, MSB-first bit streams
//! - `frequency`: entity counting
//! - `tree`: node type and the greedy tree builder
//! - `code_table`: root-to-leaf code derivation
//! - `entity_codec`: entity section (leaf values)
//! - `tree_codec`: tree section (shape bits)
//! - `payload`: data section (entity codes)
//! - `meta`: 20-byte layout header
//! - `codec`: whole-archive encode/decode
//!
//! # Example
//! ```
//! use huffman_core::{compress, decompress, EntityWidth};
//!
//! let data = b"abracadabra, abracadabra";
//! let archive = compress(EntityWidth::One, data).unwrap();
//! assert_eq!(decompress(&archive).unwrap(), data);
//! ```
//!
//! # Design Principles
//!
//! - **No panics**: malformed archives surface as [`LayoutError`]s
//! - **Single pass decode**: sections are read strictly forward
//! - **Deterministic**: equal input gives an identical archive
//! - **Host byte order**: multi-byte fields are native-endian

pub mod bitio;
pub mod code_table;
pub mod codec;
pub mod entity_codec;
pub mod error;
pub mod frequency;
pub mod meta;
pub mod payload;
pub mod tree;
pub mod tree_codec;

// Re-export commonly used types
pub use codec::{compress, decode, decompress, encode, EntityWidth};
pub use error::{Error, LayoutError, Result};
pub use meta::{decode_header, encode_header, Meta, HEADER_LEN};
