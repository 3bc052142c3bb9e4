#![warn(clippy::pedantic)]

//! Byte-level interpretation of fixed-size seismic file headers.
//!
//! This crate knows nothing about files. It describes *where* a field
//! lives inside a header window ([`FieldSpec`], [`FieldLayout`]) and *how*
//! its bytes are turned into a value ([`FieldEncoding`], [`ByteOrder`],
//! [`FieldValue`]). Opening inputs and reading the window is the job of
//! `segd-decoder`.

pub mod error;
pub mod field;
pub mod layout;

pub use error::WireError;
pub use field::FieldValue;
pub use layout::{BitRange, ByteOrder, FieldEncoding, FieldLayout, FieldSpec};

/// Default header window in bytes.
///
/// One SEG-D header block is 32 bytes, and the legacy reader this format
/// tooling grew out of always read exactly one block.
pub const DEFAULT_HEADER_SIZE: usize = 32;

/// Widest numeric field the codec can assemble (fits a `u64`).
pub const MAX_NUMERIC_WIDTH: usize = 8;
