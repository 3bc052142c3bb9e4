#![warn(clippy::pedantic)]

//! Fixed-size header decoding for SEG-D style seismic files.
//!
//! ```text
//!   path ──► ByteSource::open ──► HeaderDecoder::decode ──► Header
//!                 │                        │
//!                 └──── DecodeError ◄──────┘
//! ```
//!
//! A [`ByteSource`] owns one open input and hands out exact byte counts.
//! A [`HeaderDecoder`] reads the configured header window from it,
//! optionally checks magic/version bytes, and returns an immutable
//! [`Header`] whose named fields are described by a
//! [`FieldLayout`](segd_wire::FieldLayout).

pub mod config;
pub mod decoder;
pub mod error;
pub mod header;
pub mod render;
pub mod source;

mod offload;

pub use config::{DecoderConfig, MagicSpec, Preset, VersionSpec};
pub use decoder::HeaderDecoder;
pub use error::DecodeError;
pub use header::Header;
pub use source::ByteSource;
