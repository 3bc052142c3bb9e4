use std::io::{Read, Seek};
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};
use segd_wire::FieldLayout;

use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::header::Header;
use crate::source::ByteSource;

/// Turns the first `headerSize` bytes of an input into a [`Header`].
///
/// Decoding proceeds in three steps:
///
///   1. **Read**: `read_exact(header_size)` on the source. `Truncated` and
///      `Io` errors are returned as-is.
///   2. **Validate**: only with `strictMagicCheck` on. Magic bytes first
///      (is this the right kind of file?), then the version field (is it a
///      revision we understand?).
///   3. **Build**: wrap the bytes and the shared layout in a `Header`.
///
/// The configuration is validated once in [`new`](Self::new). The decoder
/// holds no per-decode state, so one instance can be cloned freely and
/// shared between threads decoding different files.
#[derive(Clone, Debug)]
pub struct HeaderDecoder {
    config: Arc<DecoderConfig>,
    layout: Arc<FieldLayout>,
}

impl HeaderDecoder {
    /// Build a decoder for `config`.
    ///
    /// # Errors
    ///
    /// Any error from [`DecoderConfig::validate`].
    pub fn new(config: DecoderConfig) -> Result<Self, DecodeError> {
        config.validate()?;
        let layout = Arc::new(config.field_layout.clone());
        Ok(Self {
            config: Arc::new(config),
            layout,
        })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a header from the source's current offset.
    ///
    /// On success the source has advanced by exactly `header_size` bytes.
    /// The caller keeps ownership of the source and decides when to
    /// release it.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Truncated`] if fewer than `header_size` bytes remain.
    /// - [`DecodeError::Io`] if the read fails.
    /// - [`DecodeError::InvalidMagic`] / [`DecodeError::UnsupportedVersion`]
    ///   in strict mode.
    pub fn decode<R: Read + Seek>(&self, source: &mut ByteSource<R>) -> Result<Header, DecodeError> {
        let raw = source.read_exact(self.config.header_size)?;
        self.validate(&raw).inspect_err(|e| warn!("{}: {e}", source.name()))?;
        debug!(
            "{}: decoded {}-byte header ({} fields)",
            source.name(),
            raw.len(),
            self.layout.len()
        );
        Ok(Header::new(raw, Arc::clone(&self.layout)))
    }

    /// Open `path`, decode its header, and close it again.
    ///
    /// The file handle is owned by a local [`ByteSource`] and is released
    /// when this function returns, whichever way it returns.
    ///
    /// # Errors
    ///
    /// Open errors from [`ByteSource::open`], then anything
    /// [`decode`](Self::decode) returns.
    pub fn decode_path(&self, path: impl AsRef<Path>) -> Result<Header, DecodeError> {
        let mut source = ByteSource::open(path)?;
        let header = self.decode(&mut source)?;
        source.release();
        Ok(header)
    }

    /// Decode a header from an in-memory buffer.
    ///
    /// # Errors
    ///
    /// As for [`decode`](Self::decode).
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Header, DecodeError> {
        let mut source = ByteSource::from_bytes("<memory>", bytes);
        self.decode(&mut source)
    }

    fn validate(&self, raw: &[u8]) -> Result<(), DecodeError> {
        if !self.config.strict_magic_check {
            return Ok(());
        }

        if let Some(magic) = &self.config.magic
            && !magic.matches(raw)
        {
            let end = magic.offset.saturating_add(magic.width()).min(raw.len());
            let found = raw.get(magic.offset..end).unwrap_or_default().to_vec();
            return Err(DecodeError::InvalidMagic {
                offset: magic.offset,
                found,
            });
        }

        if let Some(version) = &self.config.version {
            let value = version.field.extract(raw)?;
            // A BCD escape (e.g. 0xFF) is never a supported version.
            let found = value.as_u64().unwrap_or(u64::MAX);
            if !version.supported.contains(&found) {
                return Err(DecodeError::UnsupportedVersion {
                    found,
                    supported: version.supported.clone(),
                });
            }
        }

        Ok(())
    }
}

impl Default for HeaderDecoder {
    /// A 32-byte, non-strict decoder with no named fields.
    fn default() -> Self {
        Self {
            config: Arc::new(DecoderConfig::default()),
            layout: Arc::new(FieldLayout::default()),
        }
    }
}
