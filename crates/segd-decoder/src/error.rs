use std::path::PathBuf;

use segd_wire::WireError;

/// Errors that can occur while opening an input or decoding its header.
///
/// Every way a real file can fail to produce a header maps to its own
/// variant, so callers can decide per file whether to skip it, abort a
/// batch, or ask for a different path. Nothing here is retried internally.
///
/// ```text
///   DecodeError
///   ├── NotFound               ← input path does not exist
///   ├── PermissionDenied       ← input exists but cannot be opened
///   ├── Io                     ← any other open/read failure (cause kept)
///   ├── Truncated              ← fewer bytes than the header window
///   ├── InvalidMagic           ← strict mode: marker bytes do not match
///   ├── UnsupportedVersion     ← strict mode: version not in the known set
///   ├── SeekOutOfRange         ← seek past the known end of the input
///   ├── InvalidConfig          ← decoder configuration is unusable
///   ├── Layout(WireError)      ← field layout does not fit the window
///   ├── Json(serde_json::Error)← config file is not valid JSON
///   └── TaskFailed             ← offloaded decode task panicked/cancelled
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The input could not be opened because it does not exist.
    #[error("{} not found", path.display())]
    NotFound { path: PathBuf },

    /// The input exists but the process may not read it.
    #[error("permission denied opening {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// An I/O error during open or read.
    ///
    /// The underlying [`std::io::Error`] is kept as the error source so the
    /// OS error code survives for diagnostics.
    #[error("i/o failure on {name}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// End of input was reached before `expected` bytes could be read.
    ///
    /// An empty file is simply `actual: 0`; it is not special-cased.
    #[error("truncated input: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Strict validation: the bytes at `offset` match none of the
    /// configured magic values.
    #[error("invalid magic at offset {offset}: found {found:02X?}")]
    InvalidMagic { offset: usize, found: Vec<u8> },

    /// Strict validation: the version field holds a value outside the
    /// configured supported set.
    #[error("unsupported version {found} (supported: {supported:?})")]
    UnsupportedVersion { found: u64, supported: Vec<u64> },

    /// A seek target lies past the known length of the input.
    #[error("seek to offset {offset} is past end of input ({len} bytes)")]
    SeekOutOfRange { offset: u64, len: u64 },

    /// The decoder configuration cannot describe a readable header.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The field layout does not fit the configured header window.
    #[error("invalid field layout: {0}")]
    Layout(#[from] WireError),

    /// A configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),

    /// An offloaded decode task did not run to completion.
    #[error("decode task failed: {0}")]
    TaskFailed(String),
}

impl DecodeError {
    /// Wrap an I/O error, mapping the kinds callers care about to their own
    /// variants.
    pub(crate) fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                name: path.display().to_string(),
                source,
            },
        }
    }

    /// True for errors that mean "this input could not be opened at all".
    pub fn is_unopenable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::PermissionDenied { .. })
    }

    /// True for errors raised by strict structural validation.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::InvalidMagic { .. } | Self::UnsupportedVersion { .. }
        )
    }
}
