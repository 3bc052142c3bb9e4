/// Errors raised while describing or extracting header fields.
///
/// These are layout problems (a field that cannot possibly be read from
/// the configured window) or lookups of names the layout does not define.
/// Every variant names the offending field so a bad config file can be
/// fixed without guesswork.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The input ended before the field's byte range was available.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// Zero-width field, or a numeric field wider than 8 bytes.
    #[error("field {name:?} has invalid width {width}")]
    InvalidWidth { name: String, width: usize },

    /// The field's byte range does not fit inside the header window.
    #[error(
        "field {name:?} at offset {offset} (width {width}) exceeds header size {header_size}"
    )]
    FieldOutOfRange {
        name: String,
        offset: usize,
        width: usize,
        header_size: usize,
    },

    /// The bit sub-range is empty, runs past the field, or is not usable
    /// with the field's encoding.
    #[error("field {name:?} has invalid bit range {start}+{len} (field holds {available} bits)")]
    InvalidBitRange {
        name: String,
        start: u32,
        len: u32,
        available: u32,
    },

    /// Two fields in one layout share a name.
    #[error("duplicate field name {name:?} in layout")]
    DuplicateField { name: String },

    /// No field with this name exists in the layout.
    #[error("no field named {name:?} in layout")]
    UnknownField { name: String },
}
