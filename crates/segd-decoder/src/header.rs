use std::sync::Arc;

use segd_wire::{FieldLayout, FieldSpec, FieldValue, WireError};

/// A decoded header window.
///
/// Holds exactly the configured number of raw bytes plus the layout used
/// to name fields inside them. Only [`HeaderDecoder`](crate::HeaderDecoder)
/// builds one, and only from a complete read; it is immutable afterwards
/// and has no link back to the source it came from.
///
/// Field values are extracted on demand. Every field in the layout was
/// checked against the window size when the decoder was built, so an
/// accessor can only fail for a name the layout does not contain.
///
/// ```rust
/// use segd_decoder::{DecoderConfig, HeaderDecoder};
/// use segd_wire::{FieldSpec, FieldValue};
///
/// let config = DecoderConfig::default().with_field(FieldSpec::new("first", 0, 1));
/// let decoder = HeaderDecoder::new(config).unwrap();
/// let bytes: Vec<u8> = (1..=32).collect();
///
/// let header = decoder.decode_bytes(&bytes).unwrap();
/// assert_eq!(header.raw(), bytes.as_slice());
/// assert_eq!(header.field("first").unwrap(), FieldValue::Unsigned(1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    raw: Box<[u8]>,
    layout: Arc<FieldLayout>,
}

impl Header {
    pub(crate) fn new(raw: Vec<u8>, layout: Arc<FieldLayout>) -> Self {
        Self {
            raw: raw.into_boxed_slice(),
            layout,
        }
    }

    /// The header bytes, exactly as read.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// A single raw byte, or `None` past the end of the window.
    pub fn byte(&self, offset: usize) -> Option<u8> {
        self.raw.get(offset).copied()
    }

    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    /// Decode the named field.
    ///
    /// # Errors
    ///
    /// [`WireError::UnknownField`] if the layout has no such field.
    pub fn field(&self, name: &str) -> Result<FieldValue, WireError> {
        let spec = self.layout.get(name).ok_or_else(|| WireError::UnknownField {
            name: name.to_string(),
        })?;
        spec.extract(&self.raw)
    }

    /// Decode every field, in layout order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldSpec, Result<FieldValue, WireError>)> {
        self.layout
            .iter()
            .map(|spec| (spec, spec.extract(&self.raw)))
    }

    /// Decode an ad hoc field that is not part of the layout.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if `spec` reaches past the window, or
    /// the validation errors of a malformed `spec`.
    pub fn read(&self, spec: &FieldSpec) -> Result<FieldValue, WireError> {
        spec.extract(&self.raw)
    }
}
