use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::MAX_NUMERIC_WIDTH;
use crate::error::WireError;
use crate::field::{self, FieldValue};

/// Numeric byte order of a multi-byte field.
///
/// SEG-D is big endian throughout, so that is the default. The order is
/// fixed per field rather than per file: vendor extension blocks are
/// occasionally written little endian next to big endian standard blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ByteOrder {
    /// Most-significant byte first.
    #[default]
    #[serde(alias = "big", alias = "be", alias = "msb")]
    BigEndian,
    /// Least-significant byte first.
    #[serde(alias = "little", alias = "le", alias = "lsb")]
    LittleEndian,
}

impl ByteOrder {
    /// Short label used in rendered output (`be` / `le`).
    pub fn label(self) -> &'static str {
        match self {
            Self::BigEndian => "be",
            Self::LittleEndian => "le",
        }
    }
}

/// How a field's bytes are turned into a [`FieldValue`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldEncoding {
    #[default]
    Unsigned,
    Signed,
    /// Packed binary-coded decimal, one digit per nibble.
    Bcd,
    /// Unsigned binary fraction with the binary point before the MSB.
    Fraction,
    /// Raw bytes; byte order and bit ranges do not apply.
    Bytes,
}

impl FieldEncoding {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unsigned => "unsigned",
            Self::Signed => "signed",
            Self::Bcd => "bcd",
            Self::Fraction => "fraction",
            Self::Bytes => "bytes",
        }
    }

    pub fn is_numeric(self) -> bool {
        self != Self::Bytes
    }
}

/// A sub-range of a numeric field, counted in bits from the MSB of the
/// assembled integer.
///
/// SEG-D packs 4-bit and 12-bit values into shared bytes. The day-of-year
/// in general header #1, for example, is the low nibble of byte 11 plus
/// all of byte 12: a 2-byte field with `BitRange { start: 4, len: 12 }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BitRange {
    pub start: u32,
    pub len: u32,
}

/// One named field of a header layout.
///
/// ```text
/// ┌────────────┬──────────────────────────────────────────────────┐
/// │ Key        │ Meaning                                          │
/// ├────────────┼──────────────────────────────────────────────────┤
/// │ name       │ Lookup key, unique within a layout               │
/// │ offset     │ First byte, zero-based from the header start     │
/// │ width      │ Byte count (1-8 for numeric encodings)           │
/// │ byteOrder  │ bigEndian (default) | littleEndian               │
/// │ encoding   │ unsigned (default) | signed | bcd | fraction |   │
/// │            │ bytes                                            │
/// │ bits       │ Optional {start, len} slice of the integer       │
/// └────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldSpec {
    pub name: String,
    pub offset: usize,
    pub width: usize,
    #[serde(default)]
    pub byte_order: ByteOrder,
    #[serde(default)]
    pub encoding: FieldEncoding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits: Option<BitRange>,
}

impl FieldSpec {
    /// A big endian unsigned field.
    pub fn new(name: impl Into<String>, offset: usize, width: usize) -> Self {
        Self {
            name: name.into(),
            offset,
            width,
            byte_order: ByteOrder::BigEndian,
            encoding: FieldEncoding::Unsigned,
            bits: None,
        }
    }

    #[must_use]
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    #[must_use]
    pub fn little_endian(self) -> Self {
        self.with_byte_order(ByteOrder::LittleEndian)
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: FieldEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_bits(mut self, start: u32, len: u32) -> Self {
        self.bits = Some(BitRange { start, len });
        self
    }

    /// One past the last byte of the field, or `None` on overflow.
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.width)
    }

    fn total_bits(&self) -> u32 {
        u32::try_from(self.width.saturating_mul(8)).unwrap_or(u32::MAX)
    }

    /// Check that this field can always be read from a window of
    /// `header_size` bytes.
    ///
    /// # Errors
    ///
    /// - [`WireError::InvalidWidth`] for a zero width, or a numeric field
    ///   wider than 8 bytes.
    /// - [`WireError::FieldOutOfRange`] if `offset + width` exceeds
    ///   `header_size` (or overflows).
    /// - [`WireError::InvalidBitRange`] for an empty or overlong bit range,
    ///   a bit range on a `bytes` field, or a BCD range that is not a whole
    ///   number of nibbles.
    pub fn validate(&self, header_size: usize) -> Result<(), WireError> {
        if self.width == 0 || (self.encoding.is_numeric() && self.width > MAX_NUMERIC_WIDTH) {
            return Err(WireError::InvalidWidth {
                name: self.name.clone(),
                width: self.width,
            });
        }

        if !self.end().is_some_and(|end| end <= header_size) {
            return Err(WireError::FieldOutOfRange {
                name: self.name.clone(),
                offset: self.offset,
                width: self.width,
                header_size,
            });
        }

        if let Some(range) = self.bits {
            self.check_bits(range)?;
        }

        Ok(())
    }

    fn check_bits(&self, range: BitRange) -> Result<(), WireError> {
        let available = self.total_bits();
        let fits = range.len >= 1
            && range
                .start
                .checked_add(range.len)
                .is_some_and(|end| end <= available);
        let nibble_aligned = self.encoding != FieldEncoding::Bcd || range.len % 4 == 0;

        if fits && nibble_aligned && self.encoding.is_numeric() {
            Ok(())
        } else {
            Err(WireError::InvalidBitRange {
                name: self.name.clone(),
                start: range.start,
                len: range.len,
                available,
            })
        }
    }

    /// Decode this field from a header's raw bytes.
    ///
    /// Only `raw[offset..offset + width]` is ever touched.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if `raw` is shorter than the field's
    ///   end.
    /// - [`WireError::InvalidWidth`] / [`WireError::InvalidBitRange`] if the
    ///   spec itself is malformed (see [`validate`](Self::validate)).
    pub fn extract(&self, raw: &[u8]) -> Result<FieldValue, WireError> {
        let bytes = self
            .end()
            .and_then(|end| raw.get(self.offset..end))
            .ok_or(WireError::UnexpectedEof { offset: raw.len() })?;

        if self.encoding == FieldEncoding::Bytes {
            return Ok(FieldValue::Bytes(bytes.to_vec()));
        }

        let (value, bits) = self.numeric(bytes)?;

        Ok(match self.encoding {
            FieldEncoding::Signed => FieldValue::Signed(field::sign_extend(value, bits)),
            FieldEncoding::Bcd => {
                let digits = bits / 4;
                field::decode_bcd(value, digits)
                    .map_or(FieldValue::NonDecimal { raw: value, digits }, FieldValue::Unsigned)
            }
            FieldEncoding::Fraction => FieldValue::Fraction(field::binary_fraction(value, bits)),
            FieldEncoding::Unsigned | FieldEncoding::Bytes => FieldValue::Unsigned(value),
        })
    }

    /// Assemble the integer and apply the bit range. Returns the value and
    /// the number of significant bits.
    fn numeric(&self, bytes: &[u8]) -> Result<(u64, u32), WireError> {
        let assembled =
            field::read_unsigned(bytes, self.byte_order).ok_or_else(|| WireError::InvalidWidth {
                name: self.name.clone(),
                width: self.width,
            })?;

        let Some(range) = self.bits else {
            return Ok((assembled, self.total_bits()));
        };
        self.check_bits(range)?;

        let shift = self.total_bits() - range.start - range.len;
        let mask = if range.len >= 64 {
            u64::MAX
        } else {
            (1u64 << range.len) - 1
        };
        Ok(((assembled >> shift) & mask, range.len))
    }
}

/// An ordered list of named fields.
///
/// Order is preserved for rendering; lookup is by name. Serialized as a
/// plain JSON array of [`FieldSpec`] objects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldLayout {
    fields: Vec<FieldSpec>,
}

impl FieldLayout {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn push(&mut self, field: FieldSpec) {
        self.fields.push(field);
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldSpec> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate every field against `header_size` and reject duplicate
    /// names.
    ///
    /// # Errors
    ///
    /// The first [`WireError`] from [`FieldSpec::validate`], or
    /// [`WireError::DuplicateField`].
    pub fn validate(&self, header_size: usize) -> Result<(), WireError> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            field.validate(header_size)?;
            if !seen.insert(field.name.as_str()) {
                return Err(WireError::DuplicateField {
                    name: field.name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FieldLayout {
    type Item = &'a FieldSpec;
    type IntoIter = std::slice::Iter<'a, FieldSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl FromIterator<FieldSpec> for FieldLayout {
    fn from_iter<I: IntoIterator<Item = FieldSpec>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ascending() -> Vec<u8> {
        (1..=32).collect()
    }

    #[test]
    fn single_byte_field() {
        let spec = FieldSpec::new("first", 0, 1);
        assert_eq!(spec.extract(&ascending()).unwrap(), FieldValue::Unsigned(1));
    }

    #[test]
    fn byte_order_is_per_field() {
        let raw = ascending();
        let be = FieldSpec::new("be", 2, 2);
        let le = FieldSpec::new("le", 2, 2).little_endian();
        assert_eq!(be.extract(&raw).unwrap(), FieldValue::Unsigned(0x0304));
        assert_eq!(le.extract(&raw).unwrap(), FieldValue::Unsigned(0x0403));
    }

    #[test]
    fn signed_field() {
        let raw = [0xFF, 0xFE];
        let spec = FieldSpec::new("s", 0, 2).with_encoding(FieldEncoding::Signed);
        assert_eq!(spec.extract(&raw).unwrap(), FieldValue::Signed(-2));
    }

    #[test]
    fn bcd_nibble_fields() {
        // additional blocks = 2 (high nibble), day = 006
        let raw = [0x20, 0x06];
        let blocks = FieldSpec::new("blocks", 0, 2).with_bits(0, 4);
        let day = FieldSpec::new("day", 0, 2)
            .with_encoding(FieldEncoding::Bcd)
            .with_bits(4, 12);
        assert_eq!(blocks.extract(&raw).unwrap(), FieldValue::Unsigned(2));
        assert_eq!(day.extract(&raw).unwrap(), FieldValue::Unsigned(6));
    }

    #[test]
    fn bcd_escape_is_non_decimal() {
        let raw = [0xFF, 0xFF];
        let spec = FieldSpec::new("file_number", 0, 2).with_encoding(FieldEncoding::Bcd);
        let value = spec.extract(&raw).unwrap();
        assert_eq!(
            value,
            FieldValue::NonDecimal {
                raw: 0xFFFF,
                digits: 4
            }
        );
        assert_eq!(value.to_string(), "FFFF");
    }

    #[test]
    fn fraction_field() {
        let raw = [0x80, 0x00];
        let spec = FieldSpec::new("frac", 0, 2).with_encoding(FieldEncoding::Fraction);
        assert_eq!(spec.extract(&raw).unwrap(), FieldValue::Fraction(0.5));
    }

    #[test]
    fn bytes_field_is_verbatim() {
        let raw = ascending();
        let spec = FieldSpec::new("constants", 4, 6)
            .with_encoding(FieldEncoding::Bytes)
            .little_endian();
        assert_eq!(
            spec.extract(&raw).unwrap(),
            FieldValue::Bytes(vec![5, 6, 7, 8, 9, 10])
        );
    }

    #[test]
    fn extract_short_input() {
        let spec = FieldSpec::new("tail", 30, 4);
        let result = spec.extract(&ascending());
        assert!(matches!(result, Err(WireError::UnexpectedEof { offset: 32 })));
    }

    #[test]
    fn reject_zero_width() {
        let result = FieldSpec::new("empty", 0, 0).validate(32);
        assert!(matches!(result, Err(WireError::InvalidWidth { width: 0, .. })));
    }

    #[test]
    fn reject_wide_numeric() {
        let result = FieldSpec::new("wide", 0, 9).validate(32);
        assert!(matches!(result, Err(WireError::InvalidWidth { width: 9, .. })));
        let bytes = FieldSpec::new("wide", 0, 9).with_encoding(FieldEncoding::Bytes);
        assert!(bytes.validate(32).is_ok());
    }

    #[test]
    fn reject_out_of_range() {
        let result = FieldSpec::new("late", 31, 2).validate(32);
        assert!(matches!(
            result,
            Err(WireError::FieldOutOfRange {
                offset: 31,
                width: 2,
                header_size: 32,
                ..
            })
        ));
    }

    #[test]
    fn reject_overflowing_offset() {
        let result = FieldSpec::new("huge", usize::MAX, 2).validate(32);
        assert!(matches!(result, Err(WireError::FieldOutOfRange { .. })));
    }

    #[test]
    fn reject_bad_bit_ranges() {
        let overlong = FieldSpec::new("x", 0, 1).with_bits(4, 8);
        assert!(matches!(
            overlong.validate(32),
            Err(WireError::InvalidBitRange { available: 8, .. })
        ));

        let empty = FieldSpec::new("x", 0, 1).with_bits(0, 0);
        assert!(empty.validate(32).is_err());

        let odd_bcd = FieldSpec::new("x", 0, 1)
            .with_encoding(FieldEncoding::Bcd)
            .with_bits(0, 3);
        assert!(odd_bcd.validate(32).is_err());

        let bytes = FieldSpec::new("x", 0, 2)
            .with_encoding(FieldEncoding::Bytes)
            .with_bits(0, 4);
        assert!(bytes.validate(32).is_err());
    }

    #[test]
    fn layout_rejects_duplicates() {
        let layout = FieldLayout::new(vec![FieldSpec::new("a", 0, 1), FieldSpec::new("a", 1, 1)]);
        assert!(matches!(
            layout.validate(32),
            Err(WireError::DuplicateField { name }) if name == "a"
        ));
    }

    #[test]
    fn layout_lookup_preserves_order() {
        let layout: FieldLayout = [FieldSpec::new("b", 1, 1), FieldSpec::new("a", 0, 1)]
            .into_iter()
            .collect();
        assert_eq!(layout.get("a").map(|f| f.offset), Some(0));
        let names: Vec<_> = layout.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert!(layout.get("missing").is_none());
    }

    #[test]
    fn field_spec_from_json() {
        let json = r#"{"name":"day","offset":11,"width":2,"encoding":"bcd","bits":{"start":4,"len":12}}"#;
        let spec: FieldSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.byte_order, ByteOrder::BigEndian);
        assert_eq!(spec.encoding, FieldEncoding::Bcd);
        assert_eq!(spec.bits, Some(BitRange { start: 4, len: 12 }));
    }

    #[test]
    fn byte_order_aliases() {
        let le: ByteOrder = serde_json::from_str(r#""little""#).unwrap();
        let be: ByteOrder = serde_json::from_str(r#""bigEndian""#).unwrap();
        assert_eq!(le, ByteOrder::LittleEndian);
        assert_eq!(be, ByteOrder::BigEndian);
    }

    #[test]
    fn layout_json_is_an_array() {
        let layout = FieldLayout::new(vec![FieldSpec::new("first", 0, 1)]);
        let json = serde_json::to_string(&layout).unwrap();
        assert!(json.starts_with('['));
        let back: FieldLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }
}
