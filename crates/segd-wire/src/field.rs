use std::fmt;

use crate::MAX_NUMERIC_WIDTH;
use crate::layout::ByteOrder;

/// A decoded header field.
///
/// ```text
/// ┌──────────────┬──────────────────────────────────────────────────┐
/// │ Variant      │ Produced by                                      │
/// ├──────────────┼──────────────────────────────────────────────────┤
/// │ Unsigned     │ `unsigned`, and `bcd` when every nibble is 0-9   │
/// │ Signed       │ `signed` (two's complement, sign-extended)       │
/// │ NonDecimal   │ `bcd` containing a nibble above 9 (e.g. 0xFFFF)  │
/// │ Fraction     │ `fraction` (binary point before the MSB)         │
/// │ Bytes        │ `bytes` (verbatim copy)                          │
/// └──────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Unsigned(u64),
    Signed(i64),
    /// A BCD field whose nibbles are not all decimal digits.
    ///
    /// SEG-D writes all-F nibbles to mean "value too large, read the
    /// extended header instead", so this is an escape, not corruption.
    NonDecimal { raw: u64, digits: u32 },
    Fraction(f64),
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// The value as an unsigned integer, if it is one (or a non-negative
    /// signed integer).
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Unsigned(v) => Some(*v),
            Self::Signed(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Signed(v) => Some(*v),
            Self::Unsigned(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Fraction(v) => Some(*v),
            Self::Unsigned(v) => Some(*v as f64),
            Self::Signed(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Signed(v) => write!(f, "{v}"),
            Self::NonDecimal { raw, digits } => {
                write!(f, "{raw:0width$X}", width = *digits as usize)
            }
            Self::Fraction(v) => write!(f, "{v}"),
            Self::Bytes(b) => f.write_str(&hex::encode_upper(b)),
        }
    }
}

/// Assemble up to 8 bytes into an integer using the given byte order.
///
/// Returns `None` for slices wider than [`MAX_NUMERIC_WIDTH`]; an empty
/// slice assembles to 0.
///
/// | Bytes              | Big endian   | Little endian |
/// |--------------------|--------------|---------------|
/// | `[0x12, 0x34]`     | `0x1234`     | `0x3412`      |
/// | `[0x01, 0x00, 0x00]` | `0x010000` | `0x000001`    |
pub fn read_unsigned(bytes: &[u8], order: ByteOrder) -> Option<u64> {
    if bytes.len() > MAX_NUMERIC_WIDTH {
        return None;
    }
    let push = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);
    Some(match order {
        ByteOrder::BigEndian => bytes.iter().fold(0, push),
        ByteOrder::LittleEndian => bytes.iter().rev().fold(0, push),
    })
}

/// Interpret the low `bits` bits of `value` as a two's complement integer.
#[allow(clippy::cast_possible_wrap)]
pub fn sign_extend(value: u64, bits: u32) -> i64 {
    match bits {
        0 => 0,
        64.. => value as i64,
        _ => {
            let shift = 64 - bits;
            ((value << shift) as i64) >> shift
        }
    }
}

/// Decode `digits` packed BCD nibbles, most significant first.
///
/// Returns `None` as soon as a nibble above 9 is seen.
pub fn decode_bcd(value: u64, digits: u32) -> Option<u64> {
    let mut result = 0u64;
    for i in (0..digits).rev() {
        let nibble = (value >> (i * 4)) & 0xF;
        if nibble > 9 {
            return None;
        }
        result = result * 10 + nibble;
    }
    Some(result)
}

/// Treat `value` as a `bits`-wide binary fraction: `0x8000` over 16 bits
/// is 0.5, `0xC000` is 0.75.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
pub fn binary_fraction(value: u64, bits: u32) -> f64 {
    value as f64 / 2f64.powi(bits as i32)
}
