//! Plain-text views of a decoded header for terminals and logs.

use std::fmt::Write as _;

use crate::header::Header;

/// Hex dump, 16 bytes per line: offset, hex bytes, printable ASCII.
///
/// ```text
/// 0000  53 45 47 44 01 02 03 04 05 06 07 08 09 0a 0b 0c  SEGD............
/// ```
pub fn hex_dump(raw: &[u8]) -> String {
    let mut lines = Vec::with_capacity(raw.len().div_ceil(16));
    for (i, chunk) in raw.chunks(16).enumerate() {
        let offset = i * 16;
        let hex = chunk
            .iter()
            .fold(String::with_capacity(chunk.len() * 3), |mut s, b| {
                if !s.is_empty() {
                    s.push(' ');
                }
                let _ = write!(s, "{b:02x}");
                s
            });
        let ascii: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
            .collect();
        lines.push(format!("{offset:04x}  {hex:<47}  {ascii}"));
    }
    lines.join("\n")
}

/// One aligned line per layout field:
/// `name  offset+width[bits]  order  encoding  value`.
///
/// Fields that fail to decode show `<error: ...>` in place of a value.
pub fn field_table(header: &Header) -> String {
    let rows: Vec<(String, String, &str, &str, String)> = header
        .fields()
        .map(|(spec, value)| {
            let mut position = format!("{}+{}", spec.offset, spec.width);
            if let Some(bits) = spec.bits {
                let _ = write!(position, "[{}..{}]", bits.start, bits.start + bits.len);
            }
            let value = match value {
                Ok(v) => v.to_string(),
                Err(e) => format!("<error: {e}>"),
            };
            (
                spec.name.clone(),
                position,
                spec.byte_order.label(),
                spec.encoding.label(),
                value,
            )
        })
        .collect();

    let name_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
    let position_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0);

    rows.iter()
        .map(|(name, position, order, encoding, value)| {
            format!("{name:<name_width$}  {position:<position_width$}  {order}  {encoding:<8}  {value}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_last_line() {
        let dump = hex_dump(b"SEGD\x00");
        assert_eq!(dump, format!("0000  53 45 47 44 00{}  SEGD.", " ".repeat(33)));
    }

    #[test]
    fn empty_dump() {
        assert_eq!(hex_dump(&[]), "");
    }
}
