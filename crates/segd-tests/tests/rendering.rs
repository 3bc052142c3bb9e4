//! Snapshot tests for the text renderings shown by the CLI.
//!
//! Snapshots live in `tests/snapshots/`. After a deliberate format change,
//! review and accept the new output with `cargo insta review`.

use insta::assert_snapshot;
use segd_decoder::render::{field_table, hex_dump};
use segd_decoder::{DecoderConfig, HeaderDecoder, Preset};
use segd_tests::{ascending_header, segd_general_header};
use segd_wire::FieldSpec;

#[test]
fn ascending_hex_dump() {
    assert_snapshot!("ascending_hex_dump", hex_dump(&ascending_header()));
}

#[test]
fn general_header_hex_dump() {
    assert_snapshot!("general_header_hex_dump", hex_dump(&segd_general_header()));
}

#[test]
fn custom_field_table() {
    let config = DecoderConfig::default()
        .with_field(FieldSpec::new("first", 0, 1))
        .with_field(FieldSpec::new("word", 2, 2).little_endian())
        .with_field(
            FieldSpec::new("day", 11, 2)
                .with_encoding(segd_wire::FieldEncoding::Bcd)
                .with_bits(4, 12),
        );
    let header = HeaderDecoder::new(config)
        .unwrap()
        .decode_bytes(&ascending_header())
        .unwrap();
    assert_snapshot!("custom_field_table", field_table(&header));
}

#[test]
fn general_header_field_table() {
    let decoder = HeaderDecoder::new(DecoderConfig::preset(Preset::SegdGeneralHeader)).unwrap();
    let header = decoder.decode_bytes(&segd_general_header()).unwrap();
    assert_snapshot!("general_header_field_table", field_table(&header));
}
