#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use segd_wire::{FieldEncoding, FieldSpec};

#[derive(Arbitrary, Debug)]
struct Input {
    offset: u8,
    width: u8,
    little_endian: bool,
    encoding: u8,
    bits: Option<(u8, u8)>,
    raw: Vec<u8>,
}

// Fuzz target: FieldSpec::extract with arbitrary geometry.
//
// Catches bugs in:
// - Offset/width overflow and out-of-window slicing
// - Bit-range shifts and masks at the 64-bit edge
// - BCD decoding of non-decimal nibbles
fuzz_target!(|input: Input| {
    let encoding = match input.encoding % 5 {
        0 => FieldEncoding::Unsigned,
        1 => FieldEncoding::Signed,
        2 => FieldEncoding::Bcd,
        3 => FieldEncoding::Fraction,
        _ => FieldEncoding::Bytes,
    };
    let mut spec = FieldSpec::new("fuzz", usize::from(input.offset), usize::from(input.width))
        .with_encoding(encoding);
    if input.little_endian {
        spec = spec.little_endian();
    }
    if let Some((start, len)) = input.bits {
        spec = spec.with_bits(u32::from(start), u32::from(len));
    }

    // A spec that validates against the window must extract cleanly.
    let valid = spec.validate(input.raw.len()).is_ok();
    let extracted = spec.extract(&input.raw);
    if valid {
        assert!(extracted.is_ok(), "{spec:?} validated but failed: {extracted:?}");
    }
});
