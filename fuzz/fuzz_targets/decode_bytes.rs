#![no_main]

use libfuzzer_sys::fuzz_target;
use segd_decoder::{DecodeError, DecoderConfig, HeaderDecoder, Preset};

// Fuzz target: strict SEG-D rev 2 decoding of arbitrary input.
//
// Catches bugs in:
// - Short-read handling (Truncated must report the real length)
// - Version field extraction in strict mode
// - BCD and bit-range extraction over every preset field
fuzz_target!(|data: &[u8]| {
    let decoder = HeaderDecoder::new(DecoderConfig::preset(Preset::SegdRev2).strict())
        .expect("preset is valid");

    match decoder.decode_bytes(data) {
        Ok(header) => {
            assert_eq!(header.raw(), &data[..64]);
            for (spec, value) in header.fields() {
                assert!(value.is_ok(), "preset field {} failed", spec.name);
            }
        }
        Err(DecodeError::Truncated { expected, actual }) => {
            assert_eq!(expected, 64);
            assert_eq!(actual, data.len());
        }
        Err(DecodeError::UnsupportedVersion { .. }) => {}
        Err(e) => panic!("unexpected error: {e}"),
    }
});
