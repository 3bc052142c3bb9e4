#![no_main]

use libfuzzer_sys::fuzz_target;
use segd_decoder::{DecodeError, DecoderConfig, HeaderDecoder};

// Fuzz target: JSON configuration parsing and validation.
//
// Any config that parses and validates must decode a fixed 256-byte input
// without panicking, whatever header size it asks for.
fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = DecoderConfig::from_json_str(json) else {
        return;
    };
    let Ok(decoder) = HeaderDecoder::new(config) else {
        return;
    };
    let input = [0u8; 256];
    match decoder.decode_bytes(&input) {
        Ok(header) => assert_eq!(header.len(), decoder.config().header_size),
        Err(DecodeError::Truncated { expected, actual }) => {
            assert_eq!(expected, decoder.config().header_size);
            assert_eq!(actual, input.len());
        }
        Err(_) => {}
    }
});
