//! Shared fixtures for the integration tests and benchmarks.

use std::io::Write;

use tempfile::NamedTempFile;

/// The 32 bytes `0x01, 0x02, ..., 0x20`.
pub fn ascending_header() -> Vec<u8> {
    (1..=32).collect()
}

/// A SEG-D general header block #1 for file 1001, 32-bit IEEE samples,
/// recorded 2024 day 6 at 12:34:56 by manufacturer 61.
///
/// ```text
/// 10 01 80 58 | 00 00 00 00 00 00 | 24 20 06 12 34 56 61 01 23
/// 00 00 00 | 10 | 00 00 | 88 00 | 01 16 00 FF FF
/// ```
pub fn segd_general_header() -> Vec<u8> {
    vec![
        0x10, 0x01, // file_number 1001
        0x80, 0x58, // format_code 8058
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // general constants
        0x24, // year 24
        0x20, 0x06, // additional blocks 2, day 006
        0x12, 0x34, 0x56, // 12:34:56
        0x61, // manufacturer 61
        0x01, 0x23, // serial 0123
        0x00, 0x00, 0x00, // unused
        0x10, // base scan interval 16 (1 ms)
        0x00, 0x00, // polarity 0
        0x88, 0x00, // record type 8, record length 800
        0x01, // scan types
        0x16, // channel sets 16
        0x00, // skew blocks
        0xFF, // extended header blocks: see block #2
        0xFF, // external header blocks: see block #2
    ]
}

/// Write `bytes` to a fresh temporary file that is deleted on drop.
///
/// # Panics
///
/// Panics if the temporary file cannot be created or written.
pub fn temp_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}
