/// Implementation of `segd-header dump`.
///
/// Prints the raw header window. The default is a 16-bytes-per-line hex
/// dump; `--decimal` prints one unsigned byte value per line, which is the
/// format older scripts around this tool expect to parse.
///
/// ```text
/// 0000  01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f 10  ................
/// 0010  11 12 13 14 15 16 17 18 19 1a 1b 1c 1d 1e 1f 20  ................
/// ```
use anyhow::{Context, Result};
use segd_decoder::render;

use crate::DumpArgs;

/// Run the `segd-header dump` command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the header cannot
/// be read.
pub fn run(args: &DumpArgs) -> Result<()> {
    let decoder = args.decode.build_decoder()?;
    let header = decoder
        .decode_path(&args.file)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    if args.decimal {
        for byte in header.raw() {
            println!("{byte}");
        }
    } else {
        println!("{}", render::hex_dump(header.raw()));
    }
    Ok(())
}
