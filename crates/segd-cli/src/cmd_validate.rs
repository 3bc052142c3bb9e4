/// Implementation of `segd-header validate`.
///
/// Decodes the header with strict checks forced on and reports either a
/// series of success checkmarks (`✓`) on stdout, or a single diagnostic
/// failure line (`✗`) on stderr. A failure is returned as an error marked
/// [`Reported`] so `main` picks the exit code without printing it again.
///
/// # Success output
///
/// ```text
/// ✓ Size: 64 bytes read
/// ✓ Magic: not configured
/// ✓ Version: major_segd_revision = 3
/// ✓ Fields: 30 decoded
/// ```
///
/// # Failure output
///
/// ```text
/// ✗ Error: short.segd: truncated header (10 of 32 bytes)
/// ```
use anyhow::{Context, Result};
use segd_decoder::DecodeError;

use crate::{Reported, ValidateArgs};
use crate::options::DecodeOpts;

/// Run the `segd-header validate` command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, or if the file fails
/// any read or structural check. The [`DecodeError`] stays attached.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let mut config = args.decode.config()?;
    config.strict_magic_check = true;
    let decoder = DecodeOpts::decoder(config)?;

    match decoder.decode_path(&args.file) {
        Ok(header) => {
            let config = decoder.config();
            println!("✓ Size: {} bytes read", header.len());
            match &config.magic {
                Some(magic) => println!("✓ Magic: matched at offset {}", magic.offset),
                None => println!("✓ Magic: not configured"),
            }
            match &config.version {
                Some(version) => {
                    let value = header.read(&version.field)?;
                    println!("✓ Version: {} = {value}", version.field.name);
                }
                None => println!("✓ Version: not configured"),
            }
            let decoded = header.fields().filter(|(_, v)| v.is_ok()).count();
            println!("✓ Fields: {decoded} decoded");
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Error: {}: {}", args.file.display(), diagnostic(&e));
            Err(e).context(Reported)
        }
    }
}

// ── Error formatting ──────────────────────────────────────────────────────────

/// A one-line explanation of why the file failed.
///
/// ```text
/// ┌────────────────────┬──────────────────────────────────────────────┐
/// │ DecodeError        │ Diagnostic                                   │
/// ├────────────────────┼──────────────────────────────────────────────┤
/// │ Truncated          │ "truncated header (N of M bytes)"            │
/// │ InvalidMagic       │ "bad magic at offset O: found [..]"          │
/// │ UnsupportedVersion │ "unsupported version V (known: [..])"        │
/// │ Io                 │ "<error>: <os error>"                        │
/// │ anything else      │ "<error Display>"                            │
/// └────────────────────┴──────────────────────────────────────────────┘
/// ```
fn diagnostic(e: &DecodeError) -> String {
    match e {
        DecodeError::Truncated { expected, actual } => {
            format!("truncated header ({actual} of {expected} bytes)")
        }
        DecodeError::InvalidMagic { offset, found } => {
            format!("bad magic at offset {offset}: found {found:02X?}")
        }
        DecodeError::UnsupportedVersion { found, supported } => {
            format!("unsupported version {found} (known: {supported:?})")
        }
        DecodeError::Io { source, .. } => format!("{e}: {source}"),
        other => other.to_string(),
    }
}
