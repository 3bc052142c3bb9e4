/// Implementation of `segd-header inspect`.
///
/// Decodes the header and prints every field in the configured layout.
///
/// # Output format
///
/// ```text
/// Header: shot_1001.segd, 32 bytes, 20 fields
/// file_number           0+2          be  bcd       1001
/// format_code           2+2          be  bcd       8058
/// additional_gh_blocks  11+2[0..4]   be  unsigned  2
/// day                   11+2[4..16]  be  bcd       6
/// ...
/// ```
///
/// With `--json`:
///
/// ```json
/// { "file": "shot_1001.segd", "headerSize": 32, "raw": [16, 1, ...],
///   "fields": { "file_number": 1001, "format_code": 8058, ... } }
/// ```
use std::path::Path;

use anyhow::{Context, Result};
use segd_decoder::{Header, render};
use segd_wire::{FieldValue, WireError};
use serde_json::{Map, Value, json};

use crate::InspectArgs;

/// Run the `segd-header inspect` command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the header cannot be
/// read, or JSON serialization fails.
pub fn run(args: &InspectArgs) -> Result<()> {
    let decoder = args.decode.build_decoder()?;
    let header = decoder
        .decode_path(&args.file)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    if args.json {
        let doc = header_json(&args.file, &header);
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let count = header.layout().len();
    println!(
        "Header: {}, {} bytes, {count} field{}",
        args.file.display(),
        header.len(),
        if count == 1 { "" } else { "s" }
    );
    if count == 0 {
        println!("(no fields configured; use --preset, --config or --field)");
    } else {
        println!("{}", render::field_table(&header));
    }
    Ok(())
}

// ── JSON helpers ──────────────────────────────────────────────────────────────

fn header_json(path: &Path, header: &Header) -> Value {
    let fields: Map<String, Value> = header
        .fields()
        .map(|(spec, value)| (spec.name.clone(), value_json(value)))
        .collect();
    json!({
        "file": path.display().to_string(),
        "headerSize": header.len(),
        "raw": header.raw(),
        "fields": fields,
    })
}

/// Numbers stay numbers; BCD escapes and byte strings become hex strings.
fn value_json(value: Result<FieldValue, WireError>) -> Value {
    match value {
        Ok(FieldValue::Unsigned(v)) => json!(v),
        Ok(FieldValue::Signed(v)) => json!(v),
        Ok(FieldValue::Fraction(v)) => json!(v),
        Ok(v @ (FieldValue::NonDecimal { .. } | FieldValue::Bytes(_))) => json!(v.to_string()),
        Err(e) => json!({ "error": e.to_string() }),
    }
}
