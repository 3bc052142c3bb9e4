use std::path::Path;

use segd_wire::{DEFAULT_HEADER_SIZE, FieldEncoding, FieldLayout, FieldSpec};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::source::ByteSource;

/// Configuration for a [`HeaderDecoder`](crate::HeaderDecoder).
///
/// ```text
/// ┌──────────────────┬──────────────────────────────────────────────────┐
/// │ Key              │ Purpose                                          │
/// ├──────────────────┼──────────────────────────────────────────────────┤
/// │ headerSize       │ Bytes in the header window (default 32)          │
/// │ strictMagicCheck │ Enables the magic and version checks             │
/// │ magic            │ Accepted marker values at a fixed offset         │
/// │ version          │ Version field and the values it may hold         │
/// │ fieldLayout      │ Named fields exposed on the decoded Header       │
/// └──────────────────┴──────────────────────────────────────────────────┘
/// ```
///
/// With `strictMagicCheck` off, `magic` and `version` are ignored and any
/// window of the right size decodes. This is the default: most callers
/// only want raw field extraction.
///
/// Loaded from JSON with camelCase keys; unknown keys are rejected so a
/// typo in a config file does not silently disable a check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DecoderConfig {
    pub header_size: usize,
    pub strict_magic_check: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magic: Option<MagicSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionSpec>,
    pub field_layout: FieldLayout,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            header_size: DEFAULT_HEADER_SIZE,
            strict_magic_check: false,
            magic: None,
            version: None,
            field_layout: FieldLayout::default(),
        }
    }
}

/// Marker bytes expected at a fixed offset. Any one of `values` matching
/// is accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MagicSpec {
    pub offset: usize,
    pub values: Vec<Vec<u8>>,
}

impl MagicSpec {
    pub fn new(offset: usize, value: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            values: vec![value.into()],
        }
    }

    /// Accept another marker value at the same offset.
    #[must_use]
    pub fn or(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.values.push(value.into());
        self
    }

    /// True if any configured value matches `raw` at `offset`.
    pub fn matches(&self, raw: &[u8]) -> bool {
        self.values.iter().any(|value| {
            self.offset
                .checked_add(value.len())
                .and_then(|end| raw.get(self.offset..end))
                .is_some_and(|window| window == value.as_slice())
        })
    }

    /// Width of the longest configured value.
    pub fn width(&self) -> usize {
        self.values.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// A numeric version field and the values this decoder understands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionSpec {
    pub field: FieldSpec,
    pub supported: Vec<u64>,
}

/// Built-in layouts.
///
/// ```text
/// ┌────────────────────┬──────┬──────────────────────────────────────┐
/// │ Preset             │ Size │ Contents                             │
/// ├────────────────────┼──────┼──────────────────────────────────────┤
/// │ Raw                │ 32   │ No fields, no checks                 │
/// │ SegdGeneralHeader  │ 32   │ SEG-D general header block #1        │
/// │ SegdRev2           │ 64   │ Blocks #1 and #2, revision check     │
/// └────────────────────┴──────┴──────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    Raw,
    SegdGeneralHeader,
    SegdRev2,
}

impl DecoderConfig {
    /// Configuration for a built-in layout.
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Raw => Self::default(),
            Preset::SegdGeneralHeader => Self {
                field_layout: segd_general_header_1(),
                ..Self::default()
            },
            Preset::SegdRev2 => {
                let mut field_layout = segd_general_header_1();
                for field in segd_general_header_2() {
                    field_layout.push(field);
                }
                Self {
                    header_size: 2 * DEFAULT_HEADER_SIZE,
                    version: Some(VersionSpec {
                        field: FieldSpec::new("major_segd_revision", 42, 1),
                        supported: vec![1, 2, 3],
                    }),
                    field_layout,
                    ..Self::default()
                }
            }
        }
    }

    /// Parse a JSON configuration document.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Json`] on malformed JSON or unknown keys.
    pub fn from_json_str(json: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Open/read errors as for [`ByteSource::open`], then
    /// [`DecodeError::Json`] on parse failure.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let mut source = ByteSource::open(path)?;
        // Pipes and procfs files report no (or a zero) length; read to EOF.
        let bytes = source.read_to_end()?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Enable strict structural checks.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict_magic_check = true;
        self
    }

    #[must_use]
    pub fn with_header_size(mut self, header_size: usize) -> Self {
        self.header_size = header_size;
        self
    }

    #[must_use]
    pub fn with_magic(mut self, magic: MagicSpec) -> Self {
        self.magic = Some(magic);
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: VersionSpec) -> Self {
        self.version = Some(version);
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.field_layout.push(field);
        self
    }

    /// Check that every configured range fits the header window.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::InvalidConfig`] for a zero header size, an empty
    ///   magic value list or value, an out-of-range magic, a non-numeric
    ///   version field, or an empty supported-version list.
    /// - [`DecodeError::Layout`] if a field or the version field does not
    ///   fit.
    pub fn validate(&self) -> Result<(), DecodeError> {
        if self.header_size == 0 {
            return Err(DecodeError::InvalidConfig(
                "headerSize must be at least 1".to_string(),
            ));
        }

        self.field_layout.validate(self.header_size)?;

        if let Some(magic) = &self.magic {
            if magic.values.is_empty() || magic.values.iter().any(Vec::is_empty) {
                return Err(DecodeError::InvalidConfig(
                    "magic values must be non-empty".to_string(),
                ));
            }
            let fits = magic
                .offset
                .checked_add(magic.width())
                .is_some_and(|end| end <= self.header_size);
            if !fits {
                return Err(DecodeError::InvalidConfig(format!(
                    "magic at offset {} (width {}) exceeds header size {}",
                    magic.offset,
                    magic.width(),
                    self.header_size
                )));
            }
        }

        if let Some(version) = &self.version {
            version.field.validate(self.header_size)?;
            if !matches!(
                version.field.encoding,
                FieldEncoding::Unsigned | FieldEncoding::Bcd
            ) {
                return Err(DecodeError::InvalidConfig(format!(
                    "version field {:?} must be unsigned or bcd",
                    version.field.name
                )));
            }
            if version.supported.is_empty() {
                return Err(DecodeError::InvalidConfig(
                    "version.supported must list at least one value".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn bcd(name: &str, offset: usize, width: usize) -> FieldSpec {
    FieldSpec::new(name, offset, width).with_encoding(FieldEncoding::Bcd)
}

/// SEG-D general header block #1. All multi-byte values are big endian;
/// most are BCD, with 4-bit and 12-bit values sharing bytes.
///
/// ```text
/// ┌────────┬───────┬──────────────────────────────┬──────────────────┐
/// │ Offset │ Width │ Field                        │ Encoding         │
/// ├────────┼───────┼──────────────────────────────┼──────────────────┤
/// │ 0      │ 2     │ file_number                  │ bcd (FFFF=ext.)  │
/// │ 2      │ 2     │ format_code                  │ bcd              │
/// │ 4      │ 6     │ general_constants            │ bytes            │
/// │ 10     │ 1     │ year                         │ bcd              │
/// │ 11     │ 2     │ additional_gh_blocks         │ bits 0..4        │
/// │ 11     │ 2     │ day                          │ bcd bits 4..16   │
/// │ 13-15  │ 1 ea. │ hour, minute, second         │ bcd              │
/// │ 16     │ 1     │ manufacturer_code            │ bcd              │
/// │ 17     │ 2     │ manufacturer_serial          │ bcd              │
/// │ 22     │ 1     │ base_scan_interval           │ unsigned (1/16)  │
/// │ 23     │ 1     │ polarity                     │ bits 0..4        │
/// │ 25     │ 2     │ record_type                  │ bits 0..4        │
/// │ 25     │ 2     │ record_length                │ bcd bits 4..16   │
/// │ 27-31  │ 1 ea. │ scan types, channel sets,    │ bcd (FF=ext.)    │
/// │        │       │ skew, extended, external     │                  │
/// └────────┴───────┴──────────────────────────────┴──────────────────┘
/// ```
fn segd_general_header_1() -> FieldLayout {
    FieldLayout::new(vec![
        bcd("file_number", 0, 2),
        bcd("format_code", 2, 2),
        FieldSpec::new("general_constants", 4, 6).with_encoding(FieldEncoding::Bytes),
        bcd("year", 10, 1),
        FieldSpec::new("additional_gh_blocks", 11, 2).with_bits(0, 4),
        bcd("day", 11, 2).with_bits(4, 12),
        bcd("hour", 13, 1),
        bcd("minute", 14, 1),
        bcd("second", 15, 1),
        bcd("manufacturer_code", 16, 1),
        bcd("manufacturer_serial", 17, 2),
        FieldSpec::new("base_scan_interval", 22, 1),
        FieldSpec::new("polarity", 23, 1).with_bits(0, 4),
        FieldSpec::new("record_type", 25, 2).with_bits(0, 4),
        bcd("record_length", 25, 2).with_bits(4, 12),
        bcd("scan_types_per_record", 27, 1),
        bcd("channel_sets_per_scan_type", 28, 1),
        bcd("skew_blocks", 29, 1),
        bcd("extended_header_blocks", 30, 1),
        bcd("external_header_blocks", 31, 1),
    ])
}

/// SEG-D general header block #2 (bytes 32..64), binary big endian.
fn segd_general_header_2() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("expanded_file_number", 32, 3),
        FieldSpec::new("extended_channel_sets", 35, 2),
        FieldSpec::new("extended_header_blocks_ext", 37, 2),
        FieldSpec::new("external_header_blocks_ext", 39, 2),
        FieldSpec::new("major_segd_revision", 42, 1),
        FieldSpec::new("minor_segd_revision", 43, 1),
        FieldSpec::new("general_trailer_blocks", 44, 2),
        FieldSpec::new("extended_record_length", 46, 3),
        FieldSpec::new("gh2_block_number", 50, 1),
        FieldSpec::new("sequence_number", 52, 2),
    ]
}
