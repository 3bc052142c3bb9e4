//! Decode options shared by every sub-command.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use log::debug;
use segd_decoder::{DecoderConfig, HeaderDecoder, Preset};
use segd_wire::{ByteOrder, FieldEncoding, FieldSpec};

/// Built-in layouts selectable with `--preset`.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum PresetArg {
    /// 32 bytes, no named fields.
    #[default]
    Raw,
    /// SEG-D general header block #1 (32 bytes).
    SegdGeneralHeader,
    /// SEG-D general header blocks #1 and #2 (64 bytes, revision check).
    SegdRev2,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Raw => Preset::Raw,
            PresetArg::SegdGeneralHeader => Preset::SegdGeneralHeader,
            PresetArg::SegdRev2 => Preset::SegdRev2,
        }
    }
}

/// Options that build the [`HeaderDecoder`].
///
/// ```text
/// ┌───────────────┬──────────────────────────────────────────────────┐
/// │ Flag          │ Effect                                           │
/// ├───────────────┼──────────────────────────────────────────────────┤
/// │ --preset      │ Start from a built-in layout (default raw)       │
/// │ --config      │ Start from a JSON config file instead            │
/// │ --header-size │ Override the window size                         │
/// │ --strict      │ Turn on magic/version checks                     │
/// │ --field       │ Append a field (repeatable)                      │
/// └───────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct DecodeOpts {
    /// Built-in field layout.
    #[arg(long, value_enum, default_value_t = PresetArg::Raw)]
    pub preset: PresetArg,

    /// JSON decoder configuration file.
    #[arg(long, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Header window size in bytes.
    #[arg(long)]
    pub header_size: Option<usize>,

    /// Enable magic/version validation.
    #[arg(long)]
    pub strict: bool,

    /// Extra field as `name:offset:width[:be|le][:encoding]`.
    ///
    /// Encodings: unsigned (default), signed, bcd, fraction, bytes.
    #[arg(long = "field", value_name = "SPEC", value_parser = parse_field)]
    pub fields: Vec<FieldSpec>,
}

impl DecodeOpts {
    /// Resolve the flags into a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `--config` cannot be read or parsed.
    pub fn config(&self) -> Result<DecoderConfig> {
        let mut config = match &self.config {
            // Flattened to a message: a config that cannot be opened is a
            // usage error, not an unopenable input, when picking exit codes.
            Some(path) => DecoderConfig::from_path(path)
                .map_err(|e| anyhow!("cannot load config {}: {e}", path.display()))?,
            None => DecoderConfig::preset(self.preset.into()),
        };

        if let Some(size) = self.header_size {
            config.header_size = size;
        }
        if self.strict {
            config.strict_magic_check = true;
        }
        for field in &self.fields {
            config.field_layout.push(field.clone());
        }
        debug!(
            "decoder config: {} bytes, strict={}, {} fields",
            config.header_size,
            config.strict_magic_check,
            config.field_layout.len()
        );
        Ok(config)
    }

    /// Build a decoder from an already-resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn decoder(config: DecoderConfig) -> Result<HeaderDecoder> {
        HeaderDecoder::new(config).context("invalid decoder configuration")
    }

    /// Resolve the flags and build a decoder in one step.
    ///
    /// # Errors
    ///
    /// See [`config`](Self::config) and [`decoder`](Self::decoder).
    pub fn build_decoder(&self) -> Result<HeaderDecoder> {
        Self::decoder(self.config()?)
    }
}

/// Parse `name:offset:width[:be|le][:encoding]`.
fn parse_field(s: &str) -> Result<FieldSpec, String> {
    let mut parts = s.split(':');
    let (Some(name), Some(offset), Some(width)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected name:offset:width, got {s:?}"));
    };
    if name.is_empty() {
        return Err("field name must not be empty".to_string());
    }
    let offset: usize = offset
        .parse()
        .map_err(|e| format!("bad offset {offset:?}: {e}"))?;
    let width: usize = width
        .parse()
        .map_err(|e| format!("bad width {width:?}: {e}"))?;

    let mut spec = FieldSpec::new(name, offset, width);
    for modifier in parts {
        match modifier {
            "be" | "big" => spec.byte_order = ByteOrder::BigEndian,
            "le" | "little" => spec.byte_order = ByteOrder::LittleEndian,
            "unsigned" => spec.encoding = FieldEncoding::Unsigned,
            "signed" => spec.encoding = FieldEncoding::Signed,
            "bcd" => spec.encoding = FieldEncoding::Bcd,
            "fraction" => spec.encoding = FieldEncoding::Fraction,
            "bytes" => spec.encoding = FieldEncoding::Bytes,
            other => return Err(format!("unknown field modifier {other:?}")),
        }
    }
    Ok(spec)
}
