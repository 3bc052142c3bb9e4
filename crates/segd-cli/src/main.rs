/// `segd-header` — read the fixed-size header of SEG-D style files.
///
/// # Command overview
///
/// ```text
/// segd-header <COMMAND> [OPTIONS] <FILE>
///
/// Commands:
///   inspect    Print the named header fields
///   dump       Print the raw header bytes (hex, or decimal one per line)
///   validate   Decode with strict magic/version checks and report
///   help       Print help information
///
/// Decode options (all commands):
///   --preset <raw|segd-general-header|segd-rev2>
///   --config <PATH>        JSON decoder configuration (replaces --preset)
///   --header-size <N>      Override the header window size
///   --strict               Enable magic/version checks
///   --field <SPEC>         Add a field: name:offset:width[:be|le][:encoding]
///
/// Global options:
///   -v, --verbose    Debug logging (RUST_LOG also respected)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                      |
/// |------|----------------------------------------------|
/// | 0    | Success                                      |
/// | 1    | Other error (I/O failure, bad config, ...)   |
/// | 2    | Input could not be opened                    |
/// | 3    | Input shorter than the header window         |
/// | 4    | Magic or version check failed                |
///
/// All error details are written to stderr so stdout can be piped cleanly,
/// once per failure.
use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use segd_decoder::DecodeError;

mod cmd_dump;
mod cmd_inspect;
mod cmd_validate;
mod options;

use options::DecodeOpts;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Read and interpret the fixed-size header of SEG-D style seismic files.
#[derive(Parser)]
#[command(name = "segd-header", version, about = "SEG-D header reader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print the named fields of a file's header.
    Inspect(InspectArgs),
    /// Print the raw header bytes.
    Dump(DumpArgs),
    /// Decode with strict checks and report the result.
    Validate(ValidateArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `segd-header inspect`.
///
/// Decodes the header and prints one aligned line per configured field.
/// With `--json` the same data is written as a JSON object instead.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// File to read.
    pub file: PathBuf,

    /// Emit JSON instead of a text table.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub decode: DecodeOpts,
}

/// Arguments for `segd-header dump`.
#[derive(clap::Args)]
pub struct DumpArgs {
    /// File to read.
    pub file: PathBuf,

    /// Print each byte as a decimal value on its own line.
    #[arg(long)]
    pub decimal: bool,

    #[command(flatten)]
    pub decode: DecodeOpts,
}

/// Arguments for `segd-header validate`.
///
/// Strict mode is always on for this command, whatever `--strict` says.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// File to validate.
    pub file: PathBuf,

    #[command(flatten)]
    pub decode: DecodeOpts,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Dump(args) => cmd_dump::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
    };

    if let Err(e) = result {
        if let Some(line) = report(&e) {
            eprintln!("{line}");
        }
        process::exit(exit_code(&e));
    }
}

// Library warnings repeat errors that are returned anyway; show them only
// when asked for.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "error" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

// ── Error reporting ───────────────────────────────────────────────────────────

/// Context attached to a failure the command has already explained on
/// stderr. `main` still uses the wrapped error for the exit code.
#[derive(Debug)]
pub struct Reported;

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failure already reported")
    }
}

/// The stderr line for a failed command, or `None` if the command has
/// printed its own diagnostic.
fn report(err: &anyhow::Error) -> Option<String> {
    if err.downcast_ref::<Reported>().is_some() {
        None
    } else {
        Some(format!("error: {err:#}"))
    }
}

/// Map the underlying [`DecodeError`] (if any) to a process exit code.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<DecodeError>() {
        Some(e) if e.is_unopenable() => 2,
        Some(DecodeError::Truncated { .. }) => 3,
        Some(e) if e.is_structural() => 4,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn exit_codes_follow_error_kind() {
        let truncated: anyhow::Result<()> = Err(DecodeError::Truncated {
            expected: 32,
            actual: 10,
        })
        .context("failed to decode short.segd");
        assert_eq!(exit_code(&truncated.unwrap_err()), 3);

        let missing = anyhow::Error::new(DecodeError::NotFound {
            path: PathBuf::from("gone.segd"),
        });
        assert_eq!(exit_code(&missing), 2);

        let magic = anyhow::Error::new(DecodeError::InvalidMagic {
            offset: 0,
            found: vec![0],
        });
        assert_eq!(exit_code(&magic), 4);

        assert_eq!(exit_code(&anyhow::anyhow!("something else")), 1);
    }

    #[test]
    fn reported_failures_print_once() {
        let reported: anyhow::Result<()> = Err(DecodeError::Truncated {
            expected: 32,
            actual: 10,
        })
        .context(Reported);
        let err = reported.unwrap_err();
        assert_eq!(report(&err), None);
        assert_eq!(exit_code(&err), 3);

        let plain = anyhow::anyhow!("bad flag");
        assert_eq!(report(&plain).as_deref(), Some("error: bad flag"));
    }

    #[test]
    fn missing_config_is_not_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let opts = DecodeOpts {
            preset: options::PresetArg::Raw,
            config: Some(dir.path().join("absent.json")),
            header_size: None,
            strict: false,
            fields: Vec::new(),
        };
        let err = opts.config().unwrap_err();
        assert!(format!("{err:#}").contains("cannot load config"));
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn parses_inspect_with_fields() {
        let cli = Cli::try_parse_from([
            "segd-header",
            "inspect",
            "shot.segd",
            "--field",
            "first:0:1",
            "--field",
            "count:4:2:le",
            "--strict",
        ])
        .unwrap();
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.decode.fields.len(), 2);
        assert!(args.decode.strict);
    }
}
