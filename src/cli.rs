// Command-line front end for magic blocks.
//
// Explicit subcommands over the file helpers in `crate::io`, plus header
// inspection and a build/configuration dump.

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::codec::{DEFAULT_LEVEL, EncodeOptions};
use crate::format::header::{self, HEADER_SIZE, LZMA_PROPS_SIZE, MAGIC, Mode, VERSION};
use crate::io::{decode_file, encode_file};
use crate::transform::CipherKey;
use crate::transform::cipher::{IV_LEN, KEY_LEN};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Magic-block encoder/decoder.
#[derive(Parser, Debug)]
#[command(
    name = "magicblock",
    version,
    about = "Magic-block encoder/decoder (raw, AES-256-CBC, zlib, LZMA)",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats and headers as JSON.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Encode a file into a magic block.
    Encode(EncodeArgs),
    /// Decode a magic block back into its payload.
    Decode(DecodeArgs),
    /// Print the header of a magic block.
    Header(HeaderArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Raw,
    Cipher,
    Deflate,
    Lzma,
    DeflateCipher,
    LzmaCipher,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Raw => Mode::Raw,
            ModeArg::Cipher => Mode::Cipher,
            ModeArg::Deflate => Mode::Deflate,
            ModeArg::Lzma => Mode::Lzma,
            ModeArg::DeflateCipher => Mode::DeflateCipher,
            ModeArg::LzmaCipher => Mode::LzmaCipher,
        }
    }
}

#[derive(Args, Debug)]
struct KeyArgs {
    /// AES-256 key as 64 hex characters.
    #[arg(long, value_name = "HEX", requires = "iv")]
    key: Option<String>,

    /// CBC initialisation vector as 32 hex characters.
    #[arg(long, value_name = "HEX", requires = "key")]
    iv: Option<String>,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Transform to apply.
    #[arg(long, short = 'm', value_enum, default_value_t = ModeArg::Deflate)]
    mode: ModeArg,

    /// Compression level (0-9).
    #[arg(long, short = 'l', value_parser = clap::value_parser!(u32).range(0..=9), default_value_t = DEFAULT_LEVEL)]
    level: u32,

    #[command(flatten)]
    key: KeyArgs,

    /// Plaintext input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Magic-block output file.
    #[arg(value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    #[command(flatten)]
    key: KeyArgs,

    /// Magic-block input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Plaintext output file.
    #[arg(value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct HeaderArgs {
    /// Magic-block input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Encode,
    Decode,
    Header,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    mode: Mode,
    level: u32,
    key_hex: Option<String>,
    iv_hex: Option<String>,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
}

fn resolve_options(cli: Cli) -> Options {
    let base = Options {
        command: Command::Config,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
        mode: Mode::Deflate,
        level: DEFAULT_LEVEL,
        key_hex: None,
        iv_hex: None,
        input_file: None,
        output_file: None,
    };

    match cli.command {
        Cmd::Encode(args) => Options {
            command: Command::Encode,
            mode: args.mode.into(),
            level: args.level,
            key_hex: args.key.key,
            iv_hex: args.key.iv,
            input_file: Some(args.input),
            output_file: Some(args.output),
            ..base
        },
        Cmd::Decode(args) => Options {
            command: Command::Decode,
            key_hex: args.key.key,
            iv_hex: args.key.iv,
            input_file: Some(args.input),
            output_file: Some(args.output),
            ..base
        },
        Cmd::Header(args) => Options {
            command: Command::Header,
            input_file: Some(args.input),
            ..base
        },
        Cmd::Config => base,
    }
}

// ---------------------------------------------------------------------------
// Key parsing
// ---------------------------------------------------------------------------

fn parse_key(key_hex: Option<&str>, iv_hex: Option<&str>) -> Result<Option<CipherKey>, String> {
    let (key_hex, iv_hex) = match (key_hex, iv_hex) {
        (Some(k), Some(v)) => (k, v),
        (None, None) => return Ok(None),
        _ => return Err("--key and --iv must be given together".into()),
    };

    let key = hex::decode(key_hex.trim()).map_err(|e| format!("--key: {e}"))?;
    if key.len() != KEY_LEN {
        return Err(format!(
            "--key: expected {} hex characters, got {}",
            KEY_LEN * 2,
            key_hex.trim().len()
        ));
    }
    let iv = hex::decode(iv_hex.trim()).map_err(|e| format!("--iv: {e}"))?;
    if iv.len() != IV_LEN {
        return Err(format!(
            "--iv: expected {} hex characters, got {}",
            IV_LEN * 2,
            iv_hex.trim().len()
        ));
    }

    CipherKey::from_slices(&key, &iv)
        .map(Some)
        .map_err(|e| e.to_string())
}

fn resolve_key(opts: &Options) -> Result<Option<CipherKey>, i32> {
    parse_key(opts.key_hex.as_deref(), opts.iv_hex.as_deref()).map_err(|e| {
        eprintln!("magicblock: {e}");
        1
    })
}

fn require_paths(opts: &Options) -> Result<(&Path, &Path), i32> {
    match (&opts.input_file, &opts.output_file) {
        (Some(input), Some(output)) => Ok((input.as_path(), output.as_path())),
        _ => {
            eprintln!("magicblock: input and output files are required");
            Err(1)
        }
    }
}

fn check_overwrite(opts: &Options, output: &Path) -> Result<(), i32> {
    if output.exists() && !opts.force {
        eprintln!(
            "magicblock: to overwrite output file specify --force: {}",
            output.display()
        );
        return Err(1);
    }
    Ok(())
}

fn digest_hex(digest: Option<[u8; 32]>) -> Option<String> {
    digest.map(hex::encode)
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("magicblock version {version} (Rust)");

    let file_io = cfg!(feature = "file-io") as u8;
    let modes: Vec<String> = Mode::ALL
        .iter()
        .map(|m| format!("{}={}", m.name(), m.as_u32()))
        .collect();

    eprintln!("FILE_IO={file_io}");
    eprintln!("MAGIC=0x{MAGIC:08X}");
    eprintln!("VERSION={VERSION}");
    eprintln!("HEADER_SIZE={HEADER_SIZE}");
    eprintln!("LZMA_PROPS_SIZE={LZMA_PROPS_SIZE}");
    eprintln!("DEFAULT_LEVEL={DEFAULT_LEVEL}");
    eprintln!("MODES={}", modes.join(","));

    0
}

// ---------------------------------------------------------------------------
// Encode command
// ---------------------------------------------------------------------------

fn cmd_encode(opts: &Options) -> i32 {
    let (input, output) = match require_paths(opts) {
        Ok(paths) => paths,
        Err(code) => return code,
    };
    if let Err(code) = check_overwrite(opts, output) {
        return code;
    }
    let key = match resolve_key(opts) {
        Ok(key) => key,
        Err(code) => return code,
    };

    let encode_opts = EncodeOptions {
        mode: opts.mode,
        level: opts.level,
        key,
    };

    let stats = match encode_file(input, output, &encode_opts) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("magicblock: {}: {e}", input.display());
            return 1;
        }
    };

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "magicblock: {}: {} -> {} bytes ({})",
            input.display(),
            stats.input_size,
            stats.output_size,
            stats.mode
        );
    }

    if opts.json_output {
        let json = serde_json::json!({
            "input_size": stats.input_size,
            "output_size": stats.output_size,
            "mode": stats.mode.name(),
            "compressed_len": stats.header.compressed_len,
            "uncompressed_len": stats.header.uncompressed_len,
            "extra_len": stats.header.extra_len,
            "input_sha256": digest_hex(stats.input_sha256),
        });
        eprintln!("{json:#}");
    }

    0
}

// ---------------------------------------------------------------------------
// Decode command
// ---------------------------------------------------------------------------

fn cmd_decode(opts: &Options) -> i32 {
    let (input, output) = match require_paths(opts) {
        Ok(paths) => paths,
        Err(code) => return code,
    };
    if let Err(code) = check_overwrite(opts, output) {
        return code;
    }
    let key = match resolve_key(opts) {
        Ok(key) => key,
        Err(code) => return code,
    };

    let stats = match decode_file(input, output, key.as_ref()) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("magicblock: {}: {e}", input.display());
            return 1;
        }
    };

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "magicblock: {}: {} -> {} bytes ({})",
            input.display(),
            stats.input_size,
            stats.output_size,
            stats.mode
        );
    }

    if opts.json_output {
        let json = serde_json::json!({
            "input_size": stats.input_size,
            "output_size": stats.output_size,
            "mode": stats.mode.name(),
            "output_sha256": digest_hex(stats.output_sha256),
        });
        eprintln!("{json:#}");
    }

    0
}

// ---------------------------------------------------------------------------
// Header command
// ---------------------------------------------------------------------------

fn cmd_header(opts: &Options) -> i32 {
    let Some(input) = opts.input_file.as_deref() else {
        eprintln!("magicblock: header requires an input file");
        return 1;
    };

    let blob = match std::fs::read(input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("magicblock: {}: {e}", input.display());
            return 1;
        }
    };

    let hdr = match header::parse_header(&blob) {
        Ok(hdr) => hdr,
        Err(e) => {
            eprintln!("magicblock: invalid header: {e}");
            return 1;
        }
    };

    if opts.json_output {
        let json = serde_json::json!({
            "magic": MAGIC,
            "version": VERSION,
            "mode": hdr.mode.name(),
            "mode_id": hdr.mode.as_u32(),
            "compressed_len": hdr.compressed_len,
            "uncompressed_len": hdr.uncompressed_len,
            "extra_len": hdr.extra_len,
            "total_len": hdr.total_len(),
        });
        println!("{json:#}");
        return 0;
    }

    println!("magic:            0x{MAGIC:08X}");
    println!("version:          {VERSION}");
    println!("mode:             {} ({})", hdr.mode, hdr.mode.as_u32());
    println!("compressed_len:   {}", hdr.compressed_len);
    println!("uncompressed_len: {}", hdr.uncompressed_len);
    println!("extra_len:        {}", hdr.extra_len);
    println!("total_len:        {}", hdr.total_len());

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn default_filter(quiet: bool, verbose: u8) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    }
}

pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter(opts.quiet, opts.verbose)),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();

    let exit_code = match opts.command {
        Command::Encode => cmd_encode(&opts),
        Command::Decode => cmd_decode(&opts),
        Command::Header => cmd_header(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
