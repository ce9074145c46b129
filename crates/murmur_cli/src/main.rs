//! Murmur CLI — the command-line front end for cached speech synthesis.
//!
//! Provides `murmur synth` for synthesizing text through the configured
//! backend, `murmur fingerprint` and `murmur validate` for inspecting a
//! request without synthesizing it, and `murmur cache` for managing the
//! on-disk cache directory.

#![warn(missing_docs)]

mod cache;
mod service;
mod synth;
mod validate;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Murmur — cached speech synthesis.
#[derive(Parser, Debug)]
#[command(name = "murmur", version, about = "Cached speech synthesis")]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) log output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `murmur.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synthesize text, serving it from the cache when possible.
    Synth(SynthArgs),
    /// Print the request id a text would be cached under.
    Fingerprint(FingerprintArgs),
    /// Check that a text is well-formed speech markup.
    Validate {
        /// Text or speech markup to check.
        text: String,
    },
    /// Inspect or clear the cache directory.
    Cache {
        /// The cache action to perform.
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Arguments for the `murmur synth` subcommand.
#[derive(Parser, Debug)]
pub struct SynthArgs {
    /// Text or speech markup to synthesize.
    pub text: String,

    /// File to write the audio to. If omitted, only the request id is
    /// printed.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Per-call request option (e.g., `--option VoiceId=Joanna`).
    #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
    pub options: Vec<(String, String)>,

    /// Bypass the cache for this call.
    #[arg(long)]
    pub no_cache: bool,
}

/// Arguments for the `murmur fingerprint` subcommand.
#[derive(Parser, Debug)]
pub struct FingerprintArgs {
    /// Text or speech markup to fingerprint.
    pub text: String,

    /// Per-call request option (e.g., `--option VoiceId=Joanna`).
    #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
    pub options: Vec<(String, String)>,
}

/// Actions of the `murmur cache` subcommand.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    /// Print the resolved cache directory.
    Path,
    /// List cached request ids.
    List,
    /// Delete every cached entry.
    Purge,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

/// Parses a `KEY=VALUE` request option.
fn parse_option(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

/// Installs the stderr log subscriber.
///
/// `-q` and `-v` take precedence over `RUST_LOG`; without either flag the
/// filter comes from `RUST_LOG`, defaulting to warnings only.
fn init_logging(global: &GlobalArgs) {
    let filter = if global.quiet {
        EnvFilter::new("error")
    } else if global.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Synth(ref args) => synth::run(args, &global),
        Command::Fingerprint(ref args) => synth::fingerprint(args, &global),
        Command::Validate { ref text } => validate::run(text),
        Command::Cache { action } => cache::run(action, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
