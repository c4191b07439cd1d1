//! Shared plumbing for the converter binaries

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser};
use std::path::{Path, PathBuf};

/// Arguments of every stand-alone converter
#[derive(Debug, Parser)]
pub struct ConvertArgs {
    /// Input file
    pub input: PathBuf,

    /// Output file (replaced if it exists)
    pub output: PathBuf,
}

/// Log to stderr, INFO and above unless RUST_LOG says otherwise
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point of a `<name> <input> <output>` converter
///
/// Argument errors exit through clap with its usage message. On success a
/// single line naming the output goes to stdout.
pub fn run_converter(
    name: &'static str,
    about: &'static str,
    convert: fn(&Path, &Path) -> Result<()>,
) -> Result<()> {
    let matches = ConvertArgs::command().name(name).about(about).get_matches();
    let args = ConvertArgs::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_logging();
    tracing::info!("Converting {:?} -> {:?}", args.input, args.output);
    convert(&args.input, &args.output)?;

    println!("{}: wrote {}", name, args.output.display());
    Ok(())
}
