//! litquote - Quote and unquote C-style string literals
//!
//! This tool exposes the litquote-core codec on the command line, along
//! with the executable lookup and temp FIFO helpers.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use litquote_core::{quote, resolve, unquote, TempFifo, TempFifoConfig};
use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Quote and unquote C-style string literals
#[derive(Parser, Debug)]
#[command(name = "litquote")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Quote each argument, or stdin, as a string literal
    Quote(QuoteArgs),
    /// Decode string literals back to raw bytes
    Unquote(UnquoteArgs),
    /// Locate executables in a colon-separated search list
    Which(WhichArgs),
    /// Create a uniquely named FIFO and print its path
    Mkfifo(MkfifoArgs),
}

#[derive(Args, Debug)]
struct QuoteArgs {
    /// Text to quote (reads stdin when omitted)
    text: Vec<OsString>,

    /// Quote each line of stdin separately instead of the whole stream
    #[arg(short, long)]
    lines: bool,
}

#[derive(Args, Debug)]
struct UnquoteArgs {
    /// Literals to decode
    #[arg(required = true)]
    literals: Vec<String>,

    /// Reject literals that are not exactly what `quote` would produce
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Debug)]
struct WhichArgs {
    /// Command names or paths to resolve
    #[arg(required = true)]
    names: Vec<String>,

    /// Search list to use instead of $PATH
    #[arg(long, env = "PATH", hide_env_values = true, default_value = "")]
    path: String,
}

#[derive(Args, Debug)]
struct MkfifoArgs {
    /// File name prefix
    #[arg(short, long, default_value = "litquote-")]
    prefix: String,

    /// Directory to create the FIFO in (default: system temp directory)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Maximum number of names to try
    #[arg(long, default_value_t = litquote_core::fifo::DEFAULT_MAX_ATTEMPTS)]
    attempts: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &cli.command {
        Command::Quote(args) => run_quote(args, io::stdin().lock(), &mut out),
        Command::Unquote(args) => run_unquote(args, &mut out),
        Command::Which(args) => run_which(args, &mut out),
        Command::Mkfifo(args) => run_mkfifo(args, &mut out),
    }?;
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}

/// Quote arguments, or stdin when there are none
fn run_quote(args: &QuoteArgs, mut input: impl BufRead, out: &mut impl Write) -> Result<()> {
    if !args.text.is_empty() {
        for text in &args.text {
            writeln!(out, "{}", quote(text.as_encoded_bytes()))?;
        }
        return Ok(());
    }

    debug!("Reading stdin");
    if args.lines {
        let mut line = Vec::new();
        loop {
            line.clear();
            let n = input
                .read_until(b'\n', &mut line)
                .context("Failed to read stdin")?;
            if n == 0 {
                break;
            }
            let content = line.strip_suffix(b"\n").unwrap_or(&line[..]);
            writeln!(out, "{}", quote(content))?;
        }
    } else {
        let mut data = Vec::new();
        input
            .read_to_end(&mut data)
            .context("Failed to read stdin")?;
        info!("Quoting {} bytes", data.len());
        writeln!(out, "{}", quote(&data))?;
    }
    Ok(())
}

/// Decode one literal, optionally insisting on the canonical form
fn unquote_checked(literal: &str, strict: bool) -> Result<Vec<u8>> {
    let raw = unquote(literal).with_context(|| format!("Failed to unquote {}", literal))?;
    if strict {
        let canonical = quote(&raw);
        if canonical != literal {
            bail!(
                "Literal {} is not in canonical form (expected {})",
                literal,
                canonical
            );
        }
    }
    Ok(raw.into_owned())
}

fn run_unquote(args: &UnquoteArgs, out: &mut impl Write) -> Result<()> {
    for literal in &args.literals {
        let raw = unquote_checked(literal, args.strict)?;
        out.write_all(&raw)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

fn run_which(args: &WhichArgs, out: &mut impl Write) -> Result<()> {
    let mut failed = 0;
    for name in &args.names {
        match resolve(name, &args.path) {
            Ok(resolved) => {
                if !resolved.executable {
                    warn!("{} is a directory", resolved.path.display());
                }
                writeln!(out, "{}", resolved.path.display())?;
            }
            Err(e) => {
                // Log error but continue with other names
                warn!("{}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} names could not be resolved", failed, args.names.len());
    }
    Ok(())
}

fn run_mkfifo(args: &MkfifoArgs, out: &mut impl Write) -> Result<()> {
    let mut config = TempFifoConfig::new().max_attempts(args.attempts);
    if let Some(dir) = &args.dir {
        config = config.dir(dir);
    }

    let path = TempFifo::with_config(config)
        .create(&args.prefix)
        .with_context(|| format!("Failed to create fifo with prefix {}", args.prefix))?;
    info!("Created {}", path.display());
    writeln!(out, "{}", path.display())?;
    Ok(())
}
