//! `slogo`: a line-oriented SLogo REPL.
//!
//! Reads one program line at a time from standard input and prints each
//! result record, as plain text or as JSON.

use clap::Parser;
use slogo_session::{ExecutionResult, Session, SessionConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "slogo", version, about = "SLogo interpreter")]
struct Cli {
    /// Language pack for command names.
    #[arg(long, short)]
    language: Option<String>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay a saved command history before reading input.
    #[arg(long)]
    load: Option<PathBuf>,

    /// Print each result record as a JSON object.
    #[arg(long)]
    json: bool,

    /// Log filter, e.g. `debug` or `slogo_eval=trace`. Defaults to `RUST_LOG`.
    #[arg(long)]
    log: Option<String>,

    /// Stop evaluating a line after this many nodes.
    #[arg(long)]
    step_limit: Option<u64>,
}

fn init_tracing(directives: Option<&str>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match directives {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn print_result(out: &mut impl Write, result: &ExecutionResult, json: bool) -> io::Result<()> {
    if json {
        let line = serde_json::to_string(result).map_err(io::Error::other)?;
        writeln!(out, "{line}")
    } else if result.error {
        writeln!(out, "error: {}", result.return_value)
    } else {
        writeln!(out, "{}", result.return_value)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());

    let mut config = match &cli.config {
        Some(path) => SessionConfig::from_json_file(path)?,
        None => SessionConfig::default(),
    };
    if let Some(language) = cli.language {
        config.language = language;
    }
    if cli.step_limit.is_some() {
        config.step_limit = cli.step_limit;
    }

    let mut session = Session::new(config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(path) = &cli.load {
        for result in session.load_history(path)? {
            print_result(&mut out, &result, cli.json)?;
        }
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let result = session.execute(&line);
        print_result(&mut out, &result, cli.json)?;
        out.flush()?;
    }

    Ok(())
}
