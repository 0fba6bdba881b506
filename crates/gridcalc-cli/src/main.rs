//! gridcalc CLI - run a sheet script and print the result

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gridcalc::{Sheet, SheetOptions};
use tracing_subscriber::EnvFilter;

mod script;

#[derive(Parser)]
#[command(name = "gridcalc")]
#[command(author, version, about = "Run a spreadsheet script and print the sheet")]
struct Cli {
    /// Script file (default: stdin)
    script: Option<PathBuf>,

    /// What to print once the script has run
    #[arg(short, long, value_enum, default_value_t = PrintMode::Values)]
    print: PrintMode,

    /// Number of usable rows
    #[arg(long, default_value_t = SheetOptions::default().max_rows())]
    max_rows: i32,

    /// Number of usable columns
    #[arg(long, default_value_t = SheetOptions::default().max_cols())]
    max_cols: i32,

    /// Log filter used when RUST_LOG is not set (e.g. "debug", "gridcalc=trace")
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PrintMode {
    Values,
    Texts,
    Both,
    /// Print nothing after the script
    #[value(name = "none")]
    Nothing,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open '{}'", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let mut sheet = Sheet::with_options(SheetOptions::new(cli.max_rows, cli.max_cols));
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut errors = io::stderr().lock();

    let failures = script::run(&mut sheet, input, &mut out, &mut errors)?;

    if matches!(cli.print, PrintMode::Values | PrintMode::Both) {
        sheet
            .print_values(&mut out)
            .context("Failed to write to stdout")?;
    }
    if matches!(cli.print, PrintMode::Texts | PrintMode::Both) {
        sheet
            .print_texts(&mut out)
            .context("Failed to write to stdout")?;
    }
    out.flush().context("Failed to write to stdout")?;

    if failures > 0 {
        eprintln!("{} script line(s) failed", failures);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn init_logging(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("Invalid log level '{}'", default_filter))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}
