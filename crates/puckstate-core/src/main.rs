//! Puckstate - Team Performance-State Inference
//!
//! The CLI entry point, handling:
//! - Game-stats CSV ingestion and validation
//! - HMM fitting, decoding, and labeling via the pipeline
//! - Report rendering to stdout (JSON, table, or summary)
//! - Structured error reporting on stderr with stable exit codes

use clap::{Args, Parser, Subcommand};
use puckstate_common::error::format_error_human;
use puckstate_common::{Error, HmmSettings, OutputFormat, StructuredError};
use puckstate_core::exit_codes::ExitCode;
use puckstate_core::logging::{init_logging, LogConfig};
use puckstate_core::{ingest, pipeline};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

/// Puckstate - infer a team's hidden performance states from game stats
#[derive(Parser)]
#[command(name = "puckstate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the model and print the annotated season report
    Analyze(AnalyzeArgs),

    /// Validate a game-stats CSV without fitting
    Check(CheckArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Path to the game-stats CSV
    input: PathBuf,

    /// Number of hidden states (2-5)
    #[arg(long, short = 's', default_value_t = 3)]
    states: usize,

    /// Override the initialization seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the EM iteration cap
    #[arg(long)]
    max_iters: Option<usize>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Path to the game-stats CSV
    input: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_flags(
        cli.global.verbose,
        cli.global.quiet,
        cli.global.log_json,
    ));

    let code = match run(&cli) {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            report_error(&err, &cli.global);
            ExitCode::from_error(&err)
        }
    };
    process::exit(code.as_i32());
}

fn run(cli: &Cli) -> puckstate_common::Result<()> {
    match &cli.command {
        Commands::Analyze(args) => {
            let sequence = ingest::read_csv_path(&args.input)?;
            let mut settings = HmmSettings::with_states(args.states);
            if let Some(seed) = args.seed {
                settings.seed = seed;
            }
            if let Some(max_iters) = args.max_iters {
                settings.max_iters = max_iters;
            }
            let report = pipeline::infer(&sequence, &settings)?;
            println!("{}", report.render(cli.global.format)?);
            Ok(())
        }
        Commands::Check(args) => {
            let sequence = ingest::read_csv_path(&args.input)?;
            let first = sequence.records().first().map(|r| r.date);
            let last = sequence.records().last().map(|r| r.date);
            match cli.global.format {
                OutputFormat::Json => {
                    let payload = serde_json::json!({
                        "games": sequence.len(),
                        "first_game": first,
                        "last_game": last,
                    });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                _ => {
                    println!(
                        "OK: {} games from {} to {}",
                        sequence.len(),
                        first.map(|d| d.to_string()).unwrap_or_default(),
                        last.map(|d| d.to_string()).unwrap_or_default(),
                    );
                }
            }
            Ok(())
        }
        Commands::Version => {
            println!("puckstate {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn report_error(err: &Error, global: &GlobalOpts) {
    if global.format == OutputFormat::Json {
        eprintln!("{}", StructuredError::from(err).to_json());
    } else {
        let use_color = !global.no_color && std::io::stderr().is_terminal();
        eprintln!("{}", format_error_human(err, use_color));
    }
}
