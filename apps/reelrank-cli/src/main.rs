//! reelrank - Genre-filtered movie ranking
//!
//! Reads a ratings table and a movies table, ranks the movies of one genre
//! by mean rating and writes the results plus a per-genre movie count.

mod cli;
mod output;

use clap::Parser;
use reelrank_core::{profile_ratings, Pipeline};
use std::error::Error;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", error_report(err.as_ref()));
            ExitCode::FAILURE
        }
    }
}

/// Top-level message plus any cause it does not already spell out
fn error_report(err: &dyn Error) -> String {
    let mut report = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !report.contains(&text) {
            report.push_str("\n  caused by: ");
            report.push_str(&text);
        }
        source = cause.source();
    }
    report
}

/// Logs go to stderr so tables and JSON on stdout stay pipeable
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Run { args, report } => {
            let config = args.resolve()?;
            debug!(?config, "resolved configuration");
            let pipeline = Pipeline::new(config)?;
            let run = pipeline.run()?;

            if report {
                println!("{}", run.to_json()?);
            } else {
                println!("{}", output::run_summary_table(&run));
                println!("{}", output::results_table(&run.top));
                if run.results > run.top.len() {
                    println!("... {} more rows", run.results - run.top.len());
                }
            }
        }

        Command::Genres { args } => {
            let pipeline = Pipeline::new(args.resolve()?)?;
            let (counts, written) = pipeline.genre_report()?;
            println!("{}", output::genres_table(&counts));
            if let Some(dir) = written {
                println!("Wrote {}", dir.display());
            }
        }

        Command::Stats { source } => {
            let pipeline = Pipeline::new(source.resolve()?)?;
            let profile = profile_ratings(&pipeline.load_ratings()?)?;
            let (summary, histogram) = output::profile_tables(&profile);
            println!("{summary}");
            println!("{histogram}");
        }

        Command::Config { args } => {
            let config = args.resolve()?;
            config.validate()?;
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
