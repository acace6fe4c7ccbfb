//! Scenario Harness CLI
//!
//! Runs a scenario suite against the standard function registry and prints
//! every failing case.
//!
//! Usage:
//!   cargo run --bin scenario_harness -- --suite tests/scenarios/replace_pattern.json
//!
//! Examples:
//!   # Run the bundled suite, one case at a time
//!   cargo run --bin scenario_harness -- --sequential
//!
//!   # Machine-readable summary
//!   cargo run --bin scenario_harness -- --suite tests.json --json
//!
//! Exit status: 0 when every case passes, 1 when any case fails, 2 when the
//! suite could not be loaded or resolved.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use transform_harness::{
    ExecutionMode, FunctionRegistry, HarnessConfig, ScenarioRunner, ScenarioSuite, Settings,
    SuiteReport,
};

/// Conformance harness for pattern-based replace functions
#[derive(Parser, Debug)]
#[command(name = "scenario_harness")]
#[command(about = "Run a declarative replace scenario suite")]
struct Args {
    /// Scenario suite file (.json, .yaml or .yml)
    #[arg(long, short = 's', env = "TRANSFORM_HARNESS_SUITE")]
    suite: Option<PathBuf>,

    /// Run cases one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Output the summary as JSON
    #[arg(long)]
    json: bool,

    /// Show passing cases too
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(report) if report.passed() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{} {:#}", "ERROR:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<SuiteReport> {
    let mut config = HarnessConfig::from_env();
    if let Some(suite) = &args.suite {
        config.suite_path = suite.clone();
    }
    if args.sequential {
        config.mode = ExecutionMode::Sequential;
    }
    config.validate()?;

    let suite = ScenarioSuite::load(&config.suite_path)?;
    let registry = FunctionRegistry::standard();
    let settings = Settings::new(config.component.as_str());

    if !args.json {
        println!("\n{} {}", "Suite:".cyan().bold(), config.suite_path.display());
        println!(
            "{} {} scenarios, {} cases ({:?})",
            "Loaded:".cyan(),
            suite.scenarios.len(),
            suite.case_count(),
            config.mode
        );
    }

    let report = ScenarioRunner::new(&registry, &settings)
        .with_mode(config.mode)
        .run(&suite)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.summary())?);
    } else {
        print_report(&report, args.verbose);
    }
    Ok(report)
}

fn print_report(report: &SuiteReport, verbose: bool) {
    println!();
    for outcome in &report.outcomes {
        match outcome.error() {
            None if verbose => println!("  {} {}", "PASS".green(), outcome.test_id()),
            None => {}
            Some(error) => {
                println!("  {} {}", "FAIL".red().bold(), outcome.test_id());
                println!("       {} {}", "class:".yellow(), error.class());
                println!("       {} {}", "error:".yellow(), error);
                if let Some(actual) = &outcome.actual {
                    println!("       {} {:?}", "actual:".yellow(), actual);
                }
            }
        }
    }

    let summary = format!(
        "{} passed, {} failed, {} total",
        report.pass_count(),
        report.fail_count(),
        report.outcomes.len()
    );
    if report.passed() {
        println!("\n{} {}", "OK:".green().bold(), summary);
    } else {
        println!("\n{} {}", "FAILED:".red().bold(), summary);
    }
}
