use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use ticket_checkout::core::scenarios::{credit_suite, debit_suite, ScenarioRunner, SuiteReport};
use ticket_checkout::utils::{logger, validation::Validate};
use ticket_checkout::CheckoutConfig;

#[derive(Parser)]
#[command(name = "scenarios")]
#[command(about = "Run the ticket purchase scenarios for both payment paths")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Run as if today were this date (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Only run the debit suite
    #[arg(long, conflicts_with = "credit_only")]
    debit_only: bool,

    /// Only run the credit suite
    #[arg(long)]
    credit_only: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CheckoutConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?,
        None => CheckoutConfig::default(),
    };

    if config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(args.verbose);
    }

    config.validate().context("configuration validation failed")?;

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let rules = config.rules();
    tracing::info!("🚀 Running purchase scenarios for {}", today);

    let mut scenarios = Vec::new();
    if !args.credit_only {
        scenarios.extend(debit_suite(today, &rules));
    }
    if !args.debit_only {
        scenarios.extend(credit_suite(today, &rules));
    }

    let runner = ScenarioRunner::new(config.gateway()?, rules, today);
    let report = runner.run_all(&scenarios).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(report: &SuiteReport) {
    for result in &report.results {
        let mark = if result.passed { "✅" } else { "❌" };
        println!(
            "{} [{}] №{} {} (expect {}): {}",
            mark, result.path, result.number, result.name, result.expectation, result.detail
        );
    }
    println!();
    println!("📊 {} passed, {} failed", report.passed(), report.failed().len());
}
