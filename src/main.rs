use clap::Parser;
use ticket_checkout::core::validator::FormValidator;
use ticket_checkout::domain::ports::LedgerReader;
use ticket_checkout::utils::error::ErrorSeverity;
use ticket_checkout::utils::{logger, validation::Validate};
use ticket_checkout::{
    CheckoutConfig, CheckoutOutcome, CheckoutService, CliConfig, InMemoryLedger, LocalStorage,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting ticket-checkout CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut config = match &cli.config {
        Some(path) => match CheckoutConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => CheckoutConfig::default(),
    };
    cli.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let gateway = config.gateway()?;
    let validator = FormValidator::for_today(config.rules());
    let service = CheckoutService::new(validator, gateway, InMemoryLedger::new())
        .with_settings(&config);

    let submission = cli.submission();
    match service.submit(&submission).await {
        Ok(CheckoutOutcome::Rejected(report)) => {
            println!("📝 The form was not sent:");
            for error in report.errors() {
                println!("   {} → {} ({})", error.field, error.kind.message(), error.kind);
            }
        }
        Ok(CheckoutOutcome::Completed { status, order }) => {
            println!("✅ Gateway answered {}", status);
            println!("🧾 Order {} (payment id {})", order.id, order.payment_id);
            if let Some(credit) = service.ledger().latest_credit_request() {
                println!("🏦 Credit request {} (bank id {})", credit.id, credit.bank_id);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Checkout failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    if let Some(path) = config.export_path() {
        let storage = LocalStorage::new(path);
        let files = service.ledger().export_csv(&storage).await?;
        println!("📁 Ledger saved to {}: {}", path, files.join(", "));
    }

    Ok(())
}
