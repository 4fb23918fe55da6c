use crate::config::toml_config::{CheckoutConfig, GatewayMode};
use crate::domain::model::{CardSubmission, ProductPath};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum PathArg {
    Debit,
    Credit,
}

impl From<PathArg> for ProductPath {
    fn from(arg: PathArg) -> Self {
        match arg {
            PathArg::Debit => ProductPath::Debit,
            PathArg::Credit => ProductPath::Credit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "ticket-checkout")]
#[command(about = "Validate a card form and buy a tour ticket by card or on credit")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value = "debit")]
    pub path: PathArg,

    #[arg(long, default_value = "")]
    pub number: String,

    #[arg(long, default_value = "")]
    pub month: String,

    #[arg(long, default_value = "")]
    pub year: String,

    #[arg(long, default_value = "")]
    pub holder: String,

    #[arg(long, default_value = "")]
    pub cvc: String,

    /// Override gateway.endpoint and switch to the HTTP gateway
    #[arg(long)]
    pub gateway_url: Option<String>,

    /// Override ledger.export_path
    #[arg(long)]
    pub export_path: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn submission(&self) -> CardSubmission {
        CardSubmission {
            number: self.number.trim().to_string(),
            expiry_month: self.month.trim().to_string(),
            expiry_year: self.year.trim().to_string(),
            holder_name: self.holder.trim().to_string(),
            security_code: self.cvc.trim().to_string(),
            product_path: self.path.into(),
        }
    }

    /// 命令列參數覆蓋檔案設定
    pub fn apply_overrides(&self, config: &mut CheckoutConfig) {
        if let Some(url) = &self.gateway_url {
            config.gateway.mode = GatewayMode::Http;
            config.gateway.endpoint = Some(url.clone());
            tracing::info!("🔧 Gateway overridden to: {}", url);
        }
        if let Some(path) = &self.export_path {
            config.ledger.export_path = Some(path.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credit_submission() {
        let cli = CliConfig::parse_from([
            "ticket-checkout",
            "--path",
            "credit",
            "--number",
            "4444 4444 4444 4442",
            "--month",
            "08",
            "--year",
            "28",
            "--holder",
            " Ivan Petrov ",
            "--cvc",
            "999",
        ]);

        let submission = cli.submission();
        assert_eq!(submission.product_path, ProductPath::Credit);
        assert_eq!(submission.holder_name, "Ivan Petrov");
        assert_eq!(submission.normalized_number(), "4444444444444442");
    }

    #[test]
    fn test_gateway_url_switches_to_http() {
        let cli = CliConfig::parse_from([
            "ticket-checkout",
            "--gateway-url",
            "http://localhost:9999",
            "--export-path",
            "./ledger",
        ]);
        let mut config = CheckoutConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.gateway.mode, GatewayMode::Http);
        assert_eq!(config.gateway.endpoint.as_deref(), Some("http://localhost:9999"));
        assert_eq!(config.export_path(), Some("./ledger"));
    }
}
