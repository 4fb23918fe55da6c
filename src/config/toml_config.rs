use crate::adapters::http_gateway::HttpGateway;
use crate::adapters::ConfiguredGateway;
use crate::core::checkout::DEFAULT_TICKET_AMOUNT;
use crate::core::gateway::{GatewaySimulator, APPROVED_CARD, DECLINED_CARD};
use crate::core::validator::{ValidationRules, DEFAULT_HOLDER_MAX_LEN, DEFAULT_MAX_YEARS_AHEAD};
use crate::domain::ports::CheckoutSettings;
use crate::utils::error::{CheckoutError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default)]
    pub checkout: CheckoutTable,
    #[serde(default)]
    pub validation: ValidationTable,
    #[serde(default)]
    pub gateway: GatewayTable,
    #[serde(default)]
    pub ledger: LedgerTable,
    #[serde(default)]
    pub monitoring: MonitoringTable,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutTable {
    pub ticket_amount: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationTable {
    pub max_years_ahead: Option<u32>,
    pub holder_max_len: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    #[default]
    Simulator,
    Http,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayTable {
    #[serde(default)]
    pub mode: GatewayMode,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub approved_card: Option<String>,
    pub declined_card: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerTable {
    pub export_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringTable {
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
}

impl CheckoutConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CheckoutError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CheckoutError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GATE_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CheckoutError::ConfigError {
            message: format!("env placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(amount) = self.checkout.ticket_amount {
            validation::validate_positive_number("checkout.ticket_amount", amount, 1)?;
        }
        validation::validate_range("validation.max_years_ahead", self.max_years_ahead(), 1, 20)?;
        validation::validate_range("validation.holder_max_len", self.holder_max_len(), 1, 255)?;

        if self.gateway.mode == GatewayMode::Http {
            let endpoint =
                validation::validate_required_field("gateway.endpoint", &self.gateway.endpoint)?;
            validation::validate_url("gateway.endpoint", endpoint)?;
            validation::validate_positive_number(
                "gateway.timeout_seconds",
                self.timeout_seconds(),
                1,
            )?;
        }

        for (field, card) in [
            ("gateway.approved_card", &self.gateway.approved_card),
            ("gateway.declined_card", &self.gateway.declined_card),
        ] {
            if let Some(card) = card {
                validation::validate_non_empty_string(field, card)?;
            }
        }
        validation::validate_distinct_cards(
            "gateway.declined_card",
            self.approved_card(),
            self.declined_card(),
        )?;

        if let Some(path) = &self.ledger.export_path {
            validation::validate_path("ledger.export_path", path)?;
        }

        Ok(())
    }

    pub fn ticket_amount(&self) -> u64 {
        self.checkout.ticket_amount.unwrap_or(DEFAULT_TICKET_AMOUNT)
    }

    pub fn max_years_ahead(&self) -> u32 {
        self.validation
            .max_years_ahead
            .unwrap_or(DEFAULT_MAX_YEARS_AHEAD)
    }

    pub fn holder_max_len(&self) -> usize {
        self.validation.holder_max_len.unwrap_or(DEFAULT_HOLDER_MAX_LEN)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.gateway.timeout_seconds.unwrap_or(15)
    }

    pub fn approved_card(&self) -> &str {
        self.gateway.approved_card.as_deref().unwrap_or(APPROVED_CARD)
    }

    pub fn declined_card(&self) -> &str {
        self.gateway.declined_card.as_deref().unwrap_or(DECLINED_CARD)
    }

    pub fn export_path(&self) -> Option<&str> {
        self.ledger.export_path.as_deref()
    }

    pub fn log_level(&self) -> &str {
        self.monitoring.log_level.as_deref().unwrap_or("info")
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring.json_logs.unwrap_or(false)
    }

    pub fn rules(&self) -> ValidationRules {
        ValidationRules::from_settings(self)
    }

    /// 依 gateway.mode 建立閘道
    pub fn gateway(&self) -> Result<ConfiguredGateway> {
        match self.gateway.mode {
            GatewayMode::Simulator => Ok(ConfiguredGateway::Simulator(GatewaySimulator::new(
                self.approved_card(),
                self.declined_card(),
            ))),
            GatewayMode::Http => {
                let endpoint = validation::validate_required_field(
                    "gateway.endpoint",
                    &self.gateway.endpoint,
                )?;
                Ok(ConfiguredGateway::Http(HttpGateway::new(
                    endpoint,
                    self.timeout_seconds(),
                )?))
            }
        }
    }
}

impl CheckoutSettings for CheckoutConfig {
    fn ticket_amount(&self) -> u64 {
        CheckoutConfig::ticket_amount(self)
    }

    fn max_years_ahead(&self) -> u32 {
        CheckoutConfig::max_years_ahead(self)
    }

    fn holder_max_len(&self) -> usize {
        CheckoutConfig::holder_max_len(self)
    }
}

impl Validate for CheckoutConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
