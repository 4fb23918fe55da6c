use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Gateway request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Gateway error: {message}")]
    GatewayError { message: String },

    #[error("Card {number} is not known to the gateway")]
    UnknownCard { number: String },

    #[error("Ledger error: {message}")]
    LedgerError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Gateway,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CheckoutError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckoutError::HttpError(_)
            | CheckoutError::GatewayError { .. }
            | CheckoutError::UnknownCard { .. } => ErrorCategory::Gateway,
            CheckoutError::CsvError(_)
            | CheckoutError::IoError(_)
            | CheckoutError::LedgerError { .. } => ErrorCategory::Storage,
            CheckoutError::SerializationError(_) => ErrorCategory::Data,
            CheckoutError::ConfigError { .. }
            | CheckoutError::ConfigValidationError { .. }
            | CheckoutError::InvalidConfigValueError { .. }
            | CheckoutError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 銀行拒絕未知卡號屬於預期結果
            CheckoutError::UnknownCard { .. } => ErrorSeverity::Low,
            CheckoutError::HttpError(_) | CheckoutError::GatewayError { .. } => {
                ErrorSeverity::Medium
            }
            CheckoutError::CsvError(_)
            | CheckoutError::SerializationError(_)
            | CheckoutError::LedgerError { .. }
            | CheckoutError::ConfigError { .. }
            | CheckoutError::ConfigValidationError { .. }
            | CheckoutError::InvalidConfigValueError { .. }
            | CheckoutError::MissingConfigError { .. } => ErrorSeverity::High,
            CheckoutError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TOML configuration file and command-line flags"
            }
            ErrorCategory::Gateway => match self {
                CheckoutError::UnknownCard { .. } => {
                    "Use one of the card numbers registered in the gateway simulator"
                }
                _ => "Make sure the gateway simulator is running and reachable",
            },
            ErrorCategory::Storage => "Check that the export directory exists and is writable",
            ErrorCategory::Data => "Check the gateway response body",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CheckoutError::UnknownCard { .. } => {
                "Error! The bank declined the operation.".to_string()
            }
            CheckoutError::HttpError(_) | CheckoutError::GatewayError { .. } => {
                format!("Payment gateway is unavailable: {}", self)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
