pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http_gateway::HttpGateway, storage::LocalStorage, ConfiguredGateway};
pub use config::CheckoutConfig;
pub use crate::core::{
    checkout::CheckoutService,
    gateway::GatewaySimulator,
    ledger::InMemoryLedger,
    validator::{FormValidator, ValidationRules},
};
pub use domain::model::{
    CardSubmission, CheckoutOutcome, FieldErrorKind, FormField, GatewayStatus, ProductPath,
};
pub use utils::error::{CheckoutError, Result};
