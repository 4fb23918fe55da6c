pub mod card_data;
pub mod checkout;
pub mod gateway;
pub mod ledger;
pub mod scenarios;
pub mod validator;

pub use crate::domain::model::{CardSubmission, CheckoutOutcome, ValidationReport};
pub use crate::domain::ports::{Gateway, LedgerReader, LedgerWriter, Storage};
pub use crate::utils::error::Result;
