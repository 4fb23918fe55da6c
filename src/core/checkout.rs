use crate::core::validator::FormValidator;
use crate::domain::model::{
    CardSubmission, CheckoutOutcome, CreditRequestRecord, OrderRecord, PaymentRecord, ProductPath,
};
use crate::domain::ports::{CheckoutSettings, Gateway, LedgerWriter};
use crate::utils::error::Result;
use chrono::Utc;
use uuid::Uuid;

/// 票價 45 000 盧布，以戈比計
pub const DEFAULT_TICKET_AMOUNT: u64 = 4_500_000;

pub struct CheckoutService<G: Gateway, L: LedgerWriter> {
    validator: FormValidator,
    gateway: G,
    ledger: L,
    ticket_amount: u64,
}

impl<G: Gateway, L: LedgerWriter> CheckoutService<G, L> {
    pub fn new(validator: FormValidator, gateway: G, ledger: L) -> Self {
        Self {
            validator,
            gateway,
            ledger,
            ticket_amount: DEFAULT_TICKET_AMOUNT,
        }
    }

    /// 從設定來源套用票價
    pub fn with_settings<C: CheckoutSettings + ?Sized>(self, settings: &C) -> Self {
        self.with_ticket_amount(settings.ticket_amount())
    }

    pub fn with_ticket_amount(mut self, amount: u64) -> Self {
        self.ticket_amount = amount;
        self
    }

    pub fn validator(&self) -> &FormValidator {
        &self.validator
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub async fn submit(&self, submission: &CardSubmission) -> Result<CheckoutOutcome> {
        let report = self.validator.validate(submission);
        if !report.is_accepted() {
            tracing::info!("📝 Form refused before reaching the gateway: {}", report);
            return Ok(CheckoutOutcome::Rejected(report));
        }

        let number = submission.normalized_number();
        tracing::debug!("Sending {} authorization to gateway", submission.product_path);
        let reply = self
            .gateway
            .authorize(&number, submission.product_path)
            .await?;

        let created = Utc::now();
        let order = match submission.product_path {
            ProductPath::Debit => {
                let payment = PaymentRecord {
                    id: Uuid::new_v4().to_string(),
                    amount: self.ticket_amount,
                    status: reply.status,
                    transaction_id: reply.bank_id.clone(),
                    created,
                };
                self.ledger.record_payment(payment)?;
                OrderRecord {
                    id: Uuid::new_v4().to_string(),
                    payment_id: reply.bank_id,
                    credit_id: None,
                    created,
                }
            }
            ProductPath::Credit => {
                let credit = CreditRequestRecord {
                    id: Uuid::new_v4().to_string(),
                    bank_id: reply.bank_id.clone(),
                    status: reply.status,
                    created,
                };
                let credit_id = credit.id.clone();
                self.ledger.record_credit_request(credit)?;
                OrderRecord {
                    id: Uuid::new_v4().to_string(),
                    payment_id: reply.bank_id,
                    credit_id: Some(credit_id),
                    created,
                }
            }
        };
        self.ledger.record_order(order.clone())?;

        tracing::info!(
            "✅ {} checkout finished with status {} (order {})",
            submission.product_path,
            reply.status,
            order.id
        );
        Ok(CheckoutOutcome::Completed {
            status: reply.status,
            order,
        })
    }
}
