use crate::domain::model::{normalize_card_number, GatewayReply, GatewayStatus, ProductPath};
use crate::domain::ports::Gateway;
use crate::utils::error::{CheckoutError, Result};
use async_trait::async_trait;
use uuid::Uuid;

pub const APPROVED_CARD: &str = "4444 4444 4444 4441";
pub const DECLINED_CARD: &str = "4444 4444 4444 4442";

/// In-process stand-in for the bank simulator: two known cards, one status each.
#[derive(Debug, Clone)]
pub struct GatewaySimulator {
    approved_card: String,
    declined_card: String,
}

impl GatewaySimulator {
    pub fn new(approved_card: &str, declined_card: &str) -> Self {
        Self {
            approved_card: normalize_card_number(approved_card),
            declined_card: normalize_card_number(declined_card),
        }
    }

    pub fn status_for(&self, card_number: &str) -> Option<GatewayStatus> {
        let number = normalize_card_number(card_number);
        if number == self.approved_card {
            Some(GatewayStatus::Approved)
        } else if number == self.declined_card {
            Some(GatewayStatus::Declined)
        } else {
            None
        }
    }
}

impl Default for GatewaySimulator {
    fn default() -> Self {
        Self::new(APPROVED_CARD, DECLINED_CARD)
    }
}

#[async_trait]
impl Gateway for GatewaySimulator {
    async fn authorize(&self, card_number: &str, path: ProductPath) -> Result<GatewayReply> {
        let status = self
            .status_for(card_number)
            .ok_or_else(|| CheckoutError::UnknownCard {
                number: normalize_card_number(card_number),
            })?;

        let reply = GatewayReply {
            status,
            bank_id: Uuid::new_v4().to_string(),
        };
        tracing::debug!(
            "🏦 Simulator answered {} for {} request (bank id {})",
            reply.status,
            path,
            reply.bank_id
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_known_cards() {
        let gateway = GatewaySimulator::default();
        assert_eq!(gateway.status_for("4444444444444441"), Some(GatewayStatus::Approved));
        assert_eq!(gateway.status_for(DECLINED_CARD), Some(GatewayStatus::Declined));
        assert_eq!(gateway.status_for("4444444444444443"), None);
    }

    #[test]
    fn test_authorize_issues_fresh_bank_ids() {
        let gateway = GatewaySimulator::default();
        let first =
            tokio_test::block_on(gateway.authorize(APPROVED_CARD, ProductPath::Debit)).unwrap();
        let second =
            tokio_test::block_on(gateway.authorize(APPROVED_CARD, ProductPath::Credit)).unwrap();

        assert_eq!(first.status, GatewayStatus::Approved);
        assert_eq!(second.status, GatewayStatus::Approved);
        assert_ne!(first.bank_id, second.bank_id);
    }

    #[test]
    fn test_unknown_card_is_an_error() {
        let gateway = GatewaySimulator::default();
        let result =
            tokio_test::block_on(gateway.authorize("1111 2222 3333 4444", ProductPath::Debit));
        assert!(matches!(
            result,
            Err(CheckoutError::UnknownCard { ref number }) if number == "1111222233334444"
        ));
    }
}
