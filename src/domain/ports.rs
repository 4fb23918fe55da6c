use crate::domain::model::{
    CreditRequestRecord, GatewayReply, OrderRecord, PaymentRecord, ProductPath,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait CheckoutSettings: Send + Sync {
    /// 票價 (戈比)
    fn ticket_amount(&self) -> u64;
    fn max_years_ahead(&self) -> u32;
    fn holder_max_len(&self) -> usize;
}

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn authorize(&self, card_number: &str, path: ProductPath) -> Result<GatewayReply>;
}

pub trait LedgerReader: Send + Sync {
    fn latest_payment(&self) -> Option<PaymentRecord>;
    fn latest_credit_request(&self) -> Option<CreditRequestRecord>;
    fn latest_order(&self) -> Option<OrderRecord>;
}

pub trait LedgerWriter: Send + Sync {
    fn record_payment(&self, record: PaymentRecord) -> Result<()>;
    fn record_credit_request(&self, record: CreditRequestRecord) -> Result<()>;
    fn record_order(&self, record: OrderRecord) -> Result<()>;
}
