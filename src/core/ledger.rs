use crate::domain::model::{CreditRequestRecord, OrderRecord, PaymentRecord};
use crate::domain::ports::{LedgerReader, LedgerWriter, Storage};
use crate::utils::error::{CheckoutError, Result};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

pub const PAYMENT_TABLE: &str = "payment_entity.csv";
pub const CREDIT_REQUEST_TABLE: &str = "credit_request_entity.csv";
pub const ORDER_TABLE: &str = "order_entity.csv";

#[derive(Debug, Default)]
struct Tables {
    payments: Vec<PaymentRecord>,
    credit_requests: Vec<CreditRequestRecord>,
    orders: Vec<OrderRecord>,
}

/// Append-only record store; "latest" always means the last one written.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    tables: Mutex<Tables>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|e| CheckoutError::LedgerError {
            message: format!("ledger lock poisoned: {}", e),
        })
    }

    /// 讀取時容忍中毒的鎖：已寫入的紀錄不會因寫入端 panic 而失效
    fn read(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("⚠️ Ledger lock poisoned, reading the rows already recorded");
            poisoned.into_inner()
        })
    }

    pub fn payments(&self) -> Vec<PaymentRecord> {
        self.read().payments.clone()
    }

    pub fn credit_requests(&self) -> Vec<CreditRequestRecord> {
        self.read().credit_requests.clone()
    }

    pub fn orders(&self) -> Vec<OrderRecord> {
        self.read().orders.clone()
    }

    /// 三張表的總筆數
    pub fn len(&self) -> usize {
        let tables = self.read();
        tables.payments.len() + tables.credit_requests.len() + tables.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 將三張表各自輸出為 CSV，回傳寫入的檔名
    pub async fn export_csv<S: Storage>(&self, storage: &S) -> Result<Vec<String>> {
        let (payments, credits, orders) = {
            let tables = self.read();
            (
                to_csv(&tables.payments)?,
                to_csv(&tables.credit_requests)?,
                to_csv(&tables.orders)?,
            )
        };

        let mut written = Vec::with_capacity(3);
        for (name, data) in [
            (PAYMENT_TABLE, payments),
            (CREDIT_REQUEST_TABLE, credits),
            (ORDER_TABLE, orders),
        ] {
            storage.write_file(name, &data).await?;
            tracing::debug!("Exported {} ({} bytes)", name, data.len());
            written.push(name.to_string());
        }

        tracing::info!("📁 Ledger exported: {}", written.join(", "));
        Ok(written)
    }
}

fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| CheckoutError::LedgerError {
        message: format!("failed to flush CSV buffer: {}", e),
    })
}

impl LedgerReader for InMemoryLedger {
    fn latest_payment(&self) -> Option<PaymentRecord> {
        self.read().payments.last().cloned()
    }

    fn latest_credit_request(&self) -> Option<CreditRequestRecord> {
        self.read().credit_requests.last().cloned()
    }

    fn latest_order(&self) -> Option<OrderRecord> {
        self.read().orders.last().cloned()
    }
}

impl LedgerWriter for InMemoryLedger {
    fn record_payment(&self, record: PaymentRecord) -> Result<()> {
        tracing::debug!("Recording payment {} ({})", record.id, record.status);
        self.lock()?.payments.push(record);
        Ok(())
    }

    fn record_credit_request(&self, record: CreditRequestRecord) -> Result<()> {
        tracing::debug!("Recording credit request {} ({})", record.id, record.status);
        self.lock()?.credit_requests.push(record);
        Ok(())
    }

    fn record_order(&self, record: OrderRecord) -> Result<()> {
        tracing::debug!("Recording order {}", record.id);
        self.lock()?.orders.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::GatewayStatus;
    use chrono::Utc;

    fn payment(id: &str, status: GatewayStatus) -> PaymentRecord {
        PaymentRecord {
            id: id.to_string(),
            amount: 4_500_000,
            status,
            transaction_id: format!("tx-{}", id),
            created: Utc::now(),
        }
    }

    #[test]
    fn test_latest_is_last_written() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.latest_payment().is_none());
        assert!(ledger.is_empty());

        ledger.record_payment(payment("p1", GatewayStatus::Approved)).unwrap();
        ledger.record_payment(payment("p2", GatewayStatus::Declined)).unwrap();

        let latest = ledger.latest_payment().unwrap();
        assert_eq!(latest.id, "p2");
        assert_eq!(latest.status, GatewayStatus::Declined);
        assert_eq!(ledger.payments().len(), 2);
        assert_eq!(ledger.len(), 2);
        assert!(ledger.latest_order().is_none());
        assert!(ledger.latest_credit_request().is_none());
    }

    #[test]
    fn test_poisoned_lock_keeps_reads_and_refuses_writes() {
        let ledger = std::sync::Arc::new(InMemoryLedger::new());
        ledger.record_payment(payment("p1", GatewayStatus::Approved)).unwrap();

        let shared = std::sync::Arc::clone(&ledger);
        let panicked = std::thread::spawn(move || {
            let _guard = shared.tables.lock().unwrap();
            panic!("writer died while holding the ledger");
        })
        .join();
        assert!(panicked.is_err());
        assert!(ledger.tables.is_poisoned());

        assert_eq!(ledger.latest_payment().map(|p| p.id), Some("p1".to_string()));
        assert_eq!(ledger.len(), 1);
        assert!(matches!(
            ledger.record_payment(payment("p2", GatewayStatus::Declined)),
            Err(CheckoutError::LedgerError { .. })
        ));
        assert_eq!(ledger.payments().len(), 1);
    }

    #[test]
    fn test_payment_rows_serialize_to_csv() {
        let rows = vec![payment("p1", GatewayStatus::Approved)];
        let csv = String::from_utf8(to_csv(&rows).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("id,amount,status,transaction_id,created"));
        assert!(lines.next().unwrap().starts_with("p1,4500000,APPROVED,tx-p1,"));
    }
}
