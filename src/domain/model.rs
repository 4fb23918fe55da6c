use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 購票方式：直接刷卡或申請信用貸款
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductPath {
    Debit,
    Credit,
}

impl fmt::Display for ProductPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductPath::Debit => write!(f, "debit"),
            ProductPath::Credit => write!(f, "credit"),
        }
    }
}

/// One filled-in card form, exactly as typed into the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSubmission {
    pub number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub holder_name: String,
    pub security_code: String,
    pub product_path: ProductPath,
}

impl CardSubmission {
    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }

    pub fn with_expiry_month(mut self, month: impl Into<String>) -> Self {
        self.expiry_month = month.into();
        self
    }

    pub fn with_expiry_year(mut self, year: impl Into<String>) -> Self {
        self.expiry_year = year.into();
        self
    }

    pub fn with_holder_name(mut self, holder: impl Into<String>) -> Self {
        self.holder_name = holder.into();
        self
    }

    pub fn with_security_code(mut self, cvc: impl Into<String>) -> Self {
        self.security_code = cvc.into();
        self
    }

    /// 卡號去除分隔空白後的純數字
    pub fn normalized_number(&self) -> String {
        normalize_card_number(&self.number)
    }
}

pub fn normalize_card_number(number: &str) -> String {
    number.chars().filter(|c| !c.is_whitespace()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    CardNumber,
    ExpiryMonth,
    ExpiryYear,
    HolderName,
    SecurityCode,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::CardNumber,
        FormField::ExpiryMonth,
        FormField::ExpiryYear,
        FormField::HolderName,
        FormField::SecurityCode,
    ];
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::CardNumber => write!(f, "card_number"),
            FormField::ExpiryMonth => write!(f, "expiry_month"),
            FormField::ExpiryYear => write!(f, "expiry_year"),
            FormField::HolderName => write!(f, "holder_name"),
            FormField::SecurityCode => write!(f, "security_code"),
        }
    }
}

/// Rule category shown under a field when the page refuses the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldErrorKind {
    /// Field left empty.
    Required,
    /// Wrong length or characters.
    Format,
    /// Outside the accepted card validity window.
    Term,
    /// Card already expired.
    Expired,
    /// Too long.
    Limit,
}

impl FieldErrorKind {
    /// Inline message the page shows for this category.
    pub fn message(&self) -> &'static str {
        match self {
            FieldErrorKind::Required => "Field is required",
            FieldErrorKind::Format => "Wrong format",
            FieldErrorKind::Term => "Wrong card expiry date",
            FieldErrorKind::Expired => "Card expired",
            FieldErrorKind::Limit => "Value is too long",
        }
    }
}

impl fmt::Display for FieldErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldErrorKind::Required => write!(f, "required"),
            FieldErrorKind::Format => write!(f, "format"),
            FieldErrorKind::Term => write!(f, "term"),
            FieldErrorKind::Expired => write!(f, "expired"),
            FieldErrorKind::Limit => write!(f, "limit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FormField,
    pub kind: FieldErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

/// Field errors of a refused form, at most one per field, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同一欄位只保留第一個錯誤
    pub fn push(&mut self, field: FormField, kind: FieldErrorKind) {
        if self.error_for(field).is_none() {
            self.errors.push(FieldError { field, kind });
            self.errors.sort_by_key(|e| e.field);
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_for(&self, field: FormField) -> Option<FieldErrorKind> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.kind)
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "accepted");
        }
        let parts: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GatewayStatus {
    Approved,
    Declined,
}

impl fmt::Display for GatewayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayStatus::Approved => write!(f, "APPROVED"),
            GatewayStatus::Declined => write!(f, "DECLINED"),
        }
    }
}

/// Gateway answer for a single authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayReply {
    pub status: GatewayStatus,
    pub bank_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub amount: u64,
    pub status: GatewayStatus,
    pub transaction_id: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditRequestRecord {
    pub id: String,
    pub bank_id: String,
    pub status: GatewayStatus,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub payment_id: String,
    pub credit_id: Option<String>,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// 表單未通過驗證，沒有送到閘道
    Rejected(ValidationReport),
    Completed {
        status: GatewayStatus,
        order: OrderRecord,
    },
}

impl CheckoutOutcome {
    pub fn status(&self) -> Option<GatewayStatus> {
        match self {
            CheckoutOutcome::Rejected(_) => None,
            CheckoutOutcome::Completed { status, .. } => Some(*status),
        }
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            CheckoutOutcome::Rejected(report) => Some(report),
            CheckoutOutcome::Completed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_keeps_one_error_per_field_in_form_order() {
        let mut report = ValidationReport::new();
        report.push(FormField::SecurityCode, FieldErrorKind::Required);
        report.push(FormField::CardNumber, FieldErrorKind::Format);
        report.push(FormField::CardNumber, FieldErrorKind::Required);

        assert_eq!(report.len(), 2);
        assert_eq!(report.error_for(FormField::CardNumber), Some(FieldErrorKind::Format));
        assert_eq!(report.first().map(|e| e.field), Some(FormField::CardNumber));
        assert_eq!(report.to_string(), "card_number: format, security_code: required");
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&GatewayStatus::Approved).unwrap();
        assert_eq!(json, "\"APPROVED\"");
        let status: GatewayStatus = serde_json::from_str("\"DECLINED\"").unwrap();
        assert_eq!(status, GatewayStatus::Declined);
    }

    #[test]
    fn test_normalized_number_drops_spaces() {
        assert_eq!(normalize_card_number("4444 4444 4444 4441"), "4444444444444441");
    }
}
