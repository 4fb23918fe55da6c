use crate::domain::model::normalize_card_number;
use crate::utils::error::{CheckoutError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> CheckoutError {
    CheckoutError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 閘道位址必須是 http(s)
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "Gateway URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Not a gateway URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Gateway must be reached over http or https, got {}", scheme),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Export directory cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Export directory contains null bytes"));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(field_name, value, format!("Value must be at least {}", min_value)));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| CheckoutError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// 兩張測試卡號去除空白後不得相同，否則拒絕卡永遠不會被命中
pub fn validate_distinct_cards(field_name: &str, approved: &str, declined: &str) -> Result<()> {
    if normalize_card_number(approved) == normalize_card_number(declined) {
        return Err(invalid(
            field_name,
            declined,
            format!("Declined card is the same number as the approved card {}", approved),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_gateway_url() {
        assert!(validate_url("gateway.endpoint", "http://localhost:9999").is_ok());
        assert!(validate_url("gateway.endpoint", "https://gate.example.com/api").is_ok());
        assert!(validate_url("gateway.endpoint", "").is_err());
        assert!(validate_url("gateway.endpoint", "localhost:9999").is_err());

        let err = validate_url("gateway.endpoint", "ftp://gate.example.com").unwrap_err();
        assert!(err.to_string().contains("http or https, got ftp"));
    }

    #[test]
    fn test_validate_export_path() {
        assert!(validate_path("ledger.export_path", "./ledger").is_ok());
        assert!(validate_path("ledger.export_path", "").is_err());
        assert!(validate_path("ledger.export_path", "led\0ger").is_err());
    }

    #[test]
    fn test_validate_year_window_range() {
        assert!(validate_range("validation.max_years_ahead", 5u32, 1, 20).is_ok());
        assert!(validate_range("validation.max_years_ahead", 0u32, 1, 20).is_err());
        assert!(validate_range("validation.max_years_ahead", 21u32, 1, 20).is_err());
    }

    #[test]
    fn test_validate_ticket_amount() {
        assert!(validate_positive_number("checkout.ticket_amount", 4_500_000, 1).is_ok());
        assert!(validate_positive_number("checkout.ticket_amount", 0, 1).is_err());
    }

    #[test]
    fn test_gateway_endpoint_is_required() {
        let present = Some("http://localhost:9999".to_string());
        let absent: Option<String> = None;
        assert!(validate_required_field("gateway.endpoint", &present).is_ok());
        assert!(matches!(
            validate_required_field("gateway.endpoint", &absent),
            Err(CheckoutError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_blank_card_setting_is_rejected() {
        assert!(validate_non_empty_string("gateway.approved_card", "4444").is_ok());
        assert!(validate_non_empty_string("gateway.approved_card", "   ").is_err());
    }

    #[test]
    fn test_oracle_cards_compared_without_spaces() {
        assert!(validate_distinct_cards(
            "gateway.declined_card",
            "4444 4444 4444 4441",
            "4444 4444 4444 4442"
        )
        .is_ok());
        assert!(validate_distinct_cards(
            "gateway.declined_card",
            "4444444444444441",
            "4444 4444 4444 4441"
        )
        .is_err());
    }
}
