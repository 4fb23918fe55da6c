use chrono::NaiveDate;
use ticket_checkout::core::card_data;
use ticket_checkout::domain::ports::LedgerReader;
use ticket_checkout::{
    CheckoutError, CheckoutOutcome, CheckoutService, FieldErrorKind, FormField, FormValidator,
    GatewaySimulator, GatewayStatus, InMemoryLedger, ProductPath, ValidationRules,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn service() -> CheckoutService<GatewaySimulator, InMemoryLedger> {
    let validator = FormValidator::new(ValidationRules::default(), today());
    CheckoutService::new(validator, GatewaySimulator::default(), InMemoryLedger::new())
}

#[tokio::test]
async fn test_debit_with_approved_card() {
    let service = service();
    let form = card_data::approved_card(today(), ProductPath::Debit);

    let outcome = service.submit(&form).await.unwrap();
    assert_eq!(outcome.status(), Some(GatewayStatus::Approved));

    let payment = service.ledger().latest_payment().unwrap();
    let order = service.ledger().latest_order().unwrap();
    assert_eq!(payment.status, GatewayStatus::Approved);
    assert_eq!(payment.amount, 4_500_000);
    assert_eq!(order.payment_id, payment.transaction_id);
    assert!(order.credit_id.is_none());
    assert!(service.ledger().latest_credit_request().is_none());
}

#[tokio::test]
async fn test_debit_with_declined_card() {
    let service = service();
    let form = card_data::declined_card(today(), ProductPath::Debit);

    let outcome = service.submit(&form).await.unwrap();
    assert_eq!(outcome.status(), Some(GatewayStatus::Declined));

    let payment = service.ledger().latest_payment().unwrap();
    let order = service.ledger().latest_order().unwrap();
    assert_eq!(payment.status, GatewayStatus::Declined);
    assert_eq!(order.payment_id, payment.transaction_id);
}

#[tokio::test]
async fn test_credit_with_approved_card() {
    let service = service();
    let form = card_data::approved_card(today(), ProductPath::Credit);

    let outcome = service.submit(&form).await.unwrap();
    assert_eq!(outcome.status(), Some(GatewayStatus::Approved));

    let credit = service.ledger().latest_credit_request().unwrap();
    let order = service.ledger().latest_order().unwrap();
    assert_eq!(credit.status, GatewayStatus::Approved);
    assert_eq!(order.credit_id.as_deref(), Some(credit.id.as_str()));
    assert_eq!(order.payment_id, credit.bank_id);
    assert!(service.ledger().latest_payment().is_none());
}

#[tokio::test]
async fn test_credit_with_declined_card() {
    let service = service();
    let form = card_data::declined_card(today(), ProductPath::Credit);

    let outcome = service.submit(&form).await.unwrap();
    assert_eq!(outcome.status(), Some(GatewayStatus::Declined));

    let credit = service.ledger().latest_credit_request().unwrap();
    let order = service.ledger().latest_order().unwrap();
    assert_eq!(credit.status, GatewayStatus::Declined);
    assert_eq!(order.payment_id, credit.bank_id);
}

#[tokio::test]
async fn test_refused_form_never_reaches_the_ledger() {
    let service = service();
    let form = card_data::approved_card(today(), ProductPath::Debit)
        .with_security_code(card_data::security_code_three_zero());

    let outcome = service.submit(&form).await.unwrap();
    let report = outcome.report().expect("form should be refused");
    assert_eq!(
        report.error_for(FormField::SecurityCode),
        Some(FieldErrorKind::Format)
    );
    assert_eq!(report.len(), 1);
    assert!(service.ledger().is_empty());
}

#[tokio::test]
async fn test_unknown_card_is_refused_by_the_bank() {
    let service = service();
    let form = card_data::approved_card(today(), ProductPath::Debit)
        .with_number("1234 5678 9012 3456");

    let result = service.submit(&form).await;
    assert!(matches!(result, Err(CheckoutError::UnknownCard { .. })));
    assert!(service.ledger().is_empty());
}

#[tokio::test]
async fn test_latest_records_follow_the_last_submission() {
    let service = service();

    service
        .submit(&card_data::approved_card(today(), ProductPath::Debit))
        .await
        .unwrap();
    let second = service
        .submit(&card_data::declined_card(today(), ProductPath::Debit))
        .await
        .unwrap();

    let order = match second {
        CheckoutOutcome::Completed { order, .. } => order,
        CheckoutOutcome::Rejected(report) => panic!("form refused: {}", report),
    };
    assert_eq!(service.ledger().latest_order().unwrap().id, order.id);
    assert_eq!(
        service.ledger().latest_payment().unwrap().status,
        GatewayStatus::Declined
    );
    assert_eq!(service.ledger().payments().len(), 2);
}

#[tokio::test]
async fn test_custom_ticket_amount_is_recorded() {
    let service = service().with_ticket_amount(1_000);
    service
        .submit(&card_data::approved_card(today(), ProductPath::Debit))
        .await
        .unwrap();
    assert_eq!(service.ledger().latest_payment().unwrap().amount, 1_000);
}

#[tokio::test]
async fn test_ticket_amount_comes_from_configuration() {
    let config =
        ticket_checkout::CheckoutConfig::from_toml_str("[checkout]\nticket_amount = 2500\n")
            .unwrap();
    let service = service().with_settings(&config);
    service
        .submit(&card_data::approved_card(today(), ProductPath::Debit))
        .await
        .unwrap();
    assert_eq!(service.ledger().latest_payment().unwrap().amount, 2_500);
}
