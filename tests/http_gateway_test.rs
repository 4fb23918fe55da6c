use httpmock::prelude::*;
use ticket_checkout::core::card_data;
use ticket_checkout::domain::ports::{Gateway, LedgerReader};
use ticket_checkout::{
    CheckoutError, CheckoutService, FormValidator, GatewayStatus, HttpGateway, InMemoryLedger,
    ProductPath, ValidationRules,
};

#[tokio::test]
async fn test_debit_request_goes_to_payment_endpoint() {
    let server = MockServer::start();
    let gate_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/payment")
            .json_body(serde_json::json!({ "number": "4444444444444441" }));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({ "status": "APPROVED" }));
    });

    let gateway = HttpGateway::new(&server.base_url(), 5).unwrap();
    let reply = gateway
        .authorize("4444 4444 4444 4441", ProductPath::Debit)
        .await
        .unwrap();

    gate_mock.assert();
    assert_eq!(reply.status, GatewayStatus::Approved);
    assert!(!reply.bank_id.is_empty());
}

#[tokio::test]
async fn test_credit_request_goes_to_credit_endpoint() {
    let server = MockServer::start();
    let gate_mock = server.mock(|when, then| {
        when.method(POST).path("/credit");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({ "status": "DECLINED" }));
    });

    let gateway = HttpGateway::new(&format!("{}/", server.base_url()), 5).unwrap();
    let reply = gateway
        .authorize("4444 4444 4444 4442", ProductPath::Credit)
        .await
        .unwrap();

    gate_mock.assert();
    assert_eq!(reply.status, GatewayStatus::Declined);
}

#[tokio::test]
async fn test_server_error_is_a_gateway_error() {
    let server = MockServer::start();
    let gate_mock = server.mock(|when, then| {
        when.method(POST).path("/payment");
        then.status(500);
    });

    let gateway = HttpGateway::new(&server.base_url(), 5).unwrap();
    let result = gateway
        .authorize("4444 4444 4444 4441", ProductPath::Debit)
        .await;

    gate_mock.assert();
    assert!(matches!(result, Err(CheckoutError::GatewayError { .. })));
}

#[tokio::test]
async fn test_bad_request_means_unknown_card() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/payment");
        then.status(400);
    });

    let gateway = HttpGateway::new(&server.base_url(), 5).unwrap();
    let result = gateway
        .authorize("1111 2222 3333 4444", ProductPath::Debit)
        .await;

    assert!(matches!(result, Err(CheckoutError::UnknownCard { .. })));
}

#[tokio::test]
async fn test_unexpected_body_is_a_serialization_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/payment");
        then.status(200).body("not json");
    });

    let gateway = HttpGateway::new(&server.base_url(), 5).unwrap();
    let result = gateway
        .authorize("4444 4444 4444 4441", ProductPath::Debit)
        .await;

    assert!(matches!(result, Err(CheckoutError::SerializationError(_))));
}

#[tokio::test]
async fn test_checkout_through_http_gateway_correlates_ids() {
    let server = MockServer::start();
    let gate_mock = server.mock(|when, then| {
        when.method(POST).path("/payment");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({ "status": "APPROVED" }));
    });

    let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    let gateway = HttpGateway::new(&server.base_url(), 5).unwrap();
    let service = CheckoutService::new(
        FormValidator::new(ValidationRules::default(), today),
        gateway,
        InMemoryLedger::new(),
    );

    let outcome = service
        .submit(&card_data::approved_card(today, ProductPath::Debit))
        .await
        .unwrap();

    gate_mock.assert();
    assert_eq!(outcome.status(), Some(GatewayStatus::Approved));
    let payment = service.ledger().latest_payment().unwrap();
    let order = service.ledger().latest_order().unwrap();
    assert_eq!(order.payment_id, payment.transaction_id);
}
