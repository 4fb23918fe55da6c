use crate::core::card_data::{self as data};
use crate::core::checkout::CheckoutService;
use crate::core::ledger::InMemoryLedger;
use crate::core::validator::{expand_two_digit_year, FormValidator, ValidationRules};
use crate::domain::model::{
    CardSubmission, CheckoutOutcome, FieldErrorKind, FormField, GatewayStatus, ProductPath,
};
use crate::domain::ports::{Gateway, LedgerReader};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "expect", rename_all = "snake_case")]
pub enum Expectation {
    /// Checkout completes with this status and the ledger ids line up.
    Status { status: GatewayStatus },
    /// Checkout is refused with exactly this kind on this field.
    FieldError {
        field: FormField,
        kind: FieldErrorKind,
    },
    /// Form passes validation (gateway answer not checked).
    Accepted,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::Status { status } => write!(f, "status {}", status),
            Expectation::FieldError { field, kind } => write!(f, "{} error on {}", kind, field),
            Expectation::Accepted => write!(f, "form accepted"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub number: usize,
    pub name: String,
    pub submission: CardSubmission,
    pub expectation: Expectation,
}

impl Scenario {
    pub fn path(&self) -> ProductPath {
        self.submission.product_path
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub number: usize,
    pub name: String,
    pub path: ProductPath,
    pub expectation: Expectation,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    pub results: Vec<ScenarioResult>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed(&self) -> Vec<&ScenarioResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

struct SuiteBuilder {
    path: ProductPath,
    today: NaiveDate,
    scenarios: Vec<Scenario>,
}

impl SuiteBuilder {
    fn new(path: ProductPath, today: NaiveDate) -> Self {
        Self {
            path,
            today,
            scenarios: Vec::new(),
        }
    }

    fn approved(&self) -> CardSubmission {
        data::approved_card(self.today, self.path)
    }

    fn add(&mut self, name: &str, submission: CardSubmission, expectation: Expectation) {
        self.scenarios.push(Scenario {
            number: self.scenarios.len() + 1,
            name: name.to_string(),
            submission,
            expectation,
        });
    }

    fn field(
        &mut self,
        name: &str,
        submission: CardSubmission,
        field: FormField,
        kind: FieldErrorKind,
    ) {
        self.add(name, submission, Expectation::FieldError { field, kind });
    }
}

/// "00" 在接近世紀末時可能是有效年份
fn year_zero_expectation(today: NaiveDate, rules: &ValidationRules) -> Option<FieldErrorKind> {
    let year = expand_two_digit_year(today, 0);
    if year < today.year() {
        Some(FieldErrorKind::Expired)
    } else if year > today.year() + rules.max_years_ahead as i32 {
        Some(FieldErrorKind::Term)
    } else {
        None
    }
}

/// 直接刷卡購票的場景
pub fn debit_suite(today: NaiveDate, rules: &ValidationRules) -> Vec<Scenario> {
    build_suite(ProductPath::Debit, today, rules)
}

/// 信用貸款購票的場景，多一個拒絕卡的情境
pub fn credit_suite(today: NaiveDate, rules: &ValidationRules) -> Vec<Scenario> {
    build_suite(ProductPath::Credit, today, rules)
}

fn build_suite(path: ProductPath, today: NaiveDate, rules: &ValidationRules) -> Vec<Scenario> {
    use FieldErrorKind::*;
    use FormField::*;

    let mut s = SuiteBuilder::new(path, today);
    let approved = s.approved();
    let declined = data::declined_card(today, path);

    s.add(
        "Buying with a valid approved card",
        approved.clone(),
        Expectation::Status {
            status: GatewayStatus::Approved,
        },
    );
    s.add(
        "Buying with a declined card",
        declined.clone(),
        Expectation::Status {
            status: GatewayStatus::Declined,
        },
    );
    if path == ProductPath::Credit {
        s.add(
            "Buying in credit with a declined card shows the decline",
            declined,
            Expectation::Status {
                status: GatewayStatus::Declined,
            },
        );
    }

    s.field(
        "13 digits in the card number field",
        approved.clone().with_number(data::card_number_with_13_digits()),
        CardNumber,
        Format,
    );
    s.field(
        "16 zero in the card number field",
        approved.clone().with_number(data::card_number_with_16_zero()),
        CardNumber,
        Format,
    );
    s.field(
        "The card number field is empty",
        approved.clone().with_number(data::empty_value()),
        CardNumber,
        Required,
    );

    s.field(
        "The figure more than 12 is in the month field",
        approved.clone().with_expiry_month(data::two_digits_greater_than_12()),
        ExpiryMonth,
        Term,
    );
    s.field(
        "Figure 0 is in the month field",
        approved.clone().with_expiry_month(data::zero_digit()),
        ExpiryMonth,
        Format,
    );
    s.field(
        "Two 0 are in the month field",
        approved.clone().with_expiry_month(data::two_zero_digits()),
        ExpiryMonth,
        Term,
    );
    s.field(
        "A digit is in the month field",
        approved.clone().with_expiry_month(data::one_digit()),
        ExpiryMonth,
        Format,
    );
    match data::previous_month_in_current_year(today) {
        Some((month, year)) => s.field(
            "Previous month and current year are in their fields",
            approved.clone().with_expiry_month(month).with_expiry_year(year),
            ExpiryMonth,
            Term,
        ),
        None => tracing::warn!("Skipping previous-month scenario: no earlier month in January"),
    }
    s.field(
        "The month field is empty",
        approved.clone().with_expiry_month(data::empty_value()),
        ExpiryMonth,
        Required,
    );

    s.field(
        "A digit is in the year field",
        approved.clone().with_expiry_year(data::one_digit()),
        ExpiryYear,
        Format,
    );
    s.field(
        "Previous year is in the year field",
        approved.clone().with_expiry_year(data::year(today, -1)),
        ExpiryYear,
        Expired,
    );
    let zero_year = approved.clone().with_expiry_year(data::two_zero_digits());
    match year_zero_expectation(today, rules) {
        Some(kind) => s.field("Two zero are in the year field", zero_year, ExpiryYear, kind),
        None => s.add("Two zero are in the year field", zero_year, Expectation::Accepted),
    }
    s.field(
        "The year beyond the card term is in the year field",
        approved
            .clone()
            .with_expiry_year(data::year_beyond_term(today, rules.max_years_ahead)),
        ExpiryYear,
        Term,
    );
    s.field(
        "The year field is empty",
        approved.clone().with_expiry_year(data::empty_value()),
        ExpiryYear,
        Required,
    );

    s.field(
        "Figures are in the cardholder's name",
        approved.clone().with_holder_name(data::holder_with_figures()),
        HolderName,
        Format,
    );
    s.field(
        "Symbols are in the cardholder's name",
        approved.clone().with_holder_name(data::holder_with_symbols()),
        HolderName,
        Format,
    );
    s.field(
        "Cardholder's name is in Cyrillic",
        approved.clone().with_holder_name(data::holder_in_cyrillic()),
        HolderName,
        Format,
    );
    s.add(
        "Cardholder's name is in lower case",
        approved.clone().with_holder_name(data::holder_in_lower_case()),
        Expectation::Accepted,
    );
    s.add(
        "Cardholder's name is in capital letters",
        approved.clone().with_holder_name(data::holder_in_capital_letters()),
        Expectation::Accepted,
    );
    s.field(
        "Cardholder's name is longer than the limit",
        approved
            .clone()
            .with_holder_name(data::holder_longer_than(rules.holder_max_len)),
        HolderName,
        Limit,
    );
    s.field(
        "The cardholder's name field is empty",
        approved.clone().with_holder_name(data::empty_value()),
        HolderName,
        Required,
    );

    s.field(
        "Three zero are in the CVC field",
        approved.clone().with_security_code(data::security_code_three_zero()),
        SecurityCode,
        Format,
    );
    s.field(
        "Less than 3 digits are in the CVC field",
        approved.clone().with_security_code(data::security_code_less_than_3()),
        SecurityCode,
        Format,
    );
    s.field(
        "The CVC field is empty",
        approved.with_security_code(data::empty_value()),
        SecurityCode,
        Required,
    );

    s.scenarios
}

/// Runs scenarios one by one, each against a fresh ledger.
pub struct ScenarioRunner<G: Gateway + Clone> {
    gateway: G,
    rules: ValidationRules,
    today: NaiveDate,
}

impl<G: Gateway + Clone> ScenarioRunner<G> {
    pub fn new(gateway: G, rules: ValidationRules, today: NaiveDate) -> Self {
        Self {
            gateway,
            rules,
            today,
        }
    }

    pub async fn run(&self, scenario: &Scenario) -> ScenarioResult {
        let validator = FormValidator::new(self.rules, self.today);
        let service = CheckoutService::new(validator, self.gateway.clone(), InMemoryLedger::new());

        let verdict = match service.submit(&scenario.submission).await {
            Ok(outcome) => check(&scenario.expectation, &outcome, service.ledger()),
            Err(e) => Err(format!("checkout failed: {}", e)),
        };

        let (passed, detail) = match verdict {
            Ok(detail) => (true, detail),
            Err(detail) => (false, detail),
        };
        if passed {
            tracing::info!("✅ №{} {} ({})", scenario.number, scenario.name, scenario.path());
        } else {
            tracing::warn!(
                "❌ №{} {} ({}): {}",
                scenario.number,
                scenario.name,
                scenario.path(),
                detail
            );
        }

        ScenarioResult {
            number: scenario.number,
            name: scenario.name.clone(),
            path: scenario.path(),
            expectation: scenario.expectation,
            passed,
            detail,
        }
    }

    pub async fn run_all(&self, scenarios: &[Scenario]) -> SuiteReport {
        let mut report = SuiteReport::default();
        for scenario in scenarios {
            report.results.push(self.run(scenario).await);
        }
        tracing::info!("📊 {} of {} scenarios passed", report.passed(), report.len());
        report
    }
}

fn check(
    expectation: &Expectation,
    outcome: &CheckoutOutcome,
    ledger: &InMemoryLedger,
) -> std::result::Result<String, String> {
    match (expectation, outcome) {
        (Expectation::FieldError { field, kind }, CheckoutOutcome::Rejected(report)) => {
            match report.error_for(*field) {
                Some(actual) if actual == *kind => {}
                Some(actual) => {
                    return Err(format!("expected {} on {}, got {}", kind, field, actual))
                }
                None => return Err(format!("expected {} on {}, field passed", kind, field)),
            }
            if !ledger.is_empty() {
                return Err("refused form left records in the ledger".to_string());
            }
            Ok(format!("refused: {}", report))
        }
        (Expectation::FieldError { .. }, CheckoutOutcome::Completed { status, .. }) => {
            Err(format!("form was accepted and gateway answered {}", status))
        }
        (Expectation::Accepted, CheckoutOutcome::Completed { status, .. }) => {
            Ok(format!("accepted, gateway answered {}", status))
        }
        (Expectation::Accepted, CheckoutOutcome::Rejected(report)) => {
            Err(format!("form was refused: {}", report))
        }
        (Expectation::Status { .. }, CheckoutOutcome::Rejected(report)) => {
            Err(format!("form was refused: {}", report))
        }
        (
            Expectation::Status { status: expected },
            CheckoutOutcome::Completed { status, order },
        ) => {
            if status != expected {
                return Err(format!("expected {}, gateway answered {}", expected, status));
            }
            check_ledger(*expected, order, ledger)
        }
    }
}

fn check_ledger(
    expected: GatewayStatus,
    order: &crate::domain::model::OrderRecord,
    ledger: &InMemoryLedger,
) -> std::result::Result<String, String> {
    let latest_order = ledger
        .latest_order()
        .ok_or_else(|| "no order record written".to_string())?;
    if latest_order.id != order.id {
        return Err("latest order is not the one returned by checkout".to_string());
    }

    match order.credit_id {
        None => {
            let payment = ledger
                .latest_payment()
                .ok_or_else(|| "no payment record written".to_string())?;
            if payment.status != expected {
                return Err(format!("payment status is {}", payment.status));
            }
            if latest_order.payment_id != payment.transaction_id {
                return Err("order.payment_id differs from payment.transaction_id".to_string());
            }
            Ok(format!("payment {} {}", payment.transaction_id, payment.status))
        }
        Some(ref credit_id) => {
            let credit = ledger
                .latest_credit_request()
                .ok_or_else(|| "no credit request record written".to_string())?;
            if credit.status != expected {
                return Err(format!("credit request status is {}", credit.status));
            }
            if *credit_id != credit.id {
                return Err("order.credit_id differs from credit_request.id".to_string());
            }
            if latest_order.payment_id != credit.bank_id {
                return Err("order.payment_id differs from credit_request.bank_id".to_string());
            }
            Ok(format!("credit request {} {}", credit.id, credit.status))
        }
    }
}
