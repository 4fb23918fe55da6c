//! Card form validation.
//!
//! Mirrors what the purchase page checks before it lets a form reach the
//! gateway. Every field is judged on its own and yields at most one
//! [`FieldErrorKind`].

use crate::domain::model::{CardSubmission, FieldErrorKind, FormField, ValidationReport};
use crate::domain::ports::CheckoutSettings;
use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

pub const CARD_NUMBER_LEN: usize = 16;
pub const SECURITY_CODE_LEN: usize = 3;
pub const DEFAULT_MAX_YEARS_AHEAD: u32 = 5;
pub const DEFAULT_HOLDER_MAX_LEN: usize = 85;

const HOLDER_PATTERN: &str = r"^[A-Za-z]+(?:[ \-]+[A-Za-z]+)*$";

fn holder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HOLDER_PATTERN).expect("holder name pattern compiles"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    /// 最多可接受幾年後到期
    pub max_years_ahead: u32,
    pub holder_max_len: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            max_years_ahead: DEFAULT_MAX_YEARS_AHEAD,
            holder_max_len: DEFAULT_HOLDER_MAX_LEN,
        }
    }
}

impl ValidationRules {
    pub fn from_settings<C: CheckoutSettings + ?Sized>(settings: &C) -> Self {
        Self {
            max_years_ahead: settings.max_years_ahead(),
            holder_max_len: settings.holder_max_len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormValidator {
    rules: ValidationRules,
    today: NaiveDate,
}

impl FormValidator {
    pub fn new(rules: ValidationRules, today: NaiveDate) -> Self {
        Self { rules, today }
    }

    pub fn for_today(rules: ValidationRules) -> Self {
        Self::new(rules, Local::now().date_naive())
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn validate(&self, submission: &CardSubmission) -> ValidationReport {
        let mut report = ValidationReport::new();
        for field in FormField::ALL {
            if let Some(kind) = self.validate_field(field, submission) {
                report.push(field, kind);
            }
        }

        if report.is_accepted() {
            tracing::debug!("Form accepted for {} path", submission.product_path);
        } else {
            tracing::debug!("Form refused: {}", report);
        }
        report
    }

    pub fn validate_field(
        &self,
        field: FormField,
        submission: &CardSubmission,
    ) -> Option<FieldErrorKind> {
        match field {
            FormField::CardNumber => self.check_card_number(&submission.number),
            FormField::ExpiryMonth => {
                self.check_month(&submission.expiry_month, &submission.expiry_year)
            }
            FormField::ExpiryYear => self.check_year(&submission.expiry_year),
            FormField::HolderName => self.check_holder(&submission.holder_name),
            FormField::SecurityCode => self.check_security_code(&submission.security_code),
        }
    }

    fn check_card_number(&self, number: &str) -> Option<FieldErrorKind> {
        if number.is_empty() {
            return Some(FieldErrorKind::Required);
        }
        let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();
        if !is_digits(&digits) || digits.len() != CARD_NUMBER_LEN {
            return Some(FieldErrorKind::Format);
        }
        // 全零卡號視為格式錯誤
        if digits.chars().all(|c| c == '0') {
            return Some(FieldErrorKind::Format);
        }
        None
    }

    fn check_month(&self, month: &str, year: &str) -> Option<FieldErrorKind> {
        if month.is_empty() {
            return Some(FieldErrorKind::Required);
        }
        let value = match parse_two_digits(month) {
            Some(value) => value,
            None => return Some(FieldErrorKind::Format),
        };
        if value == 0 || value > 12 {
            return Some(FieldErrorKind::Term);
        }
        let current_year = parse_two_digits(year).map(|yy| self.full_year(yy));
        if current_year == Some(self.today.year()) && value < self.today.month() {
            return Some(FieldErrorKind::Term);
        }
        None
    }

    fn check_year(&self, year: &str) -> Option<FieldErrorKind> {
        if year.is_empty() {
            return Some(FieldErrorKind::Required);
        }
        let value = match parse_two_digits(year) {
            Some(value) => value,
            None => return Some(FieldErrorKind::Format),
        };
        let full = self.full_year(value);
        let current = self.today.year();
        if full < current {
            return Some(FieldErrorKind::Expired);
        }
        if full > current + self.rules.max_years_ahead as i32 {
            return Some(FieldErrorKind::Term);
        }
        None
    }

    fn check_holder(&self, holder: &str) -> Option<FieldErrorKind> {
        if holder.is_empty() {
            return Some(FieldErrorKind::Required);
        }
        if !holder_regex().is_match(holder) {
            return Some(FieldErrorKind::Format);
        }
        if holder.chars().count() > self.rules.holder_max_len {
            return Some(FieldErrorKind::Limit);
        }
        None
    }

    fn check_security_code(&self, code: &str) -> Option<FieldErrorKind> {
        if code.is_empty() {
            return Some(FieldErrorKind::Required);
        }
        if !is_digits(code) || code.len() != SECURITY_CODE_LEN {
            return Some(FieldErrorKind::Format);
        }
        if code.chars().all(|c| c == '0') {
            return Some(FieldErrorKind::Format);
        }
        None
    }

    fn full_year(&self, two_digits: u32) -> i32 {
        expand_two_digit_year(self.today, two_digits)
    }
}

/// 兩位數年份以今年為中心展開到 ±50 年內，跨世紀時 "00" 會落在下一個世紀
pub fn expand_two_digit_year(today: NaiveDate, two_digits: u32) -> i32 {
    let current = today.year();
    let full = current - current.rem_euclid(100) + two_digits as i32;
    if full < current - 50 {
        full + 100
    } else if full >= current + 50 {
        full - 100
    } else {
        full
    }
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn parse_two_digits(value: &str) -> Option<u32> {
    if value.len() != 2 || !is_digits(value) {
        return None;
    }
    value.parse().ok()
}
