//! Card data for the purchase scenarios.
//!
//! Every date-dependent value is computed from the `today` handed in, so a
//! scenario built on a fixed date always produces the same form.

use crate::core::gateway::{APPROVED_CARD, DECLINED_CARD};
use crate::domain::model::{CardSubmission, ProductPath};
use chrono::{Datelike, Months, NaiveDate};

pub const VALID_HOLDER: &str = "Ivan Petrov";
pub const VALID_SECURITY_CODE: &str = "123";

pub fn approved_card(today: NaiveDate, path: ProductPath) -> CardSubmission {
    valid_card(APPROVED_CARD, today, path)
}

pub fn declined_card(today: NaiveDate, path: ProductPath) -> CardSubmission {
    valid_card(DECLINED_CARD, today, path)
}

fn valid_card(number: &str, today: NaiveDate, path: ProductPath) -> CardSubmission {
    CardSubmission {
        number: number.to_string(),
        expiry_month: month(today, 0),
        expiry_year: year(today, 1),
        holder_name: VALID_HOLDER.to_string(),
        security_code: VALID_SECURITY_CODE.to_string(),
        product_path: path,
    }
}

pub fn card_number_with_13_digits() -> String {
    "4444 4444 4444 4".to_string()
}

pub fn card_number_with_16_zero() -> String {
    "0000 0000 0000 0000".to_string()
}

pub fn empty_value() -> String {
    String::new()
}

/// 以月份位移計算，格式為兩位數
pub fn month(today: NaiveDate, shift: i32) -> String {
    let shifted = shift_months(today, shift);
    format!("{:02}", shifted.month())
}

pub fn year(today: NaiveDate, shift: i32) -> String {
    format!("{:02}", (today.year() + shift).rem_euclid(100))
}

/// Previous month paired with the current year. `None` in January, where
/// the previous month belongs to last year.
pub fn previous_month_in_current_year(today: NaiveDate) -> Option<(String, String)> {
    if today.month() == 1 {
        return None;
    }
    Some((month(today, -1), year(today, 0)))
}

pub fn two_digits_greater_than_12() -> String {
    "13".to_string()
}

pub fn zero_digit() -> String {
    "0".to_string()
}

pub fn two_zero_digits() -> String {
    "00".to_string()
}

pub fn one_digit() -> String {
    "5".to_string()
}

pub fn year_beyond_term(today: NaiveDate, max_years_ahead: u32) -> String {
    year(today, max_years_ahead as i32 + 1)
}

pub fn holder_with_figures() -> String {
    "Ivan Petrov 2".to_string()
}

pub fn holder_with_symbols() -> String {
    "Ivan #Petrov!".to_string()
}

pub fn holder_in_cyrillic() -> String {
    "Иван Петров".to_string()
}

pub fn holder_in_lower_case() -> String {
    "ivan petrov".to_string()
}

pub fn holder_in_capital_letters() -> String {
    "IVAN PETROV".to_string()
}

pub fn holder_longer_than(limit: usize) -> String {
    "A".repeat(limit + 1)
}

pub fn security_code_less_than_3() -> String {
    "12".to_string()
}

pub fn security_code_three_zero() -> String {
    "000".to_string()
}

fn shift_months(date: NaiveDate, shift: i32) -> NaiveDate {
    let months = Months::new(shift.unsigned_abs());
    let shifted = if shift >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}
