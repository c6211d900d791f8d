//! Value formatters used by the alert list and detail views

use chrono::{Duration, Local, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::Criticality;

/// Semantic state used to colour values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueState {
    None,
    Success,
    Warning,
    Error,
}

/// Round a numeric string to two decimals. Empty or non-numeric input gives an empty string.
pub fn currency_value(value: &str) -> String {
    match value.trim().parse::<f64>() {
        Ok(number) if !value.trim().is_empty() => format!("{:.2}", number),
        _ => String::new(),
    }
}

/// `MM/dd/yyyy`, today when no date is given
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.unwrap_or_else(|| Local::now().date_naive())
        .format("%m/%d/%Y")
        .to_string()
}

/// Icon name for the alert level
pub fn alert_status_icon(criticality: Option<Criticality>) -> &'static str {
    match criticality {
        Some(Criticality::Critical) => "alert",
        Some(Criticality::Warning) => "message-warning",
        _ => "warning2",
    }
}

pub fn alert_state(criticality: Option<Criticality>) -> ValueState {
    match criticality {
        Some(Criticality::Critical) => ValueState::Error,
        Some(Criticality::Warning) => ValueState::Warning,
        _ => ValueState::None,
    }
}

/// Thousands separators on the integer part, `0` for non-numeric input
pub fn with_comma(value: &str) -> String {
    let number = match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => number,
        _ => return "0".to_string(),
    };

    let rendered = number.to_string();
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

/// Short form: `B` for billions, `M` (or `MM`) for millions, `K` (or `M`) for thousands.
///
/// The sign is dropped.
pub fn format_number(value: &str, digits: usize, million_as_mm: bool) -> String {
    let number = match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => number.abs(),
        _ => return "0".to_string(),
    };

    if number >= 1.0e9 {
        format!("{:.*}B", digits, number / 1.0e9)
    } else if number >= 1.0e6 {
        let unit = if million_as_mm { "MM" } else { "M" };
        format!("{:.*}{}", digits, number / 1.0e6, unit)
    } else if number >= 1.0e3 {
        let unit = if million_as_mm { "M" } else { "K" };
        format!("{:.*}{}", digits, number / 1.0e3, unit)
    } else {
        format!("{:.*}", digits, number)
    }
}

/// Outcome of an alert e-mail delivery as recorded in the alert log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmailStatus {
    #[serde(rename = "S")]
    Sent,
    #[serde(rename = "E")]
    Failed,
}

impl EmailStatus {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(EmailStatus::Sent),
            "E" => Some(EmailStatus::Failed),
            _ => None,
        }
    }
}

pub fn email_status_icon(status: Option<EmailStatus>) -> &'static str {
    match status {
        Some(EmailStatus::Sent) => "accept",
        Some(EmailStatus::Failed) => "status-negative",
        None => "",
    }
}

pub fn email_status_state(status: Option<EmailStatus>) -> ValueState {
    match status {
        Some(EmailStatus::Sent) => ValueState::Success,
        Some(EmailStatus::Failed) => ValueState::Error,
        None => ValueState::None,
    }
}

pub fn email_status_text(status: Option<EmailStatus>) -> &'static str {
    match status {
        Some(EmailStatus::Sent) => "Success",
        Some(EmailStatus::Failed) => "Error",
        None => "",
    }
}

static LEADING_ZEROS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b0+").expect("leading zero pattern compiles"));

/// Login stamps are stored three hours ahead of the displayed time
const LOGIN_OFFSET_HOURS: i64 = 3;

/// Header line with the user name and the local time of the last login.
///
/// Nothing is shown until both the login date and time are known.
pub fn last_login(
    username: &str,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> Option<String> {
    let login = date?.and_time(time?) - Duration::hours(LOGIN_OFFSET_HOURS);
    Some(format!(
        "{} \u{2014}  Last Login: {}",
        username,
        login.format("%b %-d, %I:%M %p")
    ))
}

/// Strip the leading zeros of the first number in the value (`"0002"` -> `"2"`)
pub fn delete_leading_zero(value: &str) -> String {
    LEADING_ZEROS.replace(value, "").into_owned()
}
