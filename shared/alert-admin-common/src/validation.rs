//! Field validation for alert records
//!
//! [`validate`] recomputes the whole [`ValidationState`] from a record so the
//! form can show every problem at once. [`ValidationState::live_change`] is the
//! narrower per-keystroke update: it only touches the edited field and never
//! re-runs cross-field rules.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::messages::MessageKey;
use crate::types::{AlertRecord, Source};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z]{2,3})+$")
        .expect("e-mail pattern compiles")
});

static ORG_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9]{6,}$").expect("organization code pattern compiles"));

/// Form fields that carry a validation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    Source,
    TechnicalName,
    Category,
    #[serde(rename = "orderOnCT")]
    OrderOnCt,
    EmailTo,
    EmailOrg,
    #[serde(rename = "emailCC")]
    EmailCc,
    EmailBody,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Title,
        Field::Source,
        Field::TechnicalName,
        Field::Category,
        Field::OrderOnCt,
        Field::EmailTo,
        Field::EmailOrg,
        Field::EmailCc,
        Field::EmailBody,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldStatus {
    #[default]
    None,
    Error,
    Success,
    /// An asynchronous check for the field is still in flight
    Validating,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState {
    pub status: FieldStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageKey>,
}

impl FieldState {
    pub const NONE: FieldState = FieldState {
        status: FieldStatus::None,
        message: None,
    };

    pub fn error(message: MessageKey) -> Self {
        Self {
            status: FieldStatus::Error,
            message: Some(message),
        }
    }

    pub fn success() -> Self {
        Self {
            status: FieldStatus::Success,
            message: None,
        }
    }

    pub fn validating() -> Self {
        Self {
            status: FieldStatus::Validating,
            message: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == FieldStatus::Error
    }
}

/// Last known result of the remote BEx query name check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BExVerdict {
    /// The source is not BEx, no remote check applies
    NotRequired,
    #[default]
    Unchecked,
    Pending,
    Valid,
    Invalid,
}

impl BExVerdict {
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            BExVerdict::NotRequired | BExVerdict::Valid | BExVerdict::Invalid
        )
    }
}

/// Per-field validation results of one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationState {
    fields: BTreeMap<Field, FieldState>,
}

impl Default for ValidationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationState {
    /// Every field in status `None`
    pub fn new() -> Self {
        Self {
            fields: Field::ALL
                .iter()
                .map(|field| (*field, FieldState::NONE))
                .collect(),
        }
    }

    pub fn get(&self, field: Field) -> &FieldState {
        self.fields.get(&field).unwrap_or(&FieldState::NONE)
    }

    pub fn set(&mut self, field: Field, state: FieldState) {
        self.fields.insert(field, state);
    }

    pub fn set_error(&mut self, field: Field, message: MessageKey) {
        self.set(field, FieldState::error(message));
    }

    pub fn clear(&mut self, field: Field) {
        self.set(field, FieldState::NONE);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldState)> {
        self.fields.iter().map(|(field, state)| (*field, state))
    }

    /// Fields currently in status `Error`
    pub fn errors(&self) -> Vec<Field> {
        self.iter()
            .filter(|(_, state)| state.is_error())
            .map(|(field, _)| field)
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        !self.fields.values().any(FieldState::is_error)
    }

    pub fn has_pending(&self) -> bool {
        self.fields
            .values()
            .any(|state| state.status == FieldStatus::Validating)
    }

    /// Apply a keystroke on `field`.
    ///
    /// A non-empty value clears the field's error. Recipient fields also check
    /// the shape of the typed value; an emptied CC field is cleared since CC is
    /// optional.
    pub fn live_change(&mut self, field: Field, value: &str) {
        let has_value = !value.trim().is_empty();

        match field {
            Field::EmailTo | Field::EmailOrg => {
                if has_value {
                    self.clear(Field::EmailTo);
                    self.clear(Field::EmailOrg);
                    if !is_valid_recipients(value) {
                        self.set_error(field, MessageKey::EmailToOrOrgRequired);
                    }
                }
            }
            Field::EmailCc => {
                self.clear(Field::EmailCc);
                if has_value && !is_valid_recipients(value) {
                    self.set_error(Field::EmailCc, MessageKey::EmailToOrOrgRequired);
                }
            }
            _ => {
                if has_value && self.get(field).is_error() {
                    self.clear(field);
                }
            }
        }
    }
}

/// Validate a record without any knowledge of the remote BEx check.
///
/// A BEx technical name is reported as still validating, never as valid.
pub fn validate(record: &AlertRecord) -> ValidationState {
    validate_with(record, BExVerdict::Pending)
}

/// Validate a record, merging the last known BEx verdict for its technical name
pub fn validate_with(record: &AlertRecord, bex: BExVerdict) -> ValidationState {
    let mut state = ValidationState::new();

    if record.title.trim().is_empty() {
        state.set_error(Field::Title, MessageKey::RequiredField);
    }

    if record.source.is_none() {
        state.set_error(Field::Source, MessageKey::RequiredField);
    }

    if record.technical_name.trim().is_empty() {
        state.set_error(Field::TechnicalName, MessageKey::RequiredField);
    } else if record.source == Some(Source::BEx) {
        match bex {
            BExVerdict::Valid => state.set(Field::TechnicalName, FieldState::success()),
            BExVerdict::Invalid => {
                state.set_error(Field::TechnicalName, MessageKey::InvalidBExQuery)
            }
            BExVerdict::Pending => state.set(Field::TechnicalName, FieldState::validating()),
            BExVerdict::Unchecked | BExVerdict::NotRequired => {}
        }
    }

    if record.category.is_none() {
        state.set_error(Field::Category, MessageKey::RequiredField);
    }

    if record.show_on_ct && !is_positive_order(&record.order_on_ct) {
        state.set_error(Field::OrderOnCt, MessageKey::OrderOnCtZero);
    }

    if record.auto_email {
        if !is_valid_recipients(&record.email_to) && !is_valid_recipients(&record.email_org) {
            state.set_error(Field::EmailTo, MessageKey::EmailToOrOrgRequired);
            state.set_error(Field::EmailOrg, MessageKey::EmailToOrOrgRequired);
        }

        if !record.email_cc.trim().is_empty() && !is_valid_recipients(&record.email_cc) {
            state.set_error(Field::EmailCc, MessageKey::EmailToOrOrgRequired);
        }

        if record.email_body.trim().is_empty() {
            state.set_error(Field::EmailBody, MessageKey::RequiredField);
        }
    }

    debug!(errors = ?state.errors(), "Validated alert record");
    state
}

/// All-digit order parsing to at least 1.
///
/// Zero, negative, fractional and non-numeric values are rejected alike.
pub fn is_positive_order(order: &str) -> bool {
    !order.is_empty()
        && order.bytes().all(|b| b.is_ascii_digit())
        && order.bytes().any(|b| b != b'0')
}

/// `user@domain.tld` with a 2-3 letter top level domain
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// `#` followed by at least six digits
pub fn is_valid_org_code(value: &str) -> bool {
    ORG_CODE_PATTERN.is_match(value)
}

pub fn is_valid_recipient(value: &str) -> bool {
    is_valid_email(value) || is_valid_org_code(value)
}

/// Check a `;`-separated recipient list.
///
/// Only the leading entry is checked: the first entry, or the second one when
/// the first is empty.
pub fn is_valid_recipients(value: &str) -> bool {
    let mut entries = value.split(';').map(str::trim);
    let first = entries.next().unwrap_or("");
    let second = entries.next().unwrap_or("");
    let entry = if first.is_empty() { second } else { first };

    is_valid_recipient(entry)
}
