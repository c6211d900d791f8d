//! Editing session for one create dialog or detail edit surface
//!
//! The session owns the candidate record, the record it was bound to and the
//! validation state. Every UI event goes through `&mut EditSession`, so no
//! other component mutates the candidate while a workflow is running.

use alert_admin_common::{
    validate_with, AlertDefaults, AlertId, AlertRecord, BExVerdict, Category, Criticality, Field,
    FieldState, FieldStatus, MessageKey, ServiceError, Source, ValidationState,
};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::collaborators::{ConfirmAction, ConfirmPrompt, Notifier, QueryValidator};

/// Replaced with the measured alert value when the e-mail is sent
pub const ALERT_VALUE_PLACEHOLDER: &str = " {$value} ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    Create,
    Edit { id: AlertId },
}

/// Free-text inputs of the alert form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Title,
    TechnicalName,
    Uom,
    Detail,
    EmailDetail,
    PageNo,
    OrderOnCt,
    EmailTo,
    EmailOrg,
    EmailCc,
    EmailBody,
}

impl TextField {
    /// Validated field backing this input, if any
    pub fn validated_field(&self) -> Option<Field> {
        match self {
            TextField::Title => Some(Field::Title),
            TextField::TechnicalName => Some(Field::TechnicalName),
            TextField::OrderOnCt => Some(Field::OrderOnCt),
            TextField::EmailTo => Some(Field::EmailTo),
            TextField::EmailOrg => Some(Field::EmailOrg),
            TextField::EmailCc => Some(Field::EmailCc),
            TextField::EmailBody => Some(Field::EmailBody),
            TextField::Uom | TextField::Detail | TextField::EmailDetail | TextField::PageNo => None,
        }
    }
}

/// Handle for a BEx check running outside the session borrow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCheckTicket {
    token: Uuid,
    name: String,
}

impl QueryCheckTicket {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone)]
pub struct EditSession {
    mode: SessionMode,
    record: AlertRecord,
    original: AlertRecord,
    validation: ValidationState,
    bex: BExVerdict,
    edit_mode: bool,
    busy: bool,
    active: bool,
    token: Uuid,
}

impl EditSession {
    /// Session for the create dialog, starting from a fresh candidate
    pub fn create(defaults: &AlertDefaults, now: DateTime<Utc>) -> Self {
        let record = AlertRecord::new_candidate(defaults, now);
        let bex = initial_verdict(&record, false);

        Self {
            mode: SessionMode::Create,
            original: record.clone(),
            record,
            validation: ValidationState::new(),
            bex,
            edit_mode: true,
            busy: false,
            active: true,
            token: Uuid::new_v4(),
        }
    }

    /// Session for the detail page bound to a fetched alert
    pub fn edit(fetched: &AlertRecord) -> Result<Self, ServiceError> {
        let id = fetched
            .id
            .clone()
            .ok_or_else(|| ServiceError::MalformedResponse("alert without id".to_string()))?;
        let record = AlertRecord::for_edit(fetched);
        let bex = initial_verdict(&record, true);

        Ok(Self {
            mode: SessionMode::Edit { id },
            original: record.clone(),
            record,
            validation: ValidationState::new(),
            bex,
            edit_mode: false,
            busy: false,
            active: true,
            token: Uuid::new_v4(),
        })
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn record(&self) -> &AlertRecord {
        &self.record
    }

    pub fn original(&self) -> &AlertRecord {
        &self.original
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn bex_verdict(&self) -> BExVerdict {
        self.bex
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True when the candidate differs from the bound record
    pub fn is_modified(&self) -> bool {
        self.record != self.original
    }

    pub fn enter_edit_mode(&mut self) {
        self.edit_mode = true;
    }

    /// Leave edit mode, asking first when the candidate was modified.
    ///
    /// Returns true when edit mode was left.
    pub async fn cancel(&mut self, notifier: &dyn Notifier) -> bool {
        if !self.is_modified() {
            self.edit_mode = false;
            return true;
        }

        let action = notifier
            .confirm(ConfirmPrompt::defaulting_to_no(MessageKey::ConfirmCancelEdit))
            .await;

        match action {
            ConfirmAction::Yes => {
                self.restore();
                self.edit_mode = false;
                debug!("Discarded changes to alert candidate");
                true
            }
            ConfirmAction::No => false,
        }
    }

    /// Reset the candidate to the bound record
    pub fn restore(&mut self) {
        self.record = self.original.clone();
        self.validation = ValidationState::new();
        self.bex = initial_verdict(&self.record, matches!(self.mode, SessionMode::Edit { .. }));
    }

    /// Deactivate the session; results of checks still in flight are dropped
    pub fn close(&mut self) {
        self.active = false;
        self.edit_mode = false;
        self.token = Uuid::new_v4();
    }

    /// Write a text input without touching the validation state
    pub fn set_field(&mut self, field: TextField, value: &str) {
        let value = value.to_string();
        match field {
            TextField::Title => self.record.title = value,
            TextField::TechnicalName => {
                if self.record.technical_name != value {
                    self.record.technical_name = value;
                    self.technical_name_changed();
                }
            }
            TextField::Uom => self.record.uom = value,
            TextField::Detail => self.record.detail = value,
            TextField::EmailDetail => self.record.email_detail = value,
            TextField::PageNo => self.record.page_no = value,
            TextField::OrderOnCt => self.record.order_on_ct = value,
            TextField::EmailTo => self.record.email_to = value,
            TextField::EmailOrg => self.record.email_org = value,
            TextField::EmailCc => self.record.email_cc = value,
            TextField::EmailBody => self.record.email_body = value,
        }
    }

    /// Keystroke on a text input: store the value and clear the field's error
    pub fn live_change(&mut self, field: TextField, value: &str) {
        self.set_field(field, value);
        if let Some(validated) = field.validated_field() {
            self.validation.live_change(validated, value);
        }
    }

    pub fn select_source(&mut self, source: Option<Source>) {
        self.record.source = source;
        if source.is_some() {
            self.validation.clear(Field::Source);
        }

        match source {
            Some(Source::BEx) if looks_like_xsjs_service(&self.record.technical_name) => {
                self.bex = BExVerdict::Invalid;
                self.validation
                    .set_error(Field::TechnicalName, MessageKey::InvalidBExQuery);
            }
            Some(Source::BEx) => {
                if self.bex == BExVerdict::NotRequired {
                    self.bex = BExVerdict::Unchecked;
                }
            }
            _ => {
                self.bex = BExVerdict::NotRequired;
                self.validation.clear(Field::TechnicalName);
            }
        }
    }

    /// Choosing a category starts over on the first page
    pub fn select_category(&mut self, category: Option<Category>) {
        self.record.category = category;
        if category.is_some() {
            self.validation.clear(Field::Category);
        }
        self.record.page_no = "1".to_string();
    }

    pub fn select_criticality(&mut self, criticality: Option<Criticality>) {
        self.record.criticality = criticality;
    }

    pub fn select_frequency(&mut self, frequency: &str) {
        self.record.frequency = frequency.to_string();
    }

    pub fn toggle_show_on_ct(&mut self, selected: bool) {
        self.record.show_on_ct = selected;
        if !selected {
            self.record.order_on_ct = "0".to_string();
            self.validation.clear(Field::OrderOnCt);
        }
    }

    pub fn set_trend(&mut self, trend: bool) {
        self.record.trend = trend;
    }

    pub fn set_auto_email(&mut self, auto_email: bool) {
        self.record.auto_email = auto_email;
        if !auto_email {
            for field in [Field::EmailTo, Field::EmailOrg, Field::EmailCc, Field::EmailBody] {
                self.validation.clear(field);
            }
        }
    }

    /// Append the alert value placeholder to the e-mail body
    pub fn insert_alert_value(&mut self) {
        let body = format!("{}{}", self.record.email_body, ALERT_VALUE_PLACEHOLDER);
        self.live_change(TextField::EmailBody, &body);
    }

    /// Take a position picked in the order value help
    pub fn choose_order(&mut self, position: &str) {
        self.record.order_on_ct = position.trim().to_string();
        self.validation.clear(Field::OrderOnCt);
    }

    /// Recompute the whole validation state from the candidate
    pub fn revalidate(&mut self) -> bool {
        self.validation = validate_with(&self.record, self.bex);
        self.validation.is_valid()
    }

    /// Start a BEx check of the current technical name.
    ///
    /// Returns `None` when no remote check is needed: the source is not BEx,
    /// or the name is empty (then flagged as required).
    pub fn begin_query_check(&mut self) -> Option<QueryCheckTicket> {
        if self.record.source != Some(Source::BEx) {
            self.bex = BExVerdict::NotRequired;
            self.validation.clear(Field::TechnicalName);
            return None;
        }

        let name = self.record.technical_name.trim();
        if name.is_empty() {
            self.bex = BExVerdict::Unchecked;
            self.validation
                .set_error(Field::TechnicalName, MessageKey::RequiredField);
            return None;
        }

        self.bex = BExVerdict::Pending;
        self.validation
            .set(Field::TechnicalName, FieldState::validating());

        Some(QueryCheckTicket {
            token: self.token,
            name: name.to_string(),
        })
    }

    /// Merge the answer of a BEx check started with [`begin_query_check`].
    ///
    /// Returns false when the answer was dropped because the session was
    /// closed or the technical name changed in the meantime.
    ///
    /// [`begin_query_check`]: EditSession::begin_query_check
    pub fn apply_query_check(
        &mut self,
        ticket: &QueryCheckTicket,
        result: &Result<bool, ServiceError>,
    ) -> bool {
        if !self.active
            || ticket.token != self.token
            || ticket.name != self.record.technical_name.trim()
        {
            debug!(query = %ticket.name, "Dropping stale BEx query check result");
            return false;
        }

        match result {
            Ok(true) => {
                self.bex = BExVerdict::Valid;
                self.validation.set(Field::TechnicalName, FieldState::success());
            }
            Ok(false) => {
                self.bex = BExVerdict::Invalid;
                self.validation
                    .set_error(Field::TechnicalName, MessageKey::InvalidBExQuery);
            }
            Err(e) => {
                error!(query = %ticket.name, error = %e, "{}", MessageKey::ValidateBExFail);
                self.bex = BExVerdict::Unchecked;
                self.validation.clear(Field::TechnicalName);
            }
        }
        true
    }

    /// Run the BEx check of the current technical name and merge its verdict
    pub async fn check_technical_name(
        &mut self,
        validator: &dyn QueryValidator,
    ) -> Result<BExVerdict, ServiceError> {
        let ticket = match self.begin_query_check() {
            Some(ticket) => ticket,
            None => return Ok(self.bex),
        };

        let result = validator.check_bex_query(ticket.name()).await;
        self.apply_query_check(&ticket, &result);
        result.map(|_| self.bex)
    }

    /// A verdict or pending check belongs to the previous name
    fn technical_name_changed(&mut self) {
        if self.record.source == Some(Source::BEx) {
            self.bex = BExVerdict::Unchecked;
            let status = self.validation.get(Field::TechnicalName).status;
            if status == FieldStatus::Success || status == FieldStatus::Validating {
                self.validation.clear(Field::TechnicalName);
            }
        } else {
            self.bex = BExVerdict::NotRequired;
        }
    }

    pub(crate) fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub(crate) fn mark_order_error(&mut self, message: MessageKey) {
        self.validation.set_error(Field::OrderOnCt, message);
    }

    pub(crate) fn clear_order_state(&mut self) {
        self.validation.clear(Field::OrderOnCt);
    }

    /// Order is irrelevant when the alert is not shown on the control tower
    pub(crate) fn force_hidden_order(&mut self) {
        if !self.record.show_on_ct {
            self.record.order_on_ct = "0".to_string();
        }
    }

    /// The candidate was stored: it becomes the bound record
    pub(crate) fn mark_saved(&mut self, stored: Option<AlertRecord>) {
        if let Some(stored) = stored {
            self.record = stored;
        }
        self.original = self.record.clone();
        self.edit_mode = false;

        if self.mode == SessionMode::Create {
            info!(alert_id = ?self.record.id, "Created alert, closing dialog");
            self.close();
        }
    }
}

/// Stored alerts passed the BEx check when they were saved
fn initial_verdict(record: &AlertRecord, stored: bool) -> BExVerdict {
    match record.source {
        Some(Source::BEx) if stored => BExVerdict::Valid,
        Some(Source::BEx) => BExVerdict::Unchecked,
        _ => BExVerdict::NotRequired,
    }
}

fn looks_like_xsjs_service(name: &str) -> bool {
    name.to_ascii_lowercase().contains(".xsjs")
}
