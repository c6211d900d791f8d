//! External collaborators of the editing workflows
//!
//! The alert service, the remote checks, the notification surface and the
//! navigation surface are all provided by the embedding application.

use alert_admin_common::{AlertId, AlertRecord, Message, OrderCheckResult, OrderQuery, ServiceError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

/// Persistence service for alert records
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait AlertStore: Send + Sync {
    /// Create a new alert, returning the stored record with its assigned id
    async fn create(&self, record: &AlertRecord) -> Result<AlertRecord, ServiceError>;
    async fn update(&self, id: &AlertId, record: &AlertRecord) -> Result<(), ServiceError>;
    async fn remove(&self, id: &AlertId) -> Result<(), ServiceError>;
    async fn fetch(&self, id: &AlertId) -> Result<AlertRecord, ServiceError>;
}

/// Remote check of BEx query names
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait QueryValidator: Send + Sync {
    async fn check_bex_query(&self, name: &str) -> Result<bool, ServiceError>;
}

/// Remote check of a requested display order
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait OrderChecker: Send + Sync {
    async fn check_valid_order(&self, query: &OrderQuery) -> Result<OrderCheckResult, ServiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmAction {
    Yes,
    /// Also returned when the prompt is dismissed
    No,
}

/// Transient message that disappears after `duration`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: Message,
    pub duration: Duration,
}

/// Blocking Yes/No prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub message: Message,
    pub initial_focus: ConfirmAction,
}

impl ConfirmPrompt {
    /// Prompt focused on No, as used for every destructive choice
    pub fn defaulting_to_no(message: impl Into<Message>) -> Self {
        Self {
            message: message.into(),
            initial_focus: ConfirmAction::No,
        }
    }
}

/// Informational message box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoBox {
    pub title: Message,
    pub message: Message,
    pub details: Option<Message>,
}

/// Notification surface of the UI
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn toast(&self, toast: Toast);
    async fn confirm(&self, prompt: ConfirmPrompt) -> ConfirmAction;
    fn inform(&self, info: InfoBox);
}

/// Navigation between the master list and the detail page
#[cfg_attr(test, automock)]
pub trait Navigator: Send + Sync {
    fn show_detail(&self, id: &AlertId);
    fn show_log(&self, id: &AlertId);
    fn close_detail(&self);
    fn back(&self);
}
