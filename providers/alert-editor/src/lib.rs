//! Alert editing workflows
//!
//! This crate drives one create dialog or detail edit surface: the editing
//! session owning the candidate record, the order conflict resolver, the
//! submit/delete workflows and the first-visit onboarding flag. The alert
//! service and the UI surfaces are collaborators behind traits.

pub mod collaborators;
pub mod config;
pub mod onboarding;
pub mod resolver;
pub mod session;
pub mod workflow;

// Re-export commonly used types
pub use collaborators::{
    AlertStore, ConfirmAction, ConfirmPrompt, InfoBox, Navigator, Notifier, OrderChecker,
    QueryValidator, Toast,
};
pub use config::EditorConfig;
pub use onboarding::{check_first_visit, JsonFileStore, StoreError, VisitStore};
pub use resolver::{OrderConflictResolver, Resolution, ResolverState};
pub use session::{
    EditSession, QueryCheckTicket, SessionMode, TextField, ALERT_VALUE_PLACEHOLDER,
};
pub use workflow::{AlertEditor, DeleteOutcome, SubmitOutcome};
