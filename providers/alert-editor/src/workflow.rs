//! Submit, delete and navigation workflows of the alert editor

use alert_admin_common::{
    AlertDefaults, AlertId, BExVerdict, FailureKind, Field, Message, MessageKey, ServiceError,
    Source,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::collaborators::{
    AlertStore, ConfirmAction, ConfirmPrompt, Navigator, Notifier, OrderChecker, QueryValidator,
    Toast,
};
use crate::config::EditorConfig;
use crate::resolver::{OrderConflictResolver, Resolution};
use crate::session::EditSession;

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The session is closed, read-only, or flagged busy by the embedding UI
    Ignored,
    Invalid { errors: Vec<Field> },
    QueryCheckFailed(ServiceError),
    Resolved(Resolution),
}

impl SubmitOutcome {
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            SubmitOutcome::Ignored => None,
            SubmitOutcome::Invalid { .. } => Some(FailureKind::Validation),
            SubmitOutcome::QueryCheckFailed(_) => Some(FailureKind::Remote),
            SubmitOutcome::Resolved(resolution) => resolution.failure_kind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Declined,
    /// The record was never stored, nothing to remove
    MissingId,
    Deleted(AlertId),
    Failed(ServiceError),
}

/// Entry point of the editing workflows, holding the collaborators
pub struct AlertEditor {
    store: Arc<dyn AlertStore>,
    validator: Arc<dyn QueryValidator>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    resolver: OrderConflictResolver,
    config: EditorConfig,
}

impl AlertEditor {
    pub fn new(
        store: Arc<dyn AlertStore>,
        validator: Arc<dyn QueryValidator>,
        checker: Arc<dyn OrderChecker>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        config: EditorConfig,
    ) -> Self {
        let resolver = OrderConflictResolver::new(
            checker,
            store.clone(),
            notifier.clone(),
            config.toast_duration(),
        );

        Self {
            store,
            validator,
            notifier,
            navigator,
            resolver,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Session for the create dialog
    pub fn new_alert(&self, defaults: &AlertDefaults) -> EditSession {
        EditSession::create(defaults, Utc::now())
    }

    /// Fetch an alert and show it on the detail page
    pub async fn open_detail(&self, id: &AlertId) -> Result<EditSession, ServiceError> {
        let fetched = self.store.fetch(id).await?;
        let session = EditSession::edit(&fetched)?;
        self.navigator.show_detail(id);
        debug!(alert_id = %id, "Opened alert detail");
        Ok(session)
    }

    /// Close the detail page and go back to the master list
    pub fn close_detail(&self, session: &mut EditSession) {
        session.close();
        self.navigator.close_detail();
    }

    pub fn navigate_back(&self, session: &mut EditSession) {
        session.close();
        self.navigator.back();
    }

    /// Run the BEx check for the technical name the user just entered
    pub async fn check_technical_name(
        &self,
        session: &mut EditSession,
    ) -> Result<BExVerdict, ServiceError> {
        session.check_technical_name(self.validator.as_ref()).await
    }

    /// Leave edit mode, asking first when there are unsaved changes
    pub async fn cancel(&self, session: &mut EditSession) -> bool {
        session.cancel(self.notifier.as_ref()).await
    }

    /// Validate the candidate and, when valid, resolve its order and store it
    pub async fn submit(&self, session: &mut EditSession) -> SubmitOutcome {
        if !session.is_active() || !session.is_edit_mode() {
            debug!(
                active = session.is_active(),
                "Submit ignored, session is not editable"
            );
            return SubmitOutcome::Ignored;
        }
        if session.is_busy() {
            debug!("Submit ignored, save already running");
            return SubmitOutcome::Ignored;
        }

        if session.record().source == Some(Source::BEx) && !session.bex_verdict().is_settled() {
            if let Err(e) = self.check_technical_name(session).await {
                warn!(error = %e, "Submit rejected, BEx query could not be checked");
                self.notifier.toast(Toast {
                    message: Message::with_args(
                        MessageKey::ValidateBExFail,
                        [session.record().technical_name.as_str()],
                    ),
                    duration: self.config.toast_duration(),
                });
                return SubmitOutcome::QueryCheckFailed(e);
            }
        }

        if !session.revalidate() {
            let errors = session.validation().errors();
            info!(?errors, "Alert candidate has invalid fields");
            self.toast(MessageKey::DetailValidationFail);
            return SubmitOutcome::Invalid { errors };
        }

        SubmitOutcome::Resolved(self.resolver.resolve(session).await)
    }

    /// Show the change log of the stored alert.
    ///
    /// Returns false when the session is not bound to a stored alert.
    pub fn view_alert_log(&self, session: &EditSession) -> bool {
        match &session.record().id {
            Some(id) => {
                self.navigator.show_log(id);
                true
            }
            None => {
                warn!("Alert log requested for an alert that was never stored");
                false
            }
        }
    }

    /// Delete the stored alert after confirmation, then close the detail page
    pub async fn delete(&self, session: &mut EditSession) -> DeleteOutcome {
        let action = self
            .notifier
            .confirm(ConfirmPrompt::defaulting_to_no(MessageKey::ConfirmDelete))
            .await;
        if action != ConfirmAction::Yes {
            return DeleteOutcome::Declined;
        }

        let id = match session.record().id.clone() {
            Some(id) => id,
            None => {
                warn!("Delete requested for an alert that was never stored");
                return DeleteOutcome::MissingId;
            }
        };

        match self.store.remove(&id).await {
            Ok(()) => {
                info!(alert_id = %id, "Deleted alert");
                self.toast(MessageKey::DeleteSuccess);
                tokio::time::sleep(self.config.delete_close_delay()).await;
                self.close_detail(session);
                DeleteOutcome::Deleted(id)
            }
            Err(e) => {
                error!(alert_id = %id, error = %e, "{}", MessageKey::DeleteFail);
                self.toast(MessageKey::DeleteFail);
                DeleteOutcome::Failed(e)
            }
        }
    }

    fn toast(&self, key: MessageKey) {
        self.notifier.toast(Toast {
            message: Message::new(key),
            duration: self.config.toast_duration(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{
        MockAlertStore, MockNavigator, MockNotifier, MockOrderChecker, MockQueryValidator,
    };
    use crate::resolver::ResolverState;
    use alert_admin_common::{AlertRecord, Category, Criticality, OrderCheckResult};
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    struct Mocks {
        store: MockAlertStore,
        validator: MockQueryValidator,
        checker: MockOrderChecker,
        notifier: MockNotifier,
        navigator: MockNavigator,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                store: MockAlertStore::new(),
                validator: MockQueryValidator::new(),
                checker: MockOrderChecker::new(),
                notifier: MockNotifier::new(),
                navigator: MockNavigator::new(),
            }
        }

        fn into_editor(self, config: EditorConfig) -> AlertEditor {
            AlertEditor::new(
                Arc::new(self.store),
                Arc::new(self.validator),
                Arc::new(self.checker),
                Arc::new(self.notifier),
                Arc::new(self.navigator),
                config,
            )
        }
    }

    fn quick_config() -> EditorConfig {
        EditorConfig {
            delete_close_delay_ms: 0,
            ..EditorConfig::default()
        }
    }

    fn stored_alert() -> AlertRecord {
        AlertRecord {
            id: Some(AlertId::new("A-7")),
            title: "Stock below minimum".to_string(),
            source: Some(Source::BEx),
            technical_name: "ZQ_STOCK_01".to_string(),
            category: Some(Category::Inventory),
            criticality: Some(Criticality::Critical),
            show_on_ct: true,
            order_on_ct: "3".to_string(),
            ..AlertRecord::default()
        }
    }

    fn bex_candidate() -> EditSession {
        let defaults = AlertDefaults {
            source: Some(Source::BEx),
            category: Some(Category::Inventory),
            criticality: Some(Criticality::Warning),
        };
        let mut session = EditSession::create(&defaults, Utc::now());
        session.live_change(crate::session::TextField::Title, "Q1 stock");
        session.live_change(crate::session::TextField::TechnicalName, "Q1");
        session
    }

    #[tokio::test]
    async fn test_invalid_record_is_never_saved() {
        let mut mocks = Mocks::new();
        mocks
            .validator
            .expect_check_bex_query()
            .with(eq("Q1"))
            .times(1)
            .returning(|_| Ok(true));
        mocks.checker.expect_check_valid_order().never();
        mocks.store.expect_create().never();
        mocks
            .notifier
            .expect_toast()
            .withf(|toast| toast.message.key == MessageKey::DetailValidationFail)
            .times(1)
            .return_const(());

        let editor = mocks.into_editor(quick_config());
        let mut session = bex_candidate();
        session.live_change(crate::session::TextField::Title, "");
        session.toggle_show_on_ct(true);

        let outcome = editor.submit(&mut session).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Invalid {
                errors: vec![Field::Title, Field::OrderOnCt]
            }
        );
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Validation));
    }

    #[tokio::test]
    async fn test_failed_bex_check_rejects_submit() {
        let mut mocks = Mocks::new();
        mocks
            .validator
            .expect_check_bex_query()
            .times(1)
            .returning(|_| Err(ServiceError::Transport("timeout".to_string())));
        mocks.store.expect_create().never();

        mocks
            .notifier
            .expect_toast()
            .withf(|toast| {
                toast.message.key == MessageKey::ValidateBExFail
                    && toast.message.text() == "Failed to validate BEx query Q1"
            })
            .times(1)
            .return_const(());

        let editor = mocks.into_editor(quick_config());
        let mut session = bex_candidate();

        let outcome = editor.submit(&mut session).await;
        assert!(matches!(outcome, SubmitOutcome::QueryCheckFailed(_)));
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Remote));
    }

    #[tokio::test]
    async fn test_settled_verdict_is_not_checked_again() {
        let mut mocks = Mocks::new();
        mocks.validator.expect_check_bex_query().never();
        mocks
            .checker
            .expect_check_valid_order()
            .times(1)
            .returning(|_| Ok(OrderCheckResult::free()));
        mocks.store.expect_update().times(1).returning(|_, _| Ok(()));
        mocks
            .notifier
            .expect_toast()
            .withf(|toast| toast.message.key == MessageKey::DetailUpdateSuccess)
            .times(1)
            .return_const(());

        let editor = mocks.into_editor(quick_config());
        let mut session = EditSession::edit(&stored_alert()).unwrap();
        session.enter_edit_mode();

        let outcome = editor.submit(&mut session).await;
        match outcome {
            SubmitOutcome::Resolved(resolution) => {
                assert_eq!(resolution.outcome, ResolverState::Saved)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!session.is_edit_mode());
    }

    #[tokio::test]
    async fn test_created_alert_is_not_stored_twice() {
        let mut mocks = Mocks::new();
        mocks.checker.expect_check_valid_order().never();
        mocks
            .store
            .expect_create()
            .times(1)
            .returning(|record| {
                Ok(AlertRecord {
                    id: Some(AlertId::new("A-100")),
                    ..record.clone()
                })
            });
        mocks
            .notifier
            .expect_toast()
            .withf(|toast| toast.message.key == MessageKey::MasterCreateAlertSuccess)
            .times(1)
            .return_const(());

        let editor = mocks.into_editor(quick_config());
        let defaults = AlertDefaults {
            source: Some(Source::Hana),
            category: Some(Category::Logistics),
            criticality: Some(Criticality::Normal),
        };
        let mut session = editor.new_alert(&defaults);
        session.live_change(crate::session::TextField::Title, "Late shipments");
        session.live_change(
            crate::session::TextField::TechnicalName,
            "/sap/alerts/shipments.xsjs",
        );

        let first = editor.submit(&mut session).await;
        assert!(matches!(first, SubmitOutcome::Resolved(ref r) if r.is_saved()));
        assert!(!session.is_active());

        let second = editor.submit(&mut session).await;
        assert_eq!(second, SubmitOutcome::Ignored);
        assert_eq!(second.failure_kind(), None);
    }

    #[tokio::test]
    async fn test_read_only_detail_is_not_submitted() {
        let mut mocks = Mocks::new();
        mocks.checker.expect_check_valid_order().never();
        mocks.store.expect_update().never();

        let editor = mocks.into_editor(quick_config());
        let mut session = EditSession::edit(&stored_alert()).unwrap();

        assert_eq!(editor.submit(&mut session).await, SubmitOutcome::Ignored);
    }

    #[test]
    fn test_view_alert_log() {
        let mut mocks = Mocks::new();
        mocks
            .navigator
            .expect_show_log()
            .with(eq(AlertId::new("A-7")))
            .times(1)
            .return_const(());

        let editor = mocks.into_editor(quick_config());
        let stored = EditSession::edit(&stored_alert()).unwrap();
        assert!(editor.view_alert_log(&stored));

        let candidate = editor.new_alert(&AlertDefaults::default());
        assert!(!editor.view_alert_log(&candidate));
    }

    #[tokio::test]
    async fn test_open_detail() {
        let mut mocks = Mocks::new();
        mocks
            .store
            .expect_fetch()
            .with(eq(AlertId::new("A-7")))
            .times(1)
            .returning(|_| Ok(stored_alert()));
        mocks
            .navigator
            .expect_show_detail()
            .with(eq(AlertId::new("A-7")))
            .times(1)
            .return_const(());

        let editor = mocks.into_editor(quick_config());
        let session = editor.open_detail(&AlertId::new("A-7")).await.unwrap();
        assert_eq!(session.record().email_detail, "");
        assert_eq!(session.record().title, "Stock below minimum");
    }

    #[tokio::test]
    async fn test_open_detail_not_found() {
        let mut mocks = Mocks::new();
        mocks
            .store
            .expect_fetch()
            .returning(|id| Err(ServiceError::NotFound(id.to_string())));
        mocks.navigator.expect_show_detail().never();

        let editor = mocks.into_editor(quick_config());
        let result = editor.open_detail(&AlertId::new("A-404")).await;
        assert_eq!(result.err(), Some(ServiceError::NotFound("A-404".to_string())));
    }

    #[tokio::test]
    async fn test_delete_declined() {
        let mut mocks = Mocks::new();
        mocks
            .notifier
            .expect_confirm()
            .withf(|prompt| {
                prompt.message.key == MessageKey::ConfirmDelete
                    && prompt.initial_focus == ConfirmAction::No
            })
            .times(1)
            .returning(|_| ConfirmAction::No);
        mocks.store.expect_remove().never();

        let editor = mocks.into_editor(quick_config());
        let mut session = EditSession::edit(&stored_alert()).unwrap();

        assert_eq!(editor.delete(&mut session).await, DeleteOutcome::Declined);
        assert!(session.is_active());
    }

    #[tokio::test]
    async fn test_delete_without_id_never_removes() {
        let mut mocks = Mocks::new();
        mocks
            .notifier
            .expect_confirm()
            .times(1)
            .returning(|_| ConfirmAction::Yes);
        mocks.store.expect_remove().never();

        let editor = mocks.into_editor(quick_config());
        let mut session = editor.new_alert(&AlertDefaults::default());

        assert_eq!(editor.delete(&mut session).await, DeleteOutcome::MissingId);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_waits_before_closing_detail() {
        let mut mocks = Mocks::new();
        mocks
            .notifier
            .expect_confirm()
            .times(1)
            .returning(|_| ConfirmAction::Yes);
        mocks
            .store
            .expect_remove()
            .with(eq(AlertId::new("A-7")))
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .notifier
            .expect_toast()
            .withf(|toast| toast.message.key == MessageKey::DeleteSuccess)
            .times(1)
            .return_const(());
        mocks
            .navigator
            .expect_close_detail()
            .times(1)
            .return_const(());

        let editor = mocks.into_editor(EditorConfig::default());
        let mut session = EditSession::edit(&stored_alert()).unwrap();

        let started = tokio::time::Instant::now();
        let outcome = editor.delete(&mut session).await;

        assert_eq!(outcome, DeleteOutcome::Deleted(AlertId::new("A-7")));
        assert!(started.elapsed() >= Duration::from_millis(2222));
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_session() {
        let mut mocks = Mocks::new();
        mocks
            .notifier
            .expect_confirm()
            .times(1)
            .returning(|_| ConfirmAction::Yes);
        mocks.store.expect_remove().times(1).returning(|_| {
            Err(ServiceError::Server {
                status: 409,
                message: "alert is locked".to_string(),
            })
        });
        mocks
            .notifier
            .expect_toast()
            .withf(|toast| toast.message.key == MessageKey::DeleteFail)
            .times(1)
            .return_const(());
        mocks.navigator.expect_close_detail().never();

        let editor = mocks.into_editor(quick_config());
        let mut session = EditSession::edit(&stored_alert()).unwrap();

        assert!(matches!(
            editor.delete(&mut session).await,
            DeleteOutcome::Failed(_)
        ));
        assert!(session.is_active());
    }

    #[tokio::test]
    async fn test_navigate_back_closes_session() {
        let mut mocks = Mocks::new();
        mocks.navigator.expect_back().times(1).return_const(());

        let editor = mocks.into_editor(quick_config());
        let mut session = editor.new_alert(&AlertDefaults::default());
        editor.navigate_back(&mut session);

        assert!(!session.is_active());
    }
}
