//! Order conflict resolution and persistence of a validated candidate
//!
//! One resolution runs per submit attempt:
//!
//! ```text
//! Start -> Save                                  (not shown on control tower)
//! Start -> LocalCheck -> Rejected                (order not a positive integer)
//! Start -> LocalCheck -> RemoteCheck -> Rejected (check failed)
//!                                    -> ExceedsMax -> Rejected
//!                                    -> Reserved -> Save | Cancelled
//!                                    -> Save
//! Save -> Saved | SaveFailed
//! ```

use alert_admin_common::{is_positive_order, FailureKind, Message, MessageKey};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::collaborators::{
    AlertStore, ConfirmAction, ConfirmPrompt, Notifier, OrderChecker, Toast,
};
use crate::session::{EditSession, SessionMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ResolverState {
    Start,
    LocalCheck,
    RemoteCheck,
    ExceedsMax,
    Reserved { holder: Option<String> },
    Save,
    Saved,
    SaveFailed,
    Rejected { reason: MessageKey },
    Cancelled,
}

impl ResolverState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResolverState::Saved
                | ResolverState::SaveFailed
                | ResolverState::Rejected { .. }
                | ResolverState::Cancelled
        )
    }
}

/// Final state of one resolution together with every state it visited
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub outcome: ResolverState,
    pub trace: Vec<ResolverState>,
}

impl Resolution {
    pub fn is_saved(&self) -> bool {
        self.outcome == ResolverState::Saved
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            ResolverState::Saved => None,
            ResolverState::Rejected {
                reason: MessageKey::OrderOnCtZero,
            } => Some(FailureKind::Validation),
            ResolverState::Rejected {
                reason: MessageKey::ValidateOrderFail,
            } => Some(FailureKind::Remote),
            ResolverState::Rejected { .. } | ResolverState::Cancelled => {
                Some(FailureKind::Conflict)
            }
            ResolverState::SaveFailed => Some(FailureKind::Remote),
            _ => None,
        }
    }
}

struct Trace(Vec<ResolverState>);

impl Trace {
    fn visit(&mut self, state: ResolverState) {
        debug!(?state, "Order conflict resolver transition");
        self.0.push(state);
    }

    fn finish(mut self, outcome: ResolverState) -> Resolution {
        self.visit(outcome.clone());
        Resolution {
            outcome,
            trace: self.0,
        }
    }
}

pub struct OrderConflictResolver {
    checker: Arc<dyn OrderChecker>,
    store: Arc<dyn AlertStore>,
    notifier: Arc<dyn Notifier>,
    toast_duration: Duration,
}

impl OrderConflictResolver {
    pub fn new(
        checker: Arc<dyn OrderChecker>,
        store: Arc<dyn AlertStore>,
        notifier: Arc<dyn Notifier>,
        toast_duration: Duration,
    ) -> Self {
        Self {
            checker,
            store,
            notifier,
            toast_duration,
        }
    }

    /// Check the requested order of a validated candidate, then store it
    pub async fn resolve(&self, session: &mut EditSession) -> Resolution {
        let mut trace = Trace(Vec::new());
        trace.visit(ResolverState::Start);

        if !session.record().show_on_ct {
            session.force_hidden_order();
            return self.save(session, trace).await;
        }

        trace.visit(ResolverState::LocalCheck);
        if !is_positive_order(&session.record().order_on_ct) {
            session.mark_order_error(MessageKey::OrderOnCtZero);
            return trace.finish(ResolverState::Rejected {
                reason: MessageKey::OrderOnCtZero,
            });
        }

        trace.visit(ResolverState::RemoteCheck);
        let query = session.record().order_query();
        session.set_busy(true);
        let result = self.checker.check_valid_order(&query).await;
        session.set_busy(false);

        let check = match result {
            Ok(check) => check,
            Err(e) => {
                error!(
                    order = %query.order,
                    page = %query.page_no,
                    error = %e,
                    "{}",
                    MessageKey::ValidateOrderFail
                );
                self.toast(MessageKey::ValidateOrderFail);
                return trace.finish(ResolverState::Rejected {
                    reason: MessageKey::ValidateOrderFail,
                });
            }
        };

        if check.exceeds_max {
            trace.visit(ResolverState::ExceedsMax);
            session.mark_order_error(MessageKey::OrderExceedsMax);
            return trace.finish(ResolverState::Rejected {
                reason: MessageKey::OrderExceedsMax,
            });
        }

        if check.is_reserved {
            let holder = check.current_holder_id;
            trace.visit(ResolverState::Reserved {
                holder: holder.clone(),
            });
            session.clear_order_state();

            let prompt = ConfirmPrompt::defaulting_to_no(Message::with_args(
                MessageKey::OrderReservedConfirm,
                [holder.clone().unwrap_or_default()],
            ));
            if self.notifier.confirm(prompt).await != ConfirmAction::Yes {
                info!(holder = ?holder, "Kept reserved order, alert left in edit");
                return trace.finish(ResolverState::Cancelled);
            }
            info!(holder = ?holder, "Taking over reserved order");
        }

        self.save(session, trace).await
    }

    async fn save(&self, session: &mut EditSession, mut trace: Trace) -> Resolution {
        trace.visit(ResolverState::Save);
        session.set_busy(true);

        let (result, success, failure) = match session.mode().clone() {
            SessionMode::Create => (
                self.store.create(session.record()).await.map(Some),
                MessageKey::MasterCreateAlertSuccess,
                MessageKey::MasterCreateAlertFail,
            ),
            SessionMode::Edit { id } => (
                self.store.update(&id, session.record()).await.map(|_| None),
                MessageKey::DetailUpdateSuccess,
                MessageKey::DetailUpdateFail,
            ),
        };

        session.set_busy(false);

        match result {
            Ok(stored) => {
                session.mark_saved(stored);
                self.toast(success);
                trace.finish(ResolverState::Saved)
            }
            Err(e) => {
                warn!(error = %e, "{}", failure);
                self.toast(failure);
                trace.finish(ResolverState::SaveFailed)
            }
        }
    }

    fn toast(&self, key: MessageKey) {
        self.notifier.toast(Toast {
            message: Message::new(key),
            duration: self.toast_duration,
        });
    }
}
