use tracing::{error, info};

use crate::{
    error::DappError,
    orchestrate::{FlowState, OperationKind},
};

/// Receives human-readable progress of reads and transaction flows.
///
/// Implementations decide how messages are shown, the core only decides what and when.
pub trait Notifier: Send + Sync {
    fn progress(&self, message: &str);

    fn success(&self, message: &str);

    fn error(&self, message: &str);

    /// Called on every state change of a transaction flow.
    fn transition(&self, _operation: OperationKind, _state: FlowState) {}
}

/// Forwards every message to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn progress(&self, message: &str) {
        info!(target: "staking_dapp::notify", "{message}");
    }

    fn success(&self, message: &str) {
        info!(target: "staking_dapp::notify", "✅ {message}");
    }

    fn error(&self, message: &str) {
        error!(target: "staking_dapp::notify", "❌ {message}");
    }
}

/// Logs a classified failure with its full detail and hands the user-facing text to `notifier`.
pub(crate) fn report(notifier: &dyn Notifier, action: &str, error: &DappError) {
    error!(action, kind = error.kind(), %error, "❌ {action} failed");
    notifier.error(&error.user_message());
}

#[cfg(any(test, feature = "integration-test"))]
pub use recording::{Notice, RecordingNotifier};

#[cfg(any(test, feature = "integration-test"))]
mod recording {
    use std::sync::{Mutex, PoisonError};

    use super::Notifier;
    use crate::orchestrate::{FlowState, OperationKind};

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Notice {
        Progress(String),
        Success(String),
        Error(String),
        Transition(OperationKind, FlowState),
    }

    /// Keeps every notice for later inspection.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        notices: Mutex<Vec<Notice>>,
    }

    impl RecordingNotifier {
        fn push(&self, notice: Notice) {
            self.notices.lock().unwrap_or_else(PoisonError::into_inner).push(notice);
        }

        pub fn notices(&self) -> Vec<Notice> {
            self.notices.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }

        pub fn messages(&self) -> Vec<Notice> {
            self.notices()
                .into_iter()
                .filter(|notice| !matches!(notice, Notice::Transition(..)))
                .collect()
        }

        pub fn states(&self, operation: OperationKind) -> Vec<FlowState> {
            self.notices()
                .into_iter()
                .filter_map(|notice| match notice {
                    Notice::Transition(kind, state) if kind == operation => Some(state),
                    _ => None,
                })
                .collect()
        }

        pub fn errors(&self) -> Vec<String> {
            self.notices()
                .into_iter()
                .filter_map(|notice| match notice {
                    Notice::Error(message) => Some(message),
                    _ => None,
                })
                .collect()
        }

        pub fn clear(&self) {
            self.notices.lock().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }

    impl Notifier for RecordingNotifier {
        fn progress(&self, message: &str) {
            self.push(Notice::Progress(message.to_string()));
        }

        fn success(&self, message: &str) {
            self.push(Notice::Success(message.to_string()));
        }

        fn error(&self, message: &str) {
            self.push(Notice::Error(message.to_string()));
        }

        fn transition(&self, operation: OperationKind, state: FlowState) {
            self.push(Notice::Transition(operation, state));
        }
    }
}
