use std::{
    collections::HashSet,
    sync::{Mutex, PoisonError},
};

use tracing::debug;

use super::{FlowState, OperationKind};
use crate::{
    error::{DappError, DappResult},
    notify::{report, Notifier},
};

/// Operation kinds with a flow currently running in this session.
#[derive(Debug, Default)]
pub(crate) struct InFlight(Mutex<HashSet<OperationKind>>);

/// Marks an operation kind as running until dropped.
#[derive(Debug)]
pub(crate) struct InFlightSlot<'a> {
    in_flight: &'a InFlight,
    operation: OperationKind,
}

impl InFlight {
    pub(crate) fn acquire(&self, operation: OperationKind) -> DappResult<InFlightSlot<'_>> {
        let mut running = self.0.lock().unwrap_or_else(PoisonError::into_inner);

        if !running.insert(operation) {
            return Err(DappError::validation(format!(
                "Another {operation} transaction is in progress"
            )));
        }

        Ok(InFlightSlot {
            in_flight: self,
            operation,
        })
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.in_flight
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.operation);
    }
}

/// State of one orchestrated flow. Every state change is logged and passed to the notifier.
pub(crate) struct Flow<'a> {
    operation: OperationKind,
    state: FlowState,
    notifier: &'a dyn Notifier,
    in_flight: &'a InFlight,
    _slot: Option<InFlightSlot<'a>>,
}

impl<'a> Flow<'a> {
    pub(crate) fn new(operation: OperationKind, notifier: &'a dyn Notifier, in_flight: &'a InFlight) -> Self {
        notifier.transition(operation, FlowState::Idle);

        Self {
            operation,
            state: FlowState::Idle,
            notifier,
            in_flight,
            _slot: None,
        }
    }

    pub(crate) fn operation(&self) -> OperationKind {
        self.operation
    }

    pub(crate) fn enter(&mut self, state: FlowState) {
        debug!(operation = %self.operation, from = ?self.state, to = ?state, "flow transition");

        self.state = state;
        self.notifier.transition(self.operation, state);
    }

    /// Enters `Validating` and claims the operation kind for this flow.
    pub(crate) fn validating(&mut self) -> DappResult<()> {
        self.enter(FlowState::Validating);
        self._slot = Some(self.in_flight.acquire(self.operation)?);
        Ok(())
    }

    pub(crate) fn progress(&self, message: &str) {
        self.notifier.progress(message);
    }

    /// Terminal step: reports the outcome and releases the operation kind.
    pub(crate) fn finish<T>(mut self, result: DappResult<T>, success: &str) -> DappResult<T> {
        match result {
            Ok(value) => {
                self.enter(FlowState::Succeeded);
                self.notifier.success(success);
                Ok(value)
            }
            Err(error) => {
                self.enter(FlowState::Failed);
                report(self.notifier, &self.operation.to_string(), &error);
                Err(error)
            }
        }
    }
}
