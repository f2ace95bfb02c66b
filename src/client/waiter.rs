use std::collections::HashMap;
use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::trace;

use crate::callback::next_local_id;
use crate::constants::ERROR_AI_ANALYSIS_FAILED;
use crate::CallbackError;
use crate::DeathRecipient;
use crate::Event;
use crate::Subscriber;
use crate::SubscriberId;

/// Outcomes that arrive before anyone waits for them are kept, up to this many.
const EARLY_OUTCOME_CAPACITY: usize = 64;

/// Result text on success, failure message otherwise.
pub(crate) type AnalysisOutcome = std::result::Result<String, String>;

pub(crate) enum Expectation {
    Ready(AnalysisOutcome),
    Pending(oneshot::Receiver<AnalysisOutcome>),
}

#[derive(Default)]
struct WaiterState {
    pending: HashMap<String, oneshot::Sender<AnalysisOutcome>>,
    early: VecDeque<(String, AnalysisOutcome)>,
}

/// In-process subscriber resolving analysis ids to their outcome events.
pub(crate) struct AnalysisWaiter {
    id: SubscriberId,
    state: Mutex<WaiterState>,
}

impl AnalysisWaiter {
    pub(crate) fn new() -> Self {
        Self {
            id: next_local_id(),
            state: Mutex::new(WaiterState::default()),
        }
    }

    pub(crate) fn expect(
        &self,
        analysis_id: &str,
    ) -> Expectation {
        let mut state = self.state.lock();
        if let Some(pos) = state.early.iter().position(|(id, _)| id == analysis_id) {
            if let Some((_, outcome)) = state.early.remove(pos) {
                return Expectation::Ready(outcome);
            }
        }
        let (tx, rx) = oneshot::channel();
        state.pending.insert(analysis_id.to_string(), tx);
        Expectation::Pending(rx)
    }

    pub(crate) fn cancel(
        &self,
        analysis_id: &str,
    ) {
        self.state.lock().pending.remove(analysis_id);
    }

    fn resolve(
        &self,
        analysis_id: &str,
        outcome: AnalysisOutcome,
    ) {
        let mut state = self.state.lock();
        match state.pending.remove(analysis_id) {
            Some(tx) => {
                // The waiter may have timed out already
                let _ = tx.send(outcome);
            }
            None => {
                trace!(analysis_id, "outcome arrived before any waiter");
                state.early.push_back((analysis_id.to_string(), outcome));
                while state.early.len() > EARLY_OUTCOME_CAPACITY {
                    state.early.pop_front();
                }
            }
        }
    }
}

/// Analysis id named by a failure message of the form
/// `AI analysis <id> failed: <reason>`.
pub(crate) fn failed_analysis_id(message: &str) -> Option<&str> {
    message
        .strip_prefix("AI analysis ")
        .and_then(|rest| rest.split_once(" failed"))
        .map(|(id, _)| id)
}

impl Subscriber for AnalysisWaiter {
    fn id(&self) -> SubscriberId {
        self.id
    }

    fn notify(
        &self,
        event: &Event,
    ) -> std::result::Result<(), CallbackError> {
        match event {
            Event::AiAnalysisComplete { analysis_id, result } => {
                self.resolve(analysis_id, Ok(result.clone()));
            }
            Event::Error { code, message } if *code == ERROR_AI_ANALYSIS_FAILED => {
                if let Some(analysis_id) = failed_analysis_id(message) {
                    self.resolve(analysis_id, Err(message.clone()));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn link_to_death(
        &self,
        _recipient: DeathRecipient,
    ) -> std::result::Result<(), CallbackError> {
        Ok(())
    }

    fn unlink_to_death(&self) {}
}
