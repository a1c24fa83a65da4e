/// Contact form model for the TEA update loop
///
/// Holds everything the form renders plus the lifecycle of the current
/// submission.

use crate::client::error::ErrorKind;
use crate::form::{FormData, FormErrors, SubmitStatus};
use uuid::Uuid;

/// Lifecycle of the outbound mutation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MutationState {
    #[default]
    NotStarted,
    Pending,
    Succeeded,
    Failed(ErrorKind),
}

impl MutationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationState::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MutationState::Succeeded)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, MutationState::Failed(_))
    }
}

/// Complete form state
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub form: FormData,
    pub errors: FormErrors,
    pub submit_status: SubmitStatus,
    pub submit_message: String,
    pub mutation: MutationState,
    /// Submission whose result is still awaited
    pub active_request: Option<Uuid>,
    /// Attempts used by the most recently completed submission
    pub last_attempts: Option<usize>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the latest validation pass failed
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Return the status line to idle
    pub fn clear_status(&mut self) {
        self.submit_status = SubmitStatus::Idle;
        self.submit_message.clear();
    }
}
