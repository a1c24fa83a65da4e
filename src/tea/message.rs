/// Messages consumed by the contact form update function
///
/// User input, submission requests and async submission results all flow
/// through this type so every state change goes through `update`.

use crate::client::error::SubmitResult;
use crate::client::graphql::ContactFormResponse;
use crate::form::FormField;
use uuid::Uuid;

/// Main message type
#[derive(Debug, Clone)]
pub enum Message {
    /// A field was edited
    FieldChanged(FormField, String),

    /// Recompute validation errors
    Validate,

    /// Submit the form
    Submit,

    /// Clear the form back to its initial state
    Reset,

    /// An in-flight submission finished
    SubmissionCompleted(SubmissionOutcome),
}

/// Result of one submission, after retries
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    /// Submission this outcome belongs to
    pub request_id: Uuid,

    /// Attempts made, including the first
    pub attempts: usize,

    /// Backend response or the last error
    pub result: SubmitResult<ContactFormResponse>,
}

impl Message {
    /// Create a field change message
    pub fn change(field: FormField, value: impl Into<String>) -> Self {
        Message::FieldChanged(field, value.into())
    }
}
