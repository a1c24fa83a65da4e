//! Contact form controller
//!
//! Owns the form model and drives it through `tea::update`. Submissions run
//! on the tokio runtime; their results come back over a channel and are
//! applied by `settle` or `poll`, so field edits keep working while a
//! request is in flight.

use crate::client::error::{SubmitError, SubmitResult};
use crate::client::graphql::{ContactService, GraphQLContactService};
use crate::client::retry::{RetryConfig, RetryManager};
use crate::config::ClientConfig;
use crate::form::{FormData, FormErrors, FormField, SubmitStatus};
use crate::tea::{update, CommandExecutor, Message, Model};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Event that triggered a submit
pub trait SubmitEvent {
    /// Suppress the default form-submit action
    fn prevent_default(&mut self);
}

impl SubmitEvent for () {
    fn prevent_default(&mut self) {}
}

/// Plain submit event that remembers whether its default action was prevented
#[derive(Debug, Clone, Default)]
pub struct FormSubmitEvent {
    default_prevented: bool,
}

impl FormSubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl SubmitEvent for FormSubmitEvent {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// Snapshot of everything a renderer needs
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub form_data: FormData,
    pub errors: FormErrors,
    pub submit_status: SubmitStatus,
    pub submit_message: String,
    pub is_submitting: bool,
    pub is_error: bool,
    pub is_success: bool,
    pub last_attempts: Option<usize>,
}

/// Controller exposing the contact form operations
pub struct ContactFormController {
    model: Model,
    executor: CommandExecutor,
    receiver: mpsc::UnboundedReceiver<Message>,
}

impl ContactFormController {
    /// Create a controller submitting through `service` on the current tokio runtime.
    ///
    /// Fails with a configuration error when called outside a runtime; use
    /// [`ContactFormController::with_runtime`] to pass one explicitly.
    pub fn new(service: Arc<dyn ContactService>, retry: RetryConfig) -> SubmitResult<Self> {
        let runtime = Handle::try_current().map_err(|e| {
            SubmitError::config(format!("Contact form controller needs a tokio runtime: {}", e))
        })?;
        Ok(Self::with_runtime(service, retry, runtime))
    }

    /// Create a controller whose submissions run on `runtime`.
    ///
    /// All operations, `submit` included, may then be called from outside
    /// that runtime.
    pub fn with_runtime(
        service: Arc<dyn ContactService>,
        retry: RetryConfig,
        runtime: Handle,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let executor = CommandExecutor::new(sender, service, RetryManager::new(retry), runtime);

        Self {
            model: Model::new(),
            executor,
            receiver,
        }
    }

    /// Create a controller backed by the GraphQL service described in `config`
    pub fn from_config(config: &ClientConfig) -> SubmitResult<Self> {
        let service = GraphQLContactService::from_config(config)?;
        Self::new(Arc::new(service), config.retry.clone())
    }

    /// Set a field, clearing its error and any shown submit result
    pub fn change(&mut self, field: FormField, value: impl Into<String>) {
        self.dispatch(Message::FieldChanged(field, value.into()));
    }

    /// Recompute all field errors. Returns whether the form is valid.
    pub fn validate(&mut self) -> bool {
        self.dispatch(Message::Validate);
        !self.model.has_errors()
    }

    /// Validate and, if valid, start a submission.
    ///
    /// Returns whether a request was started. A submit while another
    /// submission is pending is ignored.
    pub fn submit(&mut self, event: &mut impl SubmitEvent) -> bool {
        event.prevent_default();

        let was_pending = self.model.mutation.is_pending();
        self.dispatch(Message::Submit);
        !was_pending && self.model.mutation.is_pending()
    }

    /// Clear fields, errors and status. An in-flight request is not cancelled.
    pub fn reset(&mut self) {
        self.dispatch(Message::Reset);
    }

    /// Wait until no submission is pending, applying results as they arrive
    pub async fn settle(&mut self) {
        while self.model.mutation.is_pending() {
            match self.receiver.recv().await {
                Some(message) => self.dispatch(message),
                None => break,
            }
        }
    }

    /// Apply results that have already arrived without waiting
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(message) = self.receiver.try_recv() {
            self.dispatch(message);
            applied += 1;
        }
        applied
    }

    /// Current state for rendering
    pub fn view(&self) -> FormView {
        FormView {
            form_data: self.model.form.clone(),
            errors: self.model.errors.clone(),
            submit_status: self.model.submit_status,
            submit_message: self.model.submit_message.clone(),
            is_submitting: self.model.mutation.is_pending(),
            is_error: self.model.mutation.is_error(),
            is_success: self.model.mutation.is_success(),
            last_attempts: self.model.last_attempts,
        }
    }

    pub fn form_data(&self) -> &FormData {
        &self.model.form
    }

    pub fn errors(&self) -> &FormErrors {
        &self.model.errors
    }

    pub fn submit_status(&self) -> SubmitStatus {
        self.model.submit_status
    }

    pub fn submit_message(&self) -> &str {
        &self.model.submit_message
    }

    pub fn is_submitting(&self) -> bool {
        self.model.mutation.is_pending()
    }

    fn dispatch(&mut self, message: Message) {
        let model = std::mem::take(&mut self.model);
        let result = update(model, message);
        self.model = result.model;

        for command in result.commands {
            self.executor.execute(command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::error::ErrorKind;
    use crate::testing::MockContactService;

    fn controller() -> ContactFormController {
        ContactFormController::new(
            Arc::new(MockContactService::succeeding()),
            RetryConfig::no_retry(),
        )
        .unwrap()
    }

    fn fill(controller: &mut ContactFormController) {
        controller.change(FormField::FullName, "Jane");
        controller.change(FormField::Email, "jane@example.com");
        controller.change(FormField::Message, "This is a long enough message.");
    }

    #[tokio::test]
    async fn test_submit_prevents_default_even_when_invalid() {
        let mut controller = controller();
        let mut event = FormSubmitEvent::new();

        assert!(!controller.submit(&mut event));
        assert!(event.is_default_prevented());
        assert_eq!(controller.errors().len(), 3);
        assert!(!controller.is_submitting());
    }

    #[tokio::test]
    async fn test_validate_returns_result() {
        let mut controller = controller();
        assert!(!controller.validate());

        fill(&mut controller);
        assert!(controller.validate());
        assert!(controller.errors().is_empty());
    }

    #[tokio::test]
    async fn test_poll_applies_completed_result() {
        let mut controller = controller();
        fill(&mut controller);

        assert!(controller.submit(&mut ()));
        assert!(controller.view().is_submitting);

        while controller.poll() == 0 {
            tokio::task::yield_now().await;
        }

        let view = controller.view();
        assert!(!view.is_submitting);
        assert!(view.is_success);
        assert_eq!(view.submit_status, SubmitStatus::Success);
    }

    #[test]
    fn test_new_outside_runtime_is_config_error() {
        let result = ContactFormController::new(
            Arc::new(MockContactService::succeeding()),
            RetryConfig::no_retry(),
        );

        match result {
            Err(error @ SubmitError::Configuration { .. }) => {
                assert_eq!(error.kind(), ErrorKind::Transport);
            }
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("controller built without a runtime"),
        }
    }

    #[test]
    fn test_submit_from_outside_runtime() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mock = Arc::new(MockContactService::succeeding());
        let mut controller = ContactFormController::with_runtime(
            mock.clone(),
            RetryConfig::no_retry(),
            runtime.handle().clone(),
        );
        fill(&mut controller);

        assert!(controller.submit(&mut ()));
        runtime.block_on(controller.settle());

        assert_eq!(controller.submit_status(), SubmitStatus::Success);
        assert_eq!(runtime.block_on(mock.call_count()), 1);
    }
}
