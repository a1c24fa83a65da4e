/// Command system for the contact form update loop
///
/// Commands are the side effects requested by `update`. The executor runs
/// them and feeds any resulting messages back through a channel.

use crate::client::error::SubmitError;
use crate::client::graphql::{ContactFormData, ContactService};
use crate::client::retry::RetryManager;
use crate::tea::message::{Message, SubmissionOutcome};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinError;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Command that can be executed to perform side effects
#[derive(Debug)]
pub enum Command {
    /// No operation
    None,

    /// Batch multiple commands
    Batch(Vec<Command>),

    /// Send the form to the backend
    SubmitContactForm {
        request_id: Uuid,
        data: ContactFormData,
    },

    /// Record a failed submission for diagnostics
    ReportError(SubmitError),
}

impl Command {
    /// Create a no-op command
    pub fn none() -> Self {
        Command::None
    }

    /// Create a batch of commands
    pub fn batch(commands: Vec<Command>) -> Self {
        Command::Batch(commands)
    }

    /// Create a submission command with a fresh request id
    pub fn submit(data: ContactFormData) -> Self {
        Command::SubmitContactForm {
            request_id: Uuid::new_v4(),
            data,
        }
    }
}

/// Command executor that processes commands on a tokio runtime
pub struct CommandExecutor {
    message_sender: mpsc::UnboundedSender<Message>,
    service: Arc<dyn ContactService>,
    retry: RetryManager,
    runtime: Handle,
}

impl CommandExecutor {
    /// Create a new command executor spawning its work on `runtime`
    pub fn new(
        message_sender: mpsc::UnboundedSender<Message>,
        service: Arc<dyn ContactService>,
        retry: RetryManager,
        runtime: Handle,
    ) -> Self {
        Self {
            message_sender,
            service,
            retry,
            runtime,
        }
    }

    /// Execute a command.
    ///
    /// Submissions are spawned on the executor's runtime so the caller keeps
    /// processing input while the request is in flight. `execute` itself may
    /// be called from any thread.
    pub fn execute(&self, command: Command) {
        match command {
            Command::None => {}
            Command::Batch(commands) => {
                for cmd in commands {
                    self.execute(cmd);
                }
            }
            Command::SubmitContactForm { request_id, data } => {
                let service = Arc::clone(&self.service);
                let retry = self.retry.clone();
                let sender = self.message_sender.clone();

                let submission = self
                    .runtime
                    .spawn(run_submission(service, retry, request_id, data));

                // Every submission must end in a completion message, even if
                // the service panics
                self.runtime.spawn(async move {
                    let message = match submission.await {
                        Ok(message) => message,
                        Err(e) => {
                            tracing::error!(%request_id, "Submission task failed: {}", e);
                            aborted_submission(request_id, &e)
                        }
                    };
                    if let Err(e) = sender.send(message) {
                        tracing::error!("Failed to send submission result: {}", e);
                    }
                });
            }
            Command::ReportError(error) => {
                tracing::error!(kind = %error.kind(), "Contact form error: {}", error);
            }
        }
    }
}

/// Perform one submission including retries and wrap the result as a message
pub async fn run_submission(
    service: Arc<dyn ContactService>,
    retry: RetryManager,
    request_id: Uuid,
    data: ContactFormData,
) -> Message {
    tracing::debug!(%request_id, "Starting contact form submission");

    let (result, stats) = retry
        .execute_with_stats(|| service.submit(&data), SubmitError::is_retryable)
        .await;

    Message::SubmissionCompleted(SubmissionOutcome {
        request_id,
        attempts: stats.total_attempts,
        result,
    })
}

/// Completion reported when the submission task died before producing a result
fn aborted_submission(request_id: Uuid, error: &JoinError) -> Message {
    let reason = if error.is_panic() {
        "submission task panicked"
    } else {
        "submission task was cancelled"
    };

    Message::SubmissionCompleted(SubmissionOutcome {
        request_id,
        // The attempt in progress is the only one known to have started
        attempts: 1,
        result: Err(SubmitError::network(reason)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::error::SubmitResult;
    use crate::client::graphql::ContactFormResponse;
    use crate::client::retry::RetryConfig;
    use crate::testing::MockContactService;

    fn payload() -> ContactFormData {
        ContactFormData {
            full_name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            message: "This is a long enough message.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_run_submission_reports_attempts() {
        let mock = Arc::new(MockContactService::failing(SubmitError::network("down")));
        let request_id = Uuid::new_v4();

        let message = run_submission(
            mock.clone(),
            RetryManager::new(RetryConfig::immediate(4)),
            request_id,
            payload(),
        )
        .await;

        match message {
            Message::SubmissionCompleted(outcome) => {
                assert_eq!(outcome.request_id, request_id);
                assert_eq!(outcome.attempts, 4);
                assert_eq!(outcome.result, Err(SubmitError::network("down")));
            }
            other => panic!("unexpected message: {:?}", other),
        }
        assert_eq!(mock.call_count().await, 4);
    }

    #[tokio::test]
    async fn test_executor_sends_result_back() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mock = Arc::new(MockContactService::succeeding());
        let executor = CommandExecutor::new(
            tx,
            mock,
            RetryManager::new(RetryConfig::no_retry()),
            Handle::current(),
        );

        executor.execute(Command::batch(vec![Command::none(), Command::submit(payload())]));

        match rx.recv().await {
            Some(Message::SubmissionCompleted(outcome)) => {
                assert_eq!(outcome.attempts, 1);
                assert_eq!(
                    outcome.result,
                    Ok(ContactFormResponse {
                        success: true,
                        message: None
                    })
                );
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    struct PanickingService;

    #[async_trait::async_trait]
    impl ContactService for PanickingService {
        async fn submit(&self, _data: &ContactFormData) -> SubmitResult<ContactFormResponse> {
            panic!("backend client bug");
        }
    }

    #[tokio::test]
    async fn test_panicking_service_still_completes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let executor = CommandExecutor::new(
            tx,
            Arc::new(PanickingService),
            RetryManager::new(RetryConfig::immediate(4)),
            Handle::current(),
        );

        let command = Command::submit(payload());
        let expected_id = match &command {
            Command::SubmitContactForm { request_id, .. } => *request_id,
            other => panic!("unexpected command: {:?}", other),
        };
        executor.execute(command);

        match rx.recv().await {
            Some(Message::SubmissionCompleted(outcome)) => {
                assert_eq!(outcome.request_id, expected_id);
                assert_eq!(outcome.attempts, 1);
                assert_eq!(
                    outcome.result,
                    Err(SubmitError::network("submission task panicked"))
                );
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
