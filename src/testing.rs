//! Mock contact service for testing scenarios

use crate::client::error::{SubmitError, SubmitResult};
use crate::client::graphql::{ContactFormData, ContactFormResponse, ContactService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock};

/// Mock service behavior configuration
#[derive(Debug, Clone)]
pub struct MockServiceBehavior {
    /// Results returned in order, one per call
    pub scripted: VecDeque<SubmitResult<ContactFormResponse>>,
    /// Result returned once the script is exhausted
    pub default_result: SubmitResult<ContactFormResponse>,
    /// Simulated latency for every call
    pub latency: Duration,
}

impl Default for MockServiceBehavior {
    fn default() -> Self {
        Self {
            scripted: VecDeque::new(),
            default_result: Ok(ContactFormResponse {
                success: true,
                message: None,
            }),
            latency: Duration::ZERO,
        }
    }
}

/// Scriptable `ContactService` that records every payload it receives
pub struct MockContactService {
    behavior: Arc<RwLock<MockServiceBehavior>>,
    call_history: Arc<RwLock<Vec<ContactFormData>>>,
    gate: Option<Arc<Notify>>,
}

impl MockContactService {
    /// Create a mock that answers `success: true`
    pub fn succeeding() -> Self {
        Self::with_behavior(MockServiceBehavior::default())
    }

    /// Create a mock that always answers with the given response
    pub fn responding(response: ContactFormResponse) -> Self {
        Self::with_behavior(MockServiceBehavior {
            default_result: Ok(response),
            ..MockServiceBehavior::default()
        })
    }

    /// Create a mock that always fails with the given error
    pub fn failing(error: SubmitError) -> Self {
        Self::with_behavior(MockServiceBehavior {
            default_result: Err(error),
            ..MockServiceBehavior::default()
        })
    }

    /// Create a mock with explicit behavior
    pub fn with_behavior(behavior: MockServiceBehavior) -> Self {
        Self {
            behavior: Arc::new(RwLock::new(behavior)),
            call_history: Arc::new(RwLock::new(Vec::new())),
            gate: None,
        }
    }

    /// Queue a result for the next unscripted call
    pub async fn push_result(&self, result: SubmitResult<ContactFormResponse>) {
        self.behavior.write().await.scripted.push_back(result);
    }

    /// Make every call wait until the returned handle is notified
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    /// Number of submissions received
    pub async fn call_count(&self) -> usize {
        self.call_history.read().await.len()
    }

    /// Payloads received, oldest first
    pub async fn calls(&self) -> Vec<ContactFormData> {
        self.call_history.read().await.clone()
    }
}

#[async_trait]
impl ContactService for MockContactService {
    async fn submit(&self, data: &ContactFormData) -> SubmitResult<ContactFormResponse> {
        self.call_history.write().await.push(data.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let (result, latency) = {
            let mut behavior = self.behavior.write().await;
            let result = behavior
                .scripted
                .pop_front()
                .unwrap_or_else(|| behavior.default_result.clone());
            (result, behavior.latency)
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        result
    }
}
