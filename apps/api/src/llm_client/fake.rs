//! In-memory `StructuredModel` for tests. Returns a canned answer and records
//! every request it receives.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{LlmError, StructuredModel, StructuredRequest};

enum Canned {
    Value(Value),
    ApiError(u16, String),
}

pub struct FakeModel {
    canned: Canned,
    calls: AtomicUsize,
    requests: Mutex<Vec<StructuredRequest>>,
}

impl FakeModel {
    pub fn returning(value: Value) -> Self {
        Self::new(Canned::Value(value))
    }

    pub fn failing(status: u16, message: &str) -> Self {
        Self::new(Canned::ApiError(status, message.to_string()))
    }

    fn new(canned: Canned) -> Self {
        Self {
            canned,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<StructuredRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl StructuredModel for FakeModel {
    fn model_name(&self) -> &str {
        "fake-model"
    }

    async fn generate(&self, request: StructuredRequest) -> Result<Value, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        match &self.canned {
            Canned::Value(value) => Ok(value.clone()),
            Canned::ApiError(status, message) => Err(LlmError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}
