//! Canned agent for dispatcher and registry tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::Agent;
use crate::ai::AiError;

/// Test agent returning a fixed reply or failure, counting invocations so
/// tests can assert which agents actually ran.
pub struct MockAgent {
    name: &'static str,
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl MockAgent {
    pub fn replying(name: &'static str, text: &str) -> Self {
        MockAgent {
            name,
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &'static str, message: &str) -> Self {
        MockAgent {
            name,
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Agent for MockAgent {
    fn name(&self) -> &str {
        self.name
    }

    async fn handle(&self, _prompt: &str) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(AiError::new)
    }
}
