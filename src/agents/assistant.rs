use async_trait::async_trait;

use super::Agent;
use crate::ai::{AiError, Message, MessageRole, OpenAIClient};

/// System role sent with every delegated prompt.
const SYSTEM_PROMPT: &str = "You are a helpful executive assistant.";

/// Default agent that forwards the prompt to the completion provider and
/// returns its output verbatim. Provider failures propagate unchanged.
pub struct AssistantAgent {
    client: OpenAIClient,
}

impl AssistantAgent {
    pub fn new(client: OpenAIClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Agent for AssistantAgent {
    fn name(&self) -> &str {
        "assistant"
    }

    async fn handle(&self, prompt: &str) -> Result<String, AiError> {
        let messages = vec![
            Message {
                role: MessageRole::System,
                content: SYSTEM_PROMPT.to_string(),
            },
            Message {
                role: MessageRole::User,
                content: prompt.to_string(),
            },
        ];
        self.client.generate_text(messages).await
    }
}
