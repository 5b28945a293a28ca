pub mod assistant;
pub mod meeting;
pub mod registry;

#[cfg(test)]
pub mod mock;

pub use assistant::AssistantAgent;
pub use meeting::MeetingAgent;
pub use registry::AgentRegistry;

use std::sync::Arc;

use async_trait::async_trait;

use crate::ai::{AiError, OpenAIClient};

/// Trait that all task-handling agents implement.
///
/// Agents are stateless prompt-to-text handlers. They never see or mutate
/// task records — persistence belongs to the dispatcher.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Short identifier used in routing logs.
    fn name(&self) -> &str;

    /// Produce a response for the prompt.
    async fn handle(&self, prompt: &str) -> Result<String, AiError>;
}

/// Trigger phrases that route a prompt to the meeting agent.
const MEETING_TRIGGERS: &[&str] = &["schedule a meeting", "meeting with"];

/// Build the default registry: the meeting agent behind its trigger
/// phrases, with the delegating assistant as the fallback for everything
/// else. Registration order is significant — earlier routes win ties.
pub fn create_default_registry(client: OpenAIClient) -> AgentRegistry {
    let mut registry = AgentRegistry::new();
    registry.register(MEETING_TRIGGERS, Arc::new(MeetingAgent::new()));
    registry.set_default(Arc::new(AssistantAgent::new(client)));
    registry
}
