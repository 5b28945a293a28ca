use async_trait::async_trait;

use super::Agent;
use crate::ai::AiError;

/// Deterministic agent that acknowledges meeting requests without calling
/// the completion provider. Side-effect-free, so it is safe to invoke
/// unconditionally.
pub struct MeetingAgent;

impl MeetingAgent {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MeetingAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for MeetingAgent {
    fn name(&self) -> &str {
        "meeting"
    }

    async fn handle(&self, prompt: &str) -> Result<String, AiError> {
        Ok(format!(
            "Meeting scheduling initiated for: \"{}\". An invitation will be prepared shortly.",
            prompt
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acknowledgement_embeds_the_prompt() {
        let agent = MeetingAgent::new();
        let response = agent
            .handle("Schedule a meeting with Jane at 3pm")
            .await
            .expect("meeting agent cannot fail");
        assert!(response.contains("Meeting scheduling initiated"));
        assert!(response.contains("Schedule a meeting with Jane at 3pm"));
    }
}
