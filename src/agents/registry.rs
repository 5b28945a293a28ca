use std::sync::Arc;

use super::Agent;

/// One classification route: any matching trigger phrase selects the agent.
struct Route {
    triggers: Vec<String>,
    agent: Arc<dyn Agent>,
}

/// Registry holding the ordered list of classification routes plus the
/// default agent.
///
/// Classification is a pure function of the prompt text: routes are checked
/// in registration order and the first trigger match wins, so adding an
/// agent never requires touching a conditional chain.
pub struct AgentRegistry {
    routes: Vec<Route>,
    default_agent: Option<Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        AgentRegistry {
            routes: Vec::new(),
            default_agent: None,
        }
    }

    /// Register an agent behind a set of case-insensitive trigger phrases.
    pub fn register(&mut self, triggers: &[&str], agent: Arc<dyn Agent>) {
        self.routes.push(Route {
            triggers: triggers.iter().map(|t| t.to_lowercase()).collect(),
            agent,
        });
    }

    /// Set the agent used when no trigger phrase matches.
    pub fn set_default(&mut self, agent: Arc<dyn Agent>) {
        self.default_agent = Some(agent);
    }

    /// Number of registered routes (the default agent not included).
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Select the agent for a prompt.
    ///
    /// Returns the first registered agent with a matching trigger phrase,
    /// falling back to the default agent. `None` only when the registry was
    /// built without a default.
    pub fn select(&self, prompt: &str) -> Option<Arc<dyn Agent>> {
        let lowered = prompt.to_lowercase();
        for route in &self.routes {
            if route.triggers.iter().any(|t| lowered.contains(t.as_str())) {
                return Some(route.agent.clone());
            }
        }
        self.default_agent.clone()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::AgentRegistry;
    use crate::agents::mock::MockAgent;

    fn registry() -> AgentRegistry {
        let mut registry = AgentRegistry::new();
        registry.register(
            &["schedule a meeting", "meeting with"],
            Arc::new(MockAgent::replying("meeting", "ack")),
        );
        // Overlapping trigger on purpose: "meeting with" also appears above.
        registry.register(
            &["meeting with", "draft"],
            Arc::new(MockAgent::replying("writer", "draft")),
        );
        registry.set_default(Arc::new(MockAgent::replying("assistant", "text")));
        registry
    }

    #[test]
    fn matches_are_case_insensitive() {
        let registry = registry();
        let agent = registry.select("Schedule a MEETING with Jane").unwrap();
        assert_eq!(agent.name(), "meeting");
    }

    #[test]
    fn first_registered_route_wins_ties() {
        let registry = registry();
        let agent = registry.select("set up a meeting with the team").unwrap();
        assert_eq!(agent.name(), "meeting");
    }

    #[test]
    fn unmatched_prompts_fall_back_to_default() {
        let registry = registry();
        let agent = registry.select("summarize this document").unwrap();
        assert_eq!(agent.name(), "assistant");
    }

    #[test]
    fn selection_is_deterministic() {
        let registry = registry();
        let first = registry.select("Draft an email").unwrap();
        let second = registry.select("Draft an email").unwrap();
        assert_eq!(first.name(), second.name());
    }

    #[test]
    fn no_default_yields_none() {
        let mut registry = AgentRegistry::new();
        registry.register(&["ping"], Arc::new(MockAgent::replying("pinger", "pong")));
        assert!(registry.select("anything else").is_none());
    }
}
