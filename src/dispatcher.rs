use std::fmt;
use std::sync::Arc;

use crate::agents::AgentRegistry;
use crate::ai::AiError;
use crate::db::Database;

/// Successful pipeline outcome returned to the caller.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub task_id: String,
    pub response: String,
}

/// Everything that can go wrong in the submit pipeline.
///
/// Variants carrying a `task_id` have already attempted the compensating
/// `mark_task_failed` write; when that write itself failed, its diagnostic
/// is carried in `compensation` and appended to — never substituted for —
/// the original cause.
#[derive(Debug)]
pub enum DispatchError {
    /// Missing or empty prompt; no task record was created.
    Validation,
    /// The initial task insert failed; there is no record to compensate.
    Persistence(String),
    /// Classification produced no agent.
    Routing {
        task_id: String,
        message: String,
        compensation: Option<String>,
    },
    /// The selected agent could not produce a result.
    Execution {
        task_id: String,
        source: AiError,
        compensation: Option<String>,
    },
    /// The agent succeeded but the completion write failed; the result was
    /// not persisted and is not returned.
    CompletedUnlogged { task_id: String, message: String },
}

impl DispatchError {
    /// Whether this error is a caller mistake (HTTP 400) rather than an
    /// internal failure (HTTP 500).
    pub fn is_validation(&self) -> bool {
        matches!(self, DispatchError::Validation)
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Validation => write!(f, "Prompt is required"),
            DispatchError::Persistence(message) => {
                write!(f, "Failed to record task: {}", message)
            }
            DispatchError::Routing {
                task_id,
                message,
                compensation,
            } => {
                write!(f, "No agent available for task {}: {}", task_id, message)?;
                if let Some(note) = compensation {
                    write!(f, " (failure status not recorded: {})", note)?;
                }
                Ok(())
            }
            DispatchError::Execution {
                task_id,
                source,
                compensation,
            } => {
                write!(f, "Agent failed for task {}: {}", task_id, source)?;
                if let Some(note) = compensation {
                    write!(f, " (failure status not recorded: {})", note)?;
                }
                Ok(())
            }
            DispatchError::CompletedUnlogged { task_id, message } => {
                write!(
                    f,
                    "Task {} completed but the result could not be recorded: {}",
                    task_id, message
                )
            }
        }
    }
}

impl std::error::Error for DispatchError {}

/// Pipeline controller: records the task, routes it to an agent, runs the
/// agent, and persists the terminal outcome.
///
/// Owns every status transition. Once a task id exists, each return path
/// below has driven (or attempted to drive) the record to a terminal state.
pub struct TaskDispatcher {
    db: Arc<Database>,
    registry: Arc<AgentRegistry>,
}

impl TaskDispatcher {
    pub fn new(db: Arc<Database>, registry: Arc<AgentRegistry>) -> Self {
        Self { db, registry }
    }

    /// Run one prompt through the full pipeline.
    pub async fn dispatch(&self, prompt: &str) -> Result<TaskOutcome, DispatchError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(DispatchError::Validation);
        }

        let task = self.db.create_task(prompt).map_err(|e| {
            log::error!("Failed to record task: {}", e);
            DispatchError::Persistence(e.to_string())
        })?;

        let agent = match self.registry.select(prompt) {
            Some(agent) => agent,
            None => {
                let message = "no default agent configured".to_string();
                log::error!("Routing failed for task {}: {}", task.id, message);
                let compensation = self.record_failure(&task.id, &message);
                return Err(DispatchError::Routing {
                    task_id: task.id,
                    message,
                    compensation,
                });
            }
        };

        log::info!("Task {} routed to agent '{}'", task.id, agent.name());

        match agent.handle(prompt).await {
            Ok(response) => {
                if let Err(e) = self.db.mark_task_completed(&task.id, &response) {
                    log::error!("Task {} completed but the update failed: {}", task.id, e);
                    return Err(DispatchError::CompletedUnlogged {
                        task_id: task.id,
                        message: e.to_string(),
                    });
                }
                Ok(TaskOutcome {
                    task_id: task.id,
                    response,
                })
            }
            Err(source) => {
                log::error!(
                    "Agent '{}' failed for task {}: {}",
                    agent.name(),
                    task.id,
                    source
                );
                let compensation = self.record_failure(&task.id, &source.to_string());
                Err(DispatchError::Execution {
                    task_id: task.id,
                    source,
                    compensation,
                })
            }
        }
    }

    /// Best-effort terminal write after a failure. Returns the write's own
    /// diagnostic when it also failed, so callers report it alongside the
    /// original cause.
    fn record_failure(&self, task_id: &str, diagnostic: &str) -> Option<String> {
        match self.db.mark_task_failed(task_id, diagnostic) {
            Ok(()) => None,
            Err(e) => {
                log::error!("Failed to mark task {} as failed: {}", task_id, e);
                Some(e.to_string())
            }
        }
    }
}
