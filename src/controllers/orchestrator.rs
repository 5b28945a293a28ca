use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct OrchestrateRequest {
    /// Absent and empty prompts are both rejected with a 400.
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Serialize)]
pub struct OrchestrateResponse {
    pub success: bool,
    #[serde(rename = "taskId")]
    pub task_id: String,
    pub response: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/orchestrator").route(web::post().to(orchestrate)));
}

async fn orchestrate(
    state: web::Data<AppState>,
    body: web::Json<OrchestrateRequest>,
) -> impl Responder {
    let prompt = body.prompt.as_deref().unwrap_or("");

    match state.dispatcher.dispatch(prompt).await {
        Ok(outcome) => HttpResponse::Ok().json(OrchestrateResponse {
            success: true,
            task_id: outcome.task_id,
            response: outcome.response,
        }),
        Err(error) if error.is_validation() => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Prompt is required".to_string(),
            details: None,
        }),
        Err(error) => HttpResponse::InternalServerError().json(ErrorResponse {
            error: "An internal server error occurred.".to_string(),
            details: Some(error.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{test, web, App};

    use super::*;
    use crate::agents::mock::MockAgent;
    use crate::agents::{AgentRegistry, MeetingAgent};
    use crate::config::Config;
    use crate::db::Database;
    use crate::dispatcher::TaskDispatcher;

    fn test_config() -> Config {
        Config {
            port: 0,
            database_url: ":memory:".to_string(),
            openai_api_key: "test-key".to_string(),
            openai_endpoint: None,
            openai_model: "gpt-3.5-turbo".to_string(),
        }
    }

    fn app_state(db: Arc<Database>, registry: AgentRegistry) -> web::Data<AppState> {
        web::Data::new(AppState {
            config: test_config(),
            dispatcher: Arc::new(TaskDispatcher::new(db, Arc::new(registry))),
        })
    }

    #[actix_web::test]
    async fn meeting_prompt_returns_acknowledgement() {
        let db = Arc::new(Database::new(":memory:").expect("in-memory db"));
        let mut registry = AgentRegistry::new();
        registry.register(
            &["schedule a meeting", "meeting with"],
            Arc::new(MeetingAgent::new()),
        );
        registry.set_default(Arc::new(MockAgent::replying("assistant", "unused")));

        let app = test::init_service(
            App::new().app_data(app_state(db, registry)).configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/orchestrator")
            .set_json(serde_json::json!({"prompt": "Schedule a meeting with Jane at 3pm"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert!(body["taskId"].as_str().is_some_and(|id| !id.is_empty()));
        assert!(body["response"]
            .as_str()
            .unwrap()
            .contains("Meeting scheduling initiated"));
    }

    #[actix_web::test]
    async fn missing_prompt_is_a_bad_request() {
        let db = Arc::new(Database::new(":memory:").expect("in-memory db"));
        let mut registry = AgentRegistry::new();
        registry.set_default(Arc::new(MockAgent::replying("assistant", "unused")));

        let app = test::init_service(
            App::new()
                .app_data(app_state(db.clone(), registry))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/orchestrator")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({"error": "Prompt is required"}));

        // No task row was created for the rejected request.
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[actix_web::test]
    async fn provider_failure_is_an_internal_error_with_details() {
        let db = Arc::new(Database::new(":memory:").expect("in-memory db"));
        let mut registry = AgentRegistry::new();
        registry.set_default(Arc::new(MockAgent::failing(
            "assistant",
            "provider unreachable",
        )));

        let app = test::init_service(
            App::new()
                .app_data(app_state(db.clone(), registry))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/orchestrator")
            .set_json(serde_json::json!({"prompt": "Draft an email to the team"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "An internal server error occurred.");
        assert!(body["details"]
            .as_str()
            .unwrap()
            .contains("provider unreachable"));

        // The task record reached the failed terminal state.
        let (status, error_message): (String, Option<String>) = db
            .conn()
            .query_row(
                "SELECT status, error_message FROM tasks LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(status, "failed");
        assert!(error_message.is_some_and(|m| !m.is_empty()));
    }
}
