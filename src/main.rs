use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod agents;
mod ai;
mod config;
mod controllers;
mod db;
mod dispatcher;
mod http;
mod models;


use ai::OpenAIClient;
use config::Config;
use db::Database;
use dispatcher::TaskDispatcher;

pub struct AppState {
    pub config: Config,
    pub dispatcher: Arc<TaskDispatcher>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url).expect("Failed to initialize database");
    let db = Arc::new(db);

    // Tasks left pending by a previous run can never reach a terminal
    // state on their own — fail them now.
    let stale = db
        .fail_stale_pending_tasks("Interrupted by server restart")
        .unwrap_or_else(|e| {
            log::warn!("Failed to sweep stale tasks: {}", e);
            0
        });
    if stale > 0 {
        log::warn!("Marked {} interrupted task(s) as failed", stale);
    }

    let client = OpenAIClient::new(
        &config.openai_api_key,
        config.openai_endpoint.as_deref(),
        Some(&config.openai_model),
    )
    .expect("Failed to create completion client");

    log::info!("Initializing agent registry");
    let registry = Arc::new(agents::create_default_registry(client));
    log::info!("Registered {} agent routes", registry.len());

    let dispatcher = Arc::new(TaskDispatcher::new(db, registry));

    log::info!("Starting taskbot server on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                config: config.clone(),
                dispatcher: Arc::clone(&dispatcher),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::orchestrator::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
