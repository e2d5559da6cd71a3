use actix_web::{App, HttpResponse, HttpServer, middleware, web};

use council::config::AppConfig;
use council::errors::ApiErrorResponse;
use council::handlers;
use council::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // A missing .env file is fine; the environment alone is enough.
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("{e}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    log::info!(
        "Quorum threshold {}, vote-required categories: {:?}",
        config.vote_policy.quorum_threshold,
        config.vote_policy.vote_required_categories
    );

    let state = web::Data::new(AppState::new(&config));

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .route("/", web::get().to(|| async {
                HttpResponse::Ok().json(serde_json::json!({
                    "service": "council",
                    "version": env!("CARGO_PKG_VERSION"),
                }))
            }))
            .route("/health", web::get().to(handlers::health::check))
            .service(web::scope("/api/v1").configure(handlers::api_v1::configure))
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                HttpResponse::NotFound().json(ApiErrorResponse {
                    error: "not_found".to_string(),
                    details: None,
                })
            }))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
