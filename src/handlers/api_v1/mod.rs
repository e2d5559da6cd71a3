pub mod agenda;
pub mod audit;
pub mod comments;
pub mod committees;
pub mod meetings;
pub mod votes;

use actix_web::{
    web, Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    middleware::Next,
};

use crate::errors::ApiErrorResponse;

/// Request body for lifecycle transitions of meetings and agenda items.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct StatusForm<S> {
    pub status: S,
}

/// Rejects POST/PUT/DELETE requests without `Content-Type: application/json`.
/// GET requests pass through.
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == Method::POST || method == Method::PUT || method == Method::DELETE {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if !content_type.starts_with("application/json") {
            let response = HttpResponse::BadRequest().json(ApiErrorResponse {
                error: "validation_error".to_string(),
                details: Some("Content-Type must be application/json for mutation requests".to_string()),
            });
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Malformed JSON bodies get the same error shape as validation failures.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ApiErrorResponse {
            error: "validation_error".to_string(),
            details: Some(err.to_string()),
        });
        actix_web::error::InternalError::from_response(err, response).into()
    })
}

/// Configure API v1 routes. Mount under `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    cfg.service(
        web::scope("/committees")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(committees::list))
            .route("", web::post().to(committees::create))
            .route("/{id}", web::get().to(committees::read))
            .route("/{id}/meetings", web::get().to(committees::meetings))
    );
    cfg.service(
        web::scope("/meetings")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(meetings::list))
            .route("", web::post().to(meetings::create))
            .route("/{id}", web::get().to(meetings::read))
            .route("/{id}/status", web::post().to(meetings::update_status))
            .route("/{id}/agenda-items", web::get().to(agenda::list_for_meeting))
            .route("/{id}/agenda-items", web::post().to(agenda::create))
            .route("/{id}/approval-rate", web::get().to(meetings::approval_rate))
            .route("/{id}/summary", web::get().to(meetings::summary))
    );
    cfg.service(
        web::scope("/agenda-items")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("/{id}", web::get().to(agenda::read))
            .route("/{id}/status", web::post().to(agenda::update_status))
            .route("/{id}/vote-result", web::get().to(votes::read))
            .route("/{id}/vote-result", web::post().to(votes::record))
            .route("/{id}/comments", web::get().to(comments::list))
            .route("/{id}/comments", web::post().to(comments::create))
    );
    cfg.route("/audit", web::get().to(audit::list));
}
