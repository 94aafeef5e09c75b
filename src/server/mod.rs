//! `POST /api/cartoon` proxy that keeps the provider key server-side.

use crate::{
    config::Config,
    error::{NanoBananaError, Result},
    models::{GenerationRequest, ImageSize},
    nanobanana::ImageClient,
};
use actix_web::{
    error::InternalError, http::StatusCode, web, App, HttpResponse, HttpServer, ResponseError,
};
use serde::Deserialize;
use serde_json::json;

const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

pub struct AppState {
    pub client: ImageClient,
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CartoonBody {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/api/cartoon", web::post().to(create_cartoon));
}

/// A body that is missing, not JSON, or mistyped answers like an empty one.
/// Oversized bodies keep their 413.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(BODY_LIMIT_BYTES)
        .error_handler(|err, _req| {
            log::debug!("Rejected request body: {}", err);
            let response = if err.status_code() == StatusCode::PAYLOAD_TOO_LARGE {
                error_body(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
            } else {
                error_body(StatusCode::BAD_REQUEST, "Missing prompt")
            };
            InternalError::from_response(err, response).into()
        })
}

pub async fn run(config: Config) -> Result<()> {
    let port = config.port();
    let state = web::Data::new(AppState {
        client: ImageClient::new(&config.nanobanana)?,
        api_key: config.nanobanana.api_key.clone(),
    });

    log::info!("🌐 Cartoon proxy running on http://localhost:{}", port);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(("0.0.0.0", port))
        .map_err(|e| NanoBananaError::ConfigError(format!("failed to bind port {}: {}", port, e)))?
        .run()
        .await
        .map_err(|e| NanoBananaError::RequestError(e.to_string()))
}

async fn create_cartoon(state: web::Data<AppState>, body: web::Json<CartoonBody>) -> HttpResponse {
    let body = body.into_inner();

    let mut request = match GenerationRequest::new(
        body.prompt.as_deref().unwrap_or_default(),
        ImageSize::default(),
        body.style.as_deref().unwrap_or_default(),
        state.api_key.as_deref(),
    ) {
        Ok(request) => request,
        Err(e) => return error_response(&e),
    };

    if let Some(size) = body.size.as_deref() {
        match size.parse::<ImageSize>() {
            Ok(size) => request.size = size,
            Err(e) => return error_body(StatusCode::BAD_REQUEST, &e.to_string()),
        }
    }

    match state.client.generate(request).await {
        Ok(image) => HttpResponse::Ok().json(json!({ "image": image.display_source() })),
        Err(e) => error_response(&e),
    }
}

pub fn error_response(err: &NanoBananaError) -> HttpResponse {
    match err {
        NanoBananaError::ValidationError(_) => {
            error_body(StatusCode::BAD_REQUEST, "Missing prompt")
        }
        NanoBananaError::MissingCredentialError => {
            error_body(StatusCode::BAD_REQUEST, &err.to_string())
        }
        NanoBananaError::UpstreamError { status, body } => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
            let message = if body.is_empty() {
                "Upstream error"
            } else {
                body.as_str()
            };
            error_body(status, message)
        }
        NanoBananaError::ResponseError(_) => {
            error_body(StatusCode::BAD_GATEWAY, "Invalid JSON from upstream")
        }
        NanoBananaError::MissingImageError => {
            error_body(StatusCode::BAD_GATEWAY, "No image returned from upstream")
        }
        NanoBananaError::MalformedPayloadError(_) => {
            error_body(StatusCode::BAD_GATEWAY, &err.to_string())
        }
        NanoBananaError::RequestError(_) | NanoBananaError::ConfigError(_) => {
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Proxy request failed")
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message }))
}
