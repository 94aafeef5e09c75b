use crate::{
    config::NanoBananaConfig,
    error::{NanoBananaError, Result},
    logger::Timer,
    models::{GenerationRequest, GenerationResult, NanoBananaImageResponse, UpstreamResponse},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::{Client, Url};
use std::time::Duration;
use uuid::Uuid;

const DATA_URI_MARKER: &str = ";base64,";

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl std::fmt::Debug for ImageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ImageClient {
    /// Only the endpoint and timeout are read from `config`; the credential
    /// travels with each [`GenerationRequest`].
    pub fn new(config: &NanoBananaConfig) -> Result<Self> {
        let endpoint = Url::parse(config.endpoint()).map_err(|e| {
            NanoBananaError::ConfigError(format!("invalid endpoint '{}': {}", config.endpoint(), e))
        })?;
        let timeout = Duration::from_secs(config.timeout_secs());

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NanoBananaError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Issues exactly one POST to the configured endpoint. Failures are never retried.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult> {
        request.validate()?;

        let request_id = Uuid::new_v4();
        let _timer = Timer::new(&format!("generate [req:{}]", request_id));

        log::info!(
            "Generating image [req:{}] size={} style={}",
            request_id,
            request.size,
            request.style
        );
        log::debug!("Prompt [req:{}]: {}", request_id, request.prompt);

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&request.credential)
            .json(&request.payload())
            .send()
            .await
            .map_err(|e| self.transport_error(request_id, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(request_id, e))?;

        log::debug!("Upstream answered [req:{}] with status {}", request_id, status);

        let result = interpret_response(UpstreamResponse::new(status, body));
        match &result {
            Ok(image) => log::info!("Image ready [req:{}] ({})", request_id, image.kind()),
            Err(e) => log::error!("Generation failed [req:{}]: {}", request_id, e),
        }
        result
    }

    fn transport_error(&self, request_id: Uuid, e: reqwest::Error) -> NanoBananaError {
        log::error!("Request to {} failed [req:{}]: {:?}", self.endpoint, request_id, e);
        if e.is_timeout() {
            NanoBananaError::RequestError(format!(
                "request timed out after {}s",
                self.timeout.as_secs()
            ))
        } else {
            NanoBananaError::RequestError(e.to_string())
        }
    }
}

/// Turns a raw upstream answer into a displayable image.
pub fn interpret_response(response: UpstreamResponse) -> Result<GenerationResult> {
    if !response.is_success() {
        return Err(NanoBananaError::UpstreamError {
            status: response.status,
            body: response.body,
        });
    }

    let parsed: NanoBananaImageResponse = serde_json::from_str(&response.body)
        .map_err(|e| NanoBananaError::ResponseError(format!("invalid JSON from upstream: {}", e)))?;

    let image = parsed.image().ok_or(NanoBananaError::MissingImageError)?;
    normalize_image(image)
}

/// `http` prefix means a remote URL, a `data:...;base64,` prefix is stripped,
/// anything else is decoded as raw base64.
pub fn normalize_image(image: &str) -> Result<GenerationResult> {
    if image.starts_with("http") {
        return Ok(GenerationResult::RemoteImage {
            url: image.to_string(),
        });
    }

    let encoded = if image.starts_with("data:") {
        match image.find(DATA_URI_MARKER) {
            Some(idx) => &image[idx + DATA_URI_MARKER.len()..],
            None => {
                return Err(NanoBananaError::MalformedPayloadError(
                    "data URI is not base64 encoded".into(),
                ))
            }
        }
    } else {
        image
    };

    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| NanoBananaError::MalformedPayloadError(e.to_string()))?;

    Ok(GenerationResult::InlineImage { bytes })
}
