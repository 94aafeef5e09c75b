use crate::error::{NanoBananaError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_STYLE: &str = "cartoon";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1024x1024")]
    Square1024,
    #[serde(rename = "768x768")]
    Square768,
    #[serde(rename = "512x512")]
    Square512,
}

impl ImageSize {
    pub const ALL: [ImageSize; 3] = [
        ImageSize::Square1024,
        ImageSize::Square768,
        ImageSize::Square512,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Square1024 => "1024x1024",
            ImageSize::Square768 => "768x768",
            ImageSize::Square512 => "512x512",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = NanoBananaError;

    fn from_str(s: &str) -> Result<Self> {
        ImageSize::ALL
            .into_iter()
            .find(|size| size.as_str() == s.trim())
            .ok_or_else(|| {
                NanoBananaError::ValidationError(format!(
                    "unsupported size '{}', expected one of 1024x1024, 768x768, 512x512",
                    s
                ))
            })
    }
}

/// A validated request. Build it with [`GenerationRequest::new`] so the prompt is
/// trimmed, the style defaulted and the credential checked before anything is sent.
#[derive(Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub size: ImageSize,
    pub style: String,
    pub credential: String,
}

impl fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("prompt", &self.prompt)
            .field("size", &self.size)
            .field("style", &self.style)
            .field("credential", &"<redacted>")
            .finish()
    }
}

impl GenerationRequest {
    pub fn new(
        prompt: &str,
        size: ImageSize,
        style: &str,
        credential: Option<&str>,
    ) -> Result<Self> {
        let request = Self {
            prompt: prompt.trim().to_string(),
            size,
            style: match style.trim() {
                "" => DEFAULT_STYLE.to_string(),
                s => s.to_string(),
            },
            credential: credential.map(str::trim).unwrap_or_default().to_string(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Prompt is checked before credential.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(NanoBananaError::ValidationError(
                "Please enter a prompt.".into(),
            ));
        }
        if self.credential.trim().is_empty() {
            return Err(NanoBananaError::MissingCredentialError);
        }
        Ok(())
    }

    pub fn payload(&self) -> NanoBananaImageRequest<'_> {
        NanoBananaImageRequest {
            prompt: &self.prompt,
            size: self.size,
            style: if self.style.trim().is_empty() {
                DEFAULT_STYLE
            } else {
                &self.style
            },
        }
    }
}

/// Wire body sent upstream.
#[derive(Debug, Serialize)]
pub struct NanoBananaImageRequest<'a> {
    pub prompt: &'a str,
    pub size: ImageSize,
    pub style: &'a str,
}

/// Wire body returned by the provider.
#[derive(Debug, Default, Deserialize)]
pub struct NanoBananaImageResponse {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_base64: Option<String>,
}

impl NanoBananaImageResponse {
    /// `image_url` wins over `image_base64`; empty strings count as missing.
    pub fn image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.image_base64.as_deref().filter(|s| !s.is_empty()))
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum GenerationResult {
    RemoteImage { url: String },
    InlineImage { bytes: Vec<u8> },
}

impl fmt::Debug for GenerationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationResult::RemoteImage { url } => {
                f.debug_struct("RemoteImage").field("url", url).finish()
            }
            GenerationResult::InlineImage { bytes } => f
                .debug_struct("InlineImage")
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

impl GenerationResult {
    /// Something an `<img src>` can render directly: the URL itself, or a PNG data URI.
    pub fn display_source(&self) -> String {
        match self {
            GenerationResult::RemoteImage { url } => url.clone(),
            GenerationResult::InlineImage { bytes } => {
                format!("data:image/png;base64,{}", BASE64.encode(bytes))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GenerationResult::RemoteImage { .. } => "remote",
            GenerationResult::InlineImage { .. } => "inline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_prompt_is_rejected() {
        for prompt in ["", "   ", "\n\t"] {
            let err = GenerationRequest::new(prompt, ImageSize::default(), "cartoon", Some("key"))
                .unwrap_err();
            assert!(matches!(err, NanoBananaError::ValidationError(_)));
            assert_eq!(err.to_string(), "Please enter a prompt.");
        }
    }

    #[test]
    fn test_missing_credential_is_rejected() {
        let err = GenerationRequest::new("a corgi", ImageSize::default(), "", None).unwrap_err();
        assert!(matches!(err, NanoBananaError::MissingCredentialError));

        let err =
            GenerationRequest::new("a corgi", ImageSize::default(), "", Some("  ")).unwrap_err();
        assert!(matches!(err, NanoBananaError::MissingCredentialError));
    }

    #[test]
    fn test_prompt_checked_before_credential() {
        let err = GenerationRequest::new(" ", ImageSize::default(), "", None).unwrap_err();
        assert!(matches!(err, NanoBananaError::ValidationError(_)));
    }

    #[test]
    fn test_request_normalization() {
        let request = GenerationRequest::new(
            "  A detective corgi  ",
            ImageSize::Square512,
            "   ",
            Some("key"),
        )
        .unwrap();

        assert_eq!(request.prompt, "A detective corgi");
        assert_eq!(request.style, "cartoon");

        let body = serde_json::to_value(request.payload()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "prompt": "A detective corgi",
                "size": "512x512",
                "style": "cartoon"
            })
        );
    }

    #[test]
    fn test_payload_defaults_blank_style_on_hand_built_request() {
        let request = GenerationRequest {
            prompt: "p".into(),
            size: ImageSize::Square768,
            style: String::new(),
            credential: "k".into(),
        };
        assert_eq!(request.payload().style, "cartoon");
    }

    #[test]
    fn test_debug_redacts_credential() {
        let request =
            GenerationRequest::new("p", ImageSize::default(), "comic", Some("sk-secret")).unwrap();
        let debug = format!("{:?}", request);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("comic"));
    }

    #[test]
    fn test_image_size_parsing() {
        assert_eq!("768x768".parse::<ImageSize>().unwrap(), ImageSize::Square768);
        assert_eq!(ImageSize::default().to_string(), "1024x1024");
        assert!("640x480".parse::<ImageSize>().is_err());
    }

    #[test]
    fn test_response_field_precedence() {
        let both: NanoBananaImageResponse =
            serde_json::from_str(r#"{"image_url":"https://a/b.png","image_base64":"AAAA"}"#)
                .unwrap();
        assert_eq!(both.image(), Some("https://a/b.png"));

        let empty_url: NanoBananaImageResponse =
            serde_json::from_str(r#"{"image_url":"","image_base64":"AAAA"}"#).unwrap();
        assert_eq!(empty_url.image(), Some("AAAA"));

        let none: NanoBananaImageResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(none.image(), None);
    }

    #[test]
    fn test_display_source() {
        let remote = GenerationResult::RemoteImage {
            url: "https://x/y.png".into(),
        };
        assert_eq!(remote.display_source(), "https://x/y.png");

        let inline = GenerationResult::InlineImage {
            bytes: vec![0x89, b'P', b'N', b'G'],
        };
        assert_eq!(inline.display_source(), "data:image/png;base64,iVBORw==");
        assert_eq!(inline.kind(), "inline");
    }
}
