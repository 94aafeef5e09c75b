pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod nanobanana;
#[cfg(feature = "server")]
pub mod server;

#[cfg(test)]
mod test_support;

pub use config::{Config, NanoBananaConfig};
pub use error::{NanoBananaError, Result};
pub use models::{GenerationRequest, GenerationResult, ImageSize};
pub use nanobanana::ImageClient;
