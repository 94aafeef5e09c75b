pub mod image_client;

pub use image_client::{interpret_response, normalize_image, ImageClient};
