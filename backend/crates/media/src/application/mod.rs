//! Application Layer

pub mod config;
pub mod delete;
pub mod signed_url;
pub mod upload;

pub use delete::DeleteImageUseCase;
pub use signed_url::{DEFAULT_EXPIRES_SECS, SignedUrl, SignedUrlUseCase};
pub use upload::{ImageUpload, MAX_FILES, MAX_IMAGE_BYTES, UploadImageUseCase, UploadedImage};
