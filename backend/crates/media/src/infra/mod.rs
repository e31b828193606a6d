//! Infrastructure Layer

pub mod s3;
pub mod sigv4;

pub use s3::S3Storage;
