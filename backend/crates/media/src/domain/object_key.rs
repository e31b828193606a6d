//! Object Key Value Object
//!
//! Keys are relative paths such as `images/0b6f….png`. Client-supplied keys
//! are restricted to a safe character set and may not climb directories.

use std::fmt;

use uuid::Uuid;

use crate::error::{MediaError, MediaResult};

const MAX_KEY_LENGTH: usize = 1024;
const IMAGE_PREFIX: &str = "images";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Validate a key received from a client
    pub fn parse(raw: &str) -> MediaResult<Self> {
        let key = raw.trim();
        if key.is_empty() {
            return Err(MediaError::validation("key is required"));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(MediaError::validation("key is too long"));
        }
        if key.starts_with('/') || key.split('/').any(|s| s.is_empty() || s == "." || s == "..") {
            return Err(MediaError::validation("key is not a valid object path"));
        }
        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '-' | '_'))
        {
            return Err(MediaError::validation("key contains invalid characters"));
        }
        Ok(Self(key.to_owned()))
    }

    /// Fresh `images/{uuid}.{ext}` key
    pub fn new_image(extension: &str) -> Self {
        Self(format!("{IMAGE_PREFIX}/{}.{extension}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File extension for an uploaded image
///
/// Known content types win; otherwise the file name's extension is used when
/// it is short and alphanumeric.
pub fn image_extension(content_type: &str, file_name: Option<&str>) -> String {
    let known = match content_type {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/avif" => Some("avif"),
        "image/svg+xml" => Some("svg"),
        "image/bmp" => Some("bmp"),
        _ => None,
    };
    if let Some(ext) = known {
        return ext.to_owned();
    }

    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_shape() {
        let key = ObjectKey::new_image("png");
        let name = key.as_str().strip_prefix("images/").unwrap();
        let (id, ext) = name.split_once('.').unwrap();
        assert_eq!(ext, "png");
        assert!(Uuid::parse_str(id).is_ok());
        assert!(ObjectKey::parse(key.as_str()).is_ok());
    }

    #[test]
    fn test_rejects_unsafe_keys() {
        for bad in ["", "   ", "/images/a.png", "images/../secret", "images//a.png", "images/a b.png", "images/a?.png"] {
            assert!(ObjectKey::parse(bad).is_err(), "{bad:?} should be rejected");
        }
        assert_eq!(
            ObjectKey::parse(" images/a-1_b.png ").unwrap().as_str(),
            "images/a-1_b.png"
        );
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("image/jpeg", Some("photo.JPEG")), "jpg");
        assert_eq!(image_extension("image/x-icon", Some("favicon.ICO")), "ico");
        assert_eq!(image_extension("image/x-icon", Some("weird.name.with spaces")), "bin");
        assert_eq!(image_extension("image/heic", None), "bin");
    }
}
