//! Application Layer
//!
//! Use cases: input validation and ownership rules on top of the
//! repository traits.

pub mod banner;
pub mod brand;
pub mod category;
pub mod product;
pub mod rating;
pub mod shop;

pub use banner::{BannerInput, BannerUseCase};
pub use brand::{BrandInput, BrandUseCase};
pub use category::{CategoryInput, CategoryUseCase};
pub use product::{ImageInput, ProductInput, ProductUseCase, VariantInput};
pub use rating::{RateProductUseCase, RatingInput};
pub use shop::{ShopInput, ShopUseCase};

use crate::error::{CatalogError, CatalogResult};

pub(crate) const NAME_MAX_LENGTH: usize = 200;
pub(crate) const TEXT_MAX_LENGTH: usize = 5000;

/// Trimmed, non-empty, at most `max` characters
pub(crate) fn required_text(field: &str, value: Option<String>, max: usize) -> CatalogResult<String> {
    match optional_text(field, value, max)? {
        Some(text) => Ok(text),
        None => Err(CatalogError::validation(format!("{field} is required"))),
    }
}

/// Trimmed; blank counts as absent
pub(crate) fn optional_text(
    field: &str,
    value: Option<String>,
    max: usize,
) -> CatalogResult<Option<String>> {
    let Some(text) = value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > max {
        return Err(CatalogError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert_eq!(
            required_text("name", Some("  Shoes ".into()), 10).unwrap(),
            "Shoes"
        );
        assert!(required_text("name", Some("   ".into()), 10).is_err());
        assert!(required_text("name", None, 10).is_err());
        assert!(required_text("name", Some("x".repeat(11)), 10).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("logo", Some(" ".into()), 10).unwrap(), None);
        assert_eq!(
            optional_text("logo", Some("a.png".into()), 10).unwrap(),
            Some("a.png".into())
        );
    }
}
