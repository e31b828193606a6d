//! Common ID Types
//!
//! Type-safe wrappers around the database-generated integer keys.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type UserId = Id<markers::User>;
/// let id = UserId::new(7);
/// assert_eq!(id.as_i32(), 7);
/// ```
pub struct Id<T> {
    value: i32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Wrap an existing database key
    pub const fn new(value: i32) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Get the underlying integer
    pub const fn as_i32(&self) -> i32 {
        self.value
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<i32> for Id<T> {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl<T> From<Id<T>> for i32 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i32::deserialize(deserializer).map(Self::new)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    pub struct User;
    pub struct Shop;
    pub struct Category;
    pub struct Brand;
    pub struct Product;
    pub struct ProductImage;
    pub struct ProductVariant;
    pub struct ProductRating;
    pub struct Banner;
    pub struct CartItem;
    pub struct Order;
    pub struct OrderDetail;
}

/// Type aliases for common IDs
pub type UserId = Id<markers::User>;
pub type ShopId = Id<markers::Shop>;
pub type CategoryId = Id<markers::Category>;
pub type BrandId = Id<markers::Brand>;
pub type ProductId = Id<markers::Product>;
pub type ProductImageId = Id<markers::ProductImage>;
pub type VariantId = Id<markers::ProductVariant>;
pub type RatingId = Id<markers::ProductRating>;
pub type BannerId = Id<markers::Banner>;
pub type CartItemId = Id<markers::CartItem>;
pub type OrderId = Id<markers::Order>;
pub type OrderDetailId = Id<markers::OrderDetail>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_type_safety() {
        let user_id: UserId = Id::new(1);
        let shop_id: ShopId = Id::new(1);

        // Same value, different types: only comparable through the raw integer
        assert_eq!(user_id.as_i32(), shop_id.as_i32());
    }

    #[test]
    fn test_id_is_copy_without_marker_bounds() {
        let id = ProductId::new(42);
        let copy = id;
        assert_eq!(id, copy);
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id = OrderId::new(9);
        assert_eq!(serde_json::to_string(&id).unwrap(), "9");

        let parsed: OrderId = serde_json::from_str("12").unwrap();
        assert_eq!(parsed.as_i32(), 12);
    }

    #[test]
    fn test_id_ordering() {
        let mut ids = vec![CartItemId::new(3), CartItemId::new(1), CartItemId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![CartItemId::new(1), CartItemId::new(2), CartItemId::new(3)]);
    }
}
