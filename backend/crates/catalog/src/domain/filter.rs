//! Product search filter
//!
//! [`ProductQuery`] is the raw client input (query string or JSON body).
//! [`ProductFilter`] is the validated form the query builder consumes.

use std::fmt;
use std::str::FromStr;

use kernel::id::{BrandId, CategoryId, ShopId};
use kernel::page::PageRequest;
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;

use crate::error::{CatalogError, CatalogResult};

/// Raw search parameters. Every field is optional; blank values count as
/// absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub shop_id: Option<i32>,
    pub category_ids: Option<IdList>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub price_min: Option<Decimal>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub price_max: Option<Decimal>,
    pub search: Option<String>,
    pub brand_ids: Option<IdList>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_rating: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<u32>,
}

/// Scalar that arrives as text (query string, JSON string) or as a JSON value
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar<T> {
    Text(String),
    Value(T),
}

fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    match Option::<RawScalar<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawScalar::Value(value)) => Ok(Some(value)),
        Some(RawScalar::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse().map(Some).map_err(de::Error::custom)
        }
    }
}

/// Deduplicated, ordered list of ids
///
/// Accepts `"1,2,3"`, a single number, or an array of numbers and numeric
/// strings. Non-numeric and empty tokens are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdList(Vec<i32>);

impl IdList {
    pub fn parse_csv(raw: &str) -> Self {
        Self::from_tokens(raw.split(',').filter_map(|t| t.trim().parse::<i32>().ok()))
    }

    fn from_tokens(tokens: impl IntoIterator<Item = i32>) -> Self {
        let mut ids: Vec<i32> = Vec::new();
        for id in tokens {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self(ids)
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<i32>> for IdList {
    fn from(ids: Vec<i32>) -> Self {
        Self::from_tokens(ids)
    }
}

struct IdListVisitor;

impl<'de> Visitor<'de> for IdListVisitor {
    type Value = IdList;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a comma-separated string, a number, or an array of ids")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<IdList, E> {
        Ok(IdList::parse_csv(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<IdList, E> {
        Ok(IdList::from_tokens(i32::try_from(v).ok()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<IdList, E> {
        Ok(IdList::from_tokens(i32::try_from(v).ok()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<IdList, E> {
        let whole = (v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX))
            .then_some(v as i32);
        Ok(IdList::from_tokens(whole))
    }

    fn visit_unit<E: de::Error>(self) -> Result<IdList, E> {
        Ok(IdList::default())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<IdList, A::Error> {
        let mut ids = Vec::new();
        while let Some(token) = seq.next_element::<IdToken>()? {
            ids.extend(token.0);
        }
        Ok(IdList::from_tokens(ids))
    }
}

impl<'de> Deserialize<'de> for IdList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdListVisitor)
    }
}

/// One array element; anything that is not an integer becomes `None`
struct IdToken(Option<i32>);

impl<'de> Deserialize<'de> for IdToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let list = deserializer.deserialize_any(IdListVisitor)?;
        Ok(IdToken(list.as_slice().first().copied()))
    }
}

/// Validated search filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub shop_id: Option<ShopId>,
    pub category_ids: Vec<CategoryId>,
    pub brand_ids: Vec<BrandId>,
    /// Only set when both bounds were supplied
    pub price_range: Option<(Decimal, Decimal)>,
    /// Trimmed, non-empty name substring
    pub search: Option<String>,
    pub min_rating: Option<f64>,
    pub page: PageRequest,
}

impl ProductFilter {
    pub fn from_query(query: ProductQuery) -> CatalogResult<Self> {
        if let Some(rating) = query.min_rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(CatalogError::validation("minRating must be between 0 and 5"));
            }
        }

        // A single bound is ignored
        let price_range = match (query.price_min, query.price_max) {
            (Some(min), Some(max)) => {
                if min.is_sign_negative() || max.is_sign_negative() {
                    return Err(CatalogError::validation("Price bounds must be non-negative"));
                }
                Some((min, max))
            }
            _ => None,
        };

        Ok(Self {
            shop_id: query.shop_id.map(ShopId::new),
            category_ids: ids_of(query.category_ids),
            brand_ids: ids_of(query.brand_ids),
            price_range,
            search: query
                .search
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty()),
            min_rating: query.min_rating,
            page: PageRequest::new(query.page, query.limit),
        })
    }
}

fn ids_of<T>(list: Option<IdList>) -> Vec<kernel::id::Id<T>> {
    list.map(|l| l.as_slice().iter().copied().map(kernel::id::Id::new).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn ids(json: serde_json::Value) -> Vec<i32> {
        serde_json::from_value::<IdList>(json).unwrap().0
    }

    #[test]
    fn test_id_list_forms_are_equivalent() {
        let csv = ids(serde_json::json!("1,2,3"));
        assert_eq!(csv, vec![1, 2, 3]);
        assert_eq!(ids(serde_json::json!([1, 2, 3])), csv);
        assert_eq!(ids(serde_json::json!(["1", "2", "3"])), csv);
        assert_eq!(ids(serde_json::json!(7)), vec![7]);
    }

    #[test]
    fn test_id_list_drops_junk_and_duplicates() {
        assert_eq!(ids(serde_json::json!("3, ,abc,1,3,")), vec![3, 1]);
        assert_eq!(ids(serde_json::json!([2, "x", null, 2.5, 2])), vec![2]);
        assert!(ids(serde_json::json!("")).is_empty());
        assert!(ids(serde_json::json!([])).is_empty());
    }

    #[test]
    fn test_query_string_form() {
        let query: ProductQuery =
            serde_json::from_value(serde_json::json!({ "categoryIds": "4,5", "brandIds": [9] }))
                .unwrap();
        let filter = ProductFilter::from_query(query).unwrap();
        assert_eq!(
            filter.category_ids,
            vec![CategoryId::new(4), CategoryId::new(5)]
        );
        assert_eq!(filter.brand_ids, vec![BrandId::new(9)]);
    }

    #[test]
    fn test_price_range_requires_both_bounds() {
        let only_min = ProductQuery {
            price_min: Some(dec("10")),
            ..Default::default()
        };
        assert_eq!(ProductFilter::from_query(only_min).unwrap().price_range, None);

        let both = ProductQuery {
            price_min: Some(dec("10")),
            price_max: Some(dec("99.5")),
            ..Default::default()
        };
        assert_eq!(
            ProductFilter::from_query(both).unwrap().price_range,
            Some((dec("10"), dec("99.5")))
        );
    }

    #[test]
    fn test_min_rating_is_validated() {
        let query = ProductQuery {
            min_rating: Some(6.0),
            ..Default::default()
        };
        assert!(ProductFilter::from_query(query).is_err());
    }

    #[test]
    fn test_blank_scalars_are_absent() {
        let query: ProductQuery = serde_json::from_value(serde_json::json!({
            "shopId": "",
            "priceMin": " ",
            "priceMax": "",
            "minRating": "",
            "page": "",
            "limit": null,
        }))
        .unwrap();
        assert_eq!(query.shop_id, None);
        assert_eq!(query.price_min, None);
        assert_eq!(query.price_max, None);
        assert_eq!(query.min_rating, None);
        assert_eq!(query.page, None);
        assert_eq!(query.limit, None);
        assert_eq!(ProductFilter::from_query(query).unwrap(), ProductFilter::default());
    }

    #[test]
    fn test_scalars_accept_text_or_numbers() {
        let query: ProductQuery = serde_json::from_value(serde_json::json!({
            "shopId": "3",
            "priceMin": 10,
            "priceMax": "99.5",
            "minRating": 4,
            "page": 2,
        }))
        .unwrap();
        assert_eq!(query.shop_id, Some(3));
        assert_eq!(query.price_min, Some(dec("10")));
        assert_eq!(query.price_max, Some(dec("99.5")));
        assert_eq!(query.min_rating, Some(4.0));
        assert_eq!(query.page, Some(2));

        let bad = serde_json::from_value::<ProductQuery>(serde_json::json!({ "shopId": "abc" }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = ProductQuery {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(ProductFilter::from_query(query).unwrap().search, None);
    }
}
