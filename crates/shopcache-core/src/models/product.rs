use std::collections::HashSet;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub price: f64,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// One fetched catalog, in server order.
///
/// Holds the JSON array exactly as the server sent it next to the typed
/// products parsed from it. Serialization writes the original array back
/// out, so a cached snapshot keeps integer prices, explicit nulls and any
/// fields (nested ones included) that `Product` does not model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    raw: Vec<Value>,
    products: Vec<Product>,
}

impl CatalogSnapshot {
    /// Parse a response body. Fails unless it is an array of products.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        Self::from_values(serde_json::from_str(body)?)
    }

    fn from_values(raw: Vec<Value>) -> Result<Self, serde_json::Error> {
        let products = raw
            .iter()
            .map(|value| Product::deserialize(value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { raw, products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn into_products(self) -> Vec<Product> {
        self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Serialize for CatalogSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CatalogSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<Value>::deserialize(deserializer)?;
        Self::from_values(raw).map_err(de::Error::custom)
    }
}

impl Product {
    /// Price with two decimals, e.g. `$19.99`
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }

    pub fn display_rating(&self) -> Option<String> {
        self.rating
            .as_ref()
            .map(|r| format!("{:.1} / 5 ({} reviews)", r.rate, r.count))
    }
}

/// Ids that appear more than once in a snapshot, in first-seen order.
pub fn duplicate_ids(products: &[Product]) -> Vec<i64> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for p in products {
        if !seen.insert(p.id) && !dups.contains(&p.id) {
            dups.push(p.id);
        }
    }
    dups
}
