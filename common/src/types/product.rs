use serde::Deserialize;

use crate::utils::de;

/// A catalogue entry returned by a product search.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub image: Option<String>,
    pub url: String,
}
