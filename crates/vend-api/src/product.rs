//! Product records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Vend product.
///
/// Only the commonly edited fields are named. Everything else Vend returns
/// is kept in `extra` and sent back unchanged on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Assigned by Vend on first save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retail_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// True once Vend has assigned an id.
    pub fn is_saved(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// `{"products": [...]}` envelope returned by list and load.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductList {
    #[serde(default)]
    pub products: Vec<Product>,
}

/// `{"product": {...}}` envelope returned by save.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
    pub product: Product,
}
