//! Product CRUD on top of [`VendRequest`]

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};
use crate::product::{Product, ProductEnvelope, ProductList};
use crate::request::VendRequest;

const PRODUCTS_PATH: &str = "/api/products";

/// Resource client for one store.
#[derive(Debug, Clone)]
pub struct VendApi {
    request: VendRequest,
}

impl VendApi {
    pub fn new(request: VendRequest) -> Self {
        Self { request }
    }

    pub fn request(&self) -> &VendRequest {
        &self.request
    }

    /// List every product in the store.
    pub async fn products(&self) -> Result<Vec<Product>> {
        let body = self.request.get(PRODUCTS_PATH).await?;
        let list: ProductList = decode(&body)?;
        debug!(count = list.products.len(), "fetched products");
        Ok(list.products)
    }

    /// Load a single product by id.
    pub async fn product(&self, id: &str) -> Result<Product> {
        let body = self
            .request
            .get(&format!("{PRODUCTS_PATH}/{id}"))
            .await?;
        let list: ProductList = decode(&body)?;
        list.products
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("product {id}")))
    }

    /// Create or update a product.
    ///
    /// Vend upserts on `POST /api/products`; the returned record carries
    /// the id it assigned.
    pub async fn save_product(&self, product: &Product) -> Result<Product> {
        let body = self.request.post_json(PRODUCTS_PATH, product).await?;
        let envelope: ProductEnvelope = decode(&body)?;
        debug!(id = envelope.product.id.as_deref().unwrap_or(""), "saved product");
        Ok(envelope.product)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::Decode(e.to_string()))
}
