//! Catalog CRUD over the shared gateway.
//!
//! These calls carry the session token like any other and a 401 here
//! expires the session the same way.

use tracing::debug;

use crate::api::{ApiError, Gateway};
use crate::models::{NewProduct, Product, ProductQuery};

#[derive(Clone)]
pub struct ProductService {
    gateway: Gateway,
}

impl ProductService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        let products: Vec<Product> = self.gateway.get("/products").await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    pub async fn get(&self, id: &str) -> Result<Product, ApiError> {
        self.gateway.get(&format!("/products/{}", id)).await
    }

    pub async fn create(&self, product: &NewProduct) -> Result<Product, ApiError> {
        product.validate().map_err(ApiError::Validation)?;
        self.gateway.post("/products", product).await
    }

    pub async fn update(&self, id: &str, product: &NewProduct) -> Result<Product, ApiError> {
        product.validate().map_err(ApiError::Validation)?;
        self.gateway.put(&format!("/products/{}", id), product).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        // The body, if any, is not needed
        let _: serde_json::Value = self.gateway.delete(&format!("/products/{}", id)).await?;
        debug!(id, "Deleted product");
        Ok(())
    }

    pub async fn search(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        self.gateway.get_with_query("/products/search", query).await
    }
}
