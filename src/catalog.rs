use std::sync::Arc;

use tracing::{info, instrument};

use crate::api::{ApiError, StoreApi};
use crate::domain::Product;

/// Product listing as fetched when the shop view mounts.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    #[instrument(skip(api))]
    pub async fn load(api: &Arc<dyn StoreApi>) -> Result<Self, ApiError> {
        let products = api.list_products().await?;
        info!(count = products.len(), "Catalog loaded");
        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Case-insensitive substring match on the product name. An empty keyword
    /// matches every product.
    pub fn search(&self, keyword: &str) -> Vec<&Product> {
        let keyword = keyword.trim().to_lowercase();
        self.products
            .iter()
            .filter(|product| keyword.is_empty() || product.name.to_lowercase().contains(&keyword))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn into_products(self) -> Vec<Product> {
        self.products
    }
}
