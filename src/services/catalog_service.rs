use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};
use validator::Validate;

use crate::{
    catalog::{CatalogError, CatalogSource},
    models::product::{Product, ProductFilter, SortOrder},
};

#[derive(Error, Debug)]
pub enum CatalogServiceError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Product {id} not found")]
    ProductNotFound { id: u64 },

    #[error("Catalog error: {0}")]
    CatalogError(#[from] CatalogError),
}

pub struct CatalogService {
    catalog: Arc<dyn CatalogSource>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self { catalog }
    }

    /// Fetch the product list, then filter and sort it locally
    pub async fn browse(
        &self,
        sort: SortOrder,
        filter: ProductFilter,
    ) -> Result<Vec<Product>, CatalogServiceError> {
        debug!("Browsing catalog sorted by {} with filter: {:?}", sort, filter);

        filter
            .validate()
            .map_err(|e| CatalogServiceError::ValidationError {
                message: format!("Invalid product filter: {}", e),
            })?;

        let mut products = self.catalog.fetch_products().await.map_err(|e| {
            error!("Failed to fetch products: {}", e);
            CatalogServiceError::CatalogError(e)
        })?;

        if !filter.is_empty() {
            products.retain(|product| filter.matches(product));
        }
        sort.apply(&mut products);

        debug!("Browse returned {} products", products.len());
        Ok(products)
    }

    pub async fn categories(&self) -> Result<Vec<String>, CatalogServiceError> {
        let categories = self.catalog.fetch_categories().await.map_err(|e| {
            error!("Failed to fetch categories: {}", e);
            CatalogServiceError::CatalogError(e)
        })?;

        debug!("Retrieved {} categories", categories.len());
        Ok(categories)
    }

    pub async fn product(&self, id: u64) -> Result<Product, CatalogServiceError> {
        info!("Fetching details for product {}", id);

        self.catalog.fetch_product(id).await.map_err(|e| match e {
            CatalogError::NotFound { id } => CatalogServiceError::ProductNotFound { id },
            other => {
                error!("Failed to fetch product {}: {}", id, other);
                CatalogServiceError::CatalogError(other)
            }
        })
    }
}
