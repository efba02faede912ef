use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::product::Product;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog request failed for {url}: {message}")]
    Request { url: String, message: String },
    #[error("Catalog returned status {code} for {url}")]
    Status { url: String, code: u16 },
    #[error("Product {id} not found")]
    NotFound { id: u64 },
    #[error("Failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Catalog worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Read-only access to the product catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError>;
    async fn fetch_product(&self, id: u64) -> Result<Product, CatalogError>;
    async fn fetch_categories(&self) -> Result<Vec<String>, CatalogError>;
}

/// Catalog backed by a Fake Store style REST API
pub struct HttpCatalog {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent("storefront-cli")
            .build();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ureq blocks, so every call runs on the blocking pool
    async fn get_body(&self, path: &str) -> Result<String, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        let agent = self.agent.clone();
        debug!("GET {}", url);

        tokio::task::spawn_blocking(move || {
            let request_error = |message: String| CatalogError::Request {
                url: url.clone(),
                message,
            };

            let response = match agent.get(&url).set("Accept", "application/json").call() {
                Ok(response) => response,
                Err(ureq::Error::Status(code, _)) => {
                    return Err(CatalogError::Status {
                        url: url.clone(),
                        code,
                    });
                }
                Err(err) => return Err(request_error(err.to_string())),
            };

            response
                .into_string()
                .map_err(|err| request_error(err.to_string()))
        })
        .await?
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let body = self.get_body(path).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let products: Vec<Product> = self.get_json("/products").await?;
        info!("Fetched {} products from catalog", products.len());
        Ok(products)
    }

    async fn fetch_product(&self, id: u64) -> Result<Product, CatalogError> {
        let body = match self.get_body(&format!("/products/{}", id)).await {
            Ok(body) => body,
            Err(CatalogError::Status { code: 404, .. }) => {
                return Err(CatalogError::NotFound { id });
            }
            Err(e) => return Err(e),
        };

        parse_product(&body, id)
    }

    async fn fetch_categories(&self) -> Result<Vec<String>, CatalogError> {
        let categories: Vec<String> = self.get_json("/products/categories").await?;
        debug!("Fetched {} categories", categories.len());
        Ok(categories)
    }
}

// The API answers an unknown id with 200 and an empty body
fn parse_product(body: &str, id: u64) -> Result<Product, CatalogError> {
    let body = body.trim();
    if body.is_empty() || body == "null" {
        return Err(CatalogError::NotFound { id });
    }
    Ok(serde_json::from_str(body)?)
}
