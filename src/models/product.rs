use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}

/// A catalog entry as served by the products API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    pub id: u64,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: Rating,
}

impl Product {
    /// The cart identifies products by title.
    pub fn cart_key(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Featured,
    PriceLowToHigh,
    PriceHighToLow,
    NameAToZ,
    NameZToA,
    Popularity,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Featured => write!(f, "featured"),
            SortOrder::PriceLowToHigh => write!(f, "price: low to high"),
            SortOrder::PriceHighToLow => write!(f, "price: high to low"),
            SortOrder::NameAToZ => write!(f, "name: A to Z"),
            SortOrder::NameZToA => write!(f, "name: Z to A"),
            SortOrder::Popularity => write!(f, "popularity"),
        }
    }
}

impl SortOrder {
    /// Sorts in place. `Featured` keeps the order the API returned.
    pub fn apply(&self, products: &mut [Product]) {
        match self {
            SortOrder::Featured => {}
            SortOrder::PriceLowToHigh => products.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceHighToLow => products.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::NameAToZ => products.sort_by(|a, b| compare_titles(&a.title, &b.title)),
            SortOrder::NameZToA => products.sort_by(|a, b| compare_titles(&b.title, &a.title)),
            SortOrder::Popularity => {
                products.sort_by(|a, b| b.rating.rate.total_cmp(&a.rating.rate))
            }
        }
    }
}

// Case-insensitive, with byte order only breaking ties
fn compare_titles(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// Product filter for catalog queries
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_price_range"))]
pub struct ProductFilter {
    #[validate(length(min = 1, message = "Category must not be empty"))]
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

fn validate_price_range(filter: &ProductFilter) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (filter.effective_min(), filter.effective_max()) {
        if min > max {
            return Err(ValidationError::new("Minimum price exceeds maximum price"));
        }
    }
    Ok(())
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: String) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_min_price(mut self, min: Decimal) -> Self {
        self.min_price = Some(min);
        self
    }

    pub fn with_max_price(mut self, max: Decimal) -> Self {
        self.max_price = Some(max);
        self
    }

    // A zero bound means "no bound"
    fn effective_min(&self) -> Option<Decimal> {
        self.min_price.filter(|p| !p.is_zero())
    }

    fn effective_max(&self) -> Option<Decimal> {
        self.max_price.filter(|p| !p.is_zero())
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.effective_min().is_none() && self.effective_max().is_none()
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(ref category) = self.category {
            if &product.category != category {
                return false;
            }
        }

        if let Some(min) = self.effective_min() {
            if product.price < min {
                return false;
            }
        }

        if let Some(max) = self.effective_max() {
            if product.price > max {
                return false;
            }
        }

        true
    }
}
