use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::fmt;

use crate::models::product::{ProductFilter, SortOrder as ModelSortOrder};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Browse a product catalog and shop from the terminal")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List products with optional sorting and filtering
    Browse {
        #[command(flatten)]
        listing: ListingArgs,
    },
    /// List product categories
    Categories,
    /// Show detailed information about a product
    Show {
        /// Product ID
        id: u64,
    },
    /// Start an interactive shopping session with a cart
    Shop {
        #[command(flatten)]
        listing: ListingArgs,
    },
}

#[derive(clap::Args, Clone, Default)]
pub struct ListingArgs {
    /// Sort order
    #[arg(short, long, default_value = "featured")]
    pub sort: SortOrder,
    /// Only show products in this category
    #[arg(short, long)]
    pub category: Option<String>,
    /// Minimum price
    #[arg(long)]
    pub min: Option<Decimal>,
    /// Maximum price
    #[arg(long)]
    pub max: Option<Decimal>,
}

impl ListingArgs {
    /// A blank `--category` means no category filter
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            category: self
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            min_price: self.min,
            max_price: self.max,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum SortOrder {
    #[default]
    Featured,
    PriceLowToHigh,
    PriceHighToLow,
    NameAToZ,
    NameZToA,
    Popularity,
}

impl From<SortOrder> for ModelSortOrder {
    fn from(sort: SortOrder) -> Self {
        match sort {
            SortOrder::Featured => ModelSortOrder::Featured,
            SortOrder::PriceLowToHigh => ModelSortOrder::PriceLowToHigh,
            SortOrder::PriceHighToLow => ModelSortOrder::PriceHighToLow,
            SortOrder::NameAToZ => ModelSortOrder::NameAToZ,
            SortOrder::NameZToA => ModelSortOrder::NameZToA,
            SortOrder::Popularity => ModelSortOrder::Popularity,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Featured => write!(f, "featured"),
            SortOrder::PriceLowToHigh => write!(f, "price-low-to-high"),
            SortOrder::PriceHighToLow => write!(f, "price-high-to-low"),
            SortOrder::NameAToZ => write!(f, "name-a-to-z"),
            SortOrder::NameZToA => write!(f, "name-z-to-a"),
            SortOrder::Popularity => write!(f, "popularity"),
        }
    }
}
