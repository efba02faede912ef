use std::sync::Arc;
use anyhow::{Context, Result};
use console::{style, Emoji};
use dialoguer::{Input, Select, Confirm, theme::ColorfulTheme};

use tracing::{error, info};

use crate::{
    catalog::HttpCatalog,
    cli::{
        args::*,
        session::{CartAction, CartEvent, MenuChoice, ShopSession},
    },
    models::product::SortOrder as ModelSortOrder,
    services::{CatalogService, CatalogServiceError},
    utils::{
        formatting::{format_cart, format_money, format_product_detail, format_product_table, format_receipt, format_total},
        Config,
    },
};

static CHECKMARK: Emoji<'_, '_> = Emoji("✅ ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️ ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️ ", "");
static CART: Emoji<'_, '_> = Emoji("🛒 ", "");
static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");

pub struct CliApp {
    catalog_service: Arc<CatalogService>,
    currency: String,
}

impl CliApp {
    pub fn new(config: &Config) -> Result<Self> {
        config
            .validate()
            .context("Invalid catalog configuration")?;

        let catalog = Arc::new(HttpCatalog::new(&config.catalog_url, config.catalog_timeout()));
        info!("Using catalog at {}", catalog.base_url());
        let catalog_service = Arc::new(CatalogService::new(catalog));

        Ok(Self {
            catalog_service,
            currency: config.currency_symbol.clone(),
        })
    }

    pub async fn run(&self, args: Args) -> Result<()> {
        match args.command {
            Commands::Browse { listing } => self.handle_browse(listing).await,
            Commands::Categories => self.handle_categories().await,
            Commands::Show { id } => self.handle_show(id).await,
            Commands::Shop { listing } => self.handle_shop(listing).await,
        }
    }

    async fn handle_browse(&self, listing: ListingArgs) -> Result<()> {
        let sort = ModelSortOrder::from(listing.sort);

        match self.catalog_service.browse(sort, listing.filter()).await {
            Ok(products) => {
                if products.is_empty() {
                    println!("{} No products match your filters", INFO);
                } else {
                    println!(
                        "{} {}",
                        INFO,
                        style(format!("Found {} products (sorted by {})", products.len(), sort)).bold()
                    );
                    println!("{}", format_product_table(&products, &self.currency));
                }
            }
            Err(e) => {
                println!("{} Failed to list products: {}", CROSS, style(&e).red());
                error!("Failed to list products: {}", e);
            }
        }

        Ok(())
    }

    async fn handle_categories(&self) -> Result<()> {
        match self.catalog_service.categories().await {
            Ok(categories) => {
                println!("{} {}", INFO, style("Categories").bold().cyan());
                for category in categories {
                    println!("  • {}", style(category).green());
                }
            }
            Err(e) => {
                println!("{} Failed to list categories: {}", CROSS, style(&e).red());
                error!("Failed to list categories: {}", e);
            }
        }

        Ok(())
    }

    async fn handle_show(&self, id: u64) -> Result<()> {
        match self.catalog_service.product(id).await {
            Ok(product) => {
                println!("{} {}", INFO, style("Product Details").bold().cyan());
                println!("{}", format_product_detail(&product, &self.currency));
            }
            Err(CatalogServiceError::ProductNotFound { id }) => {
                println!("{} No product with ID {}", WARNING, style(id).yellow());
            }
            Err(e) => {
                println!("{} Failed to get product: {}", CROSS, style(&e).red());
                error!("Failed to get product {}: {}", id, e);
            }
        }

        Ok(())
    }

    async fn handle_shop(&self, listing: ListingArgs) -> Result<()> {
        println!("{} {}", ROCKET, style("Storefront").bold().cyan());

        let products = match self
            .catalog_service
            .browse(listing.sort.into(), listing.filter())
            .await
        {
            Ok(products) => products,
            Err(e) => {
                println!("{} Failed to load the catalog: {}", CROSS, style(&e).red());
                error!("Failed to load catalog for shop session: {}", e);
                return Ok(());
            }
        };

        if products.is_empty() {
            println!("{} No products to shop for with these filters", WARNING);
        } else {
            println!("{}", format_product_table(&products, &self.currency));
        }

        let mut session = ShopSession::new(products);
        info!("Shop session started with {} products", session.products().len());

        let theme = ColorfulTheme::default();
        loop {
            let choices = session.menu();
            let picked = Select::with_theme(&theme)
                .with_prompt(format!("{}{} in cart", CART, session.cart().item_count()))
                .items(&choices)
                .default(0)
                .interact()
                .context("Failed to read menu selection")?;

            let action = match choices[picked] {
                MenuChoice::AddProduct => self.prompt_add(&theme, &session)?,
                MenuChoice::ChangeQuantity => self.prompt_quantity(&theme, &session)?,
                MenuChoice::RemoveItem => self.prompt_remove(&theme, &session)?,
                MenuChoice::ViewCart => {
                    println!("{}", format_cart(&session.cart().snapshot(), &self.currency));
                    None
                }
                MenuChoice::Checkout => self.prompt_checkout(&theme, &session)?,
                MenuChoice::Quit => break,
            };

            if let Some(action) = action {
                self.apply(&mut session, action);
            }
        }

        if !session.cart().is_empty() {
            println!(
                "{} Leaving with {} items in the cart; they are not saved",
                WARNING,
                session.cart().item_count()
            );
        }
        info!("Shop session ended");
        Ok(())
    }

    fn apply(&self, session: &mut ShopSession, action: CartAction) {
        match session.dispatch(action) {
            Ok(CartEvent::Updated(snapshot)) => {
                println!("{} Cart updated", CHECKMARK);
                println!("{}", format_total(snapshot.total_price, &self.currency));
            }
            Ok(CartEvent::CheckedOut(receipt)) => {
                println!("{} Your purchase was successful!", CHECKMARK);
                println!("{}", format_receipt(&receipt, &self.currency));
            }
            Err(e) => {
                // stale view: redraw from the cart itself
                println!("{} {}", CROSS, style(&e).red());
                println!("{}", format_cart(&session.cart().snapshot(), &self.currency));
            }
        }
    }

    fn prompt_add(&self, theme: &ColorfulTheme, session: &ShopSession) -> Result<Option<CartAction>> {
        let labels: Vec<String> = session
            .products()
            .iter()
            .map(|p| format!("{} - {}", p.title, format_money(p.price, &self.currency)))
            .collect();

        let picked = Select::with_theme(theme)
            .with_prompt("Which product?")
            .items(&labels)
            .default(0)
            .interact_opt()
            .context("Failed to read product selection")?;

        Ok(picked.map(|i| CartAction::add(&session.products()[i])))
    }

    fn prompt_line_item(&self, theme: &ColorfulTheme, session: &ShopSession, prompt: &str) -> Result<Option<usize>> {
        let labels: Vec<String> = session
            .cart()
            .line_items()
            .iter()
            .map(|item| format!("{} x {} - {}", item.product_key, item.quantity, format_money(item.subtotal(), &self.currency)))
            .collect();

        Select::with_theme(theme)
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact_opt()
            .context("Failed to read cart item selection")
    }

    fn prompt_quantity(&self, theme: &ColorfulTheme, session: &ShopSession) -> Result<Option<CartAction>> {
        let Some(i) = self.prompt_line_item(theme, session, "Change which item?")? else {
            return Ok(None);
        };
        let item = &session.cart().line_items()[i];

        let quantity: u32 = Input::with_theme(theme)
            .with_prompt(format!("Quantity for {}", item.product_key))
            .default(item.quantity)
            .validate_with(|input: &u32| -> Result<(), &str> {
                if *input < 1 {
                    Err("Quantity must be at least 1")
                } else {
                    Ok(())
                }
            })
            .interact_text()
            .context("Failed to read quantity")?;

        Ok(Some(CartAction::SetQuantity {
            product_key: item.product_key.clone(),
            quantity,
        }))
    }

    fn prompt_remove(&self, theme: &ColorfulTheme, session: &ShopSession) -> Result<Option<CartAction>> {
        let picked = self.prompt_line_item(theme, session, "Remove which item?")?;
        Ok(picked.map(|i| CartAction::Remove {
            product_key: session.cart().line_items()[i].product_key.clone(),
        }))
    }

    fn prompt_checkout(&self, theme: &ColorfulTheme, session: &ShopSession) -> Result<Option<CartAction>> {
        println!("{}", format_cart(&session.cart().snapshot(), &self.currency));

        let confirm = Confirm::with_theme(theme)
            .with_prompt("Place this order?")
            .default(true)
            .interact()
            .context("Failed to read checkout confirmation")?;

        if !confirm {
            println!("Checkout cancelled");
            return Ok(None);
        }
        Ok(Some(CartAction::Checkout))
    }
}
