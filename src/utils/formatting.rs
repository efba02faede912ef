use chrono::{DateTime, Local, Utc};
use console::style;
use rust_decimal::{Decimal, RoundingStrategy};
use tabled::{Table, Tabled, settings::{Style, Alignment}};

use crate::models::{
    cart::{CartSnapshot, CheckoutReceipt, LineItem},
    product::Product,
};

#[derive(Tabled)]
struct ProductTableRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Rating")]
    rating: String,
}

#[derive(Tabled)]
struct CartTableRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Unit Price")]
    unit_price: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Subtotal")]
    subtotal: String,
}

/// Two decimal places, rounded half away from zero
pub fn format_money(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{:.2}", symbol, rounded)
}

pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

pub fn format_product_table(products: &[Product], symbol: &str) -> String {
    if products.is_empty() {
        return String::new();
    }

    let rows: Vec<ProductTableRow> = products
        .iter()
        .map(|product| ProductTableRow {
            id: product.id,
            title: truncate(&product.title, 40),
            category: product.category.clone(),
            price: format_money(product.price, symbol),
            rating: format!("{:.1} ({})", product.rating.rate, product.rating.count),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Alignment::left());

    table.to_string()
}

pub fn format_product_detail(product: &Product, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}: {}\n", style("ID").bold(), style(product.id).cyan()));
    output.push_str(&format!("{}: {}\n", style("Title").bold(), style(&product.title).green()));
    output.push_str(&format!("{}: {}\n", style("Category").bold(), product.category));
    output.push_str(&format!(
        "{}: {}\n",
        style("Price").bold(),
        style(format_money(product.price, symbol)).yellow()
    ));
    output.push_str(&format!(
        "{}: {:.1} from {} reviews\n",
        style("Rating").bold(),
        product.rating.rate,
        product.rating.count
    ));

    if !product.description.is_empty() {
        output.push_str(&format!("{}: {}\n", style("Description").bold(), style(&product.description).dim()));
    }

    if !product.image.is_empty() {
        output.push_str(&format!("{}: {}\n", style("Image").bold(), style(&product.image).dim()));
    }

    output
}

fn cart_rows(items: &[LineItem], symbol: &str) -> Vec<CartTableRow> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| CartTableRow {
            position: i + 1,
            product: truncate(&item.product_key, 40),
            unit_price: format_money(item.unit_price, symbol),
            quantity: item.quantity,
            subtotal: format_money(item.subtotal(), symbol),
        })
        .collect()
}

pub fn format_cart(snapshot: &CartSnapshot, symbol: &str) -> String {
    if snapshot.is_empty() {
        return format!("{}\n", style("Your cart is empty").dim());
    }

    let mut table = Table::new(cart_rows(&snapshot.items, symbol));
    table
        .with(Style::rounded())
        .with(Alignment::left());

    format!(
        "{}\n{}: {} items ({} units)\n{}\n",
        table,
        style("Cart").bold(),
        snapshot.item_count,
        snapshot.total_units,
        format_total(snapshot.total_price, symbol)
    )
}

pub fn format_total(total: Decimal, symbol: &str) -> String {
    format!("{}: {}", style("Total").bold(), style(format_money(total, symbol)).green())
}

pub fn format_receipt(receipt: &CheckoutReceipt, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}: {}\n", style("Order").bold(), style(receipt.order_id).cyan()));
    output.push_str(&format!(
        "{}: {}\n",
        style("Purchased").bold(),
        style(format_date(&receipt.purchased_at)).dim()
    ));

    if !receipt.is_empty() {
        let mut table = Table::new(cart_rows(&receipt.items, symbol));
        table.with(Style::rounded()).with(Alignment::left());
        output.push_str(&format!("{}\n", table));
    }

    output.push_str(&format!("{}\n", format_total(receipt.total_price, symbol)));
    output
}

pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::Rating;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_money_pads_and_rounds() {
        assert_eq!(format_money(dec!(20), "$"), "$20.00");
        assert_eq!(format_money(dec!(109.95), "$"), "$109.95");
        assert_eq!(format_money(dec!(0.005), "€"), "€0.01");
        assert_eq!(format_money(dec!(70.000), "$"), "$70.00");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_empty_cart_message() {
        let output = format_cart(&CartSnapshot::default(), "$");
        assert!(output.contains("Your cart is empty"));
    }

    #[test]
    fn test_cart_table_lists_items_and_total() {
        let snapshot = CartSnapshot {
            items: vec![LineItem {
                product_key: "Shirt".to_string(),
                unit_price: dec!(20),
                quantity: 3,
            }],
            item_count: 1,
            total_units: 3,
            total_price: dec!(60),
        };

        let output = format_cart(&snapshot, "$");
        assert!(output.contains("Shirt"));
        assert!(output.contains("$60.00"));
    }

    #[test]
    fn test_product_table_is_empty_for_no_products() {
        assert!(format_product_table(&[], "$").is_empty());

        let product = Product {
            id: 5,
            title: "Gold Ring".to_string(),
            price: dec!(168),
            description: String::new(),
            category: "jewelery".to_string(),
            image: String::new(),
            rating: Rating { rate: 3.9, count: 70 },
        };
        let table = format_product_table(&[product], "$");
        assert!(table.contains("Gold Ring"));
        assert!(table.contains("$168.00"));
    }
}
