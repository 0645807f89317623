use console::style;
use rust_decimal::Decimal;
use tabled::{settings::{Alignment, Style}, Table, Tabled};

use crate::models::{cart::CartLine, product::Product};

#[derive(Tabled)]
struct CatalogTableRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: u64,
    #[tabled(rename = "Available Quantity")]
    available: u32,
}

#[derive(Tabled)]
struct SummaryTableRow {
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Quantity")]
    quantity: u32,
    #[tabled(rename = "Accumulated Value")]
    subtotal: u64,
}

pub fn format_catalog_table<'a>(products: impl IntoIterator<Item = &'a Product>) -> String {
    let rows: Vec<CatalogTableRow> = products
        .into_iter()
        .map(|product| CatalogTableRow {
            id: product.id,
            name: product.name.clone(),
            price: product.unit_price,
            available: product.available_quantity,
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded()).with(Alignment::left());
    table.to_string()
}

pub fn format_summary_table(lines: &[CartLine]) -> String {
    if lines.is_empty() {
        return String::new();
    }

    let rows: Vec<SummaryTableRow> = lines
        .iter()
        .map(|line| SummaryTableRow {
            product: line.product_name.clone(),
            quantity: line.quantity,
            subtotal: line.subtotal,
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded()).with(Alignment::left());
    table.to_string()
}

/// Whole-unit amount with its currency label, e.g. `2400 CLP`.
pub fn format_amount(amount: u64, currency: &str) -> String {
    format!("{} {}", amount, currency)
}

/// Two-decimal amount with its currency label, e.g. `970.00 CLP`.
pub fn format_decimal_amount(amount: Decimal, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

pub fn format_heading(text: &str) -> String {
    style(text).bold().cyan().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_table_has_headers_and_rows() {
        let products = vec![
            Product::new(1, "Mineral Water", 800, 20),
            Product::new(2, "Flavored Water", 1000, 12),
        ];
        let table = format_catalog_table(&products);

        for header in ["ID", "Name", "Price", "Available Quantity"] {
            assert!(table.contains(header), "missing header {header}");
        }
        assert!(table.contains("Flavored Water"));
        assert!(table.contains("1000"));
    }

    #[test]
    fn test_summary_table() {
        let lines = vec![CartLine {
            product_id: 3,
            product_name: "Cola".to_string(),
            quantity: 4,
            subtotal: 4000,
        }];
        let table = format_summary_table(&lines);

        assert!(table.contains("Accumulated Value"));
        assert!(table.contains("Cola"));
        assert!(table.contains("4000"));
        assert!(format_summary_table(&[]).is_empty());
    }

    #[test]
    fn test_amounts() {
        assert_eq!(format_amount(2400, "CLP"), "2400 CLP");
        assert_eq!(format_decimal_amount(Decimal::new(970, 0), "CLP"), "970.00 CLP");
        assert_eq!(format_decimal_amount(Decimal::new(129301, 2), "USD"), "1293.01 USD");
    }
}
