use serde::{Deserialize, Serialize};

pub type ProductId = u32;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub unit_price: u64,
    pub available_quantity: u32,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: u64, available_quantity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            available_quantity,
        }
    }

    pub fn is_sold_out(&self) -> bool {
        self.available_quantity == 0
    }
}

/// Products loaded at startup: (id, name, unit price, available quantity).
pub const SEED_PRODUCTS: &[(ProductId, &str, u64, u32)] = &[
    (1, "Mineral Water", 800, 20),
    (2, "Flavored Water", 1000, 12),
    (3, "Cola", 1000, 15),
    (4, "Orange Soda", 1200, 10),
    (5, "Iced Tea", 1300, 14),
    (6, "Cold Brew Coffee", 1500, 8),
    (7, "Orange Juice", 1300, 10),
    (8, "Energy Drink", 1500, 9),
    (9, "Sports Drink", 1400, 11),
    (10, "Chocolate Milk", 1600, 7),
    (11, "Potato Chips", 700, 18),
    (12, "Chocolate Bar", 1200, 16),
    (13, "Cookies", 800, 20),
    (14, "Mixed Nuts", 1500, 6),
    (15, "Yogurt", 1200, 10),
];

pub fn seed_products() -> Vec<Product> {
    SEED_PRODUCTS
        .iter()
        .map(|&(id, name, price, quantity)| Product::new(id, name, price, quantity))
        .collect()
}
