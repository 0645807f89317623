use serde::{Deserialize, Serialize};

use crate::models::product::{Product, ProductId};

/// One product's accumulated quantity and subtotal within a cart session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub subtotal: u64,
}

impl CartLine {
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            subtotal: product.unit_price * u64::from(quantity),
        }
    }

    /// Adds another purchase of the same product on top of what is already in the line.
    pub fn merge(&mut self, quantity: u32, subtotal: u64) {
        self.quantity += quantity;
        self.subtotal += subtotal;
    }
}

/// Cart lines keyed by product id, kept in the order each product was first added.
#[derive(Debug, Default, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `quantity` units of `product` into the cart and returns the resulting line.
    pub fn add(&mut self, product: &Product, quantity: u32) -> &CartLine {
        let subtotal = product.unit_price * u64::from(quantity);

        match self.lines.iter().position(|line| line.product_id == product.id) {
            Some(index) => {
                let line = &mut self.lines[index];
                line.merge(quantity, subtotal);
                &*line
            }
            None => {
                self.lines.push(CartLine::new(product, quantity));
                let last = self.lines.len() - 1;
                &self.lines[last]
            }
        }
    }

    pub fn get(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn total_amount(&self) -> u64 {
        self.lines.iter().map(|line| line.subtotal).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cola() -> Product {
        Product::new(3, "Cola", 1000, 15)
    }

    #[test]
    fn test_repeated_product_merges_into_one_line() {
        let mut cart = Cart::new();
        cart.add(&cola(), 2);
        cart.add(&cola(), 3);
        let line = cart.add(&cola(), 1).clone();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(line.quantity, 6);
        assert_eq!(line.subtotal, 6000);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&Product::new(11, "Potato Chips", 700, 18), 1);
        cart.add(&cola(), 1);
        cart.add(&Product::new(11, "Potato Chips", 700, 18), 2);

        let names: Vec<&str> = cart.lines().iter().map(|l| l.product_name.as_str()).collect();
        assert_eq!(names, vec!["Potato Chips", "Cola"]);
        assert_eq!(cart.get(11).map(|l| l.quantity), Some(3));
    }

    #[test]
    fn test_totals_are_sums_of_lines() {
        let mut cart = Cart::new();
        assert_eq!(cart.total_amount(), 0);

        cart.add(&cola(), 2);
        cart.add(&Product::new(1, "Mineral Water", 800, 20), 3);

        assert_eq!(cart.total_quantity(), 5);
        assert_eq!(cart.total_amount(), 2 * 1000 + 3 * 800);
        assert_eq!(
            cart.total_amount(),
            cart.lines().iter().map(|l| l.subtotal).sum::<u64>()
        );
    }
}
