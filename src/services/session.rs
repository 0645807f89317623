use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    models::{
        cart::{Cart, CartLine},
        payment::{PaymentMethod, PurchaseSummary, Settlement},
        product::ProductId,
    },
    services::catalog::{Catalog, CatalogError},
};

/// Product id that ends the selection loop.
pub const FINISH_SENTINEL: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Selecting,
    ConfirmingContinue,
    Summarizing,
    Done,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Selecting => write!(f, "selecting"),
            SessionState::ConfirmingContinue => write!(f, "confirming continue"),
            SessionState::Summarizing => write!(f, "summarizing"),
            SessionState::Done => write!(f, "done"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    ProductId,
    Quantity,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputField::ProductId => write!(f, "product ID"),
            InputField::Quantity => write!(f, "quantity"),
        }
    }
}

/// Numeric input that breaks a purchase rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Product {product_id} does not exist. Please select an existing product.")]
    UnknownProduct { product_id: i64 },

    #[error("Quantity must be greater than zero. Please try again.")]
    NonPositiveQuantity { quantity: i64 },

    #[error("Quantity not available. Only {available} units left.")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid input '{input}'. Please enter a valid number for the {field}.")]
    InputFormat { field: InputField, input: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("An unexpected error occurred: cannot {action} while {state}")]
    OutOfOrder {
        action: &'static str,
        state: SessionState,
    },

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl SelectionError {
    pub fn is_recoverable_input(&self) -> bool {
        matches!(self, SelectionError::InputFormat { .. } | SelectionError::Validation(_))
    }
}

impl From<CatalogError> for SelectionError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => ValidationError::UnknownProduct {
                product_id: i64::from(id),
            }
            .into(),
        }
    }
}

/// Result of reading a product id while selecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductChoice {
    Finish,
    Product { id: ProductId, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Finished,
    Added(CartLine),
}

/// One customer's purchase, from the first selection to payment.
///
/// The session never owns the catalog; it borrows it for each operation that reads or
/// decrements stock, so a single catalog outlives any number of sessions.
#[derive(Debug)]
pub struct CartSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    customer: String,
    cart: Cart,
    state: SessionState,
}

impl CartSession {
    pub fn new(customer: impl Into<String>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            customer: customer.into(),
            cart: Cart::new(),
            state: SessionState::Selecting,
        };
        info!("Session {} started for '{}'", session.id, session.customer);
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn total_amount(&self) -> u64 {
        self.cart.total_amount()
    }

    /// Parses and checks a product id. Sentinel 0 moves the session to summarizing.
    pub fn choose_product(
        &mut self,
        catalog: &Catalog,
        raw_id: &str,
    ) -> Result<ProductChoice, SelectionError> {
        self.expect_state(SessionState::Selecting, "choose a product")?;

        let product_id = parse_number(raw_id, InputField::ProductId)?;
        if product_id == FINISH_SENTINEL {
            debug!("Session {} finished selecting", self.id);
            self.state = SessionState::Summarizing;
            return Ok(ProductChoice::Finish);
        }

        let product = ProductId::try_from(product_id)
            .map_err(|_| ValidationError::UnknownProduct { product_id })
            .and_then(|id| {
                catalog
                    .lookup(id)
                    .map_err(|_| ValidationError::UnknownProduct { product_id })
            })?;

        Ok(ProductChoice::Product {
            id: product.id,
            name: product.name.clone(),
        })
    }

    /// Validates a quantity for an already chosen product, merges it into the cart and
    /// takes it out of stock.
    pub fn add_to_cart(
        &mut self,
        catalog: &mut Catalog,
        product_id: ProductId,
        raw_quantity: &str,
    ) -> Result<CartLine, SelectionError> {
        self.expect_state(SessionState::Selecting, "add to the cart")?;

        let product = catalog.lookup(product_id)?.clone();
        let requested = parse_number(raw_quantity, InputField::Quantity)?;

        if requested <= 0 {
            return Err(ValidationError::NonPositiveQuantity {
                quantity: requested,
            }
            .into());
        }
        if requested > i64::from(product.available_quantity) {
            return Err(ValidationError::InsufficientStock {
                product_id,
                requested,
                available: product.available_quantity,
            }
            .into());
        }

        // Bounded by available_quantity above.
        let quantity = requested as u32;
        let line = self.cart.add(&product, quantity).clone();
        catalog.decrement_stock(product_id, quantity)?;

        info!(
            "Session {}: added {} x {} (line now {} for {})",
            self.id, quantity, product.name, line.quantity, line.subtotal
        );
        self.state = SessionState::ConfirmingContinue;
        Ok(line)
    }

    /// Runs a whole (product id, quantity) candidate through validation.
    pub fn select(
        &mut self,
        catalog: &mut Catalog,
        raw_id: &str,
        raw_quantity: &str,
    ) -> Result<SelectionOutcome, SelectionError> {
        match self.choose_product(catalog, raw_id)? {
            ProductChoice::Finish => Ok(SelectionOutcome::Finished),
            ProductChoice::Product { id, .. } => self
                .add_to_cart(catalog, id, raw_quantity)
                .map(SelectionOutcome::Added),
        }
    }

    /// `y` keeps selecting; `n` or anything else moves on to the summary.
    pub fn confirm_continue(&mut self, answer: &str) -> Result<SessionState, SelectionError> {
        self.expect_state(SessionState::ConfirmingContinue, "confirm")?;

        self.state = match answer.trim().to_lowercase().as_str() {
            "y" => SessionState::Selecting,
            _ => SessionState::Summarizing,
        };
        Ok(self.state)
    }

    /// Purchase summary, or `None` when nothing was bought.
    pub fn summary(&self) -> Option<PurchaseSummary> {
        let total_amount = self.cart.total_amount();
        if total_amount == 0 {
            return None;
        }

        Some(PurchaseSummary {
            session_id: self.id,
            started_at: self.started_at,
            customer: self.customer.clone(),
            lines: self.cart.lines().to_vec(),
            total_quantity: self.cart.total_quantity(),
            total_amount,
        })
    }

    /// Applies the chosen payment method to the session total and closes the session.
    pub fn settle(&mut self, payment_code: &str) -> Result<Settlement, SelectionError> {
        self.expect_state(SessionState::Summarizing, "settle payment")?;

        let summary = self.summary().ok_or_else(|| {
            SelectionError::Unexpected("there is nothing in the cart to pay for".to_string())
        })?;
        let settlement = summary.settle(PaymentMethod::from_code(payment_code));

        info!(
            "Session {} settled by {}: {} -> {:.2}",
            self.id, settlement.method, settlement.total_amount, settlement.final_amount
        );
        self.state = SessionState::Done;
        Ok(settlement)
    }

    /// Ends a session that had nothing to pay for.
    pub fn close(&mut self) -> Result<(), SelectionError> {
        self.expect_state(SessionState::Summarizing, "close")?;
        debug!("Session {} closed without a purchase", self.id);
        self.state = SessionState::Done;
        Ok(())
    }

    fn expect_state(
        &self,
        expected: SessionState,
        action: &'static str,
    ) -> Result<(), SelectionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SelectionError::OutOfOrder {
                action,
                state: self.state,
            })
        }
    }
}

fn parse_number(raw: &str, field: InputField) -> Result<i64, SelectionError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| SelectionError::InputFormat {
            field,
            input: raw.trim().to_string(),
        })
}
