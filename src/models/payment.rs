use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::cart::CartLine;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Debit,
    Credit,
}

impl PaymentMethod {
    pub const DEBIT_CODE: &'static str = "1";
    pub const CREDIT_CODE: &'static str = "2";

    /// Any code other than the credit one pays by debit.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            Self::CREDIT_CODE => PaymentMethod::Credit,
            _ => PaymentMethod::Debit,
        }
    }

    /// Multiplier applied to the purchase total, `None` when the method pays full price.
    pub fn discount_factor(&self) -> Option<Decimal> {
        match self {
            PaymentMethod::Debit => None,
            // 3% off
            PaymentMethod::Credit => Some(Decimal::new(97, 2)),
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Debit
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Debit => write!(f, "debit"),
            PaymentMethod::Credit => write!(f, "credit"),
        }
    }
}

/// What the customer bought in one session, in the order products were first picked.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PurchaseSummary {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub customer: String,
    pub lines: Vec<CartLine>,
    pub total_quantity: u64,
    pub total_amount: u64,
}

impl PurchaseSummary {
    /// Applies the payment method to the whole purchase total.
    pub fn settle(&self, method: PaymentMethod) -> Settlement {
        let total = Decimal::from(self.total_amount);

        match method.discount_factor() {
            Some(factor) => {
                let final_amount = (total * factor).round_dp(2);
                Settlement {
                    method,
                    total_amount: self.total_amount,
                    discount: Some(total - final_amount),
                    final_amount,
                }
            }
            None => Settlement {
                method,
                total_amount: self.total_amount,
                discount: None,
                final_amount: total,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub method: PaymentMethod,
    pub total_amount: u64,
    pub discount: Option<Decimal>,
    pub final_amount: Decimal,
}

impl Settlement {
    pub fn is_discounted(&self) -> bool {
        self.discount.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_with_total(total_amount: u64) -> PurchaseSummary {
        PurchaseSummary {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            customer: "Ana".to_string(),
            lines: Vec::new(),
            total_quantity: 1,
            total_amount,
        }
    }

    #[test]
    fn test_payment_codes() {
        assert_eq!(PaymentMethod::from_code("1"), PaymentMethod::Debit);
        assert_eq!(PaymentMethod::from_code(" 2 "), PaymentMethod::Credit);
        assert_eq!(PaymentMethod::from_code("cash"), PaymentMethod::Debit);
        assert_eq!(PaymentMethod::from_code(""), PaymentMethod::Debit);
    }

    #[test]
    fn test_credit_takes_three_percent_off() {
        let settlement = summary_with_total(1000).settle(PaymentMethod::Credit);

        assert!(settlement.is_discounted());
        assert_eq!(settlement.final_amount, Decimal::new(97000, 2));
        assert_eq!(format!("{:.2}", settlement.final_amount), "970.00");
        assert_eq!(settlement.discount, Some(Decimal::new(3000, 2)));
    }

    #[test]
    fn test_credit_rounds_to_cents() {
        // 1333 * 0.97 = 1293.01
        let settlement = summary_with_total(1333).settle(PaymentMethod::Credit);
        assert_eq!(format!("{:.2}", settlement.final_amount), "1293.01");
    }

    #[test]
    fn test_debit_leaves_total_unchanged() {
        let settlement = summary_with_total(4200).settle(PaymentMethod::Debit);

        assert!(!settlement.is_discounted());
        assert_eq!(settlement.final_amount, Decimal::from(4200u64));
        assert_eq!(settlement.total_amount, 4200);
    }
}
