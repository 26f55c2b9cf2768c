//! # Order Types
//!
//! Payment session request and result types.
//! Each value lives for a single request and is never persisted.

use crate::error::{PaymentError, PaymentResult};
use crate::money::{to_minor_units, Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A line item in an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// Product name shown on the hosted checkout page
    pub name: String,

    /// Unit price as a decimal currency amount (e.g. `29.99`)
    pub price: Decimal,

    /// Quantity
    pub quantity: u32,
}

impl OrderLineItem {
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Unit price in the smallest currency unit
    pub fn unit_amount(&self) -> PaymentResult<i64> {
        to_minor_units(self.price)
    }
}

/// Request to open a hosted checkout session for an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionRequest {
    /// Currency for every line item
    pub currency: Currency,

    /// Line items, in display order
    pub items: Vec<OrderLineItem>,

    /// Our order identifier, echoed back through the webhook metadata
    pub order_id: String,
}

impl PaymentSessionRequest {
    pub fn new(currency: Currency, order_id: impl Into<String>) -> Self {
        Self {
            currency,
            items: Vec::new(),
            order_id: order_id.into(),
        }
    }

    /// Add a line item (builder style)
    pub fn with_item(mut self, item: OrderLineItem) -> Self {
        self.items.push(item);
        self
    }

    /// Check the request before it is sent to the gateway
    pub fn validate(&self) -> PaymentResult<()> {
        if self.items.is_empty() {
            return Err(PaymentError::InvalidRequest(
                "Payment session requires at least one line item".to_string(),
            ));
        }

        if self.order_id.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "orderId must not be empty".to_string(),
            ));
        }

        for (i, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(PaymentError::InvalidRequest(format!(
                    "items[{}].name must not be empty",
                    i
                )));
            }
            if item.quantity == 0 {
                return Err(PaymentError::InvalidRequest(format!(
                    "items[{}].quantity must be at least 1",
                    i
                )));
            }
            item.unit_amount()?;
        }

        Ok(())
    }

    /// Total number of units across all items
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

/// URLs returned by the gateway for a created session.
///
/// The values are opaque and passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionResult {
    /// Where the customer lands after cancelling
    pub cancel_url: String,

    /// Where the customer lands after paying
    pub success_url: String,

    /// Hosted checkout page to redirect the customer to
    pub url: String,
}
