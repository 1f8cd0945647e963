//! Cart, session credit and checkout.
//!
//! The cart holds order lines for one venue visit. Checkout settles the cart
//! against a prepaid [`CreditAccount`] after a simulated backend round trip and
//! hands back a [`Receipt`].

use crate::{
    core::{
        clock::Clock,
        pricing::{CartSummary, PricingRates, price_cart},
    },
    config::settings::CheckoutSettings,
    errors::{Error, Result},
    models::{LiveOrder, MenuItem, OrderItem, OrderStatus},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Order lines collected before checkout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<OrderItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Adds one unit of `menu_item`, merging into an existing line with the same id.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] if the item's price is negative or not finite.
    pub fn add(&mut self, menu_item: &MenuItem) -> Result<()> {
        if !menu_item.price.is_finite() || menu_item.price < 0.0 {
            return Err(Error::InvalidAmount {
                amount: menu_item.price,
            });
        }

        if let Some(line) = self.items.iter_mut().find(|item| item.id == menu_item.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.items.push(OrderItem::from(menu_item));
        }
        debug!("Added {} to cart", menu_item.name);
        Ok(())
    }

    /// Adds one unit to an existing line.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the item is not in the cart.
    pub fn increment(&mut self, item_id: i64) -> Result<()> {
        let line = self.line_mut(item_id)?;
        line.quantity = line.quantity.saturating_add(1);
        Ok(())
    }

    /// Removes one unit from a line, never going below 1.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the item is not in the cart.
    pub fn decrement(&mut self, item_id: i64) -> Result<()> {
        let line = self.line_mut(item_id)?;
        line.quantity = line.quantity.saturating_sub(1).max(1);
        Ok(())
    }

    /// Drops a whole line from the cart.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the item is not in the cart.
    pub fn remove(&mut self, item_id: i64) -> Result<OrderItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == item_id)
            .ok_or_else(|| not_in_cart(item_id))?;
        Ok(self.items.remove(index))
    }

    /// Sets or clears the free-text note on a line. Blank notes clear it.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the item is not in the cart.
    pub fn set_note(&mut self, item_id: i64, note: Option<String>) -> Result<()> {
        let line = self.line_mut(item_id)?;
        line.note = note
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Prices the cart against the available credit.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] if a rate is negative or not finite.
    pub fn summary(&self, credit: f64, rates: &PricingRates) -> Result<CartSummary> {
        price_cart(&self.items, credit, rates)
    }

    fn line_mut(&mut self, item_id: i64) -> Result<&mut OrderItem> {
        self.items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| not_in_cart(item_id))
    }
}

fn not_in_cart(item_id: i64) -> Error {
    Error::validation(format!("item {item_id} is not in the cart"))
}

/// Prepaid balance for the current session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreditAccount {
    balance: f64,
}

impl CreditAccount {
    /// Opens an account with a starting balance.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] if the balance is negative or not finite.
    pub fn new(balance: f64) -> Result<Self> {
        if !balance.is_finite() || balance < 0.0 {
            return Err(Error::InvalidAmount { amount: balance });
        }
        Ok(Self { balance })
    }

    /// Opens an account with the configured starting credit.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] if `starting_credit` is negative or not finite.
    pub fn from_settings(settings: &CheckoutSettings) -> Result<Self> {
        Self::new(settings.starting_credit)
    }

    #[must_use]
    pub const fn balance(&self) -> f64 {
        self.balance
    }

    /// Adds credit and returns the new balance.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] unless `amount` is positive and finite.
    pub fn top_up(&mut self, amount: f64) -> Result<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount { amount });
        }
        self.balance += amount;
        Ok(self.balance)
    }

    /// Deducts `amount` and returns the remaining balance.
    ///
    /// # Errors
    /// - [`Error::InvalidAmount`] if `amount` is negative or not finite
    /// - [`Error::InsufficientCredit`] when the balance does not cover `amount`
    pub fn charge(&mut self, amount: f64) -> Result<f64> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount { amount });
        }
        if amount > self.balance {
            return Err(Error::InsufficientCredit {
                available: self.balance,
                required: amount,
            });
        }
        self.balance -= amount;
        Ok(self.balance)
    }
}

/// Proof of a settled order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Display number ("ORD-1760700000000")
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub service_fee: f64,
    pub total: f64,
    /// Credit left after paying
    pub remaining_credit: f64,
    pub issued_at: DateTime<Utc>,
}

impl Receipt {
    /// Sends the paid order to the kitchen display as a pending order.
    #[must_use]
    pub fn to_live_order(&self, table: impl Into<String>) -> LiveOrder {
        LiveOrder::new(
            self.order_number.clone(),
            table,
            self.items.clone(),
            OrderStatus::Pending,
            self.issued_at,
        )
    }
}

/// Settles the cart against the session credit.
///
/// The cart is priced and checked against the balance up front. The function
/// then waits `latency` to mimic the backend round trip, deducts the total,
/// empties the cart and returns the receipt. Nothing is charged on error and
/// the cart keeps its lines.
///
/// # Arguments
/// * `cart` - Lines to pay for; emptied on success
/// * `account` - Session credit the total is deducted from
/// * `clock` - Source of the receipt timestamp and order number
/// * `latency` - Simulated round trip before the charge lands
/// * `rates` - Tax and service fee rates
///
/// # Errors
/// - [`Error::Validation`] if the cart is empty
/// - [`Error::InvalidAmount`] if a rate is negative or not finite
/// - [`Error::InsufficientCredit`] if the credit does not cover the total
pub async fn checkout(
    cart: &mut Cart,
    account: &mut CreditAccount,
    clock: &dyn Clock,
    latency: Duration,
    rates: &PricingRates,
) -> Result<Receipt> {
    if cart.is_empty() {
        return Err(Error::validation("cannot check out an empty cart"));
    }

    let summary = cart.summary(account.balance(), rates)?;
    if !summary.has_enough_credit {
        warn!(
            "Checkout refused: total {:.2} exceeds credit {:.2}",
            summary.total,
            account.balance()
        );
        return Err(Error::InsufficientCredit {
            available: account.balance(),
            required: summary.total,
        });
    }

    tokio::time::sleep(latency).await;

    let remaining_credit = account.charge(summary.total)?;
    let issued_at = clock.now();
    let receipt = Receipt {
        order_number: format!("ORD-{}", issued_at.timestamp_millis()),
        items: std::mem::take(&mut cart.items),
        subtotal: summary.subtotal,
        tax: summary.tax,
        service_fee: summary.service_fee,
        total: summary.total,
        remaining_credit,
        issued_at,
    };

    info!(
        "Checkout {} settled for {:.2}, {:.2} credit left",
        receipt.order_number, receipt.total, receipt.remaining_credit
    );
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::clock::ManualClock,
        test_utils::{assert_money_eq, fixed_start, menu_item},
    };

    #[test]
    fn test_add_merges_lines_by_id() {
        let mut cart = Cart::new();
        let latte = menu_item(1, "Latte", 4.5);

        cart.add(&latte).unwrap();
        cart.add(&latte).unwrap();
        cart.add(&menu_item(2, "Bagel", 8.95)).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_rejects_bad_price() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add(&menu_item(1, "Broken", -1.0)),
            Err(Error::InvalidAmount { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_clamps_at_one() {
        let mut cart = Cart::new();
        cart.add(&menu_item(1, "Latte", 4.5)).unwrap();
        cart.increment(1).unwrap();
        assert_eq!(cart.items()[0].quantity, 2);

        cart.decrement(1).unwrap();
        cart.decrement(1).unwrap();
        cart.decrement(1).unwrap();
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_missing_line_operations_fail() {
        let mut cart = Cart::new();
        assert!(matches!(cart.increment(9), Err(Error::Validation { .. })));
        assert!(matches!(cart.decrement(9), Err(Error::Validation { .. })));
        assert!(matches!(cart.remove(9), Err(Error::Validation { .. })));
        assert!(matches!(
            cart.set_note(9, Some("hot".to_string())),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_notes_and_remove() {
        let mut cart = Cart::new();
        cart.add(&menu_item(1, "Latte", 4.5)).unwrap();

        cart.set_note(1, Some("  oat milk ".to_string())).unwrap();
        assert_eq!(cart.items()[0].note.as_deref(), Some("oat milk"));

        cart.set_note(1, Some("   ".to_string())).unwrap();
        assert!(cart.items()[0].note.is_none());

        let removed = cart.remove(1).unwrap();
        assert_eq!(removed.name, "Latte");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_credit_account() {
        assert!(CreditAccount::new(-5.0).is_err());

        let mut account = CreditAccount::new(10.0).unwrap();
        assert_eq!(account.top_up(5.0).unwrap(), 15.0);
        assert!(matches!(
            account.top_up(0.0),
            Err(Error::InvalidAmount { .. })
        ));

        assert_eq!(account.charge(15.0).unwrap(), 0.0);
        assert!(matches!(
            account.charge(0.01),
            Err(Error::InsufficientCredit { .. })
        ));
    }

    #[test]
    fn test_charge_rejects_negative_and_nan() {
        let mut account = CreditAccount::new(10.0).unwrap();
        assert!(matches!(
            account.charge(-5.0),
            Err(Error::InvalidAmount { .. })
        ));
        assert!(matches!(
            account.charge(f64::NAN),
            Err(Error::InvalidAmount { .. })
        ));
        assert_eq!(account.balance(), 10.0);
    }

    #[test]
    fn test_account_from_settings() {
        let settings = CheckoutSettings {
            latency_ms: 0,
            starting_credit: 25.0,
        };
        assert_eq!(CreditAccount::from_settings(&settings).unwrap().balance(), 25.0);

        let broken = CheckoutSettings {
            starting_credit: -1.0,
            ..settings
        };
        assert!(matches!(
            CreditAccount::from_settings(&broken),
            Err(Error::InvalidAmount { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_settles_after_latency() -> Result<()> {
        let clock = ManualClock::new(fixed_start());
        let mut cart = Cart::new();
        cart.add(&menu_item(1, "Latte", 4.5))?;
        cart.add(&menu_item(2, "Bagel", 8.95))?;
        let mut account = CreditAccount::new(20.0)?;

        let started = tokio::time::Instant::now();
        let receipt = checkout(
            &mut cart,
            &mut account,
            &clock,
            Duration::from_secs(1),
            &PricingRates::default(),
        )
        .await?;

        assert!(started.elapsed() >= Duration::from_secs(1));
        assert_money_eq(receipt.total, 15.1985);
        assert_money_eq(receipt.remaining_credit, 20.0 - 15.1985);
        assert_money_eq(account.balance(), receipt.remaining_credit);
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.issued_at, fixed_start());
        assert!(cart.is_empty());

        let order = receipt.to_live_order("Table 4");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.id, receipt.order_number);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_refuses_without_charging() -> Result<()> {
        let clock = ManualClock::new(fixed_start());
        let rates = PricingRates::default();
        let mut account = CreditAccount::new(10.0)?;

        let mut empty = Cart::new();
        let result = checkout(&mut empty, &mut account, &clock, Duration::ZERO, &rates).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let mut cart = Cart::new();
        cart.add(&menu_item(1, "Latte", 4.5))?;
        cart.add(&menu_item(2, "Bagel", 8.95))?;
        let result = checkout(&mut cart, &mut account, &clock, Duration::ZERO, &rates).await;

        assert!(matches!(result, Err(Error::InsufficientCredit { .. })));
        assert_eq!(account.balance(), 10.0);
        assert_eq!(cart.items().len(), 2);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_with_negative_rate_leaves_credit_alone() -> Result<()> {
        let clock = ManualClock::new(fixed_start());
        let rates = PricingRates {
            cart_tax_rate: -3.0,
            ..PricingRates::default()
        };
        let mut cart = Cart::new();
        cart.add(&menu_item(1, "Latte", 4.5))?;
        let mut account = CreditAccount::new(1.0)?;

        let result = checkout(&mut cart, &mut account, &clock, Duration::ZERO, &rates).await;

        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        assert_eq!(account.balance(), 1.0);
        assert_eq!(cart.items().len(), 1);
        Ok(())
    }
}
