//! Pricing calculator.
//!
//! Two independent pure computations: the booking quote shown by the booking
//! widget, and the cart summary shown before checkout. Both are re-derived from
//! scratch whenever their inputs change; nothing here holds state.

use crate::{
    errors::{Error, Result},
    models::{OrderItem, Venue, venue::parse_time_of_day},
};
use chrono::{Datelike, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

/// Fee and tax rates applied by the calculators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingRates {
    /// Service fee on a desk booking subtotal
    pub booking_service_fee_rate: f64,
    /// Sales tax on an in-venue order subtotal
    pub cart_tax_rate: f64,
    /// Service fee on an in-venue order subtotal
    pub cart_service_fee_rate: f64,
}

impl Default for PricingRates {
    fn default() -> Self {
        Self {
            booking_service_fee_rate: 0.10,
            cart_tax_rate: 0.08,
            cart_service_fee_rate: 0.05,
        }
    }
}

impl PricingRates {
    /// Ensures every rate is a finite, non-negative fraction.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAmount`] for the first bad rate.
    pub fn validate(&self) -> Result<()> {
        for amount in [
            self.booking_service_fee_rate,
            self.cart_tax_rate,
            self.cart_service_fee_rate,
        ] {
            if !amount.is_finite() || amount < 0.0 {
                return Err(Error::InvalidAmount { amount });
            }
        }
        Ok(())
    }
}

/// Price breakdown for a desk booking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookingQuote {
    /// Booked time in hours
    pub duration_hours: f64,
    pub subtotal: f64,
    pub service_fee: f64,
    pub total: f64,
}

/// Price breakdown for an in-venue order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartSummary {
    pub subtotal: f64,
    pub tax: f64,
    pub service_fee: f64,
    pub total: f64,
    /// Whether the session credit covers `total`
    pub has_enough_credit: bool,
}

/// Hours between two `"HH:MM"` times on the same day.
///
/// # Errors
/// - [`Error::InvalidTime`] if either time is malformed
/// - [`Error::Validation`] if `end` is not after `start`
pub fn booking_duration(start: &str, end: &str) -> Result<f64> {
    let start_time = parse_time_of_day(start)?;
    let end_time = parse_time_of_day(end)?;

    if end_time <= start_time {
        return Err(Error::validation(format!(
            "booking must end after it starts ({start} - {end})"
        )));
    }

    let hours = f64::from(end_time.hour()) - f64::from(start_time.hour());
    let minutes = f64::from(end_time.minute()) - f64::from(start_time.minute());
    Ok(hours + minutes / 60.0)
}

/// Quotes a booking from start/end times and an hourly price.
///
/// # Errors
/// - [`Error::InvalidAmount`] if the hourly price or a rate is negative or not finite
/// - any error from [`booking_duration`]
pub fn quote_booking(
    start: &str,
    end: &str,
    price_per_hour: f64,
    rates: &PricingRates,
) -> Result<BookingQuote> {
    rates.validate()?;
    if !price_per_hour.is_finite() || price_per_hour <= 0.0 {
        return Err(Error::InvalidAmount {
            amount: price_per_hour,
        });
    }

    let duration_hours = booking_duration(start, end)?;
    let subtotal = duration_hours * price_per_hour;
    let service_fee = subtotal * rates.booking_service_fee_rate;

    Ok(BookingQuote {
        duration_hours,
        subtotal,
        service_fee,
        total: subtotal + service_fee,
    })
}

/// Checks that `venue` can take the booking, then quotes it at the venue's price.
///
/// The venue must be open on `date`'s weekday for the whole window and must
/// fit `guests`. Availability is checked before any price is computed, so a
/// closed venue is reported even when the times would also be rejected.
///
/// # Arguments
/// * `venue` - The venue being booked
/// * `date` - Calendar day of the stay; only its weekday matters
/// * `start` - Arrival time as `"HH:MM"`
/// * `end` - Departure time as `"HH:MM"`, same day
/// * `guests` - Party size, at least 1 and at most the venue's capacity
/// * `rates` - Fee rates applied to the subtotal
///
/// # Errors
/// - [`Error::Validation`] if the venue is closed, the window falls outside
///   its hours, or the party is empty or too large
/// - any error from [`quote_booking`]
pub fn quote_venue_booking(
    venue: &Venue,
    date: NaiveDate,
    start: &str,
    end: &str,
    guests: u32,
    rates: &PricingRates,
) -> Result<BookingQuote> {
    if guests == 0 || guests > venue.capacity {
        return Err(Error::validation(format!(
            "{} fits 1 to {} guests, requested {guests}",
            venue.name, venue.capacity
        )));
    }

    let weekday = date.weekday();
    let hours = venue.hours_on(weekday).ok_or_else(|| {
        Error::validation(format!("{} is closed on {weekday}", venue.name))
    })?;

    let open = parse_time_of_day(start)?;
    let close = parse_time_of_day(end)?;
    if !hours.contains(open, close) {
        return Err(Error::validation(format!(
            "{} is open {} - {} on {weekday}",
            venue.name,
            hours.open.format("%H:%M"),
            hours.close.format("%H:%M")
        )));
    }

    quote_booking(start, end, venue.price_per_hour, rates)
}

/// Totals a cart and compares it with the available credit.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] if a rate is negative or not finite.
pub fn price_cart(items: &[OrderItem], credit: f64, rates: &PricingRates) -> Result<CartSummary> {
    rates.validate()?;
    let subtotal: f64 = items.iter().map(OrderItem::line_total).sum();
    let tax = subtotal * rates.cart_tax_rate;
    let service_fee = subtotal * rates.cart_service_fee_rate;
    let total = subtotal + tax + service_fee;

    Ok(CartSummary {
        subtotal,
        tax,
        service_fee,
        total,
        has_enough_credit: credit >= total,
    })
}
