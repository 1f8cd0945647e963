//! Shared test utilities for `WorkOut`.
//!
//! This module provides common helpers for building venues, catalogs and orders
//! with sensible defaults, plus database setup for storage tests.

#![allow(clippy::expect_used)]

use crate::{
    core::search::Catalog,
    errors::Result,
    models::{
        Coordinates, DayHours, Features, LiveOrder, Location, MenuItem, OrderItem, OrderStatus,
        Venue,
    },
};
use chrono::{DateTime, TimeZone, Utc, Weekday};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A fixed instant used as "now" by clock-driven tests.
pub fn fixed_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// Compares currency amounts with a tolerance for float rounding.
#[track_caller]
pub fn assert_money_eq(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Creates a test venue with sensible defaults.
///
/// # Defaults
/// * location: Springfield, IL
/// * `rating`: 4.0, `capacity`: 20
/// * `hours`: every day 08:00 - 20:00
/// * no tags, no features, no menu
pub fn sample_venue(id: i64, name: &str, price_per_hour: f64) -> Venue {
    let daily = DayHours::parse("08:00", "20:00").expect("valid default hours");
    let hours: HashMap<Weekday, DayHours> = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ]
    .into_iter()
    .map(|day| (day, daily))
    .collect();

    Venue {
        id,
        name: name.to_string(),
        description: String::new(),
        location: Location {
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            address: "1 Main St".to_string(),
            zip_code: "62701".to_string(),
            coordinates: Coordinates::default(),
        },
        rating: 4.0,
        review_count: 0,
        price_per_hour,
        capacity: 20,
        tags: Vec::new(),
        hours,
        features: Features::default(),
        images: Vec::new(),
        menu: Vec::new(),
    }
}

fn venue_in(
    id: i64,
    name: &str,
    price_per_hour: f64,
    city: &str,
    rating: f64,
    has_wifi: bool,
) -> Venue {
    let mut venue = sample_venue(id, name, price_per_hour);
    venue.location.city = city.to_string();
    venue.rating = rating;
    venue.features.has_wifi = has_wifi;
    venue
}

/// Five venues spread over cities, prices, ratings and wifi.
///
/// Only venue 2 is in Portland, has wifi and rates at least 4.5.
/// Prices 4.5 and 8.0 sit exactly on common filter bounds.
pub fn sample_catalog() -> Catalog {
    let venues = vec![
        venue_in(1, "The Daily Grind", 4.5, "Austin", 4.2, true),
        venue_in(2, "Harbor Desk Co-Work", 8.0, "Portland", 4.8, true),
        venue_in(3, "Rose Reading Room", 3.5, "Portland", 4.9, false),
        venue_in(4, "Summit Loft", 12.0, "Denver", 4.6, true),
        venue_in(5, "Bean There", 6.0, "Portland", 4.1, true),
    ];
    Catalog::new(venues).expect("sample catalog is valid")
}

pub fn menu_item(id: i64, name: &str, price: f64) -> MenuItem {
    MenuItem {
        id,
        name: name.to_string(),
        price,
        category: String::new(),
        description: None,
    }
}

pub fn order_item(id: i64, name: &str, price: f64, quantity: u32) -> OrderItem {
    OrderItem {
        id,
        name: name.to_string(),
        price,
        quantity,
        note: None,
    }
}

/// A live order for table "T1" with a single latte.
pub fn live_order(id: &str, status: OrderStatus, created_at: DateTime<Utc>) -> LiveOrder {
    LiveOrder::new(
        id,
        "T1",
        vec![order_item(1, "Latte", 4.5, 1)],
        status,
        created_at,
    )
}
