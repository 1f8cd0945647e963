//! Venue entity - a bookable workspace listed in the catalog.
//!
//! Venues are read-only seed data. Opening hours are kept per weekday as
//! `NaiveTime` values and (de)serialized as 24h `"HH:MM"` strings.

use crate::{
    errors::{Error, Result},
    models::order::MenuItem,
};
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Venue catalog model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    /// Unique identifier for the venue
    pub id: i64,
    /// Display name (e.g., "The Daily Grind")
    pub name: String,
    /// Free text shown on the listing, searched by substring
    pub description: String,
    /// Postal address and map position
    pub location: Location,
    /// Average review score between 0 and 5
    pub rating: f64,
    /// Number of reviews the rating is based on
    #[serde(default)]
    pub review_count: u32,
    /// Hourly desk price in currency units
    pub price_per_hour: f64,
    /// Maximum number of simultaneous occupants
    pub capacity: u32,
    /// Free-form categorical labels ("Fast WiFi", "Coffee", ...)
    #[serde(default)]
    pub tags: Vec<String>,
    /// Opening hours keyed by weekday; a missing day means closed
    #[serde(default)]
    pub hours: HashMap<Weekday, DayHours>,
    /// Amenity flags
    #[serde(default)]
    pub features: Features,
    /// Ordered image references
    #[serde(default)]
    pub images: Vec<String>,
    /// Food and drink that can be ordered in the venue
    #[serde(default)]
    pub menu: Vec<MenuItem>,
}

impl Venue {
    /// Returns the opening hours for `day`, or `None` when the venue is closed.
    #[must_use]
    pub fn hours_on(&self, day: Weekday) -> Option<&DayHours> {
        self.hours.get(&day)
    }

    /// Looks up a menu item by id.
    #[must_use]
    pub fn menu_item(&self, item_id: i64) -> Option<&MenuItem> {
        self.menu.iter().find(|item| item.id == item_id)
    }

    /// Checks the catalog invariants for a single venue.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] when the rating is outside `0..=5`, the
    /// price is not positive, the capacity is zero, or a day closes before it
    /// opens.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(Error::validation(format!(
                "venue {} has rating {} outside 0-5",
                self.id, self.rating
            )));
        }

        if !self.price_per_hour.is_finite() || self.price_per_hour <= 0.0 {
            return Err(Error::validation(format!(
                "venue {} has non-positive price {}",
                self.id, self.price_per_hour
            )));
        }

        if self.capacity == 0 {
            return Err(Error::validation(format!(
                "venue {} has zero capacity",
                self.id
            )));
        }

        for (day, hours) in &self.hours {
            if hours.open > hours.close {
                return Err(Error::validation(format!(
                    "venue {} closes before it opens on {day}",
                    self.id
                )));
            }
        }

        Ok(())
    }
}

/// Where a venue is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub address: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub coordinates: Coordinates,
}

/// Latitude/longitude pair, display only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Opening window for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    /// Opening time
    #[serde(with = "hhmm")]
    pub open: NaiveTime,
    /// Closing time, never before `open`
    #[serde(with = "hhmm")]
    pub close: NaiveTime,
}

impl DayHours {
    /// Parses an opening window from two `"HH:MM"` strings.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTime`] if either string is malformed.
    pub fn parse(open: &str, close: &str) -> Result<Self> {
        Ok(Self {
            open: parse_time_of_day(open)?,
            close: parse_time_of_day(close)?,
        })
    }

    /// True when `[open, close]` lies entirely inside these hours.
    #[must_use]
    pub fn contains(&self, open: NaiveTime, close: NaiveTime) -> bool {
        self.open <= open && close <= self.close
    }
}

/// Fixed set of amenity flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Features {
    pub has_wifi: bool,
    pub has_power: bool,
    pub has_food: bool,
    pub has_quiet_space: bool,
    pub has_meeting_rooms: bool,
    pub has_outdoor_seating: bool,
    pub is_accessible: bool,
    pub allows_pets: bool,
    pub ordering_available: bool,
}

impl Features {
    /// Reads the flag that corresponds to `feature`.
    #[must_use]
    pub const fn has(&self, feature: Feature) -> bool {
        match feature {
            Feature::Wifi => self.has_wifi,
            Feature::Power => self.has_power,
            Feature::Food => self.has_food,
            Feature::QuietSpace => self.has_quiet_space,
            Feature::MeetingRooms => self.has_meeting_rooms,
            Feature::OutdoorSeating => self.has_outdoor_seating,
            Feature::Accessible => self.is_accessible,
            Feature::PetFriendly => self.allows_pets,
            Feature::Ordering => self.ordering_available,
        }
    }
}

/// Names a single amenity flag, used by filter criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Wifi,
    Power,
    Food,
    QuietSpace,
    MeetingRooms,
    OutdoorSeating,
    Accessible,
    PetFriendly,
    Ordering,
}

/// Parses a 24h `"HH:MM"` time of day.
///
/// # Errors
/// Returns [`Error::InvalidTime`] if `value` is not a valid time.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| Error::InvalidTime {
        value: value.to_string(),
    })
}

/// Serde adapter storing `NaiveTime` as `"HH:MM"`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Writes the time as `"HH:MM"`.
    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    /// Reads a `"HH:MM"` string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::sample_venue;

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(
            parse_time_of_day("08:30").unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day(" 23:59 ").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );

        for bad in ["", "25:00", "12:60", "noon", "12-30"] {
            assert!(
                matches!(parse_time_of_day(bad), Err(Error::InvalidTime { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_day_hours_contains_is_inclusive() {
        let hours = DayHours::parse("08:00", "18:00").unwrap();
        let at = |s| parse_time_of_day(s).unwrap();

        assert!(hours.contains(at("08:00"), at("18:00")));
        assert!(hours.contains(at("09:00"), at("12:00")));
        assert!(!hours.contains(at("07:59"), at("12:00")));
        assert!(!hours.contains(at("12:00"), at("18:01")));
    }

    #[test]
    fn test_validate_rejects_broken_invariants() {
        assert!(sample_venue(1, "Ok", 5.0).validate().is_ok());

        let mut venue = sample_venue(1, "Bad rating", 5.0);
        venue.rating = 5.1;
        assert!(matches!(venue.validate(), Err(Error::Validation { .. })));

        let venue = sample_venue(2, "Free", 0.0);
        assert!(matches!(venue.validate(), Err(Error::Validation { .. })));

        let mut venue = sample_venue(3, "Empty", 5.0);
        venue.capacity = 0;
        assert!(matches!(venue.validate(), Err(Error::Validation { .. })));

        let mut venue = sample_venue(4, "Backwards", 5.0);
        venue
            .hours
            .insert(Weekday::Sun, DayHours::parse("18:00", "09:00").unwrap());
        assert!(matches!(venue.validate(), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_features_has_maps_every_flag() {
        let features = Features {
            has_wifi: true,
            allows_pets: true,
            ..Features::default()
        };

        assert!(features.has(Feature::Wifi));
        assert!(features.has(Feature::PetFriendly));
        assert!(!features.has(Feature::Power));
        assert!(!features.has(Feature::Ordering));
    }

    #[test]
    fn test_hours_deserialize_from_toml_weekday_keys() {
        let toml_str = r#"
            mon = { open = "08:00", close = "20:00" }
            Saturday = { open = "10:00", close = "16:00" }
        "#;

        let hours: HashMap<Weekday, DayHours> = toml::from_str(toml_str).unwrap();
        assert_eq!(hours.len(), 2);
        assert_eq!(
            hours[&Weekday::Sat].close,
            NaiveTime::from_hms_opt(16, 0, 0).unwrap()
        );
    }
}
