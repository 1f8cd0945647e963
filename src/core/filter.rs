//! Filter predicate engine.
//!
//! Each predicate checks one venue against one criterion and nothing else.
//! The search orchestrator in [`crate::core::search`] ANDs them together.
//! Text predicates are case-insensitive substring matches with no tokenizing
//! or fuzzy matching. Absent bounds and empty strings impose no constraint.

use crate::{
    errors::{Error, Result},
    models::{
        Feature, Venue,
        venue::{DayHours, parse_time_of_day},
    },
};
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// User-chosen constraints for one search. Built fresh from form state on every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Matched against name, description and tags
    pub query: String,
    /// Matched against city, state and street address
    pub location: String,
    /// Venue must carry every one of these tags
    pub tags: Vec<String>,
    /// Inclusive lower bound on the hourly price
    pub min_price: Option<f64>,
    /// Inclusive upper bound on the hourly price; `None` means unbounded
    pub max_price: Option<f64>,
    /// Inclusive lower bound on the rating
    pub min_rating: Option<f64>,
    /// Inclusive lower bound on capacity
    pub min_capacity: Option<u32>,
    /// Window the venue must be open for
    pub hours: Option<HoursWindow>,
    /// Amenities that must be present
    pub features: BTreeSet<Feature>,
}

impl FilterCriteria {
    /// Criteria that match every venue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    #[must_use]
    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    #[must_use]
    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    #[must_use]
    pub fn with_min_capacity(mut self, capacity: u32) -> Self {
        self.min_capacity = Some(capacity);
        self
    }

    #[must_use]
    pub fn with_hours(mut self, window: HoursWindow) -> Self {
        self.hours = Some(window);
        self
    }

    #[must_use]
    pub fn require(mut self, feature: Feature) -> Self {
        self.features.insert(feature);
        self
    }

    /// Rejects bounds that cannot describe a real search.
    ///
    /// # Errors
    /// - [`Error::InvalidAmount`] for a negative or non-finite price/rating bound
    /// - [`Error::Validation`] when `min_price` exceeds `max_price` or the
    ///   hours window closes before it opens
    pub fn validate(&self) -> Result<()> {
        for amount in [self.min_price, self.max_price, self.min_rating]
            .into_iter()
            .flatten()
        {
            if !amount.is_finite() || amount < 0.0 {
                return Err(Error::InvalidAmount { amount });
            }
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price)
            && min > max
        {
            return Err(Error::validation(format!(
                "minimum price {min} is above maximum price {max}"
            )));
        }

        if let Some(window) = &self.hours {
            window.validate()?;
        }

        Ok(())
    }

    /// True when `venue` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, venue: &Venue) -> bool {
        matches_query(venue, &self.query)
            && matches_location(venue, &self.location)
            && within_price(venue, self.min_price, self.max_price)
            && meets_rating(venue, self.min_rating)
            && meets_capacity(venue, self.min_capacity)
            && has_tags(venue, &self.tags)
            && self.hours.as_ref().is_none_or(|w| open_during(venue, w))
            && has_features(venue, &self.features)
    }
}

/// A requested stay, checked against the venue's opening hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursWindow {
    /// Day to check; `None` requires the window on every day of the week
    pub day: Option<Weekday>,
    #[serde(with = "crate::models::venue::hhmm")]
    pub open: NaiveTime,
    #[serde(with = "crate::models::venue::hhmm")]
    pub close: NaiveTime,
}

impl HoursWindow {
    /// Builds a window from form strings.
    ///
    /// Returns `Ok(None)` when either field is blank, which the form uses for
    /// "any time".
    ///
    /// # Errors
    /// - [`Error::InvalidTime`] if a field is not `"HH:MM"`
    /// - [`Error::Validation`] if the window closes before it opens
    pub fn parse(day: Option<Weekday>, open: &str, close: &str) -> Result<Option<Self>> {
        if open.trim().is_empty() || close.trim().is_empty() {
            return Ok(None);
        }

        let window = Self {
            day,
            open: parse_time_of_day(open)?,
            close: parse_time_of_day(close)?,
        };
        window.validate()?;
        Ok(Some(window))
    }

    /// # Errors
    /// Returns [`Error::Validation`] if the window closes before it opens.
    pub fn validate(&self) -> Result<()> {
        if self.open > self.close {
            return Err(Error::validation(format!(
                "requested window closes at {} before it opens at {}",
                self.close.format("%H:%M"),
                self.open.format("%H:%M")
            )));
        }
        Ok(())
    }
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Free-text match against name, description and tags.
#[must_use]
pub fn matches_query(venue: &Venue, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    contains_ignore_case(&venue.name, &needle)
        || contains_ignore_case(&venue.description, &needle)
        || venue
            .tags
            .iter()
            .any(|tag| contains_ignore_case(tag, &needle))
}

/// Free-text match against city, state and street address.
#[must_use]
pub fn matches_location(venue: &Venue, location: &str) -> bool {
    let needle = location.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let place = &venue.location;
    contains_ignore_case(&place.city, &needle)
        || contains_ignore_case(&place.state, &needle)
        || contains_ignore_case(&place.address, &needle)
}

/// Inclusive hourly price bounds.
#[must_use]
pub fn within_price(venue: &Venue, min: Option<f64>, max: Option<f64>) -> bool {
    min.is_none_or(|min| venue.price_per_hour >= min)
        && max.is_none_or(|max| venue.price_per_hour <= max)
}

/// Inclusive rating floor.
#[must_use]
pub fn meets_rating(venue: &Venue, min: Option<f64>) -> bool {
    min.is_none_or(|min| venue.rating >= min)
}

/// Inclusive capacity floor.
#[must_use]
pub fn meets_capacity(venue: &Venue, min: Option<u32>) -> bool {
    min.is_none_or(|min| venue.capacity >= min)
}

/// Venue tags must be a superset of `wanted` (labels compared case-insensitively).
#[must_use]
pub fn has_tags(venue: &Venue, wanted: &[String]) -> bool {
    let labels: Vec<String> = venue
        .tags
        .iter()
        .map(|tag| tag.trim().to_lowercase())
        .collect();

    wanted.iter().all(|want| {
        let want = want.trim().to_lowercase();
        labels.contains(&want)
    })
}

/// The window must fit inside the venue's hours on the requested day, or on
/// every day when no day is given. Missing days count as closed.
#[must_use]
pub fn open_during(venue: &Venue, window: &HoursWindow) -> bool {
    let fits = |day: Weekday| {
        venue
            .hours_on(day)
            .is_some_and(|hours: &DayHours| hours.contains(window.open, window.close))
    };

    match window.day {
        Some(day) => fits(day),
        None => ALL_WEEKDAYS.into_iter().all(fits),
    }
}

/// Every required feature flag must be set on the venue.
#[must_use]
pub fn has_features(venue: &Venue, required: &BTreeSet<Feature>) -> bool {
    required.iter().all(|feature| venue.features.has(*feature))
}
