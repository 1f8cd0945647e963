//! Venue catalog and search orchestrator.
//!
//! The catalog is the read-only seed list of venues. `filter_venues` runs every
//! predicate from [`crate::core::filter`] with AND semantics and returns the
//! matches in catalog order.

use crate::{
    core::filter::FilterCriteria,
    errors::{Error, Result},
    models::Venue,
};
use std::collections::HashSet;
use tracing::debug;

/// In-memory venue catalog. Never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    venues: Vec<Venue>,
}

impl Catalog {
    /// Builds a catalog, checking every venue's invariants and id uniqueness.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] for the first venue that breaks an
    /// invariant or reuses an id.
    pub fn new(venues: Vec<Venue>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(venues.len());
        for venue in &venues {
            venue.validate()?;
            if !seen.insert(venue.id) {
                return Err(Error::validation(format!(
                    "duplicate venue id {} ({})",
                    venue.id, venue.name
                )));
            }
        }

        debug!("Catalog built with {} venues", venues.len());
        Ok(Self { venues })
    }

    /// All venues in seed order.
    #[must_use]
    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.venues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    /// Finds a venue by id, returning None if it is not listed.
    #[must_use]
    pub fn get_venue_by_id(&self, venue_id: i64) -> Option<&Venue> {
        self.venues.iter().find(|venue| venue.id == venue_id)
    }

    /// Like [`Catalog::get_venue_by_id`] but treats a missing venue as an error.
    ///
    /// # Errors
    /// Returns [`Error::VenueNotFound`] if no venue has this id.
    pub fn require_venue(&self, venue_id: i64) -> Result<&Venue> {
        self.get_venue_by_id(venue_id)
            .ok_or(Error::VenueNotFound { id: venue_id })
    }
}

/// Returns every venue matching all of `criteria`, preserving catalog order.
///
/// Each criterion is checked by its own predicate in [`crate::core::filter`]
/// and a venue is kept only if all of them pass. The catalog is never mutated
/// and the matches are not re-sorted. An empty result is not an error.
///
/// # Arguments
/// * `catalog` - Venues to search
/// * `criteria` - Current filter state; default criteria match every venue
///
/// # Errors
/// Returns an error only when the criteria themselves are invalid (see
/// [`FilterCriteria::validate`]).
pub fn filter_venues<'a>(catalog: &'a Catalog, criteria: &FilterCriteria) -> Result<Vec<&'a Venue>> {
    criteria.validate()?;

    let matches: Vec<&Venue> = catalog
        .venues()
        .iter()
        .filter(|venue| criteria.matches(venue))
        .collect();

    debug!(
        "Search matched {} of {} venues",
        matches.len(),
        catalog.len()
    );
    Ok(matches)
}
