//! Venue selection for newly created allocations.

use mentorship_core::error::{MentorshipError, Result};
use mentorship_core::store::{DocumentStore, Filter, Stored};
use mentorship_core::venue::Venue;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Mutex;

/// Picks a venue uniformly at random.
///
/// The generator is seeded once and shared across calls. The lock is only
/// held for the draw itself, never across a store call.
pub struct VenueSelector {
    store: DocumentStore,
    rng: Mutex<StdRng>,
}

impl VenueSelector {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic selector, for tests and reproducible runs.
    pub fn with_seed(store: DocumentStore, seed: u64) -> Self {
        Self {
            store,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn pick_venue(&self) -> Result<Stored<Venue>> {
        let venues = self.store.find::<Venue>(&Filter::all()).await?;

        let venue = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| MentorshipError::internal("venue rng lock poisoned"))?;
            venues.choose(&mut *rng).cloned()
        };
        let Some(venue) = venue else {
            tracing::warn!("no venues configured");
            return Err(MentorshipError::NoVenuesAvailable);
        };

        tracing::debug!(venue_id = %venue.id, venue = %venue.name, "picked venue");
        Ok(venue)
    }
}
