use crate::flow::{BookingError, BookingFlow};
use crate::params::BookingParams;
use chrono::{DateTime, Duration, Utc};
use wanderlust_catalog::Catalog;
use uuid::Uuid;
use std::collections::HashMap;

/// Drafts untouched for this long are dropped
const DEFAULT_DRAFT_TTL_SECS: i64 = 30 * 60;

/// Holds the open booking drafts for the current process. Drafts live only in
/// memory and disappear when discarded or once idle past the TTL.
pub struct BookingManager {
    bookings: HashMap<Uuid, BookingFlow>,
    draft_ttl: Duration,
}

impl BookingManager {
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_DRAFT_TTL_SECS))
    }

    pub fn with_ttl(draft_ttl: Duration) -> Self {
        Self {
            bookings: HashMap::new(),
            draft_ttl,
        }
    }

    /// Open a booking from navigation parameters. Idle drafts are swept first.
    pub fn open(&mut self, catalog: &Catalog, params: &BookingParams) -> Result<Uuid, BookingError> {
        let flow = BookingFlow::open(catalog, params)?;
        self.cleanup_expired();
        let id = Uuid::new_v4();
        tracing::info!("Booking {} opened for package {}", id, params.package_id);
        self.bookings.insert(id, flow);
        Ok(id)
    }

    /// Get a booking by ID
    pub fn get(&self, booking_id: &Uuid) -> Result<&BookingFlow, BookingError> {
        self.bookings
            .get(booking_id)
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))
    }

    pub fn get_mut(&mut self, booking_id: &Uuid) -> Result<&mut BookingFlow, BookingError> {
        self.bookings
            .get_mut(booking_id)
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))
    }

    /// Drop a draft ("Plan Another Trip" or navigating away)
    pub fn discard(&mut self, booking_id: &Uuid) -> Result<BookingFlow, BookingError> {
        let flow = self
            .bookings
            .remove(booking_id)
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))?;
        tracing::info!("Booking {} discarded at step {}", booking_id, flow.step());
        Ok(flow)
    }

    /// "Plan Another Trip": replace the draft with a fresh one for the same
    /// package, keeping the booking id.
    pub fn restart(&mut self, booking_id: &Uuid) -> Result<&BookingFlow, BookingError> {
        let flow = self
            .bookings
            .remove(booking_id)
            .ok_or_else(|| BookingError::NotFound(booking_id.to_string()))?;
        tracing::info!("Booking {} restarted from step {}", booking_id, flow.step());
        Ok(self.bookings.entry(*booking_id).or_insert(flow.restart()))
    }

    /// Clean up expired drafts
    pub fn cleanup_expired(&mut self) -> usize {
        self.evict_idle(Utc::now())
    }

    /// Drop every draft whose last edit is at least one TTL before `now`
    pub fn evict_idle(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.draft_ttl;
        let initial_count = self.bookings.len();

        self.bookings.retain(|id, flow| {
            let keep = flow.draft().updated_at() > cutoff;
            if !keep {
                tracing::debug!("Booking {} expired at step {}", id, flow.step());
            }
            keep
        });

        let evicted = initial_count - self.bookings.len();
        if evicted > 0 {
            tracing::info!("Evicted {} idle booking drafts", evicted);
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

impl Default for BookingManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStep;

    #[test]
    fn test_open_and_discard() {
        let catalog = Catalog::embedded().unwrap();
        let mut manager = BookingManager::new();

        let id = manager.open(&catalog, &BookingParams::default()).unwrap();
        assert_eq!(manager.get(&id).unwrap().step(), BookingStep::Details);
        assert_eq!(manager.len(), 1);

        manager.get_mut(&id).unwrap().set_traveler_count(3).unwrap();
        assert_eq!(manager.get(&id).unwrap().draft().traveler_count(), 3);

        manager.discard(&id).unwrap();
        assert!(manager.is_empty());
        assert!(matches!(manager.get(&id), Err(BookingError::NotFound(_))));
        assert!(manager.discard(&id).is_err());
    }

    #[test]
    fn test_restart_keeps_id_and_package() {
        let catalog = Catalog::embedded().unwrap();
        let mut manager = BookingManager::new();
        let params = BookingParams { package_id: 3, traveler_count: 5, ..Default::default() };
        let id = manager.open(&catalog, &params).unwrap();

        let restarted = manager.restart(&id).unwrap();
        assert_eq!(restarted.draft().package_id(), 3);
        assert_eq!(restarted.draft().traveler_count(), 2);
        assert_eq!(manager.len(), 1);

        assert!(manager.restart(&Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_open_unknown_package_leaves_no_draft() {
        let catalog = Catalog::embedded().unwrap();
        let mut manager = BookingManager::new();
        let params = BookingParams { package_id: 4040, ..Default::default() };

        assert!(matches!(manager.open(&catalog, &params), Err(BookingError::PackageNotFound(4040))));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_idle_drafts_are_evicted() {
        let catalog = Catalog::embedded().unwrap();
        let mut manager = BookingManager::with_ttl(Duration::minutes(30));
        let stale = manager.open(&catalog, &BookingParams::default()).unwrap();
        let opened_at = manager.get(&stale).unwrap().draft().updated_at();

        assert_eq!(manager.evict_idle(opened_at + Duration::minutes(29)), 0);
        assert_eq!(manager.len(), 1);

        assert_eq!(manager.evict_idle(opened_at + Duration::minutes(31)), 1);
        assert!(manager.is_empty());
        assert!(matches!(manager.get(&stale), Err(BookingError::NotFound(_))));
    }

    #[test]
    fn test_abandoned_drafts_do_not_accumulate() {
        let catalog = Catalog::embedded().unwrap();
        let mut manager = BookingManager::with_ttl(Duration::zero());

        let mut last = None;
        for _ in 0..100 {
            last = Some(manager.open(&catalog, &BookingParams::default()).unwrap());
        }

        assert_eq!(manager.len(), 1);
        assert!(manager.get(&last.unwrap()).is_ok());
    }

    #[test]
    fn test_edits_keep_a_draft_alive() {
        let catalog = Catalog::embedded().unwrap();
        let mut manager = BookingManager::with_ttl(Duration::minutes(30));
        let id = manager.open(&catalog, &BookingParams::default()).unwrap();
        let opened_at = manager.get(&id).unwrap().draft().updated_at();

        manager.get_mut(&id).unwrap().set_traveler_count(4).unwrap();
        let edited_at = manager.get(&id).unwrap().draft().updated_at();
        assert!(edited_at >= opened_at);

        assert_eq!(manager.evict_idle(edited_at + Duration::minutes(29)), 0);
        assert_eq!(manager.get(&id).unwrap().draft().traveler_count(), 4);
    }
}
