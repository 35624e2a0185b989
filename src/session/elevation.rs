use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::ClientError;
use crate::store::{StateStore, ELEVATION_KEY};

/// Short-lived proof of elevated admin intent, separate from the base
/// session. Persisted under its own key as a plain millisecond string.
///
/// The deadline is written once by the elevated login flow and never
/// renewed implicitly; validity strictly decays once the wall clock
/// passes it. There is no background timer: expiry is observed on the
/// next evaluation, not at the deadline instant.
pub struct ElevationStore<S: StateStore> {
    valid_until: Option<DateTime<Utc>>,
    store: S,
}

impl<S: StateStore> ElevationStore<S> {
    pub fn open(store: S) -> Result<Self, ClientError> {
        let valid_until = match store.load(ELEVATION_KEY)? {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
            None => None,
        };
        Ok(Self { valid_until, store })
    }

    pub fn valid_until(&self) -> Option<DateTime<Utc>> {
        self.valid_until
    }

    /// Writes `now + window` as the new deadline and returns it.
    /// The deadline is always in the future at the moment it is written.
    pub fn grant(&mut self, window: Duration) -> Result<DateTime<Utc>, ClientError> {
        // Truncate to millisecond precision so the in-memory deadline
        // matches what the store can represent.
        let until = Utc
            .timestamp_millis_opt((Utc::now() + window).timestamp_millis())
            .single()
            .expect("current time plus window is representable in millis");
        self.store
            .save(ELEVATION_KEY, &until.timestamp_millis().to_string())?;
        self.valid_until = Some(until);
        Ok(until)
    }

    /// Strict comparison: valid iff a deadline exists and lies after `now`.
    /// No grace period once the clock passes it.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.valid_until, Some(until) if until > now)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn clear(&mut self) -> Result<(), ClientError> {
        self.valid_until = None;
        self.store.remove(ELEVATION_KEY)
    }
}
