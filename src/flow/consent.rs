//! flow::consent
//!
//! One-shot consent markers.
//!
//! # Design
//!
//! When the downstream service demands renewed consent, the orchestrator
//! sets a time-limited marker for the user. The sign-in collaborator
//! consumes it via [`ConsentMarkers::take`] to force an interactive
//! consent prompt on the next login, after which the marker is gone.
//! It is a one-shot signal, the in-process analogue of a short-lived
//! cookie.
//!
//! Markers expire on their own; an expired marker reads as absent and is
//! dropped lazily on access. The store is `Clone` (Arc-backed) and
//! mutation-atomic like the token cache, since two requests of the same
//! user may race on it.
//!
//! # Example
//!
//! ```
//! use taskgate::flow::ConsentMarkers;
//! use taskgate::core::types::UserId;
//!
//! let markers = ConsentMarkers::new(60);
//! let user = UserId::new("user-1");
//!
//! markers.set(&user);
//! assert!(markers.is_pending(&user));
//!
//! // The sign-in flow consumes the marker exactly once.
//! assert!(markers.take(&user));
//! assert!(!markers.is_pending(&user));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

use crate::core::types::UserId;

/// User-scoped, time-limited consent flags.
#[derive(Debug, Clone)]
pub struct ConsentMarkers {
    ttl_minutes: i64,
    entries: Arc<RwLock<HashMap<UserId, DateTime<Utc>>>>,
}

impl ConsentMarkers {
    /// Create a store whose markers live for `ttl_minutes`.
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            ttl_minutes,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Flag `user` as needing a consent prompt on next sign-in.
    ///
    /// Re-setting refreshes the expiry.
    pub fn set(&self, user: &UserId) {
        let expires_at = Utc::now() + Duration::minutes(self.ttl_minutes);
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(user.clone(), expires_at);
            tracing::debug!(user = %user, "consent marker set");
        }
    }

    /// Whether a live marker exists for `user` (does not consume it).
    pub fn is_pending(&self, user: &UserId) -> bool {
        let Ok(entries) = self.entries.read() else {
            return false;
        };
        entries.get(user).is_some_and(|expiry| *expiry > Utc::now())
    }

    /// Consume the marker for `user`, returning whether a live one existed.
    ///
    /// This is what the sign-in collaborator calls: a `true` means "force
    /// the interactive consent prompt", and the marker is cleared either
    /// way.
    pub fn take(&self, user: &UserId) -> bool {
        let Ok(mut entries) = self.entries.write() else {
            return false;
        };
        entries
            .remove(user)
            .is_some_and(|expiry| expiry > Utc::now())
    }

    /// Drop the marker for `user` without reading it.
    pub fn clear(&self, user: &UserId) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(user);
        }
    }
}
