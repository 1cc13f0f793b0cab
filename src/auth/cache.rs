//! auth::cache
//!
//! Session-scoped token cache.
//!
//! # Design
//!
//! The cache is keyed by `(UserId, ResourceId)`. Each entry holds at most
//! one live [`Token`]. Entries are created on first successful silent
//! acquisition, overwritten on refresh, and removed either by
//! classifier-driven invalidation (the backend rejected the token) or by
//! user sign-out.
//!
//! Invalidation is scoped: `invalidate(user, resource)` removes exactly
//! the entries matching that resource, leaving the same user's tokens for
//! other downstream APIs untouched. Over-eager clearing forces needless
//! re-prompts; under-eager clearing loops forever on 401s.
//!
//! The cache is shared across concurrent requests of one session (two
//! browser tabs hitting the same user's session), so it is `Clone`
//! (Arc-backed) and all mutations take the write lock. A reader never
//! observes a half-invalidated entry. Lookups never touch the network.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use taskgate::auth::{Token, TokenCache};
//! use taskgate::core::types::{ResourceId, UserId};
//!
//! let cache = TokenCache::new();
//! let user = UserId::new("user-1");
//! let resource = ResourceId::new("api://tasklist");
//!
//! let token = Token::new("at-secret", resource.clone(), Utc::now() + Duration::hours(1));
//! cache.store(&user, &resource, token);
//! assert!(cache.lookup(&user, &resource).is_some());
//!
//! cache.invalidate(&user, &resource);
//! assert!(cache.lookup(&user, &resource).is_none());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

use crate::core::types::{ResourceId, UserId};

/// Seconds before nominal expiry at which a token is treated as expired.
///
/// Hands callers a small safety margin so a token is never attached to a
/// request moments before the backend would reject it.
pub const EXPIRY_BUFFER_SECS: i64 = 60;

/// An access token scoped to one downstream resource.
///
/// Owned by the cache entry that produced it; once that entry is
/// invalidated the token is gone. Callers hold clones for the duration
/// of a single request pipeline only.
#[derive(Clone)]
pub struct Token {
    access_token: String,
    resource: ResourceId,
    expires_at: DateTime<Utc>,
}

impl Token {
    /// Create a token from an acquisition result.
    pub fn new(
        access_token: impl Into<String>,
        resource: ResourceId,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            resource,
            expires_at,
        }
    }

    /// The raw credential, for building the `Authorization` header.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The resource this token is valid for.
    pub fn resource(&self) -> &ResourceId {
        &self.resource
    }

    /// When this token expires.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the token is expired (with [`EXPIRY_BUFFER_SECS`] margin).
    pub fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_BUFFER_SECS) >= self.expires_at
    }
}

// Custom Debug to avoid exposing the credential.
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("resource", &self.resource)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Session-scoped store of acquired tokens.
///
/// Cheap to clone; all clones share the same underlying map. No entry
/// survives the session; there is no persistence.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    entries: Arc<RwLock<HashMap<(UserId, ResourceId), Token>>>,
}

impl TokenCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a live token for `(user, resource)`.
    ///
    /// Pure read against session state: never triggers network I/O.
    /// An expired entry behaves as absent.
    pub fn lookup(&self, user: &UserId, resource: &ResourceId) -> Option<Token> {
        let entries = self.entries.read().ok()?;
        entries
            .get(&(user.clone(), resource.clone()))
            .filter(|t| !t.is_expired())
            .cloned()
    }

    /// Store a token, overwriting any previous entry for the pair.
    pub fn store(&self, user: &UserId, resource: &ResourceId, token: Token) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert((user.clone(), resource.clone()), token);
        }
    }

    /// Remove exactly the entry for `(user, resource)`.
    ///
    /// Entries for the same user against other resources are untouched.
    pub fn invalidate(&self, user: &UserId, resource: &ResourceId) {
        if let Ok(mut entries) = self.entries.write() {
            if entries.remove(&(user.clone(), resource.clone())).is_some() {
                tracing::debug!(user = %user, resource = %resource, "invalidated cached token");
            }
        }
    }

    /// Remove every entry for `user`, across all resources (sign-out).
    pub fn clear(&self, user: &UserId) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|(u, _), _| u != user);
        }
    }

    /// Number of entries (including expired ones not yet overwritten).
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_token(resource: &ResourceId, suffix: &str) -> Token {
        Token::new(
            format!("at-{}", suffix),
            resource.clone(),
            Utc::now() + Duration::hours(1),
        )
    }

    fn user() -> UserId {
        UserId::new("user-1")
    }

    fn tasks_resource() -> ResourceId {
        ResourceId::new("api://tasklist")
    }

    mod token_tests {
        use super::*;

        #[test]
        fn fresh_token_is_not_expired() {
            let token = live_token(&tasks_resource(), "a");
            assert!(!token.is_expired());
        }

        #[test]
        fn past_expiry_is_expired() {
            let token = Token::new("at", tasks_resource(), Utc::now() - Duration::seconds(1));
            assert!(token.is_expired());
        }

        #[test]
        fn expiry_buffer_applies() {
            // Nominally valid for 30 more seconds, inside the 60s buffer.
            let token = Token::new("at", tasks_resource(), Utc::now() + Duration::seconds(30));
            assert!(token.is_expired());
        }

        #[test]
        fn debug_output_does_not_expose_credential() {
            let token = live_token(&tasks_resource(), "secret-material");
            let debug = format!("{:?}", token);
            assert!(!debug.contains("secret-material"));
            assert!(debug.contains("api://tasklist"));
        }
    }

    mod cache_tests {
        use super::*;

        #[test]
        fn new_is_empty() {
            let cache = TokenCache::new();
            assert!(cache.is_empty());
            assert_eq!(cache.len(), 0);
        }

        #[test]
        fn store_and_lookup() {
            let cache = TokenCache::new();
            cache.store(&user(), &tasks_resource(), live_token(&tasks_resource(), "a"));

            let token = cache.lookup(&user(), &tasks_resource()).expect("cached");
            assert_eq!(token.access_token(), "at-a");
        }

        #[test]
        fn lookup_miss_returns_none() {
            let cache = TokenCache::new();
            assert!(cache.lookup(&user(), &tasks_resource()).is_none());
        }

        #[test]
        fn expired_entry_behaves_as_absent() {
            let cache = TokenCache::new();
            let stale = Token::new(
                "at-stale",
                tasks_resource(),
                Utc::now() - Duration::minutes(5),
            );
            cache.store(&user(), &tasks_resource(), stale);

            assert!(cache.lookup(&user(), &tasks_resource()).is_none());
            // The entry is still present until overwritten or invalidated.
            assert_eq!(cache.len(), 1);
        }

        #[test]
        fn store_overwrites_on_refresh() {
            let cache = TokenCache::new();
            cache.store(&user(), &tasks_resource(), live_token(&tasks_resource(), "old"));
            cache.store(&user(), &tasks_resource(), live_token(&tasks_resource(), "new"));

            assert_eq!(cache.len(), 1);
            let token = cache.lookup(&user(), &tasks_resource()).expect("cached");
            assert_eq!(token.access_token(), "at-new");
        }

        #[test]
        fn invalidate_is_scoped_to_resource() {
            let cache = TokenCache::new();
            let other = ResourceId::new("api://graph");
            cache.store(&user(), &tasks_resource(), live_token(&tasks_resource(), "a"));
            cache.store(&user(), &other, live_token(&other, "b"));

            cache.invalidate(&user(), &tasks_resource());

            assert!(cache.lookup(&user(), &tasks_resource()).is_none());
            assert!(cache.lookup(&user(), &other).is_some());
        }

        #[test]
        fn invalidate_missing_entry_is_noop() {
            let cache = TokenCache::new();
            cache.invalidate(&user(), &tasks_resource());
            assert!(cache.is_empty());
        }

        #[test]
        fn clear_removes_all_entries_for_user_only() {
            let cache = TokenCache::new();
            let other_user = UserId::new("user-2");
            let other = ResourceId::new("api://graph");
            cache.store(&user(), &tasks_resource(), live_token(&tasks_resource(), "a"));
            cache.store(&user(), &other, live_token(&other, "b"));
            cache.store(&other_user, &tasks_resource(), live_token(&tasks_resource(), "c"));

            cache.clear(&user());

            assert!(cache.lookup(&user(), &tasks_resource()).is_none());
            assert!(cache.lookup(&user(), &other).is_none());
            assert!(cache.lookup(&other_user, &tasks_resource()).is_some());
        }

        #[test]
        fn clones_share_state() {
            let cache = TokenCache::new();
            let alias = cache.clone();
            cache.store(&user(), &tasks_resource(), live_token(&tasks_resource(), "a"));

            assert!(alias.lookup(&user(), &tasks_resource()).is_some());
            alias.invalidate(&user(), &tasks_resource());
            assert!(cache.lookup(&user(), &tasks_resource()).is_none());
        }

        #[test]
        fn concurrent_readers_and_writers_do_not_deadlock() {
            let cache = TokenCache::new();
            let resource = tasks_resource();

            let writers: Vec<_> = (0..8)
                .map(|i| {
                    let cache = cache.clone();
                    let resource = resource.clone();
                    std::thread::spawn(move || {
                        let u = UserId::new(format!("user-{}", i));
                        for _ in 0..100 {
                            cache.store(&u, &resource,
                                Token::new("at", resource.clone(), Utc::now() + Duration::hours(1)));
                            let _ = cache.lookup(&u, &resource);
                            cache.invalidate(&u, &resource);
                        }
                    })
                })
                .collect();

            for handle in writers {
                handle.join().expect("writer thread");
            }
            assert!(cache.is_empty());
        }
    }

    mod invalidation_scoping_property {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// After invalidate(user, resource), lookup for that pair is
            /// none and every other pair is unaffected.
            #[test]
            fn invalidate_removes_exactly_one_key(
                users in proptest::collection::vec("[a-z]{1,8}", 1..6),
                resources in proptest::collection::vec("[a-z]{1,8}", 1..6),
                pick_user in 0usize..6,
                pick_resource in 0usize..6,
            ) {
                let cache = TokenCache::new();
                for u in &users {
                    for r in &resources {
                        let resource = ResourceId::new(r.clone());
                        cache.store(
                            &UserId::new(u.clone()),
                            &resource,
                            Token::new("at", resource.clone(), Utc::now() + Duration::hours(1)),
                        );
                    }
                }

                let target_user = UserId::new(users[pick_user % users.len()].clone());
                let target_resource = ResourceId::new(resources[pick_resource % resources.len()].clone());
                cache.invalidate(&target_user, &target_resource);

                for u in &users {
                    for r in &resources {
                        let user = UserId::new(u.clone());
                        let resource = ResourceId::new(r.clone());
                        let hit = cache.lookup(&user, &resource).is_some();
                        if user == target_user && resource == target_resource {
                            prop_assert!(!hit);
                        } else {
                            prop_assert!(hit);
                        }
                    }
                }
            }
        }
    }
}
