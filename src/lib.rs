//! Taskgate - authenticated resource client for a remote task-list API
//!
//! Taskgate is the auth-aware core of a task-list front end: it acquires
//! per-user access tokens silently, issues authenticated CRUD calls to
//! the backing task API, and classifies failures into the outcomes that
//! matter for the session: re-authenticate, drop the cached credential,
//! or obtain renewed consent.
//!
//! # Architecture
//!
//! The crate follows a strict layered architecture:
//!
//! - [`core`] - Domain types and configuration
//! - [`auth`] - Token cache and silent token provider
//! - [`api`] - Authenticated HTTP client, outcome types, classification
//! - [`flow`] - Per-use-case orchestration (list/get/create/update/delete)
//!
//! The web transport, view rendering, and the identity-provider SDK are
//! external collaborators: taskgate consumes an opaque "acquire token
//! silently" capability and exposes terminal outcomes the caller maps to
//! redirects and rendered errors.
//!
//! # Correctness Invariants
//!
//! 1. A token the backend has rejected is never reused: its cache entry
//!    is invalidated at the classification boundary, before control
//!    returns to the caller.
//! 2. Invalidation is scoped to one `(user, resource)` pair; tokens for
//!    other resources of the same user survive.
//! 3. A partial or malformed envelope is never treated as a decoded
//!    entity.
//! 4. No operation retries automatically; every failure terminates in a
//!    caller-visible outcome.

pub mod api;
pub mod auth;
pub mod core;
pub mod flow;
