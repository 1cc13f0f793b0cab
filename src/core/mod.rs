//! core
//!
//! Core domain types and configuration for taskgate.
//!
//! # Modules
//!
//! - [`types`] - Strong types: UserId, ResourceId, Task, etc.
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents mixing up users, resources, and task ids
//! - Entities are transient: tasks are decoded from responses, never cached
//! - Configuration is validated after parsing, not at use sites

pub mod config;
pub mod types;
