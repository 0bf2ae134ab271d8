//! Domain layer containing the short link entity and storage contract.
//!
//! Records are plain data (row-mappable via `sqlx::FromRow`); persistence
//! lives behind the
//! [`repositories::LinkRepository`] trait, implemented in
//! [`crate::infrastructure::persistence`].
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Data access trait definitions

pub mod entities;
pub mod repositories;
