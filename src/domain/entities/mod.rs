//! Core domain entities.
//!
//! Entities follow the "New Type" pattern with a separate struct for creation:
//! [`ShortLink`] is a stored record, [`NewShortLink`] is the insert input.

pub mod short_link;

pub use short_link::{NewShortLink, ShortLink};
