//! Utility functions for slug generation, URL processing, and storage errors.
//!
//! - [`slug_generator`] - Random slug drawing and shape checks
//! - [`url_normalizer`] - URL validation and canonicalisation
//! - [`db_error`] - Classification of database constraint violations

pub mod db_error;
pub mod slug_generator;
pub mod url_normalizer;
