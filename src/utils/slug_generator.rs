//! Random slug generation.
//!
//! Slugs are six characters drawn uniformly from `[A-Za-z0-9]`, giving
//! 62^6 (about 5.7 * 10^10) possible values. Uniqueness against the store is
//! enforced by [`crate::application::services::LinkService::generate_unique_slug`]
//! and, ultimately, by the storage layer's unique constraint.

use rand::Rng;

/// Number of characters in every slug.
pub const SLUG_LENGTH: usize = 6;

/// Characters a slug may contain.
pub const SLUG_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Draws a random slug candidate.
///
/// The result is not checked against the store.
///
/// # Examples
///
/// ```ignore
/// let slug = random_slug();
/// assert_eq!(slug.len(), 6);
/// assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn random_slug() -> String {
    let mut rng = rand::rng();

    (0..SLUG_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..SLUG_ALPHABET.len());
            SLUG_ALPHABET[idx] as char
        })
        .collect()
}

/// Returns true if `candidate` has the shape of a generated slug.
pub fn is_valid_slug(candidate: &str) -> bool {
    candidate.len() == SLUG_LENGTH && candidate.bytes().all(|b| SLUG_ALPHABET.contains(&b))
}
