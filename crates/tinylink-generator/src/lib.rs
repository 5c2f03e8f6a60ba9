//! Short code generators.
//!
//! Generators are pure: they never talk to storage. Uniqueness is settled by
//! the store's insert-if-absent, and the shortener asks for a fresh candidate
//! (with a bumped [`Seed::attempt`]) whenever a code turns out to be taken.

pub mod error;
pub mod hash;
pub mod random;
pub mod seq;

pub use error::Error;
pub use hash::{HashGenerator, HashSettings};
pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use tinylink_core::ShortCode;

/// Input for a single generation attempt.
#[derive(Debug, Clone, Copy)]
pub struct Seed<'a> {
    /// The URL being shortened.
    pub original_url: &'a str,
    /// Zero for the first candidate, incremented on every collision.
    pub attempt: u32,
}

impl<'a> Seed<'a> {
    pub fn new(original_url: &'a str, attempt: u32) -> Self {
        Self {
            original_url,
            attempt,
        }
    }
}

/// Trait for generating short codes.
///
/// Implementations can vary from random generators to hash-based or
/// counter-based ones. Two calls with different seeds should produce
/// different codes with overwhelming probability.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Generates a candidate short code for the given seed.
    fn generate(&self, seed: &Seed<'_>) -> Self::Output;
}
