use crate::{Error, Generator, Seed};
use rand::Rng;
use tinylink_core::base62::ALPHABET;
use tinylink_core::shortcode::MAX_LENGTH;
use tinylink_core::ShortCode;

/// Shortest length that still carries at least 36 bits of entropy
/// (`7 * log2(62)` is about 41.7 bits; 6 characters would only give 35.7).
pub const MIN_RANDOM_LENGTH: usize = 7;

pub const DEFAULT_RANDOM_LENGTH: usize = 7;

/// Draws every character uniformly from the base62 alphabet.
///
/// The seed is ignored: each call is an independent roll, so a retry after a
/// collision is simply a re-roll.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    /// Creates a generator producing codes of `length` characters.
    pub fn new(length: usize) -> Result<Self, Error> {
        if !(MIN_RANDOM_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(Error::InvalidLength {
                length,
                min: MIN_RANDOM_LENGTH,
                max: MAX_LENGTH,
            });
        }
        Ok(Self { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Entropy of one generated code, in bits.
    pub fn entropy_bits(&self) -> f64 {
        self.length as f64 * (ALPHABET.len() as f64).log2()
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_RANDOM_LENGTH,
        }
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self, _seed: &Seed<'_>) -> Self::Output {
        let mut rng = rand::thread_rng();
        let code: String = (0..self.length)
            .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
            .collect();
        ShortCode::new_unchecked(code)
    }
}
