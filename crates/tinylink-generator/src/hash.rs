use crate::{Error, Generator, Seed};
use sha2::{Digest, Sha256};
use tinylink_core::base62;
use tinylink_core::shortcode::MAX_LENGTH;
use tinylink_core::ShortCode;
use typed_builder::TypedBuilder;

/// Same entropy floor as [`MIN_RANDOM_LENGTH`](crate::random::MIN_RANDOM_LENGTH).
pub const MIN_HASH_LENGTH: usize = crate::random::MIN_RANDOM_LENGTH;
pub const DEFAULT_HASH_LENGTH: usize = 8;

// a u64 never needs more than 11 base62 digits
const U64_BASE62_WIDTH: usize = 11;

/// Configures a [`HashGenerator`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct HashSettings {
    /// Mixed into every digest so codes cannot be predicted from the URL alone.
    #[builder(setter(into))]
    pub salt: String,
    /// Length of the produced codes, in `7..=10`.
    #[builder(default = DEFAULT_HASH_LENGTH)]
    pub length: usize,
}

/// Derives codes from `SHA-256(salt || attempt || original_url)`.
///
/// The same URL maps to the same first candidate on every node, and each
/// retry re-salts the digest with the attempt number.
#[derive(Debug, Clone)]
pub struct HashGenerator {
    salt: String,
    length: usize,
}

impl HashGenerator {
    pub fn new(settings: HashSettings) -> Result<Self, Error> {
        if !(MIN_HASH_LENGTH..=MAX_LENGTH).contains(&settings.length) {
            return Err(Error::InvalidLength {
                length: settings.length,
                min: MIN_HASH_LENGTH,
                max: MAX_LENGTH,
            });
        }
        if settings.salt.is_empty() {
            return Err(Error::EmptySalt);
        }

        Ok(Self {
            salt: settings.salt,
            length: settings.length,
        })
    }

    fn digest(&self, seed: &Seed<'_>) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(seed.attempt.to_be_bytes());
        hasher.update(seed.original_url.as_bytes());
        let digest = hasher.finalize();

        let mut head = [0_u8; 8];
        head.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(head)
    }
}

impl Generator for HashGenerator {
    type Output = ShortCode;

    fn generate(&self, seed: &Seed<'_>) -> Self::Output {
        let encoded = base62::encode_u64_padded(self.digest(seed), U64_BASE62_WIDTH);
        // Keep the low-order digits; the leading digit of a padded u64 only spans 0..=4.
        let code = &encoded[encoded.len() - self.length..];
        ShortCode::new_unchecked(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(salt: &str) -> HashGenerator {
        HashGenerator::new(HashSettings::builder().salt(salt).build()).unwrap()
    }

    #[test]
    fn same_seed_same_code() {
        let generator = generator("pepper");
        let seed = Seed::new("https://example.com/a", 0);
        assert_eq!(generator.generate(&seed), generator.generate(&seed));
    }

    #[test]
    fn retry_changes_code() {
        let generator = generator("pepper");
        let first = generator.generate(&Seed::new("https://example.com/a", 0));
        let second = generator.generate(&Seed::new("https://example.com/a", 1));
        assert_ne!(first, second);
    }

    #[test]
    fn salt_changes_code() {
        let seed = Seed::new("https://example.com/a", 0);
        assert_ne!(
            generator("pepper").generate(&seed),
            generator("paprika").generate(&seed)
        );
    }

    #[test]
    fn shortest_codes_have_seven_chars() {
        let generator = HashGenerator::new(
            HashSettings::builder()
                .salt("pepper")
                .length(MIN_HASH_LENGTH)
                .build(),
        )
        .unwrap();
        let code = generator.generate(&Seed::new("https://example.com/a", 0));
        assert_eq!(code.as_str().len(), 7);
    }

    #[test]
    fn honours_length() {
        let generator =
            HashGenerator::new(HashSettings::builder().salt("pepper").length(10).build()).unwrap();
        let code = generator.generate(&Seed::new("https://example.com/a", 3));
        assert_eq!(code.as_str().len(), 10);
        assert!(ShortCode::new(code.as_str()).is_ok());
    }

    #[test]
    fn rejects_bad_settings() {
        assert!(matches!(
            HashGenerator::new(HashSettings::builder().salt("pepper").length(6).build()),
            Err(Error::InvalidLength { length: 6, min: 7, .. })
        ));
        assert_eq!(
            HashGenerator::new(HashSettings::builder().salt("").build()).unwrap_err(),
            Error::EmptySalt
        );
    }
}
