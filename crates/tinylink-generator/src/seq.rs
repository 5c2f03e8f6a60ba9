use crate::{Error, Generator, Seed};
use std::sync::atomic::{AtomicU64, Ordering};
use tinylink_core::base62;
use tinylink_core::shortcode::{MAX_LENGTH, MIN_LENGTH};
use tinylink_core::ShortCode;

pub const DEFAULT_SEQ_LENGTH: usize = 6;

/// Number of distinct counter values that fit in a maximum-length code (62^10).
pub const SEQ_CAPACITY: u64 = 839_299_365_868_340_224;

/// A short code generator backed by a monotonically increasing counter.
///
/// Each counter value is encoded as base62 and left-padded with `'0'` up to
/// the configured minimum length, producing codes like `"0000"`, `"0001"`, ...
///
/// The counter lives in memory. Against a durable store, start it with
/// [`SeqGenerator::resume_after`] so a restarted process does not walk
/// through codes it already handed out. For several nodes sharing one
/// store, give each node a disjoint counter range with
/// [`SeqGenerator::with_offset`]; any overlap is still caught by the store
/// and retried.
///
/// Once [`SEQ_CAPACITY`] values are used up the generator keeps returning
/// the last code, which the store reports as taken.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    min_length: usize,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            min_length: self.min_length,
        }
    }
}

impl SeqGenerator {
    /// Creates a generator starting at zero.
    pub fn new(min_length: usize) -> Result<Self, Error> {
        Self::with_offset(min_length, 0)
    }

    /// Creates a generator starting from a specific counter value.
    ///
    /// Useful for distributing counter ranges across nodes
    /// (e.g. node 1 starts at 0, node 2 at 1_000_000).
    pub fn with_offset(min_length: usize, offset: u64) -> Result<Self, Error> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&min_length) {
            return Err(Error::InvalidLength {
                length: min_length,
                min: MIN_LENGTH,
                max: MAX_LENGTH,
            });
        }
        if offset >= SEQ_CAPACITY {
            return Err(Error::OffsetOutOfRange {
                offset,
                max: SEQ_CAPACITY - 1,
            });
        }

        Ok(Self {
            counter: AtomicU64::new(offset),
            min_length,
        })
    }

    /// Creates a generator that continues after `last`, the highest code
    /// already stored, and never starts below `offset`.
    pub fn resume_after(
        min_length: usize,
        offset: u64,
        last: Option<&ShortCode>,
    ) -> Result<Self, Error> {
        let next = match last {
            Some(code) => base62::decode_u64(code.as_str())
                .ok_or_else(|| Error::UndecodableCode(code.to_string()))?
                .saturating_add(1),
            None => 0,
        };
        Self::with_offset(min_length, next.max(offset))
    }

    /// The counter value the next call to `generate` will encode.
    pub fn next_value(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    fn advance(&self) -> u64 {
        match self
            .counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                (count < SEQ_CAPACITY).then_some(count + 1)
            }) {
            Ok(count) => count,
            Err(_) => SEQ_CAPACITY - 1,
        }
    }
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self, _seed: &Seed<'_>) -> Self::Output {
        let count = self.advance();
        ShortCode::new_unchecked(base62::encode_u64_padded(count, self.min_length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next(generator: &SeqGenerator) -> ShortCode {
        generator.generate(&Seed::new("https://example.com", 0))
    }

    #[test]
    fn produces_sequential_codes() {
        let generator = SeqGenerator::new(4).unwrap();

        assert_eq!(next(&generator).as_str(), "0000");
        assert_eq!(next(&generator).as_str(), "0001");
        assert_eq!(next(&generator).as_str(), "0002");
    }

    #[test]
    fn with_offset() {
        let generator = SeqGenerator::with_offset(6, 62).unwrap();

        assert_eq!(next(&generator).as_str(), "000010");
        assert_eq!(next(&generator).as_str(), "000011");
    }

    #[test]
    fn grows_past_min_length() {
        let generator = SeqGenerator::with_offset(4, 62_u64.pow(4)).unwrap();
        assert_eq!(next(&generator).as_str(), "10000");
    }

    #[test]
    fn rejects_bad_min_length() {
        assert!(SeqGenerator::new(3).is_err());
        assert!(SeqGenerator::new(11).is_err());
    }

    #[test]
    fn capacity_is_ten_base62_digits() {
        assert_eq!(SEQ_CAPACITY, 62_u64.pow(10));
    }

    #[test]
    fn rejects_offsets_past_capacity() {
        assert_eq!(
            SeqGenerator::with_offset(6, u64::MAX).unwrap_err(),
            Error::OffsetOutOfRange {
                offset: u64::MAX,
                max: SEQ_CAPACITY - 1
            }
        );
        assert!(SeqGenerator::with_offset(6, SEQ_CAPACITY).is_err());
    }

    #[test]
    fn stays_within_max_length_when_exhausted() {
        let generator = SeqGenerator::with_offset(4, SEQ_CAPACITY - 1).unwrap();

        let last = next(&generator);
        assert_eq!(last.as_str(), "zzzzzzzzzz");
        // no wraparound and no 11-character codes
        assert_eq!(next(&generator), last);
        assert_eq!(next(&generator), last);
        assert!(ShortCode::new(last.as_str()).is_ok());
    }

    #[test]
    fn resume_continues_after_last_code() {
        let last = ShortCode::new("000004").unwrap();
        let generator = SeqGenerator::resume_after(6, 0, Some(&last)).unwrap();

        assert_eq!(next(&generator).as_str(), "000005");
    }

    #[test]
    fn resume_respects_offset_floor() {
        let last = ShortCode::new("000004").unwrap();
        let generator = SeqGenerator::resume_after(6, 1_000, Some(&last)).unwrap();
        assert_eq!(generator.next_value(), 1_000);

        let empty = SeqGenerator::resume_after(6, 7, None).unwrap();
        assert_eq!(empty.next_value(), 7);
    }

    #[test]
    fn resume_after_last_encodable_code_fails() {
        let last = ShortCode::new("zzzzzzzzzz").unwrap();
        assert!(matches!(
            SeqGenerator::resume_after(6, 0, Some(&last)),
            Err(Error::OffsetOutOfRange { .. })
        ));
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SeqGenerator>();
    }

    #[test]
    fn clone_preserves_counter_state() {
        let generator = SeqGenerator::new(4).unwrap();
        next(&generator);
        next(&generator);

        let cloned = generator.clone();

        // Original continues from 2
        assert_eq!(next(&generator).as_str(), "0002");

        // Clone also continues from 2 (same counter value)
        assert_eq!(next(&cloned).as_str(), "0002");
    }
}
