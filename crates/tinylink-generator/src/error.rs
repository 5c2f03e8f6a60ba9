use thiserror::Error;

/// Errors returned when a generator is configured with unusable settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid code length {length}; expected {min}..={max}")]
    InvalidLength {
        length: usize,
        min: usize,
        max: usize,
    },
    #[error("hash salt must not be empty")]
    EmptySalt,
    #[error("sequence offset {offset} is past the last encodable value {max}")]
    OffsetOutOfRange { offset: u64, max: u64 },
    #[error("'{0}' cannot be decoded as a sequence value")]
    UndecodableCode(String),
}
