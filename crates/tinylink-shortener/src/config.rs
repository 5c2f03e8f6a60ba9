use typed_builder::TypedBuilder;

/// How many candidate codes `create_short_url` tries before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Tuning knobs for [`ShortenerService`](crate::ShortenerService).
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerConfig {
    /// Upper bound on insert attempts per create. Values below 1 are treated as 1.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
