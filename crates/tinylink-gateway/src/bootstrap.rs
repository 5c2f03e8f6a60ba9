use std::sync::Arc;
use std::time::Duration;

use tinylink_cache::{LayeredCache, MokaUrlCache, NoopCache, RedisUrlCache};
use tinylink_core::{UrlCache, UrlStore};
use tinylink_generator::hash::DEFAULT_HASH_LENGTH;
use tinylink_generator::random::DEFAULT_RANDOM_LENGTH;
use tinylink_generator::seq::DEFAULT_SEQ_LENGTH;
use tinylink_generator::{HashGenerator, HashSettings, RandomGenerator, SeqGenerator};
use tinylink_shortener::{Shortener, ShortenerConfig, ShortenerService};
use tinylink_storage::{InMemoryStore, MySqlStore};
use tracing::info;

use crate::cli::{CacheBackendArg, GeneratorArg, StorageBackendArg, CLI};

pub type BootstrapError = Box<dyn std::error::Error + Send + Sync>;
type Result<T> = std::result::Result<T, BootstrapError>;

/// Wires the store, cache and generator selected on the command line into
/// one shortener.
pub async fn build_shortener(cli: &CLI) -> Result<Arc<dyn Shortener>> {
    match cli.storage {
        StorageBackendArg::InMemory => with_store(cli, InMemoryStore::new()).await,
        StorageBackendArg::Mysql => {
            let mysql_dsn = cli
                .mysql_dsn
                .as_deref()
                .ok_or("mysql dsn is required when storage backend is mysql")?;
            let store = MySqlStore::connect(mysql_dsn).await?;
            store.ensure_schema().await?;
            info!("connected to mysql");
            with_store(cli, store).await
        }
    }
}

async fn with_store<S: UrlStore>(cli: &CLI, store: S) -> Result<Arc<dyn Shortener>> {
    match cli.cache {
        CacheBackendArg::None => with_cache(cli, store, NoopCache).await,
        CacheBackendArg::Moka => with_cache(cli, store, moka_cache(cli)).await,
        CacheBackendArg::Redis => {
            let redis = redis_cache(cli).await?;
            with_cache(cli, store, redis).await
        }
        CacheBackendArg::Layered => {
            let redis = redis_cache(cli).await?;
            with_cache(cli, store, LayeredCache::new(moka_cache(cli), redis)).await
        }
    }
}

async fn with_cache<S: UrlStore, C: UrlCache>(
    cli: &CLI,
    store: S,
    cache: C,
) -> Result<Arc<dyn Shortener>> {
    let config = ShortenerConfig::builder()
        .max_attempts(cli.max_attempts)
        .build();

    let shortener: Arc<dyn Shortener> = match cli.generator {
        GeneratorArg::Random => {
            let generator =
                RandomGenerator::new(cli.code_length.unwrap_or(DEFAULT_RANDOM_LENGTH))?;
            Arc::new(ShortenerService::with_config(store, cache, generator, config))
        }
        GeneratorArg::Hash => {
            let salt = cli
                .hash_salt
                .clone()
                .ok_or("hash salt is required when generator is hash")?;
            let settings = HashSettings::builder()
                .salt(salt)
                .length(cli.code_length.unwrap_or(DEFAULT_HASH_LENGTH))
                .build();
            let generator = HashGenerator::new(settings)?;
            Arc::new(ShortenerService::with_config(store, cache, generator, config))
        }
        GeneratorArg::Seq => {
            let generator = seq_generator(cli, &store).await?;
            Arc::new(ShortenerService::with_config(store, cache, generator, config))
        }
    };

    Ok(shortener)
}

/// Picks up after the greatest code already in the store, so a restart
/// against a durable store does not replay taken codes.
async fn seq_generator<S: UrlStore>(cli: &CLI, store: &S) -> Result<SeqGenerator> {
    let last = store.max_code().await?;
    let generator = SeqGenerator::resume_after(
        cli.code_length.unwrap_or(DEFAULT_SEQ_LENGTH),
        cli.seq_offset,
        last.as_ref(),
    )?;
    info!(
        last_code = ?last.as_ref().map(|code| code.as_str()),
        next_value = generator.next_value(),
        "resumed sequence generator"
    );
    Ok(generator)
}

fn cache_ttl(cli: &CLI) -> Option<Duration> {
    (cli.cache_ttl_secs > 0).then(|| Duration::from_secs(cli.cache_ttl_secs))
}

fn moka_cache(cli: &CLI) -> MokaUrlCache {
    match cache_ttl(cli) {
        Some(ttl) => MokaUrlCache::with_ttl(cli.moka_capacity, ttl),
        None => MokaUrlCache::with_capacity(cli.moka_capacity),
    }
}

async fn redis_cache(cli: &CLI) -> Result<RedisUrlCache> {
    let redis_url = cli
        .redis_url
        .as_deref()
        .ok_or("redis url is required when cache backend uses redis")?;
    let cache = RedisUrlCache::connect(redis_url).await?;
    info!("connected to redis");

    Ok(match cache_ttl(cli) {
        Some(ttl) => cache.with_ttl(ttl),
        None => cache,
    })
}
