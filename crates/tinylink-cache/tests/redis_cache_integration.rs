//! Runs the Redis cache against a real server. Needs a Docker daemon:
//! `cargo test -p tinylink-cache -- --ignored`.

use std::time::Duration;

use redis::AsyncCommands;
use tinylink_cache::{LayeredCache, MokaUrlCache, RedisUrlCache};
use tinylink_core::{ShortCode, UrlCache, UrlRecord};
use tinylink_test_infra::redis::RedisServer;

struct Fixture {
    redis: RedisServer,
}

impl Fixture {
    async fn start() -> Self {
        let redis = RedisServer::new().await.expect("start redis");
        // give the server a moment after the readiness line
        tokio::time::sleep(Duration::from_millis(500)).await;
        Self { redis }
    }

    async fn connection(&self) -> redis::aio::MultiplexedConnection {
        self.redis.connection().await.expect("redis connection")
    }
}

fn code(value: &str) -> ShortCode {
    ShortCode::new(value).unwrap()
}

fn record(c: &str, url: &str) -> UrlRecord {
    UrlRecord::new(code(c), url)
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn get_set_and_invalidate() {
    let fixture = Fixture::start().await;
    let cache = RedisUrlCache::new(fixture.connection().await);
    let c = code("test123");
    let rec = record("test123", "https://example.com");

    assert!(cache.get_url(&c).await.unwrap().is_none());

    cache.set_url(&c, &rec).await.unwrap();
    assert_eq!(cache.get_url(&c).await.unwrap(), Some(rec));

    cache.invalidate(&c).await.unwrap();
    assert!(cache.get_url(&c).await.unwrap().is_none());

    // invalidating again is fine
    cache.invalidate(&c).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn uses_key_prefix() {
    let fixture = Fixture::start().await;
    let cache = RedisUrlCache::new(fixture.connection().await).with_prefix("custom:");
    let c = code("prefix1");

    cache
        .set_url(&c, &record("prefix1", "https://example.com"))
        .await
        .unwrap();

    let mut conn = fixture.connection().await;
    let raw: Option<String> = conn.get("custom:prefix1").await.unwrap();
    assert!(raw.unwrap().contains("https://example.com"));
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn ttl_expires_entries() {
    let fixture = Fixture::start().await;
    let cache = RedisUrlCache::new(fixture.connection().await).with_ttl(Duration::from_secs(1));
    let c = code("ttl123");

    cache
        .set_url(&c, &record("ttl123", "https://example.com"))
        .await
        .unwrap();
    assert!(cache.get_url(&c).await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(2_100)).await;
    assert!(cache.get_url(&c).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn garbage_value_is_invalid_data() {
    let fixture = Fixture::start().await;
    let cache = RedisUrlCache::new(fixture.connection().await);

    let mut conn = fixture.connection().await;
    let _: () = conn.set("tl:url:broken1", "not json").await.unwrap();

    let err = cache.get_url(&code("broken1")).await.unwrap_err();
    assert!(matches!(err, tinylink_core::CacheError::InvalidData(_)));
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn layered_over_redis_backfills_l1() {
    let fixture = Fixture::start().await;
    let redis = RedisUrlCache::connect(&fixture.redis.redis_url().await.unwrap())
        .await
        .unwrap();
    let cache = LayeredCache::new(MokaUrlCache::new(), redis);
    let c = code("layer1");
    let rec = record("layer1", "https://example.com");

    cache.l2().set_url(&c, &rec).await.unwrap();
    assert_eq!(cache.get_url(&c).await.unwrap(), Some(rec.clone()));
    assert_eq!(cache.l1().get_url(&c).await.unwrap(), Some(rec));
}
