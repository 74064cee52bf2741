use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use crate::domain::invoice::ports::PageCache;

const KEY_PREFIX: &str = "page:";
const GENERATION_PREFIX: &str = "page-gen:";

/// Rendered page fragments in Redis, expiring after a fixed TTL
///
/// Fragments live under `page:<path>#<generation>`; `revalidate` increments
/// `page-gen:<path>` and leaves older fragments to expire.
#[derive(Clone)]
pub struct RedisPageCache {
  redis: ConnectionManager,
  ttl_seconds: u64,
}

impl RedisPageCache {
  pub fn new(redis: ConnectionManager, ttl_seconds: u64) -> Self {
    Self { redis, ttl_seconds }
  }

  fn key(path: &str, generation: u64) -> String {
    format!("{}{}#{}", KEY_PREFIX, path, generation)
  }

  fn generation_key(path: &str) -> String {
    format!("{}{}", GENERATION_PREFIX, path)
  }
}

#[async_trait]
impl PageCache for RedisPageCache {
  async fn generation(&self, path: &str) -> u64 {
    let mut conn = self.redis.clone();

    match conn.get::<_, Option<u64>>(Self::generation_key(path)).await {
      Ok(generation) => generation.unwrap_or(0),
      Err(e) => {
        tracing::warn!(path, error = %e, "Page cache generation read failed");
        0
      }
    }
  }

  async fn get(&self, path: &str, generation: u64) -> Option<String> {
    let mut conn = self.redis.clone();

    match conn
      .get::<_, Option<String>>(Self::key(path, generation))
      .await
    {
      Ok(html) => html,
      Err(e) => {
        tracing::warn!(path, error = %e, "Page cache read failed");
        None
      }
    }
  }

  async fn put(&self, path: &str, generation: u64, html: &str) {
    let mut conn = self.redis.clone();

    if let Err(e) = conn
      .set_ex::<_, _, ()>(Self::key(path, generation), html, self.ttl_seconds)
      .await
    {
      tracing::warn!(path, error = %e, "Page cache write failed");
    }
  }

  async fn revalidate(&self, path: &str) {
    let mut conn = self.redis.clone();

    match conn.incr::<_, _, u64>(Self::generation_key(path), 1).await {
      Ok(generation) => tracing::debug!(path, generation, "Page revalidated"),
      Err(e) => tracing::warn!(path, error = %e, "Page cache revalidation failed"),
    }
  }
}
