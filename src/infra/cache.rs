//! Redis connection used for rate limiting and health probes.
//!
//! Wraps a multiplexed connection manager; the fixed-window counters behind
//! the rate limiter live here.

use once_cell::sync::Lazy;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError, Script};

use crate::config::CACHE_PREFIX_RATE_LIMIT;
use crate::errors::{AppError, AppResult};

/// INCR the window counter and make sure it expires, in one round trip.
/// A counter left without a TTL is given one on its next hit.
static WINDOW_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r"
local count = redis.call('INCR', KEYS[1])
if count == 1 or redis.call('TTL', KEYS[1]) < 0 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return count
",
    )
});

/// Redis handle shared by every request.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis at the given URL.
    pub async fn connect(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }

    /// Round-trip a PING to the server.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    // =========================================================================
    // Rate Limiting Operations
    // =========================================================================

    /// Count a request against a fixed window.
    /// Returns (current_count, is_allowed) tuple.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = rate_limit_key(identifier);
        let mut conn = self.connection.clone();

        let count: i64 = WINDOW_SCRIPT
            .key(&key)
            .arg(window_seconds.max(1))
            .invoke_async(&mut conn)
            .await
            .map_err(cache_error)?;

        let count = count.max(0) as u64;
        Ok((count, count <= max_requests))
    }

    /// Seconds until the current window for `identifier` closes.
    pub async fn rate_limit_reset_in(&self, identifier: &str) -> AppResult<Option<u64>> {
        let mut conn = self.connection.clone();
        let ttl: i64 = conn
            .ttl(rate_limit_key(identifier))
            .await
            .map_err(cache_error)?;
        Ok(u64::try_from(ttl).ok())
    }
}

fn rate_limit_key(identifier: &str) -> String {
    format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier)
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}
