//! Counting in-flight background jobs.
//!
//! The drain phase needs one number: how much work is still outstanding.
//! Where that number comes from depends on the queue backend, so each
//! backend gets its own [`JobCounter`] implementation and the choice is
//! made by configuration at construction.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;

/// Source of the in-flight job count sampled by the drain loop.
#[async_trait]
pub trait JobCounter: Send + Sync {
    /// Returns the number of jobs currently reserved or pending.
    async fn in_flight(&self) -> Result<u64>;
}

/// Counts reserved rows in the `jobs` table (database queue backend).
pub struct DatabaseJobCounter {
    pool: PgPool,
}

impl DatabaseJobCounter {
    /// Creates a counter over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobCounter for DatabaseJobCounter {
    async fn in_flight(&self) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE reserved_at IS NOT NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

/// Counts reserved plus pending entries in the Redis queue structures:
/// the cardinality of the reserved sorted set and the length of the
/// pending list.
pub struct RedisJobCounter {
    conn: redis::aio::ConnectionManager,
    reserved_key: String,
    pending_key: String,
}

impl RedisJobCounter {
    /// Creates a counter for `<prefix>queues:<queue>`.
    #[must_use]
    pub fn new(conn: redis::aio::ConnectionManager, prefix: &str, queue: &str) -> Self {
        Self {
            conn,
            reserved_key: reserved_key(prefix, queue),
            pending_key: pending_key(prefix, queue),
        }
    }
}

#[async_trait]
impl JobCounter for RedisJobCounter {
    async fn in_flight(&self) -> Result<u64> {
        let mut conn = self.conn.clone();

        let reserved: u64 = redis::cmd("ZCARD")
            .arg(&self.reserved_key)
            .query_async(&mut conn)
            .await?;
        let pending: u64 = redis::cmd("LLEN")
            .arg(&self.pending_key)
            .query_async(&mut conn)
            .await?;

        Ok(reserved + pending)
    }
}

/// Constant-zero counter for synchronous or unsupported queue backends,
/// where nothing can be outstanding by the time this process runs.
pub struct NullJobCounter;

#[async_trait]
impl JobCounter for NullJobCounter {
    async fn in_flight(&self) -> Result<u64> {
        Ok(0)
    }
}

/// Key of the sorted set holding currently reserved (processing) jobs.
#[must_use]
pub fn reserved_key(prefix: &str, queue: &str) -> String {
    format!("{prefix}queues:{queue}:reserved")
}

/// Key of the list holding pending jobs.
#[must_use]
pub fn pending_key(prefix: &str, queue: &str) -> String {
    format!("{prefix}queues:{queue}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_keys_match_wire_layout() {
        assert_eq!(reserved_key("", "default"), "queues:default:reserved");
        assert_eq!(pending_key("", "default"), "queues:default");
        assert_eq!(reserved_key("app:", "emails"), "app:queues:emails:reserved");
        assert_eq!(pending_key("app:", "emails"), "app:queues:emails");
    }

    #[tokio::test]
    async fn null_counter_is_always_zero() {
        assert_eq!(NullJobCounter.in_flight().await.unwrap(), 0);
    }
}
