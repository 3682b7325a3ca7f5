//! Per-schema storage reclaim.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;

/// Executes the storage-reclaim operation against one schema.
#[async_trait]
pub trait CompactionExecutor: Send + Sync {
    /// Compacts every table in the named schema. May fail with
    /// arbitrary error text (lock timeouts, permission errors, ...).
    async fn compact(&self, schema: &str) -> Result<()>;
}

/// Runs `VACUUM FULL` with the search path pinned to the target schema.
pub struct PgCompactionExecutor {
    pool: PgPool,
}

impl PgCompactionExecutor {
    /// Creates an executor over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompactionExecutor for PgCompactionExecutor {
    async fn compact(&self, schema: &str) -> Result<()> {
        // search_path is connection-local state, so both statements must
        // run on the same pooled connection. VACUUM cannot run inside a
        // transaction block, which rules out a sqlx transaction here.
        let mut conn = self.pool.acquire().await?;

        sqlx::query(&format!("SET search_path TO {}", quote_ident(schema)))
            .execute(&mut *conn)
            .await?;

        let vacuumed = sqlx::query("VACUUM FULL").execute(&mut *conn).await;

        // Leave the connection clean for the next pool user even when the
        // vacuum failed.
        let _ = sqlx::query("RESET search_path").execute(&mut *conn).await;

        vacuumed?;
        Ok(())
    }
}

/// Quotes a PostgreSQL identifier for interpolation into a statement.
#[must_use]
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_ident_wraps_plain_names() {
        assert_eq!(quote_ident("tenant_a"), "\"tenant_a\"");
    }

    #[test]
    fn quote_ident_escapes_embedded_quotes() {
        assert_eq!(quote_ident("ten\"ant"), "\"ten\"\"ant\"");
    }
}
