//! Tenant schema discovery.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;

/// System namespaces that are never maintenance targets.
pub const RESERVED_SCHEMAS: [&str; 3] = ["information_schema", "pg_catalog", "public"];

/// Catalog of tenant schemas eligible for maintenance.
#[async_trait]
pub trait SchemaCatalog: Send + Sync {
    /// Lists tenant schema names, ordered, excluding reserved namespaces.
    async fn list_schemas(&self) -> Result<Vec<String>>;
}

/// Discovers tenant schemas from `information_schema.schemata`.
pub struct PgSchemaCatalog {
    pool: PgPool,
}

impl PgSchemaCatalog {
    /// Creates a catalog over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaCatalog for PgSchemaCatalog {
    async fn list_schemas(&self) -> Result<Vec<String>> {
        let reserved: Vec<String> = RESERVED_SCHEMAS.iter().map(ToString::to_string).collect();

        let schemas = sqlx::query_scalar(
            "SELECT schema_name::text FROM information_schema.schemata \
             WHERE schema_name::text <> ALL($1) \
             ORDER BY schema_name",
        )
        .bind(&reserved)
        .fetch_all(&self.pool)
        .await?;

        Ok(schemas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_set_covers_system_namespaces() {
        assert!(RESERVED_SCHEMAS.contains(&"information_schema"));
        assert!(RESERVED_SCHEMAS.contains(&"pg_catalog"));
        assert!(RESERVED_SCHEMAS.contains(&"public"));
    }
}
