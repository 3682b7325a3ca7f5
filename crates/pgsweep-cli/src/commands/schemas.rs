//! Schemas command - list discovered tenant schemas.

use anyhow::Result;

use pgsweep_core::schema::{PgSchemaCatalog, SchemaCatalog};

use crate::{wiring, Settings};

/// Execute the schemas command.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn execute(settings: &Settings) -> Result<()> {
    let pool = wiring::pg_pool(settings).await?;
    let schemas = PgSchemaCatalog::new(pool).list_schemas().await?;

    if schemas.is_empty() {
        println!("No tenant schemas found.");
        return Ok(());
    }

    println!("Found {} tenant schema(s):", schemas.len());
    for schema in &schemas {
        println!("  {schema}");
    }

    Ok(())
}
