//! Database plumbing: connection bootstrap, schema and index reconciliation,
//! and the per-record upsert.

pub mod crud;
pub mod indexes;
pub mod schema;

use log::info;
use surrealdb::{Surreal, engine::any::Any};

use crate::{config::Settings, errors::Error};

/// Connect to the store named by `settings` and select the importer's
/// namespace and database.
///
/// # Errors
///
/// This function will return an error if the endpoint cannot be reached or
/// the namespace/database cannot be selected.
pub async fn connect(settings: &Settings) -> Result<Surreal<Any>, Error> {
    let db = surrealdb::engine::any::connect(settings.endpoint.as_str()).await?;
    db.use_ns(settings.namespace.as_str())
        .use_db(settings.database.as_str())
        .await?;
    info!("Connected to karaoke database at {}", settings.endpoint);

    Ok(db)
}
