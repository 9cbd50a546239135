//! CRUD operations for the song table.

use log::warn;
use surrealdb::{Connection, Surreal};
use tracing::instrument;

use crate::{
    catalog::{Song, TABLE_NAME},
    errors::Error,
};

/// Which path an upsert took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record with this id existed before the call.
    Inserted,
    /// An existing record was replaced.
    Updated,
}

/// Struct to assist deserializing the results of the count query
#[derive(Debug, serde::Deserialize)]
struct Count {
    count: u64,
}

impl Song {
    /// Write this song to the database under `song:<catalog_id>`, replacing
    /// the stored record when one already exists.
    ///
    /// The statement returns its pre-image, which tells the two paths apart:
    /// an empty pre-image means this call created the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails, e.g. because the write violates
    /// the table schema or a unique index.
    #[instrument(skip_all, fields(id = self.catalog_id))]
    pub async fn upsert<C: Connection>(&self, db: &Surreal<C>) -> Result<UpsertOutcome, Error> {
        let mut response = db
            .query("UPSERT type::thing($tb, $id) CONTENT $data RETURN BEFORE;")
            .bind(("tb", TABLE_NAME))
            .bind(("id", self.catalog_id))
            .bind(("data", self.clone()))
            .await?
            .check()?;
        let before: Option<Self> = response.take(0)?;

        Ok(match before {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Inserted,
        })
    }

    /// Read one song by its catalog id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or if the result cannot be
    /// deserialized.
    pub async fn read<C: Connection>(
        db: &Surreal<C>,
        catalog_id: i64,
    ) -> Result<Option<Self>, Error> {
        Ok(db.select((TABLE_NAME, catalog_id)).await?)
    }

    /// Count the number of songs in the table.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or if the result cannot be
    /// deserialized.
    pub async fn count<C: Connection>(db: &Surreal<C>) -> Result<u64, Error> {
        let result: Option<Count> = db
            .query(format!("SELECT count() FROM {TABLE_NAME} GROUP ALL"))
            .await?
            .take(0)?;

        Ok(result.map_or_else(
            || {
                warn!("When counting entries in table {TABLE_NAME}, no count was returned");
                0
            },
            |c| c.count,
        ))
    }
}
