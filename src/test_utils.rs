//! Helpers shared by the crate's tests.

use surrealdb::{Surreal, engine::any::Any};

use crate::catalog::{Song, epoch};

/// Fresh in-memory database with the importer's namespace and database
/// selected.
///
/// # Errors
///
/// This function will return an error if the in-memory engine cannot be
/// started.
pub async fn init_test_database() -> surrealdb::Result<Surreal<Any>> {
    let db = surrealdb::engine::any::connect("mem://").await?;
    db.use_ns("karaoke").use_db("catalog").await?;

    Ok(db)
}

/// A song with plausible values derived from `catalog_id`.
#[must_use]
pub fn sample_song(catalog_id: i64) -> Song {
    Song {
        catalog_id,
        title: format!("Song {catalog_id}"),
        artist: format!("Artist {catalog_id}"),
        year: 1990 + catalog_id,
        duo: catalog_id % 2 == 0,
        explicit: false,
        date_added: epoch(),
        styles: vec!["Pop".to_string()],
        languages: vec!["English".to_string()],
    }
}
