//! One-shot importer that loads a karaoke catalog file into an embedded
//! SurrealDB database.
//!
//! A run parses the catalog, converges the `song` table's schema and indexes
//! on the layout declared in [`db::schema`] and [`db::indexes`], and upserts
//! every parsed record, reporting how many records were inserted and how many
//! replaced an existing one.

use std::fmt;

use surrealdb::{Connection, Surreal};

pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

use catalog::Song;
use config::Settings;
use db::crud::UpsertOutcome;
use errors::Error;

/// Totals reported by a completed import run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Import complete: inserted {} songs and updated {} songs!",
            self.inserted, self.updated
        )
    }
}

/// Run one import: parse the catalog, reconcile the table schema and
/// indexes, and upsert every record in order.
///
/// The catalog is read before the store is touched, and the whole interaction
/// with the store runs under the single deadline from `settings`.
///
/// # Errors
///
/// This function will return an error if the catalog cannot be read, if the
/// deadline elapses, or on the first store error; the import stops at the
/// failing record with no retry or partial recovery.
pub async fn run(settings: &Settings) -> Result<ImportSummary, Error> {
    let songs = catalog::read_songs(&settings.catalog_path)?;
    log::info!(
        "parsed {} songs from {}",
        songs.len(),
        settings.catalog_path.display()
    );

    let store = async {
        let db = db::connect(settings).await?;
        db::schema::reconcile(&db).await?;
        db::indexes::reconcile(&db).await?;
        import_songs(&db, &songs).await
    };

    match tokio::time::timeout(settings.timeout(), store).await {
        Ok(result) => result,
        Err(_) => Err(Error::DeadlineElapsed(settings.timeout())),
    }
}

/// Upsert every song sequentially, tallying which path each one took.
async fn import_songs<C: Connection>(
    db: &Surreal<C>,
    songs: &[Song],
) -> Result<ImportSummary, Error> {
    let mut inserted = 0;
    for song in songs {
        println!(
            "Upserting song ({}): \"{}\" by {}",
            song.catalog_id, song.title, song.artist
        );
        if song.upsert(db).await? == UpsertOutcome::Inserted {
            inserted += 1;
        }
    }

    Ok(ImportSummary {
        inserted,
        updated: songs.len() - inserted,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_utils::{init_test_database, sample_song};

    const CATALOG: &str = "\
Id;Title;Artist;Year;Duo;Explicit;Date Added;Styles;Languages
42;Bohemian Rhapsody;Queen;1975;false;false;2020-01-15;Rock,Opera;English
7;Islands in the Stream;Kenny Rogers;1983;true;false;2019-06-01;Country;English
";

    #[tokio::test]
    async fn importing_twice_converges() -> anyhow::Result<()> {
        let db = init_test_database().await?;
        db::schema::reconcile(&db).await?;
        db::indexes::reconcile(&db).await?;
        let songs: Vec<Song> = (1..=5).map(sample_song).collect();

        let first = import_songs(&db, &songs).await?;
        assert_eq!(
            first,
            ImportSummary {
                inserted: 5,
                updated: 0,
            }
        );

        // a second pass replaces every record instead of growing the table
        db::schema::reconcile(&db).await?;
        db::indexes::reconcile(&db).await?;
        let second = import_songs(&db, &songs).await?;
        assert_eq!(
            second,
            ImportSummary {
                inserted: 0,
                updated: 5,
            }
        );

        assert_eq!(Song::count(&db).await?, 5);
        Ok(())
    }

    #[tokio::test]
    async fn a_failing_upsert_aborts_the_run() -> anyhow::Result<()> {
        let db = init_test_database().await?;
        db::schema::reconcile(&db).await?;
        db::indexes::reconcile(&db).await?;

        // the third song collides with the second on (title, artist, year)
        let mut duplicate = sample_song(2);
        duplicate.catalog_id = 3;
        let songs = vec![sample_song(1), sample_song(2), duplicate];

        let result = import_songs(&db, &songs).await;

        assert!(result.is_err());
        assert_eq!(Song::count(&db).await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn run_imports_a_catalog_end_to_end() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let catalog_path = dir.path().join("catalog.csv");
        std::fs::write(&catalog_path, CATALOG)?;
        let settings = Settings {
            catalog_path,
            endpoint: format!("surrealkv://{}", dir.path().join("db").display()),
            ..Settings::default()
        };

        let first = run(&settings).await?;
        assert_eq!(
            first,
            ImportSummary {
                inserted: 2,
                updated: 0,
            }
        );

        // the store outlives the run, so a re-run only updates
        let second = run(&settings).await?;
        assert_eq!(
            second,
            ImportSummary {
                inserted: 0,
                updated: 2,
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn a_missing_catalog_fails_before_the_store_is_touched() {
        let settings = Settings {
            catalog_path: "./does-not-exist.csv".into(),
            endpoint: "mem://".to_string(),
            ..Settings::default()
        };

        let result = run(&settings).await;

        assert!(matches!(result, Err(Error::Catalog { .. })));
    }
}
