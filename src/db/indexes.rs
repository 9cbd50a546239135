//! Declaration and reconciliation of the secondary indexes on the `song`
//! table.

use std::fmt::Write as _;

use log::info;
use serde_json::Value;
use surrealdb::{Connection, Surreal};
use tracing::instrument;

use crate::{catalog::TABLE_NAME, errors::Error};

/// Sort direction of an indexed column. The direction is rendered into the
/// canonical index name; the index definitions themselves carry none.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i8)]
pub enum Direction {
    Ascending = 1,
    Descending = -1,
}

/// Specification of one secondary index on the `song` table.
pub struct IndexSpec {
    /// Explicit name; when `None` the name is derived from the columns.
    name: Option<&'static str>,
    columns: &'static [(&'static str, Direction)],
    unique: bool,
}

/// The indexes every run converges the table to: the unique business key,
/// the unique (title, artist, year) triple, and two lookup indexes.
pub const SONG_INDEXES: &[IndexSpec] = &[
    IndexSpec {
        name: None,
        columns: &[("catalog_id", Direction::Ascending)],
        unique: true,
    },
    IndexSpec {
        name: None,
        columns: &[
            ("title", Direction::Ascending),
            ("artist", Direction::Ascending),
            ("year", Direction::Ascending),
        ],
        unique: true,
    },
    IndexSpec {
        name: None,
        columns: &[("title", Direction::Ascending)],
        unique: false,
    },
    IndexSpec {
        name: None,
        columns: &[("artist", Direction::Ascending)],
        unique: false,
    },
];

impl IndexSpec {
    /// Canonical name of the index: the configured name if there is one,
    /// otherwise every column joined with its direction by underscores
    /// (e.g. `title_1_artist_1_year_1`).
    #[must_use]
    pub fn name(&self) -> String {
        self.name.map_or_else(
            || {
                let mut name = String::new();
                for (i, (column, direction)) in self.columns.iter().enumerate() {
                    if i > 0 {
                        name.push('_');
                    }
                    let _ = write!(name, "{column}_{}", *direction as i8);
                }
                name
            },
            str::to_string,
        )
    }

    fn definition(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|(column, _)| *column)
            .collect::<Vec<_>>()
            .join(", ");
        let unique = if self.unique { " UNIQUE" } else { "" };

        format!(
            "DEFINE INDEX IF NOT EXISTS {} ON TABLE {TABLE_NAME} COLUMNS {columns}{unique};",
            self.name()
        )
    }
}

/// Converge the table's indexes on [`SONG_INDEXES`]: drop every existing
/// index that is no longer desired, then (re)issue every desired definition,
/// leaving create-if-absent to the store rather than pre-filtering.
///
/// # Errors
///
/// This function will return an error if listing, dropping, or creating an
/// index fails.
#[instrument(skip(db))]
pub async fn reconcile<C: Connection>(db: &Surreal<C>) -> Result<(), Error> {
    let desired: Vec<String> = SONG_INDEXES.iter().map(IndexSpec::name).collect();

    for name in existing_names(db).await? {
        if !desired.contains(&name) {
            info!("dropping index {name}");
            db.query(format!("REMOVE INDEX {name} ON TABLE {TABLE_NAME};"))
                .await?
                .check()?;
        }
    }

    for spec in SONG_INDEXES {
        db.query(spec.definition()).await?.check()?;
    }

    Ok(())
}

/// Names of the indexes currently defined on the table. The built-in primary
/// key is never part of the listing.
pub(crate) async fn existing_names<C: Connection>(db: &Surreal<C>) -> Result<Vec<String>, Error> {
    let mut response = db
        .query(format!("INFO FOR TABLE {TABLE_NAME};"))
        .await?
        .check()?;
    let indexes: Vec<Value> = response.take((0, "indexes"))?;

    Ok(indexes
        .first()
        .and_then(Value::as_object)
        .map(|indexes| indexes.keys().cloned().collect())
        .unwrap_or_default())
}
