use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("SurrealDB error: {0}")]
    Db(#[from] surrealdb::Error),
    #[error("error reading catalog file ({path}): {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("row {row} of the catalog has {found} columns, expected {expected}")]
    MalformedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("deadline of {0:?} elapsed before the import finished")]
    DeadlineElapsed(std::time::Duration),
}
