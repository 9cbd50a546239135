//! Parsing of the semicolon-delimited catalog file into [`Song`] records.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Datetime;

use crate::errors::Error;

pub const TABLE_NAME: &str = "song";

/// Number of columns every catalog row must have.
const COLUMNS: usize = 9;

/// One entry of the karaoke catalog.
///
/// The record id in the database is derived from `catalog_id`, so the struct
/// carries no id field of its own.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Song {
    /// The unique identifier of the song in the catalog.
    pub catalog_id: i64,
    /// Title of the song.
    pub title: String,
    /// Artist of the song.
    pub artist: String,
    /// The year the song was released.
    pub year: i64,
    /// Whether the song is a duet.
    pub duo: bool,
    /// Whether the song is explicit.
    pub explicit: bool,
    /// The date the song was added to the catalog.
    pub date_added: Datetime,
    /// The styles of the song.
    pub styles: Vec<String>,
    /// The languages of the song.
    pub languages: Vec<String>,
}

/// Zero value for `date_added`, used when the date column cannot be parsed.
#[must_use]
pub fn epoch() -> Datetime {
    Datetime::from(DateTime::<Utc>::UNIX_EPOCH)
}

/// Read the catalog file at `path` into a list of [`Song`]s.
///
/// The first row is a header and is skipped; the remaining rows map
/// positionally to the fields of [`Song`]. A scalar column that fails to
/// parse leaves the zero value in its field, the row is never rejected for
/// it.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or if a row does not have
/// exactly nine columns; there is no partial-import recovery.
pub fn read_songs(path: &Path) -> Result<Vec<Song>, Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .map_err(|source| Error::Catalog {
            path: path.to_path_buf(),
            source,
        })?;

    let mut songs = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(|source| Error::Catalog {
            path: path.to_path_buf(),
            source,
        })?;
        if record.len() != COLUMNS {
            return Err(Error::MalformedRow {
                // +2: one for the skipped header, one for 1-based counting
                row: i + 2,
                found: record.len(),
                expected: COLUMNS,
            });
        }
        songs.push(parse_row(&record));
    }

    Ok(songs)
}

/// Columns: 0:id, 1:title, 2:artist, 3:year, 4:duo, 5:explicit, 6:date,
/// 7:styles, 8:languages.
fn parse_row(record: &StringRecord) -> Song {
    let mut song = Song {
        catalog_id: 0,
        title: record[1].to_string(),
        artist: record[2].to_string(),
        year: 0,
        duo: false,
        explicit: false,
        date_added: epoch(),
        // an empty column splits into one empty string, not an empty list
        styles: record[7].split(',').map(str::to_string).collect(),
        languages: record[8].split(',').map(str::to_string).collect(),
    };

    if let Ok(id) = record[0].parse() {
        song.catalog_id = id;
    }
    if let Ok(year) = record[3].parse() {
        song.year = year;
    }
    if let Some(duo) = parse_flag(&record[4]) {
        song.duo = duo;
    }
    if let Some(explicit) = parse_flag(&record[5]) {
        song.explicit = explicit;
    }
    if let Some(date) = parse_date(&record[6]) {
        song.date_added = date;
    }

    song
}

/// Boolean literals accepted by the catalog: `1`/`t`/`T`/`TRUE`/`true`/`True`
/// and `0`/`f`/`F`/`FALSE`/`false`/`False`. Anything else is no value.
fn parse_flag(column: &str) -> Option<bool> {
    match column {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Dates are `YYYY-MM-DD` and stored as midnight UTC.
fn parse_date(column: &str) -> Option<Datetime> {
    NaiveDate::parse_from_str(column, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Datetime::from(naive.and_utc()))
}
