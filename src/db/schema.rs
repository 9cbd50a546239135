//! Declaration and reconciliation of the `song` table schema.

use log::info;
use serde_json::Value;
use surrealdb::{Connection, Surreal};
use tracing::instrument;

use crate::{catalog::TABLE_NAME, errors::Error};

/// Field declarations for the `song` table, declared once in code rather
/// than derived from data. Required fields use plain types so the store
/// rejects writes that omit them; every other field is `option<...>`.
const FIELDS: &[&str] = &[
    "DEFINE FIELD OVERWRITE catalog_id ON song TYPE int;",
    "DEFINE FIELD OVERWRITE title ON song TYPE string;",
    "DEFINE FIELD OVERWRITE artist ON song TYPE string;",
    "DEFINE FIELD OVERWRITE year ON song TYPE option<int>;",
    "DEFINE FIELD OVERWRITE duo ON song TYPE option<bool>;",
    "DEFINE FIELD OVERWRITE explicit ON song TYPE option<bool>;",
    "DEFINE FIELD OVERWRITE date_added ON song TYPE option<datetime>;",
    "DEFINE FIELD OVERWRITE styles ON song TYPE option<array<string>>;",
    "DEFINE FIELD OVERWRITE languages ON song TYPE option<array<string>>;",
];

/// Ensure the `song` table exists and enforces the declared schema.
///
/// An existing table has its definition overwritten in place: stored records
/// are left untouched and only new writes are validated, so repeated runs
/// converge on the same schema without duplicating or dropping the table.
///
/// # Errors
///
/// This function will return an error if listing, creating, or modifying the
/// table fails; there is no partial-success state.
#[instrument(skip(db))]
pub async fn reconcile<C: Connection>(db: &Surreal<C>) -> Result<(), Error> {
    if table_exists(db).await? {
        info!("table {TABLE_NAME} already exists, refreshing its schema");
        db.query(format!("DEFINE TABLE OVERWRITE {TABLE_NAME} SCHEMAFULL;"))
            .await?
            .check()?;
    } else {
        info!("creating table {TABLE_NAME}");
        db.query(format!("DEFINE TABLE {TABLE_NAME} SCHEMAFULL;"))
            .await?
            .check()?;
    }

    let mut queries = db.query("BEGIN;");
    for field in FIELDS {
        queries = queries.query(*field);
    }
    queries.query("COMMIT;").await?.check()?;

    Ok(())
}

async fn table_exists<C: Connection>(db: &Surreal<C>) -> Result<bool, Error> {
    let mut response = db.query("INFO FOR DB;").await?.check()?;
    let tables: Vec<Value> = response.take((0, "tables"))?;

    Ok(tables
        .first()
        .and_then(Value::as_object)
        .is_some_and(|tables| tables.contains_key(TABLE_NAME)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use super::*;
    use crate::test_utils::init_test_database;

    #[tokio::test]
    async fn creates_the_table_when_it_is_missing() -> anyhow::Result<()> {
        let db = init_test_database().await?;
        assert!(!table_exists(&db).await?);

        reconcile(&db).await?;

        assert!(table_exists(&db).await?);
        Ok(())
    }

    #[tokio::test]
    async fn declares_every_catalog_field() -> anyhow::Result<()> {
        let db = init_test_database().await?;
        reconcile(&db).await?;

        let mut response = db
            .query(format!("INFO FOR TABLE {TABLE_NAME};"))
            .await?
            .check()?;
        let fields: Vec<Value> = response.take((0, "fields"))?;
        let fields = fields[0].as_object().unwrap();

        for name in [
            "catalog_id",
            "title",
            "artist",
            "year",
            "duo",
            "explicit",
            "date_added",
            "styles",
            "languages",
        ] {
            assert!(fields.contains_key(name), "field {name} is not defined");
        }
        Ok(())
    }

    #[tokio::test]
    async fn reconciling_twice_is_convergent() -> anyhow::Result<()> {
        let db = init_test_database().await?;

        reconcile(&db).await?;
        let mut response = db
            .query(format!("INFO FOR TABLE {TABLE_NAME};"))
            .await?
            .check()?;
        let first: Vec<Value> = response.take((0, "fields"))?;

        reconcile(&db).await?;
        let mut response = db
            .query(format!("INFO FOR TABLE {TABLE_NAME};"))
            .await?
            .check()?;
        let second: Vec<Value> = response.take((0, "fields"))?;

        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn the_schema_rejects_writes_missing_required_fields() -> anyhow::Result<()> {
        let db = init_test_database().await?;
        reconcile(&db).await?;

        let result = db
            .query("CREATE song:1 CONTENT { catalog_id: 1 };")
            .await?
            .check();

        assert!(result.is_err());
        Ok(())
    }
}
