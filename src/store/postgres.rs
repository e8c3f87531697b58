//! PostgreSQL store over the `items` table. Each operation holds one pooled
//! connection for its duration; the connection returns to the pool on drop.

use super::ItemStore;
use crate::error::{AppError, ConfigError};
use crate::model::{id_space_exhausted, Item, ItemFields, ItemPatch, SeedOutcome};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

const SELECT_COLUMNS: &str = "id, name, description, price";

/// Create the `items` table and its name index if missing.
pub async fn ensure_items_table(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id BIGINT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            price DOUBLE PRECISION NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS ix_items_name ON items (name)")
        .execute(pool)
        .await?;
    Ok(())
}

/// Ensure the database named in `database_url` exists, creating it through the
/// `postgres` maintenance database if not. Call before opening the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let Some((admin, db_name)) = admin_target(database_url)? else {
        return Ok(());
    };
    let mut conn: PgConnection = admin.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Options pointing at the `postgres` database, plus the target database name.
/// `None` when the URL names no database or names `postgres` itself.
fn admin_target(database_url: &str) -> Result<Option<(PgConnectOptions, String)>, AppError> {
    let options = PgConnectOptions::from_str(database_url).map_err(|e| ConfigError::Invalid {
        key: "DATABASE_URL",
        value: e.to_string(),
    })?;
    match options.get_database().map(str::to_string) {
        Some(name) if !name.is_empty() && name != "postgres" => {
            Ok(Some((options.database("postgres"), name)))
        }
        _ => Ok(None),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn map_write_error(e: sqlx::Error, id: Option<i64>) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => match id {
            Some(id) => AppError::Conflict(format!("Item {} already exists", id)),
            None => AppError::Conflict("concurrent insert took the next id; retry".into()),
        },
        // numeric_value_out_of_range: MAX(id) + 1 past i64::MAX
        sqlx::Error::Database(db) if db.code().as_deref() == Some("22003") => id_space_exhausted(),
        _ => AppError::Db(e),
    }
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert(conn: &mut PgConnection, id: Option<i64>, fields: ItemFields) -> Result<Item, AppError> {
    let sql = format!(
        "INSERT INTO items (id, name, description, price) \
         VALUES (COALESCE($1, (SELECT COALESCE(MAX(id), 0) + 1 FROM items)), $2, $3, $4) \
         RETURNING {}",
        SELECT_COLUMNS
    );
    tracing::debug!(sql = %sql, ?id, "query");
    sqlx::query_as::<_, Item>(&sql)
        .bind(id)
        .bind(fields.name)
        .bind(fields.description)
        .bind(fields.price)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_write_error(e, id))
}

async fn count(conn: &mut PgConnection) -> Result<u64, AppError> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items")
        .fetch_one(&mut *conn)
        .await?;
    Ok(n.max(0) as u64)
}

#[async_trait]
impl ItemStore for PgStore {
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Item>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let sql = format!("SELECT {} FROM items ORDER BY id LIMIT $1 OFFSET $2", SELECT_COLUMNS);
        tracing::debug!(sql = %sql, skip, limit, "query");
        let rows = sqlx::query_as::<_, Item>(&sql)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .bind(i64::try_from(skip).unwrap_or(i64::MAX))
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<Item>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let sql = format!("SELECT {} FROM items WHERE id = $1", SELECT_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn create(&self, id: Option<i64>, fields: ItemFields) -> Result<Item, AppError> {
        let mut conn = self.pool.acquire().await?;
        insert(&mut conn, id, fields).await
    }

    async fn replace_all(&self, id: i64, fields: ItemFields) -> Result<Option<Item>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let sql = format!(
            "UPDATE items SET name = $2, description = $3, price = $4 WHERE id = $1 RETURNING {}",
            SELECT_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .bind(fields.name)
            .bind(fields.description)
            .bind(fields.price)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn replace_partial(&self, id: i64, patch: ItemPatch) -> Result<Option<Item>, AppError> {
        let mut conn = self.pool.acquire().await?;
        let set_description = patch.description.is_some();
        let sql = format!(
            "UPDATE items SET \
             name = COALESCE($2, name), \
             description = CASE WHEN $4 THEN $3 ELSE description END, \
             price = COALESCE($5, price) \
             WHERE id = $1 RETURNING {}",
            SELECT_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .bind(patch.name)
            .bind(patch.description.flatten())
            .bind(set_description)
            .bind(patch.price)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await?;
        tracing::debug!(id, "delete");
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, AppError> {
        let mut conn = self.pool.acquire().await?;
        count(&mut conn).await
    }

    async fn seed_if_empty(&self, samples: Vec<ItemFields>) -> Result<SeedOutcome, AppError> {
        let mut tx = self.pool.begin().await?;
        let existing = count(&mut tx).await?;
        if existing > 0 {
            return Ok(SeedOutcome::AlreadySeeded(existing));
        }
        let mut inserted = 0u64;
        for fields in samples {
            insert(&mut tx, None, fields).await?;
            inserted += 1;
        }
        tx.commit().await?;
        Ok(SeedOutcome::Inserted(inserted))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample_items;
    use crate::store::ItemStore;

    #[test]
    fn admin_target_switches_to_postgres_database() {
        let (admin, name) = admin_target("postgres://u:p@db:5432/items?sslmode=disable")
            .unwrap()
            .unwrap();
        assert_eq!(name, "items");
        assert_eq!(admin.get_database(), Some("postgres"));
        assert_eq!(admin.get_host(), "db");
    }

    #[test]
    fn admin_target_skips_maintenance_database() {
        assert!(admin_target("postgres://u:p@db:5432/postgres").unwrap().is_none());
    }

    #[test]
    fn unparseable_url_is_a_config_error() {
        let err = admin_target("postgres://u:p@db:notaport/items").unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::Invalid { key: "DATABASE_URL", .. })
        ));
    }

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("items"), "\"items\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    fn fields(name: &str, description: Option<&str>, price: f64) -> ItemFields {
        ItemFields::new(name, description, price)
    }

    /// Runs against `TEST_DATABASE_URL` and truncates its `items` table.
    /// `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn sql_paths_against_live_database() {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .unwrap();
        ensure_items_table(&pool).await.unwrap();
        sqlx::query("TRUNCATE items").execute(&pool).await.unwrap();
        let store = PgStore::new(pool);

        assert_eq!(store.seed_if_empty(sample_items()).await.unwrap(), SeedOutcome::Inserted(3));
        assert_eq!(
            store.seed_if_empty(sample_items()).await.unwrap(),
            SeedOutcome::AlreadySeeded(3)
        );

        assert!(store.delete(3).await.unwrap());
        let next = store.create(None, fields("Monitor", None, 199.0)).await.unwrap();
        assert_eq!(next.id, 3);
        assert!(store.delete(1).await.unwrap());
        let next = store.create(None, fields("Cable", None, 5.0)).await.unwrap();
        assert_eq!(next.id, 4);

        let merged = store
            .replace_partial(
                2,
                ItemPatch {
                    price: Some(19.99),
                    ..ItemPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(merged, Item::from_fields(2, fields("Mouse", Some("Wireless mouse"), 19.99)));

        let cleared = store
            .replace_partial(
                2,
                ItemPatch {
                    description: Some(None),
                    ..ItemPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.description, None);
        assert_eq!(cleared.price, 19.99);

        let replaced = store
            .replace_all(2, fields("Trackball", None, 59.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced, Item::from_fields(2, fields("Trackball", None, 59.0)));
        assert_eq!(store.get(2).await.unwrap(), Some(replaced));
        assert_eq!(store.replace_partial(99, ItemPatch::default()).await.unwrap(), None);

        let page = store.list(1, 2).await.unwrap();
        assert_eq!(page.iter().map(|i| i.id).collect::<Vec<_>>(), vec![3, 4]);

        assert!(matches!(
            store.create(Some(2), fields("Dup", None, 1.0)).await,
            Err(AppError::Conflict(_))
        ));
        store.create(Some(i64::MAX), fields("Last", None, 1.0)).await.unwrap();
        assert!(matches!(
            store.create(None, fields("Overflow", None, 1.0)).await,
            Err(AppError::Conflict(_))
        ));

        store.ping().await.unwrap();
    }
}
