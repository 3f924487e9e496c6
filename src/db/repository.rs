use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use tokio_rusqlite::Connection;

use crate::error::{AppError, Result};
use crate::models::HighlightRecord;
use crate::services::ItemTable;

use super::schema::SCHEMA;

/// SQLite-backed key-value table for local runs.
pub struct ItemRepository {
    conn: Connection,
    table_name: String,
}

impl ItemRepository {
    pub async fn new(db_path: &str, table_name: String) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::init(conn, table_name).await
    }

    #[allow(dead_code)]
    pub async fn in_memory(table_name: String) -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn, table_name).await
    }

    async fn init(conn: Connection, table_name: String) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn, table_name })
    }

    pub async fn upsert_item(&self, key: &str, item: &HighlightRecord) -> Result<()> {
        let item_json = serde_json::to_string(item)?;
        let fetch_date = item
            .get("fetch_date")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let table_name = self.table_name.clone();
        let key = key.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO highlights (table_name, item_key, item, fetch_date)
                       VALUES (?1, ?2, ?3, ?4)
                       ON CONFLICT(table_name, item_key) DO UPDATE SET
                           item = excluded.item,
                           fetch_date = excluded.fetch_date,
                           updated_at = datetime('now')"#,
                    params![table_name, key, item_json, fetch_date],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    #[allow(dead_code)]
    pub async fn get_item(&self, key: &str) -> Result<Option<HighlightRecord>> {
        let table_name = self.table_name.clone();
        let key = key.to_string();

        let raw: Option<String> = self
            .conn
            .call(move |conn| {
                let item = conn
                    .query_row(
                        "SELECT item FROM highlights WHERE table_name = ?1 AND item_key = ?2",
                        params![table_name, key],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(item)
            })
            .await?;

        raw.map(|s| {
            serde_json::from_str::<HighlightRecord>(&s)
                .map_err(|e| AppError::Table(format!("corrupt stored item: {}", e)))
        })
        .transpose()
    }

    #[allow(dead_code)]
    pub async fn count_items(&self) -> Result<i64> {
        let table_name = self.table_name.clone();
        let count = self
            .conn
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM highlights WHERE table_name = ?1",
                    params![table_name],
                    |row| row.get(0),
                )?;
                Ok(count)
            })
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ItemTable for ItemRepository {
    async fn put_item(&self, key: &str, item: &HighlightRecord) -> Result<()> {
        self.upsert_item(key, item).await
    }
}
