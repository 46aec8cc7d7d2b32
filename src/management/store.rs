use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, params, params_from_iter, types::Value};

use crate::{
    error::StoreError,
    types::{Category, EntityMap, Owner, RankTable, ResourceKey},
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS rankings (
    owner_kind  TEXT    NOT NULL,
    owner_id    TEXT    NOT NULL,
    category    TEXT    NOT NULL,
    position    INTEGER NOT NULL,
    label       TEXT    NOT NULL,
    appearances INTEGER NOT NULL,
    updated_at  TEXT    NOT NULL,
    PRIMARY KEY (owner_kind, owner_id, category, label)
);
CREATE TABLE IF NOT EXISTS unique_artists (
    owner_kind  TEXT NOT NULL,
    owner_id    TEXT NOT NULL,
    artist_id   TEXT NOT NULL,
    artist_name TEXT NOT NULL,
    PRIMARY KEY (owner_kind, owner_id, artist_id)
);
CREATE TABLE IF NOT EXISTS followers (
    brand_id     TEXT NOT NULL,
    user_id      TEXT NOT NULL,
    playlist_ids TEXT NOT NULL,
    PRIMARY KEY (brand_id, user_id)
);
";

/// Column names and rows of a SELECT.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Relational store for rankings, unique artists and followers.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) the database file and its tables.
    ///
    /// Blocking like every other `Store` call, the parent directory included.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn init_schema(&self) -> Result<(), StoreError> {
        self.execute(SCHEMA)
    }

    /// Runs one or more statements without parameters.
    pub fn execute(&self, sql: &str) -> Result<(), StoreError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Runs a parameterized statement once per row inside one transaction.
    /// Returns the number of affected rows.
    pub fn execute_many(&mut self, sql: &str, rows: &[Vec<Value>]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let mut affected = 0;
        {
            let mut stmt = tx.prepare(sql)?;
            for row in rows {
                affected += stmt.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;
        Ok(affected)
    }

    pub fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                (0..width)
                    .map(|i| row.get::<_, Value>(i))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QueryResult { columns, rows })
    }

    /// Replaces the ranking of `owner` for `category`.
    pub fn upsert_ranking(
        &mut self,
        owner: &Owner,
        category: Category,
        ranking: &RankTable,
    ) -> Result<usize, StoreError> {
        let updated_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM rankings WHERE owner_kind = ?1 AND owner_id = ?2 AND category = ?3",
            params![owner.kind(), owner.id(), category.as_str()],
        )?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO rankings
                 (owner_kind, owner_id, category, position, label, appearances, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (i, entry) in ranking.iter().enumerate() {
                inserted += stmt.execute(params![
                    owner.kind(),
                    owner.id(),
                    category.as_str(),
                    (i + 1) as i64,
                    entry.label,
                    entry.count as i64,
                    updated_at,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Ranking of `owner` for `category`; empty if none was stored.
    pub fn load_ranking(&self, owner: &Owner, category: Category) -> Result<RankTable, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT label, appearances FROM rankings
             WHERE owner_kind = ?1 AND owner_id = ?2 AND category = ?3
             ORDER BY appearances DESC, position ASC",
        )?;
        let rows = stmt
            .query_map(params![owner.kind(), owner.id(), category.as_str()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?.max(0) as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RankTable::from_counts(rows))
    }

    pub fn upsert_unique_artists(
        &mut self,
        owner: &Owner,
        artists: &EntityMap,
    ) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM unique_artists WHERE owner_kind = ?1 AND owner_id = ?2",
            params![owner.kind(), owner.id()],
        )?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO unique_artists (owner_kind, owner_id, artist_id, artist_name)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (id, name) in artists {
                inserted += stmt.execute(params![owner.kind(), owner.id(), id, name])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    pub fn upsert_followers(
        &mut self,
        brand_id: &str,
        followers: &[ResourceKey],
    ) -> Result<usize, StoreError> {
        let rows = followers
            .iter()
            .map(|f| -> Result<Vec<Value>, StoreError> {
                Ok(vec![
                    Value::Text(brand_id.to_string()),
                    Value::Text(f.id.clone()),
                    Value::Text(serde_json::to_string(&f.playlists)?),
                ])
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.execute_many(
            "INSERT INTO followers (brand_id, user_id, playlist_ids) VALUES (?1, ?2, ?3)
             ON CONFLICT (brand_id, user_id) DO UPDATE SET playlist_ids = excluded.playlist_ids",
            &rows,
        )
    }

    pub fn follower_count(&self, brand_id: &str) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM followers WHERE brand_id = ?1",
            params![brand_id],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as usize)
    }
}
