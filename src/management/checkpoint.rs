use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::CheckpointError,
    types::{Appearances, EntityMap, ResourceKey},
};

/// One row of the checkpoint table. `entities` stays `None` until the key's
/// pipeline has completed. `appearances` holds the per-track artist credits
/// of the key and is absent in tables written without them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointRow {
    pub key: String,
    #[serde(default)]
    pub playlists: Vec<String>,
    pub entities: Option<EntityMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearances: Option<Appearances>,
}

/// Per-key progress of an aggregation, persisted as a JSON table.
///
/// A set `entities` cell is final: that key is never fetched again from
/// this file.
pub struct CheckpointManager {
    path: PathBuf,
    rows: Vec<CheckpointRow>,
}

impl CheckpointManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            rows: Vec::new(),
        }
    }

    /// Loads the table at `path`; a missing file is an empty table.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, CheckpointError> {
        let path = path.into();
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new(path)),
            Err(e) => return Err(CheckpointError::Io(e)),
        };

        let rows: Vec<CheckpointRow> = serde_json::from_str(&content)?;
        Ok(Self { path, rows })
    }

    /// Rewrites the whole table. Goes through a temporary file so a crash
    /// mid-write leaves the previous table intact.
    pub async fn persist(&self) -> Result<(), CheckpointError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(&self.rows)?;
        let tmp = self.path.with_extension("json.tmp");
        async_fs::write(&tmp, json).await?;
        async_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Deletes the file and forgets all progress.
    pub async fn clear(&mut self) -> Result<(), CheckpointError> {
        self.rows.clear();
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CheckpointError::Io(e)),
        }
    }

    /// Adds an empty row for every key the table does not know yet.
    pub fn register(&mut self, keys: &[ResourceKey]) {
        for key in keys {
            if self.row(&key.id).is_none() {
                self.rows.push(CheckpointRow {
                    key: key.id.clone(),
                    playlists: key.playlists.clone(),
                    entities: None,
                    appearances: None,
                });
            }
        }
    }

    pub fn is_done(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&EntityMap> {
        self.row(key).and_then(|r| r.entities.as_ref())
    }

    /// Sets the result of a finished key.
    pub fn complete(&mut self, key: &ResourceKey, entities: EntityMap) {
        self.finish(key, entities, None);
    }

    /// Sets the result of a finished key together with its track credits.
    pub fn complete_counted(
        &mut self,
        key: &ResourceKey,
        entities: EntityMap,
        appearances: Appearances,
    ) {
        self.finish(key, entities, Some(appearances));
    }

    /// Track credits recorded for a finished key.
    pub fn appearances(&self, key: &str) -> Option<&Appearances> {
        self.row(key).and_then(|r| r.appearances.as_ref())
    }

    /// Playlists recorded for `key` by an earlier run.
    pub fn playlists(&self, key: &str) -> Option<&[String]> {
        self.row(key)
            .map(|r| r.playlists.as_slice())
            .filter(|p| !p.is_empty())
    }

    pub fn rows(&self) -> &[CheckpointRow] {
        &self.rows
    }

    pub fn count_done(&self) -> usize {
        self.rows.iter().filter(|r| r.entities.is_some()).count()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn finish(
        &mut self,
        key: &ResourceKey,
        entities: EntityMap,
        appearances: Option<Appearances>,
    ) {
        match self.rows.iter_mut().find(|r| r.key == key.id) {
            Some(row) => {
                row.entities = Some(entities);
                row.appearances = appearances;
            }
            None => self.rows.push(CheckpointRow {
                key: key.id.clone(),
                playlists: key.playlists.clone(),
                entities: Some(entities),
                appearances,
            }),
        }
    }

    fn row(&self, key: &str) -> Option<&CheckpointRow> {
        self.rows.iter().find(|r| r.key == key)
    }
}
