//! Table manager for spawning and managing multiple table actors.

use super::{
    actor::{TableActor, TableError, TableHandle},
    config::{ConfigError, EngineTiming, TableConfig},
};
use crate::game::entities::Usd;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TableManagerError {
    #[error("room `{0}` already has a running engine")]
    DuplicateRoom(String),
    #[error("no running engine for room `{0}`")]
    TableNotFound(String),
    #[error(transparent)]
    TableClosed(#[from] TableError),
    #[error("invalid table config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Table metadata for discovery
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    pub room_name: String,
    pub small_blind: Usd,
    pub big_blind: Usd,
    pub max_players: usize,
    pub created_at: DateTime<Utc>,
}

struct TableEntry {
    handle: TableHandle,
    metadata: TableMetadata,
}

/// Registry of running tables keyed by room name
#[derive(Clone)]
pub struct TableManager {
    timing: EngineTiming,
    tables: Arc<RwLock<HashMap<String, TableEntry>>>,
}

impl TableManager {
    pub fn new(timing: EngineTiming) -> Self {
        Self {
            timing,
            tables: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create and spawn a new table
    ///
    /// # Arguments
    ///
    /// * `config` - Table configuration
    ///
    /// # Returns
    ///
    /// * `Result<TableHandle, TableManagerError>` - Handle to the running
    ///   table, or why it couldn't be started
    pub async fn create_table(
        &self,
        config: TableConfig,
    ) -> Result<TableHandle, TableManagerError> {
        config.validate()?;

        let mut tables = self.tables.write().await;
        if tables.contains_key(&config.room_name) {
            return Err(TableManagerError::DuplicateRoom(config.room_name));
        }

        let (actor, handle) = TableActor::new(&config, self.timing);
        let metadata = TableMetadata {
            room_name: config.room_name.clone(),
            small_blind: config.small_blind,
            big_blind: config.big_blind,
            max_players: config.max_players,
            created_at: Utc::now(),
        };
        tables.insert(
            config.room_name.clone(),
            TableEntry {
                handle: handle.clone(),
                metadata,
            },
        );
        drop(tables);

        // Spawn actor task; it deregisters itself when the loop ends
        let registry = Arc::clone(&self.tables);
        let room_name = config.room_name;
        let instance_id = handle.instance_id();
        tokio::spawn(async move {
            actor.run().await;
            remove_entry(&registry, &room_name, instance_id).await;
        });

        log::info!("Created table '{}'", handle.room_name());
        Ok(handle)
    }

    /// Get a table handle
    pub async fn get_table(&self, room_name: &str) -> Option<TableHandle> {
        let tables = self.tables.read().await;
        tables.get(room_name).map(|entry| entry.handle.clone())
    }

    /// List running tables, sorted by room name
    pub async fn list_tables(&self) -> Vec<TableMetadata> {
        let tables = self.tables.read().await;
        let mut metadata: Vec<TableMetadata> =
            tables.values().map(|entry| entry.metadata.clone()).collect();
        metadata.sort_by(|a, b| a.room_name.cmp(&b.room_name));
        metadata
    }

    /// Close a table
    ///
    /// # Arguments
    ///
    /// * `room_name` - Room the table runs in
    ///
    /// # Returns
    ///
    /// * `Result<(), TableManagerError>` - `TableNotFound` if no table
    ///   runs in that room
    pub async fn close_table(&self, room_name: &str) -> Result<(), TableManagerError> {
        let handle = self
            .get_table(room_name)
            .await
            .ok_or_else(|| TableManagerError::TableNotFound(room_name.to_string()))?;

        let result = handle.close().await;
        remove_entry(&self.tables, room_name, handle.instance_id()).await;
        result?;

        log::info!("Closed table '{room_name}'");
        Ok(())
    }

    pub async fn active_table_count(&self) -> usize {
        self.tables.read().await.len()
    }
}

/// Removes `room_name` only if it still belongs to `instance_id`, so a
/// finished actor never removes its replacement.
async fn remove_entry(
    tables: &RwLock<HashMap<String, TableEntry>>,
    room_name: &str,
    instance_id: Uuid,
) {
    let mut tables = tables.write().await;
    if tables
        .get(room_name)
        .is_some_and(|entry| entry.handle.instance_id() == instance_id)
    {
        tables.remove(room_name);
        log::debug!("Table '{room_name}' removed from registry");
    }
}
