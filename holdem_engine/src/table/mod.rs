//! Table module providing multi-table support with async actor model.
//!
//! This module implements:
//! - TableActor: Async actor owning a single table engine
//! - TableManager: Registry of running tables keyed by room name
//! - Message-based communication with tokio channels
//! - Table configuration and engine timing presets
//!
//! ## Architecture
//!
//! Each table runs in a separate Tokio task with an mpsc message inbox.
//! The actor alternates between handling messages and ticking its engine
//! on the engine's own cadence, and pushes a snapshot to every subscriber
//! whenever the table changes.
//!
//! ## Example
//!
//! ```no_run
//! use holdem_engine::{Command, CommandKind, EngineTiming, TableConfig, TableManager};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = TableManager::new(EngineTiming::dev());
//! let table = manager.create_table(TableConfig::new("main", 1, 2)).await?;
//! let mut snapshots = table.subscribe().await?;
//! table
//!     .queue_command(Command::new("alice", CommandKind::Join { seat: None, chips: 100 }))
//!     .await?;
//! while let Some(snapshot) = snapshots.recv().await {
//!     println!("{} players", snapshot.players.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod config;
pub mod manager;
pub mod messages;

pub use actor::{TableActor, TableError, TableHandle};
pub use config::{ConfigError, EngineTiming, Environment, TableConfig};
pub use manager::{TableManager, TableManagerError, TableMetadata};
pub use messages::TableMessage;
