//! Table actor: owns one engine and runs its tick loop.

use super::{
    config::{EngineTiming, TableConfig},
    messages::TableMessage,
};
use crate::game::{
    commands::Command, entities::Card, snapshot::TableSnapshot, state_machine::Engine,
};
use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot},
    time::{Instant, sleep_until},
};
use uuid::Uuid;

const INBOX_CAPACITY: usize = 100;

/// Snapshots buffered per subscriber before new ones are dropped.
pub const SUBSCRIBER_CAPACITY: usize = 64;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TableError {
    #[error("table is closed")]
    Closed,
}

/// Table actor handle for sending messages
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
    room_name: String,
    /// Distinguishes this actor from a later one in the same room.
    instance_id: Uuid,
}

impl TableHandle {
    pub fn new(sender: mpsc::Sender<TableMessage>, room_name: String) -> Self {
        Self {
            sender,
            room_name,
            instance_id: Uuid::new_v4(),
        }
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Whether the actor behind this handle has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Send a message to the table
    pub async fn send(&self, message: TableMessage) -> Result<(), TableError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| TableError::Closed)
    }

    pub async fn queue_command(&self, command: Command) -> Result<(), TableError> {
        self.send(TableMessage::Command(command)).await
    }

    /// Subscribe to snapshots. The first one received is the current
    /// state.
    pub async fn subscribe(&self) -> Result<mpsc::Receiver<TableSnapshot>, TableError> {
        let (sender, receiver) = mpsc::channel(SUBSCRIBER_CAPACITY);
        self.send(TableMessage::Subscribe { sender }).await?;
        Ok(receiver)
    }

    pub async fn snapshot(&self) -> Result<TableSnapshot, TableError> {
        let (tx, rx) = oneshot::channel();
        self.send(TableMessage::GetSnapshot { response: tx }).await?;
        rx.await.map_err(|_| TableError::Closed)
    }

    pub async fn stack_deck(&self, cards: Vec<Card>) -> Result<(), TableError> {
        self.send(TableMessage::StackDeck { cards }).await
    }

    /// Ask the actor to stop and wait until it has acknowledged.
    pub async fn close(&self) -> Result<(), TableError> {
        let (tx, rx) = oneshot::channel();
        self.send(TableMessage::Close { response: tx }).await?;
        rx.await.map_err(|_| TableError::Closed)
    }
}

/// Table actor managing a single table
pub struct TableActor {
    engine: Engine,

    /// Message inbox
    inbox: mpsc::Receiver<TableMessage>,

    /// Snapshot subscribers, pruned when their receiver goes away
    subscribers: Vec<mpsc::Sender<TableSnapshot>>,

    is_closed: bool,
}

impl TableActor {
    pub fn new(config: &TableConfig, timing: EngineTiming) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let actor = Self {
            engine: Engine::new(config, timing),
            inbox,
            subscribers: Vec::new(),
            is_closed: false,
        };
        let handle = TableHandle::new(sender, config.room_name.clone());
        (actor, handle)
    }

    /// Run the table actor event loop until closed or every handle is
    /// dropped.
    pub async fn run(mut self) {
        log::info!("Table '{}' starting", self.engine.room_name());

        let mut next_tick = Instant::now();
        loop {
            tokio::select! {
                message = self.inbox.recv() => match message {
                    Some(message) => self.handle_message(message),
                    None => {
                        log::debug!("Table '{}': all handles dropped", self.engine.room_name());
                        break;
                    }
                },

                _ = sleep_until(next_tick) => {
                    let pause = self.engine.tick();
                    self.publish_if_changed();
                    next_tick = Instant::now() + pause;
                }
            }

            if self.is_closed {
                break;
            }
        }

        log::info!("Table '{}' closed", self.engine.room_name());
    }

    fn handle_message(&mut self, message: TableMessage) {
        match message {
            TableMessage::Command(command) => {
                log::debug!("Table '{}': queued `{command}`", self.engine.room_name());
                self.engine.queue_command(command);
            }

            TableMessage::Subscribe { sender } => {
                if sender.try_send(self.engine.snapshot()).is_ok() {
                    self.subscribers.push(sender);
                }
            }

            TableMessage::GetSnapshot { response } => {
                let _ = response.send(self.engine.snapshot());
            }

            TableMessage::StackDeck { cards } => {
                self.engine.stack_deck(cards);
            }

            TableMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(());
            }
        }
    }

    /// Broadcast the snapshot to all subscribers if anything changed
    fn publish_if_changed(&mut self) {
        let Some(snapshot) = self.engine.snapshot_if_changed() else {
            return;
        };
        let room_name = self.engine.room_name();
        self.subscribers
            .retain(|sender| match sender.try_send(snapshot.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("Table '{room_name}': subscriber channel full, dropping snapshot");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Table '{room_name}': subscriber disconnected, removing");
                    false
                }
            });
    }
}
