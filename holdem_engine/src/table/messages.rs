//! Table actor message types.

use crate::game::{commands::Command, entities::Card, snapshot::TableSnapshot};
use tokio::sync::{mpsc, oneshot};

/// Messages that can be sent to a TableActor
#[derive(Debug)]
pub enum TableMessage {
    /// Queue a player or seating command for the next tick
    Command(Command),

    /// Receive every changed snapshot from now on. The current snapshot
    /// is sent right away.
    Subscribe {
        sender: mpsc::Sender<TableSnapshot>,
    },

    /// Get the current snapshot, changed or not
    GetSnapshot {
        response: oneshot::Sender<TableSnapshot>,
    },

    /// Fix the top of the deck for the next hand
    StackDeck { cards: Vec<Card> },

    /// Stop the table after the current iteration
    Close { response: oneshot::Sender<()> },
}
