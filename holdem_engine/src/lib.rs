//! # Hold'em Engine
//!
//! An authoritative Texas Hold'em table engine. Clients send commands;
//! the engine owns all table state, enforces betting rules, settles side
//! pots, and publishes a snapshot whenever something visible changes.
//!
//! ## Architecture
//!
//! The hand is a finite state machine of 17 phases dispatched with
//! `enum_dispatch`. Each tick runs one phase's work:
//!
//! - **ProcessSitCommands**: Waiting for players and `startGame`
//! - **StartHand**: Rotating the dealer, building the in-hand ring
//! - **PostBlinds / DealCards**: Blinds and hole cards
//! - **ProcessGameCommands**: Player betting
//! - **EndStreet / DealStreet**: Side pots, collection, the board
//! - **Showdown**: Paying winners tier by tier
//! - **EveryoneFoldedPayout**: Paying the last player standing
//! - **EndHand**: Clearing the hand, applying queued seating changes
//!
//! plus a pause phase after each visible step.
//!
//! ## Core Modules
//!
//! - [`game`]: Table state, actions, showdown and the engine
//! - [`table`]: Async table actor and the registry of running tables
//!
//! ## Example
//!
//! ```
//! use holdem_engine::{Command, CommandKind, Engine, EngineTiming, TableConfig};
//!
//! let mut engine = Engine::new(&TableConfig::new("main", 1, 2), EngineTiming::dev());
//! engine.queue_command(Command::new("alice", CommandKind::Join { seat: Some(0), chips: 100 }));
//! engine.tick();
//! assert_eq!(engine.table().num_players(), 1);
//! ```

/// Table rules and the hand state machine.
pub mod game;
pub use game::{
    ActionError, ActionOutcome, Command, CommandKind, Engine, EngineCommand, EngineState,
    PlayerSnapshot, RingError, SeatingError, TableSnapshot, TableState,
    constants::{self, MAX_PLAYERS},
    entities::{self, Card, Usd, Username},
    functional,
};

/// Async table actors and the table registry.
pub mod table;
pub use table::{
    EngineTiming, Environment, TableConfig, TableHandle, TableManager, TableManagerError,
    TableMetadata,
};
