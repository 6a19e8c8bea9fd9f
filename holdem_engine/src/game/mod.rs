//! Hold'em table rules: seating, betting, side pots and the hand state
//! machine.

pub mod actions;
pub mod commands;
pub mod constants;
pub mod entities;
pub mod errors;
pub mod functional;
pub mod showdown;
pub mod snapshot;
pub mod state;
pub mod state_machine;
pub mod states;

pub use actions::ActionOutcome;
pub use commands::{Command, CommandKind, EngineCommand};
pub use errors::{ActionError, RingError, SeatingError};
pub use snapshot::{PlayerSnapshot, TableSnapshot};
pub use state::TableState;
pub use state_machine::{Engine, EngineState, Phase};
