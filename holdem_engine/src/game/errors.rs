use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::{SeatIndex, Usd, Username};

/// Structural failures from ring operations. These are never fatal; the
/// engine goes back to waiting for players.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum RingError {
    #[error("no dealer: nobody is seated")]
    NoDealer,
    #[error("need 2+ players sitting in")]
    InsufficientPlayers,
    #[error("dealer is sitting out")]
    DealerSittingOut,
}

/// Reasons a player command is rejected. A rejected command leaves the
/// table untouched.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum ActionError {
    #[error("not your turn")]
    NotYourTurn,
    #[error("already matched the bet")]
    AlreadyMatched,
    #[error("bet of {amount} is below the minimum raise of {min_raise}")]
    BetTooSmall { amount: Usd, min_raise: Usd },
    #[error("can't check facing {to_call} to call")]
    CannotCheck { to_call: Usd },
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("{0} is not seated")]
    UserNotSeated(Username),
    #[error("`{0}` is not a player action")]
    NotAPlayerAction(&'static str),
    #[error(transparent)]
    Seating(#[from] SeatingError),
}

/// Failures while seating a player.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum SeatingError {
    #[error("seat {0} is already taken")]
    DuplicateSeat(SeatIndex),
    #[error("{0} is already seated")]
    DuplicateUser(Username),
    /// Signed so a bad seat id off the wire can be reported as sent.
    #[error("seat {0} is unavailable")]
    SeatUnavailable(i64),
    #[error("table is full")]
    TableFull,
}
