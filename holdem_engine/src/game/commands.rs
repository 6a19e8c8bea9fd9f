//! Inbound commands, in wire form and in the typed form the engine
//! dispatches on.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    entities::{SeatIndex, Usd, Username},
    errors::{ActionError, SeatingError},
};

/// Command as it arrives from a client.
///
/// ```
/// use holdem_engine::game::commands::EngineCommand;
///
/// let cmd: EngineCommand =
///     serde_json::from_str(r#"{"engineCommand":"join","user":"alice","chips":200}"#).unwrap();
/// assert_eq!(cmd.seat_id, -1);
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineCommand {
    pub engine_command: String,
    /// Requested seat for `join`; -1 picks any open seat.
    #[serde(default = "any_seat")]
    pub seat_id: i32,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub chips: Usd,
}

fn any_seat() -> i32 {
    -1
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommandKind {
    Join { seat: Option<SeatIndex>, chips: Usd },
    Leave,
    StartGame,
    AddChips(Usd),
    SitOut,
    SitIn,
    Fold,
    Check,
    Call,
    /// Total the player wants in front of them this street.
    Bet(Usd),
}

impl CommandKind {
    /// Fold, check, call and bet go to the in-hand queue; everything else
    /// is administrative.
    pub fn is_action(&self) -> bool {
        matches!(self, Self::Fold | Self::Check | Self::Call | Self::Bet(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Leave => "leave",
            Self::StartGame => "startGame",
            Self::AddChips(_) => "addChips",
            Self::SitOut => "sitOut",
            Self::SitIn => "sitIn",
            Self::Fold => "fold",
            Self::Check => "check",
            Self::Call => "call",
            Self::Bet(_) => "bet",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Command {
    pub user: Username,
    pub kind: CommandKind,
}

impl Command {
    pub fn new(user: impl Into<Username>, kind: CommandKind) -> Self {
        Self {
            user: user.into(),
            kind,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CommandKind::Join { seat: Some(seat), chips } => {
                write!(f, "{} join seat {seat} with {chips}", self.user)
            }
            CommandKind::Join { seat: None, chips } => {
                write!(f, "{} join with {chips}", self.user)
            }
            CommandKind::AddChips(amount) | CommandKind::Bet(amount) => {
                write!(f, "{} {} {amount}", self.user, self.kind.name())
            }
            kind => write!(f, "{} {}", self.user, kind.name()),
        }
    }
}

/// -1 asks for any open seat; any other negative id names no seat at all.
fn requested_seat(seat_id: i32) -> Result<Option<SeatIndex>, SeatingError> {
    match seat_id {
        -1 => Ok(None),
        id => SeatIndex::try_from(id)
            .map(Some)
            .map_err(|_| SeatingError::SeatUnavailable(id.into())),
    }
}

impl TryFrom<EngineCommand> for Command {
    type Error = ActionError;

    fn try_from(value: EngineCommand) -> Result<Self, Self::Error> {
        let kind = match value.engine_command.as_str() {
            "join" => CommandKind::Join {
                seat: requested_seat(value.seat_id)?,
                chips: value.chips,
            },
            "leave" => CommandKind::Leave,
            "startGame" => CommandKind::StartGame,
            "addChips" => CommandKind::AddChips(value.chips),
            "sitOut" => CommandKind::SitOut,
            "sitIn" => CommandKind::SitIn,
            "fold" => CommandKind::Fold,
            "check" => CommandKind::Check,
            "call" => CommandKind::Call,
            "bet" => CommandKind::Bet(value.chips),
            other => return Err(ActionError::UnknownCommand(other.to_string())),
        };
        Ok(Self::new(Username::new(&value.user), kind))
    }
}
