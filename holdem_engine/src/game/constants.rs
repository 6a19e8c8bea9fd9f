use super::entities::Usd;

/// Seats at a full ring table.
pub const MAX_PLAYERS: usize = 9;

pub const MAX_USERNAME_LENGTH: usize = 32;

pub const DEFAULT_SMALL_BLIND: Usd = 1;
pub const DEFAULT_BIG_BLIND: Usd = 2;

/// Seconds of time bank each player starts with. Reported but never
/// consumed by the engine.
pub const DEFAULT_TIMEBANK_TOTAL: u32 = 60;

/// Channel tag carried by every outbound snapshot.
pub const SEND_STATE_COMMAND: &str = "sendState";
