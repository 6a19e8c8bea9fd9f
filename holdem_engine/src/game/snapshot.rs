//! Outbound table snapshots and change detection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{
    constants::SEND_STATE_COMMAND,
    entities::{Card, SeatIndex, Street, Usd, Username},
    state::TableState,
};

/// Full table view pushed to clients whenever it changes.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot {
    pub channel_command: String,
    pub small_blind: Usd,
    pub big_blind: Usd,
    pub timebank_total: u32,
    pub street: Street,
    pub pot: Usd,
    pub collected_pot: Usd,
    pub current_bet: Usd,
    pub min_raise: Usd,
    pub community_cards: Vec<String>,
    /// True while the table is waiting for `startGame`.
    pub game_stopped: bool,
    pub players: BTreeMap<SeatIndex, PlayerSnapshot>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub user: String,
    pub sitting_out: bool,
    pub chips: Usd,
    pub chips_in_pot: Usd,
    pub time_bank: u32,
    pub hole_cards: Vec<String>,
    pub spotlight: bool,
    pub dealer: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct PlayerDigest {
    user: Username,
    hole_cards: Vec<Card>,
    sitting_out: bool,
    chips: Usd,
    chips_in_pot: Usd,
    time_bank: u32,
}

/// The fields whose change triggers a new snapshot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateDigest {
    dealer: Option<SeatIndex>,
    pseudo_dealer: Option<SeatIndex>,
    spotlight: Option<SeatIndex>,
    street: Street,
    pot: Usd,
    community_cards: Vec<Card>,
    players: Vec<(SeatIndex, PlayerDigest)>,
}

fn card_strings(cards: &[Card]) -> Vec<String> {
    cards.iter().map(ToString::to_string).collect()
}

impl TableState {
    pub fn digest(&self) -> StateDigest {
        StateDigest {
            dealer: self.dealer,
            pseudo_dealer: self.pseudo_dealer,
            spotlight: self.spotlight,
            street: self.street,
            pot: self.pot,
            community_cards: self.community_cards.clone(),
            players: self
                .players()
                .map(|p| {
                    (
                        p.seat,
                        PlayerDigest {
                            user: p.user.clone(),
                            hole_cards: p.hole_cards.clone(),
                            sitting_out: p.sitting_out,
                            chips: p.chips,
                            chips_in_pot: p.chips_in_pot,
                            time_bank: p.time_bank,
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn snapshot(&self, game_stopped: bool) -> TableSnapshot {
        TableSnapshot {
            channel_command: SEND_STATE_COMMAND.to_string(),
            small_blind: self.blinds.small,
            big_blind: self.blinds.big,
            timebank_total: self.timebank_total,
            street: self.street,
            pot: self.pot,
            collected_pot: self.collected_pot,
            current_bet: self.current_bet,
            min_raise: self.min_raise,
            community_cards: card_strings(&self.community_cards),
            game_stopped,
            players: self
                .players()
                .map(|p| {
                    (
                        p.seat,
                        PlayerSnapshot {
                            user: p.user.to_string(),
                            sitting_out: p.sitting_out,
                            chips: p.chips,
                            chips_in_pot: p.chips_in_pot,
                            time_bank: p.time_bank,
                            hole_cards: card_strings(&p.hole_cards),
                            spotlight: self.spotlight == Some(p.seat),
                            dealer: self.dealer == Some(p.seat),
                        },
                    )
                })
                .collect(),
        }
    }
}
