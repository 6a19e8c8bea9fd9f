//! Engine phase definitions.
//!
//! Each phase does one unit of work per tick and names its successor.
//! Pauses are phases too, so a client always sees the table at rest
//! between blinds, streets and payouts.

use log::{error, info, warn};
use std::time::Duration;

use super::{
    actions::ActionOutcome,
    entities::Street,
    state_machine::{EngineCore, EngineState, Phase},
};
use crate::table::config::EngineTiming;

/// Waiting for players; applies seating commands until `startGame`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ProcessSitCommands;

/// Rotating the dealer and building the in-hand ring
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StartHand;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PauseAfterStartHand;

/// Posting the small and big blinds
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PostBlinds;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PauseAfterPostBlinds;

/// Dealing hole cards
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DealCards;

/// Applying player actions until the street or the hand ends
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProcessGameCommands;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PauseAfterEveryoneFolded;

/// Paying the last player standing
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EveryoneFoldedPayout;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PauseAfterEveryoneFoldedPayout;

/// Fixing side-pot ceilings and collecting the street's bets
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EndStreet;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PauseAfterEndStreet;

/// Dealing the flop, turn or river
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DealStreet;

/// Paying one tier of winners
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Showdown;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PauseAfterShowdown;

/// Clearing the hand and reapplying queued seating commands
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EndHand;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PauseAfterEndHand;

impl Phase for ProcessSitCommands {
    fn step(&self, core: &mut EngineCore) -> EngineState {
        if core.process_sit_commands(true) {
            StartHand.into()
        } else {
            (*self).into()
        }
    }
}

impl Phase for StartHand {
    fn step(&self, core: &mut EngineCore) -> EngineState {
        match core.table.perform_dealer_rotation() {
            Ok(()) => {
                core.table.street = Street::Preflop;
                info!("new hand, ring {}", core.table.fmt_hand_ring());
                PauseAfterStartHand.into()
            }
            Err(error) => {
                warn!("can't start a hand: {error}");
                ProcessSitCommands.into()
            }
        }
    }
}

impl Phase for PauseAfterStartHand {
    fn step(&self, _core: &mut EngineCore) -> EngineState {
        PostBlinds.into()
    }

    fn pacing(&self, timing: &EngineTiming) -> Duration {
        timing.pause_medium
    }
}

impl Phase for PostBlinds {
    fn step(&self, core: &mut EngineCore) -> EngineState {
        core.table.post_blinds();
        PauseAfterPostBlinds.into()
    }
}

impl Phase for PauseAfterPostBlinds {
    fn step(&self, _core: &mut EngineCore) -> EngineState {
        DealCards.into()
    }

    fn pacing(&self, timing: &EngineTiming) -> Duration {
        timing.pause_medium
    }
}

impl Phase for DealCards {
    fn step(&self, core: &mut EngineCore) -> EngineState {
        core.deal_hole_cards();
        if core.table.is_action_closed() {
            EndStreet.into()
        } else {
            ProcessGameCommands.into()
        }
    }
}

impl Phase for ProcessGameCommands {
    fn step(&self, core: &mut EngineCore) -> EngineState {
        match core.process_game_commands() {
            Some(ActionOutcome::StreetComplete) => EndStreet.into(),
            Some(ActionOutcome::EveryoneFolded) => PauseAfterEveryoneFolded.into(),
            Some(ActionOutcome::Continue) | None => (*self).into(),
        }
    }
}

impl Phase for PauseAfterEveryoneFolded {
    fn step(&self, _core: &mut EngineCore) -> EngineState {
        EveryoneFoldedPayout.into()
    }

    fn pacing(&self, timing: &EngineTiming) -> Duration {
        timing.pause_medium
    }
}

impl Phase for EveryoneFoldedPayout {
    fn step(&self, core: &mut EngineCore) -> EngineState {
        core.table.award_pot_to_last_player();
        PauseAfterEveryoneFoldedPayout.into()
    }
}

impl Phase for PauseAfterEveryoneFoldedPayout {
    fn step(&self, _core: &mut EngineCore) -> EngineState {
        EndHand.into()
    }

    fn pacing(&self, timing: &EngineTiming) -> Duration {
        timing.pause_medium
    }
}

impl Phase for EndStreet {
    fn step(&self, core: &mut EngineCore) -> EngineState {
        core.table.create_side_pots();
        core.table.collect_pot();
        PauseAfterEndStreet.into()
    }
}

impl Phase for PauseAfterEndStreet {
    fn step(&self, core: &mut EngineCore) -> EngineState {
        if core.table.street == Street::River {
            Showdown.into()
        } else {
            core.table.go_to_next_street();
            DealStreet.into()
        }
    }

    fn pacing(&self, timing: &EngineTiming) -> Duration {
        timing.pause_medium
    }
}

impl Phase for DealStreet {
    fn step(&self, core: &mut EngineCore) -> EngineState {
        core.deal_street();
        core.table.reset_spotlight();
        if core.table.spotlight().is_none() || core.table.is_action_closed() {
            EndStreet.into()
        } else {
            ProcessGameCommands.into()
        }
    }
}

impl Phase for Showdown {
    fn step(&self, core: &mut EngineCore) -> EngineState {
        core.table.showdown_round();
        PauseAfterShowdown.into()
    }
}

impl Phase for PauseAfterShowdown {
    fn step(&self, core: &mut EngineCore) -> EngineState {
        let table = &core.table;
        if table.needs_another_showdown() {
            return Showdown.into();
        }
        if table.pot > 0 {
            error!("{} chips left in the pot with nobody to pay", table.pot);
        }
        EndHand.into()
    }

    fn pacing(&self, timing: &EngineTiming) -> Duration {
        timing.pause_medium
    }
}

impl Phase for EndHand {
    fn step(&self, core: &mut EngineCore) -> EngineState {
        core.table.reset_hand();
        core.discard_game_commands();
        core.process_sit_commands(false);
        PauseAfterEndHand.into()
    }
}

impl Phase for PauseAfterEndHand {
    fn step(&self, _core: &mut EngineCore) -> EngineState {
        StartHand.into()
    }

    fn pacing(&self, timing: &EngineTiming) -> Duration {
        timing.pause_long
    }
}
