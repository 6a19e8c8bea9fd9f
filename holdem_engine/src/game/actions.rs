//! Player commands applied to the table.

use log::{debug, info};

use super::{
    commands::{Command, CommandKind},
    entities::{SeatIndex, Usd},
    errors::ActionError,
    state::TableState,
};

/// What an accepted command did to the flow of the hand.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActionOutcome {
    Continue,
    StreetComplete,
    EveryoneFolded,
}

impl TableState {
    /// Applies a seated player's command. Rejected commands leave the
    /// table untouched.
    pub fn make_action(&mut self, command: &Command) -> Result<ActionOutcome, ActionError> {
        let seat = self
            .seat_of(&command.user)
            .ok_or_else(|| ActionError::UserNotSeated(command.user.clone()))?;
        match command.kind {
            CommandKind::AddChips(amount) => {
                self.add_chips(seat, amount);
                Ok(ActionOutcome::Continue)
            }
            CommandKind::SitOut => {
                self.set_sitting_out(seat, true);
                Ok(ActionOutcome::Continue)
            }
            CommandKind::SitIn => {
                self.set_sitting_out(seat, false);
                Ok(ActionOutcome::Continue)
            }
            CommandKind::Fold => self.fold(seat),
            CommandKind::Check => self.check(seat),
            CommandKind::Call => self.call(seat),
            CommandKind::Bet(amount) => self.bet(seat, amount),
            CommandKind::Join { .. } | CommandKind::Leave | CommandKind::StartGame => {
                Err(ActionError::NotAPlayerAction(command.kind.name()))
            }
        }
    }

    fn verify_spotlight(&self, seat: SeatIndex) -> Result<(), ActionError> {
        if self.spotlight == Some(seat) {
            Ok(())
        } else {
            Err(ActionError::NotYourTurn)
        }
    }

    fn after_action(&mut self) -> ActionOutcome {
        self.rotate_spotlight();
        if self.is_street_complete() {
            ActionOutcome::StreetComplete
        } else {
            ActionOutcome::Continue
        }
    }

    fn add_chips(&mut self, seat: SeatIndex, amount: Usd) {
        if let Some(player) = self.player_mut(seat) {
            player.chips = player.chips.saturating_add(amount);
            info!("{} adds {amount} chips", player.user);
        }
    }

    fn set_sitting_out(&mut self, seat: SeatIndex, sitting_out: bool) {
        if let Some(player) = self.player_mut(seat) {
            player.sitting_out = sitting_out;
            info!(
                "{} {}",
                player.user,
                if sitting_out { "sits out" } else { "sits in" }
            );
        }
    }

    fn fold(&mut self, seat: SeatIndex) -> Result<ActionOutcome, ActionError> {
        self.verify_spotlight(seat)?;
        let was_closer = self.last_aggressor == Some(seat);
        self.remove_player_in_hand(seat);
        debug!("seat {seat} folds");

        if self.is_everyone_folded() {
            self.spotlight = None;
            self.last_aggressor = None;
            return Ok(ActionOutcome::EveryoneFolded);
        }

        if was_closer {
            // The folder can't close the street anymore; the next player who
            // can still act takes over that role.
            return Ok(match self.first_actor_after(seat) {
                Some(next) => {
                    self.spotlight = Some(next);
                    self.last_aggressor = Some(next);
                    if self.is_action_closed() {
                        ActionOutcome::StreetComplete
                    } else {
                        ActionOutcome::Continue
                    }
                }
                None => {
                    self.spotlight = None;
                    self.last_aggressor = None;
                    ActionOutcome::StreetComplete
                }
            });
        }

        Ok(self.after_action())
    }

    fn check(&mut self, seat: SeatIndex) -> Result<ActionOutcome, ActionError> {
        self.verify_spotlight(seat)?;
        let chips_in_pot = self.player(seat).map_or(0, |p| p.chips_in_pot);
        if chips_in_pot < self.current_bet {
            return Err(ActionError::CannotCheck {
                to_call: self.current_bet - chips_in_pot,
            });
        }
        debug!("seat {seat} checks");
        Ok(self.after_action())
    }

    fn call(&mut self, seat: SeatIndex) -> Result<ActionOutcome, ActionError> {
        self.verify_spotlight(seat)?;
        let chips_in_pot = self.player(seat).map_or(0, |p| p.chips_in_pot);
        if chips_in_pot >= self.current_bet {
            return Err(ActionError::AlreadyMatched);
        }
        let called = self.commit_chips(seat, self.current_bet - chips_in_pot);
        debug!("seat {seat} calls {called}");
        Ok(self.after_action())
    }

    /// `amount` is the total the player wants in front of them this
    /// street. A stack too short for it goes all-in instead.
    fn bet(&mut self, seat: SeatIndex, amount: Usd) -> Result<ActionOutcome, ActionError> {
        self.verify_spotlight(seat)?;
        let Some(player) = self.player(seat) else {
            return Err(ActionError::NotYourTurn);
        };
        let increment = amount.saturating_sub(player.chips_in_pot).min(player.chips);
        let all_in = increment == player.chips;
        let new_total = player.chips_in_pot + increment;

        if !all_in && (increment < self.min_raise || new_total <= self.current_bet) {
            return Err(ActionError::BetTooSmall {
                amount,
                min_raise: self.min_raise,
            });
        }

        self.commit_chips(seat, increment);
        if new_total > self.current_bet {
            self.min_raise = increment;
            self.last_aggressor = Some(seat);
            self.current_bet = new_total;
            debug!("seat {seat} bets to {new_total}");
        } else {
            // all-in for no more than the current bet is a call
            debug!("seat {seat} calls all-in for {increment}");
        }
        Ok(self.after_action())
    }
}
