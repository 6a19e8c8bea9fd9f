//! Side-pot ceilings, hand comparison and payouts.
//!
//! Every player in the hand carries a `max_win`: the most they can take
//! from the pot. An all-in player's ceiling is fixed on the street they
//! run out of chips; everyone else's tracks the whole pot. Payouts walk
//! the winners from the smallest ceiling up, so each short stack takes
//! its share before the remainder goes to the deeper stacks.

use log::{error, info};

use super::{
    entities::{SeatIndex, Usd},
    functional,
    state::TableState,
};

impl TableState {
    /// Refreshes every in-hand player's `max_win` at the end of a street.
    pub fn create_side_pots(&mut self) {
        for seat in self.in_hand().to_vec() {
            let Some(player) = self.player(seat) else {
                continue;
            };
            if player.max_win_capped {
                continue;
            }
            if player.is_all_in() && player.chips_in_pot <= self.current_bet {
                let ceiling = self.side_pot_ceiling(seat);
                if let Some(player) = self.player_mut(seat) {
                    player.max_win = ceiling;
                    player.max_win_capped = true;
                    info!("{} is all-in, can win at most {ceiling}", player.user);
                }
            } else {
                let pot = self.pot;
                if let Some(player) = self.player_mut(seat) {
                    player.max_win = player.max_win.max(pot);
                }
            }
        }
    }

    /// Chips from earlier streets plus, from every seat, what this street
    /// contributed up to the hero's own contribution.
    fn side_pot_ceiling(&self, hero: SeatIndex) -> Usd {
        let Some(hero_in_pot) = self.player(hero).map(|p| p.chips_in_pot) else {
            return 0;
        };
        self.players()
            .map(|p| p.chips_in_pot.min(hero_in_pot))
            .fold(self.collected_pot, Usd::saturating_add)
    }

    /// Seats holding the best hand, in acting order.
    pub fn find_best_hand(&self) -> Vec<SeatIndex> {
        let seats = self.acting_order();
        let hands: Vec<_> = seats
            .iter()
            .filter_map(|seat| self.player(*seat))
            .map(|player| {
                let mut cards = player.hole_cards.clone();
                cards.extend_from_slice(&self.community_cards);
                functional::eval(&cards)
            })
            .collect();
        functional::argmax(&hands)
            .into_iter()
            .map(|i| seats[i])
            .collect()
    }

    /// Pays `winners` from the smallest side-pot ceiling upward. Each
    /// winner, once paid, no longer shares in larger pots.
    pub fn payout_winners(&mut self, winners: &[SeatIndex]) {
        let mut winners = winners.to_vec();
        // stable, so ties keep acting order
        winners.sort_by_key(|seat| self.player(*seat).map_or(0, |p| p.max_win));
        while !winners.is_empty() {
            let amount = self.player(winners[0]).map_or(0, |p| p.max_win);
            if amount > 0 {
                self.distribute_chips(&winners, amount);
            }
            winners.remove(0);
        }
    }

    /// Splits `amount` evenly between `winners`. Odd chips go one at a
    /// time to the winners closest to the left of the pseudo-dealer.
    pub fn distribute_chips(&mut self, winners: &[SeatIndex], amount: Usd) {
        let amount = amount.min(self.pot);
        if amount == 0 || winners.is_empty() {
            return;
        }
        let order: Vec<SeatIndex> = self
            .acting_order()
            .into_iter()
            .filter(|seat| winners.contains(seat))
            .collect();
        if order.is_empty() {
            error!("no winner in {winners:?} is still in the hand");
            return;
        }

        let share = amount / order.len() as Usd;
        let mut odd_chips = amount % order.len() as Usd;
        for seat in &order {
            let extra = if odd_chips > 0 {
                odd_chips -= 1;
                1
            } else {
                0
            };
            if let Some(player) = self.player_mut(*seat) {
                player.chips += share + extra;
                info!("{} wins {}", player.user, share + extra);
            }
        }

        for seat in self.in_hand().to_vec() {
            if let Some(player) = self.player_mut(seat) {
                player.max_win = player.max_win.saturating_sub(amount);
            }
        }
        self.pot -= amount;
        self.collected_pot = self.collected_pot.saturating_sub(amount);
    }

    /// Awards the whole pot to the last player standing.
    pub fn award_pot_to_last_player(&mut self) {
        self.collect_pot();
        let Some(&winner) = self.in_hand().first() else {
            error!("pot of {} has nobody left to win it", self.pot);
            return;
        };
        let pot = self.pot;
        if let Some(player) = self.player_mut(winner) {
            player.chips += pot;
            info!("{} wins {pot} uncontested", player.user);
        }
        self.pot = 0;
        self.collected_pot = 0;
    }

    /// One showdown round: pays the best hands still in and removes them
    /// from the hand.
    pub fn showdown_round(&mut self) {
        let winners = self.find_best_hand();
        self.payout_winners(&winners);
        for seat in winners {
            self.remove_player_in_hand(seat);
        }
    }

    /// Chips remain and someone is still in the hand to win them.
    pub fn needs_another_showdown(&self) -> bool {
        self.pot > 0 && !self.in_hand().is_empty()
    }
}
