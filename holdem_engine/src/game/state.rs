//! Table state: seating, the per-hand ring and pot bookkeeping.
//!
//! The seating ring is the ascending seat order of `players`, wrapping
//! from the highest occupied seat back to the lowest. The in-hand ring is
//! the subsequence of seats still contesting the current hand, in the
//! same order. Walking either ring is a range scan over the seat map, so
//! a seat that just left the hand can still be used as a starting point.

use log::{debug, info};
use std::collections::{BTreeMap, HashMap};

use super::{
    constants::MAX_PLAYERS,
    entities::{Blinds, Card, Player, SeatIndex, Street, Usd, Username, random_seat},
    errors::{RingError, SeatingError},
};

#[derive(Clone, Debug)]
pub struct TableState {
    pub blinds: Blinds,
    pub timebank_total: u32,
    pub max_players: usize,
    players: BTreeMap<SeatIndex, Player>,
    seats: HashMap<Username, SeatIndex>,
    pub(crate) dealer: Option<SeatIndex>,
    /// Anchor of the in-hand ring. Frozen at the start of a hand and only
    /// moved when its player leaves the hand.
    pub(crate) pseudo_dealer: Option<SeatIndex>,
    pub(crate) spotlight: Option<SeatIndex>,
    /// Last bettor, or the player who closes a street with no aggression.
    pub(crate) last_aggressor: Option<SeatIndex>,
    /// Seats still in the hand, in ring order starting at the dealer.
    in_hand: Vec<SeatIndex>,
    pub street: Street,
    /// Every chip committed this hand, including earlier streets.
    pub pot: Usd,
    /// The part of `pot` carried over from completed streets.
    pub collected_pot: Usd,
    pub current_bet: Usd,
    pub min_raise: Usd,
    pub community_cards: Vec<Card>,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(
            Blinds {
                small: super::constants::DEFAULT_SMALL_BLIND,
                big: super::constants::DEFAULT_BIG_BLIND,
            },
            super::constants::DEFAULT_TIMEBANK_TOTAL,
            MAX_PLAYERS,
        )
    }
}

impl TableState {
    #[must_use]
    pub fn new(blinds: Blinds, timebank_total: u32, max_players: usize) -> Self {
        Self {
            blinds,
            timebank_total,
            max_players,
            players: BTreeMap::new(),
            seats: HashMap::with_capacity(max_players),
            dealer: None,
            pseudo_dealer: None,
            spotlight: None,
            last_aggressor: None,
            in_hand: Vec::with_capacity(max_players),
            street: Street::BetweenHands,
            pot: 0,
            collected_pot: 0,
            current_bet: 0,
            min_raise: 0,
            community_cards: Vec::with_capacity(5),
        }
    }

    // === Lookups ===

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, seat: SeatIndex) -> Option<&Player> {
        self.players.get(&seat)
    }

    pub fn player_mut(&mut self, seat: SeatIndex) -> Option<&mut Player> {
        self.players.get_mut(&seat)
    }

    pub fn seat_of(&self, user: &Username) -> Option<SeatIndex> {
        self.seats.get(user).copied()
    }

    pub fn dealer(&self) -> Option<SeatIndex> {
        self.dealer
    }

    pub fn pseudo_dealer(&self) -> Option<SeatIndex> {
        self.pseudo_dealer
    }

    pub fn spotlight(&self) -> Option<SeatIndex> {
        self.spotlight
    }

    pub fn last_aggressor(&self) -> Option<SeatIndex> {
        self.last_aggressor
    }

    pub fn in_hand(&self) -> &[SeatIndex] {
        &self.in_hand
    }

    pub fn is_in_hand(&self, seat: SeatIndex) -> bool {
        self.in_hand.contains(&seat)
    }

    /// Seats clockwise after `seat`, ending with `seat` itself when it's
    /// occupied.
    fn ring_after(&self, seat: SeatIndex) -> impl Iterator<Item = SeatIndex> + '_ {
        self.players
            .range(seat + 1..)
            .chain(self.players.range(..=seat))
            .map(|(s, _)| *s)
    }

    /// Seats counter-clockwise before `seat`, ending with `seat` itself
    /// when it's occupied.
    fn ring_before(&self, seat: SeatIndex) -> impl Iterator<Item = SeatIndex> + '_ {
        self.players
            .range(..seat)
            .rev()
            .chain(self.players.range(seat..).rev())
            .map(|(s, _)| *s)
    }

    /// Next occupied seat in the seating ring.
    pub fn next_seat(&self, seat: SeatIndex) -> Option<SeatIndex> {
        self.ring_after(seat).next()
    }

    /// Next seat in the in-hand ring after `seat`. `seat` itself need not
    /// be in the hand.
    pub fn next_in_hand(&self, seat: SeatIndex) -> Option<SeatIndex> {
        self.ring_after(seat).find(|s| self.in_hand.contains(s))
    }

    pub fn prev_in_hand(&self, seat: SeatIndex) -> Option<SeatIndex> {
        self.ring_before(seat).find(|s| self.in_hand.contains(s))
    }

    /// Seating ring starting at the dealer.
    pub fn seating_order(&self) -> Vec<SeatIndex> {
        match self.dealer {
            Some(dealer) => {
                let mut order: Vec<SeatIndex> = self.ring_after(dealer).collect();
                order.rotate_right(1);
                order
            }
            None => Vec::new(),
        }
    }

    /// In-hand seats in the order they act, starting with the first seat
    /// after the pseudo-dealer.
    pub fn acting_order(&self) -> Vec<SeatIndex> {
        let Some(anchor) = self.pseudo_dealer else {
            return Vec::new();
        };
        self.ring_after(anchor)
            .filter(|s| self.in_hand.contains(s))
            .collect()
    }

    // === Seating ===

    pub fn open_seats(&self) -> Vec<SeatIndex> {
        (0..self.max_players)
            .filter(|s| !self.players.contains_key(s))
            .collect()
    }

    /// Resolves a join request to a concrete seat. No request means any
    /// open seat, chosen at random.
    pub fn determine_seat(&self, requested: Option<SeatIndex>) -> Result<SeatIndex, SeatingError> {
        match requested {
            Some(seat) if seat >= self.max_players || self.players.contains_key(&seat) => {
                Err(SeatingError::SeatUnavailable(seat as i64))
            }
            Some(seat) => Ok(seat),
            None => random_seat(&self.open_seats()).ok_or(SeatingError::TableFull),
        }
    }

    /// Seats a player. The first player at an empty table becomes the
    /// dealer.
    pub fn add_player(&mut self, player: Player) -> Result<(), SeatingError> {
        if self.players.contains_key(&player.seat) {
            return Err(SeatingError::DuplicateSeat(player.seat));
        }
        if self.seats.contains_key(&player.user) {
            return Err(SeatingError::DuplicateUser(player.user));
        }
        if self.players.len() >= self.max_players {
            return Err(SeatingError::TableFull);
        }
        if self.dealer.is_none() {
            self.dealer = Some(player.seat);
        }
        info!("{} sits down at seat {}", player.user, player.seat);
        self.seats.insert(player.user.clone(), player.seat);
        self.players.insert(player.seat, player);
        Ok(())
    }

    /// Unseats a player. A departing dealer hands the button to the next
    /// seat.
    pub fn remove_player(&mut self, user: &Username) -> Option<Player> {
        let seat = self.seats.remove(user)?;
        if self.is_in_hand(seat) {
            self.remove_player_in_hand(seat);
        }
        let next = self.next_seat(seat).filter(|s| *s != seat);
        let player = self.players.remove(&seat)?;
        if self.dealer == Some(seat) {
            self.dealer = next;
        }
        info!("{} leaves seat {}", player.user, seat);
        Some(player)
    }

    /// Takes a seat out of the current hand. A departing pseudo-dealer
    /// hands the anchor to its predecessor first.
    pub fn remove_player_in_hand(&mut self, seat: SeatIndex) {
        if self.pseudo_dealer == Some(seat) {
            self.pseudo_dealer = self.prev_in_hand(seat).filter(|s| *s != seat);
        }
        self.in_hand.retain(|s| *s != seat);
        if self.in_hand.is_empty() {
            self.pseudo_dealer = None;
        }
    }

    // === Dealer rotation ===

    pub fn sit_out_busted_players(&mut self) -> Result<(), RingError> {
        if self.dealer.is_none() {
            return Err(RingError::NoDealer);
        }
        for player in self.players.values_mut() {
            if player.chips == 0 && !player.sitting_out {
                info!("{} is out of chips and sits out", player.user);
                player.sitting_out = true;
            }
        }
        Ok(())
    }

    pub fn count_players_sitting_in(&self) -> usize {
        self.players.values().filter(|p| !p.sitting_out).count()
    }

    pub fn validate_minimum_players_sitting_in(&self) -> Result<(), RingError> {
        if self.dealer.is_none() {
            return Err(RingError::NoDealer);
        }
        if self.count_players_sitting_in() < 2 {
            return Err(RingError::InsufficientPlayers);
        }
        Ok(())
    }

    /// Moves the button (and the pseudo-dealer with it) to the next seat
    /// that is sitting in.
    pub fn rotate_dealer(&mut self) -> Result<(), RingError> {
        let dealer = self.dealer.ok_or(RingError::NoDealer)?;
        let next = self
            .ring_after(dealer)
            .filter(|s| *s != dealer)
            .find(|s| !self.players[s].sitting_out)
            .ok_or(RingError::InsufficientPlayers)?;
        self.dealer = Some(next);
        self.pseudo_dealer = Some(next);
        Ok(())
    }

    /// Builds the in-hand ring from the seating ring, starting at the
    /// dealer and skipping anyone sitting out.
    pub fn order_players_in_hand(&mut self) -> Result<(), RingError> {
        let dealer = self.dealer.ok_or(RingError::NoDealer)?;
        if self.players[&dealer].sitting_out {
            return Err(RingError::DealerSittingOut);
        }
        let in_hand: Vec<SeatIndex> = self
            .seating_order()
            .into_iter()
            .filter(|s| !self.players[s].sitting_out)
            .collect();
        if in_hand.len() < 2 {
            self.in_hand.clear();
            return Err(RingError::InsufficientPlayers);
        }
        self.in_hand = in_hand;
        Ok(())
    }

    pub fn perform_dealer_rotation(&mut self) -> Result<(), RingError> {
        self.sit_out_busted_players()?;
        self.validate_minimum_players_sitting_in()?;
        self.rotate_dealer()?;
        self.order_players_in_hand()?;
        debug!("hand ring: {}", self.fmt_hand_ring());
        Ok(())
    }

    // === Betting ===

    /// Moves up to `amount` from a player's stack into the pot. Returns
    /// what was actually committed.
    pub fn commit_chips(&mut self, seat: SeatIndex, amount: Usd) -> Usd {
        let Some(player) = self.players.get_mut(&seat) else {
            return 0;
        };
        let amount = amount.min(player.chips);
        player.chips -= amount;
        player.chips_in_pot += amount;
        self.pot += amount;
        amount
    }

    /// Posts both blinds and hands the action to the first player. That
    /// player also closes the street if nobody raises, which keeps the
    /// big blind's option.
    pub fn post_blinds(&mut self) {
        let Some(dealer) = self.dealer else {
            return;
        };
        let heads_up = self.in_hand.len() == 2;
        let sb = if heads_up {
            Some(dealer)
        } else {
            self.next_in_hand(dealer)
        };
        let bb = sb.and_then(|s| self.next_in_hand(s));
        let first = if heads_up {
            sb
        } else {
            bb.and_then(|s| self.next_in_hand(s))
        };
        let (Some(sb), Some(bb)) = (sb, bb) else {
            return;
        };

        let small = self.commit_chips(sb, self.blinds.small);
        let big = self.commit_chips(bb, self.blinds.big);
        debug!("seat {sb} posts {small}, seat {bb} posts {big}");

        self.current_bet = self.blinds.big;
        self.min_raise = self.blinds.big;
        self.spotlight = first;
        self.last_aggressor = first;
    }

    /// Hands the action to the first player after the pseudo-dealer who
    /// still has chips, for a fresh street.
    pub fn reset_spotlight(&mut self) {
        let first = self
            .pseudo_dealer
            .and_then(|anchor| self.first_actor_after(anchor));
        self.spotlight = first;
        self.last_aggressor = first;
        self.min_raise = self.blinds.big;
    }

    /// First in-hand seat after `seat` that isn't all-in.
    pub fn first_actor_after(&self, seat: SeatIndex) -> Option<SeatIndex> {
        self.ring_after(seat)
            .find(|s| self.in_hand.contains(s) && !self.players[s].is_all_in())
    }

    pub fn players_able_to_act(&self) -> Vec<SeatIndex> {
        self.in_hand
            .iter()
            .copied()
            .filter(|s| !self.players[s].is_all_in())
            .collect()
    }

    /// Whether betting on this street is already settled without anyone
    /// acting: nobody can act, or the only one who can owes nothing.
    pub fn is_action_closed(&self) -> bool {
        match self.players_able_to_act().as_slice() {
            [] => true,
            [only] => self.players[only].chips_in_pot >= self.current_bet,
            _ => false,
        }
    }

    /// Advances the spotlight along the in-hand ring, skipping all-in
    /// players, stopping at the last aggressor.
    pub fn rotate_spotlight(&mut self) {
        let Some(mut seat) = self.spotlight else {
            return;
        };
        for _ in 0..self.players.len() {
            let Some(next) = self.next_in_hand(seat) else {
                break;
            };
            seat = next;
            if Some(seat) == self.last_aggressor || !self.players[&seat].is_all_in() {
                break;
            }
        }
        self.spotlight = Some(seat);
    }

    pub fn is_street_complete(&self) -> bool {
        self.spotlight == self.last_aggressor
    }

    pub fn is_everyone_folded(&self) -> bool {
        self.in_hand.len() == 1
    }

    /// Ends a street's betting: the whole pot so far is now collected and
    /// nobody has anything in front of them.
    pub fn collect_pot(&mut self) {
        self.collected_pot = self.pot;
        self.current_bet = 0;
        for player in self.players.values_mut() {
            player.chips_in_pot = 0;
        }
    }

    pub fn go_to_next_street(&mut self) {
        self.street = self.street.next();
    }

    /// Clears everything scoped to a single hand. Stacks, seats, and the
    /// dealer button survive.
    pub fn reset_hand(&mut self) {
        for player in self.players.values_mut() {
            player.reset();
        }
        self.in_hand.clear();
        self.pseudo_dealer = None;
        self.spotlight = None;
        self.last_aggressor = None;
        self.street = Street::BetweenHands;
        self.pot = 0;
        self.collected_pot = 0;
        self.current_bet = 0;
        self.min_raise = 0;
        self.community_cards.clear();
    }

    // === Diagnostics ===

    /// Seating ring from the dealer, e.g. `1 -> 5 -> 8 -> 1`.
    pub fn fmt_seating_ring(&self) -> String {
        fmt_ring(&self.seating_order())
    }

    /// In-hand ring from the pseudo-dealer.
    pub fn fmt_hand_ring(&self) -> String {
        let mut order = self.acting_order();
        order.rotate_right(1);
        fmt_ring(&order)
    }
}

fn fmt_ring(order: &[SeatIndex]) -> String {
    let Some(first) = order.first() else {
        return String::new();
    };
    order
        .iter()
        .chain(std::iter::once(first))
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(seats: &[SeatIndex]) -> TableState {
        let mut table = TableState::default();
        for seat in seats {
            table
                .add_player(Player::new(
                    Username::new(&format!("p{seat}")),
                    *seat,
                    100,
                    60,
                ))
                .unwrap();
        }
        table
    }

    #[test]
    fn test_first_player_becomes_dealer() {
        let table = table_with(&[4]);
        assert_eq!(table.dealer(), Some(4));
        assert_eq!(table.fmt_seating_ring(), "4 -> 4");
    }

    #[test]
    fn test_duplicate_seat_and_user() {
        let mut table = table_with(&[1]);
        assert_eq!(
            table.add_player(Player::new(Username::new("other"), 1, 100, 60)),
            Err(SeatingError::DuplicateSeat(1))
        );
        assert_eq!(
            table.add_player(Player::new(Username::new("p1"), 2, 100, 60)),
            Err(SeatingError::DuplicateUser(Username::new("p1")))
        );
        assert_eq!(table.num_players(), 1);
    }

    #[test]
    fn test_table_full() {
        let mut table = TableState::new(Blinds { small: 1, big: 2 }, 60, 2);
        for seat in 0..2 {
            table
                .add_player(Player::new(Username::new(&format!("p{seat}")), seat, 10, 60))
                .unwrap();
        }
        assert_eq!(table.determine_seat(None), Err(SeatingError::TableFull));
        assert_eq!(
            table.determine_seat(Some(1)),
            Err(SeatingError::SeatUnavailable(1))
        );
        assert_eq!(
            table.determine_seat(Some(7)),
            Err(SeatingError::SeatUnavailable(7))
        );
    }

    #[test]
    fn test_determine_seat_random_is_open() {
        let table = table_with(&[0, 1, 2, 4]);
        for _ in 0..20 {
            let seat = table.determine_seat(None).unwrap();
            assert!(table.open_seats().contains(&seat));
        }
        assert_eq!(table.determine_seat(Some(3)), Ok(3));
    }

    #[test]
    fn test_remove_dealer_advances_button() {
        let mut table = table_with(&[2, 5, 7]);
        assert_eq!(table.dealer(), Some(2));
        table.remove_player(&Username::new("p2"));
        assert_eq!(table.dealer(), Some(5));
        table.remove_player(&Username::new("p5"));
        table.remove_player(&Username::new("p7"));
        assert_eq!(table.dealer(), None);
        assert_eq!(table.fmt_seating_ring(), "");
    }

    #[test]
    fn test_remove_pseudo_dealer_moves_to_predecessor() {
        let mut table = table_with(&[1, 3, 5, 7]);
        table.perform_dealer_rotation().unwrap();
        assert_eq!(table.pseudo_dealer(), Some(3));
        table.remove_player_in_hand(3);
        assert_eq!(table.pseudo_dealer(), Some(1));
        assert_eq!(table.in_hand(), &[5, 7, 1]);
        assert_eq!(table.fmt_hand_ring(), "1 -> 5 -> 7 -> 1");
    }

    #[test]
    fn test_next_in_hand_from_folded_seat() {
        let mut table = table_with(&[1, 3, 5]);
        table.perform_dealer_rotation().unwrap();
        table.remove_player_in_hand(5);
        assert_eq!(table.next_in_hand(5), Some(1));
        assert_eq!(table.prev_in_hand(5), Some(3));
    }

    #[test]
    fn test_rotate_dealer_skips_sitting_out() {
        let mut table = table_with(&[0, 1, 2]);
        table.player_mut(1).unwrap().sitting_out = true;
        table.rotate_dealer().unwrap();
        assert_eq!(table.dealer(), Some(2));
    }

    #[test]
    fn test_rotation_errors() {
        let mut empty = TableState::default();
        assert_eq!(empty.perform_dealer_rotation(), Err(RingError::NoDealer));
        assert_eq!(empty.rotate_dealer(), Err(RingError::NoDealer));

        let mut table = table_with(&[0, 1]);
        table.player_mut(1).unwrap().chips = 0;
        assert_eq!(
            table.perform_dealer_rotation(),
            Err(RingError::InsufficientPlayers)
        );
        assert!(table.player(1).unwrap().sitting_out);

        let mut table = table_with(&[0, 1, 2]);
        table.player_mut(0).unwrap().sitting_out = true;
        assert_eq!(
            table.order_players_in_hand(),
            Err(RingError::DealerSittingOut)
        );
    }

    #[test]
    fn test_rotate_spotlight_skips_all_in() {
        let mut table = table_with(&[0, 1, 2, 3]);
        table.perform_dealer_rotation().unwrap();
        table.player_mut(2).unwrap().chips = 0;
        table.spotlight = Some(1);
        table.last_aggressor = Some(0);
        table.rotate_spotlight();
        assert_eq!(table.spotlight(), Some(3));
    }

    #[test]
    fn test_rotate_spotlight_stops_at_all_in_aggressor() {
        let mut table = table_with(&[0, 1, 2]);
        table.perform_dealer_rotation().unwrap();
        table.player_mut(2).unwrap().chips = 0;
        table.player_mut(0).unwrap().chips = 0;
        table.spotlight = Some(1);
        table.last_aggressor = Some(0);
        table.rotate_spotlight();
        assert_eq!(table.spotlight(), Some(0));
        assert!(table.is_street_complete());
    }

    #[test]
    fn test_commit_chips_caps_at_stack() {
        let mut table = table_with(&[0, 1]);
        assert_eq!(table.commit_chips(0, 150), 100);
        let player = table.player(0).unwrap();
        assert_eq!(player.chips, 0);
        assert_eq!(player.chips_in_pot, 100);
        assert_eq!(table.pot, 100);
    }

    #[test]
    fn test_heads_up_blinds() {
        let mut table = table_with(&[0, 1]);
        table.perform_dealer_rotation().unwrap();
        table.post_blinds();
        assert_eq!(table.dealer(), Some(1));
        assert_eq!(table.player(1).unwrap().chips_in_pot, 1);
        assert_eq!(table.player(0).unwrap().chips_in_pot, 2);
        assert_eq!(table.spotlight(), Some(1));
        assert_eq!(table.last_aggressor(), Some(1));
        assert_eq!(table.current_bet, 2);
        assert_eq!(table.pot, 3);
    }

    #[test]
    fn test_multiway_blinds() {
        let mut table = table_with(&[0, 2, 4, 6]);
        table.perform_dealer_rotation().unwrap();
        table.post_blinds();
        assert_eq!(table.dealer(), Some(2));
        assert_eq!(table.player(4).unwrap().chips_in_pot, 1);
        assert_eq!(table.player(6).unwrap().chips_in_pot, 2);
        assert_eq!(table.spotlight(), Some(0));
        assert_eq!(table.last_aggressor(), Some(0));
        assert_eq!(table.min_raise, 2);
    }

    #[test]
    fn test_collect_pot_and_reset() {
        let mut table = table_with(&[0, 1, 2]);
        table.perform_dealer_rotation().unwrap();
        table.post_blinds();
        table.collect_pot();
        assert_eq!(table.collected_pot, 3);
        assert_eq!(table.pot, 3);
        assert_eq!(table.current_bet, 0);
        assert!(table.players().all(|p| p.chips_in_pot == 0));

        table.reset_hand();
        assert!(table.in_hand().is_empty());
        assert_eq!(table.pot, 0);
        assert_eq!(table.street, Street::BetweenHands);
        assert_eq!(table.spotlight(), None);
        assert_eq!(table.dealer(), Some(1));
    }

    #[test]
    fn test_action_closed() {
        let mut table = table_with(&[0, 1]);
        table.perform_dealer_rotation().unwrap();
        table.player_mut(1).unwrap().chips = 1;
        table.post_blinds();
        // dealer (seat 1) is all-in on the small blind, the big blind has
        // nothing to call
        assert!(table.player(1).unwrap().is_all_in());
        assert!(table.is_action_closed());
    }
}
