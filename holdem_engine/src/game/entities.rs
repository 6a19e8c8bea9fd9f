use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

use super::constants;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Self::Club, Self::Spade, Self::Diamond, Self::Heart];

    fn code(self) -> char {
        match self {
            Self::Club => 'c',
            Self::Spade => 's',
            Self::Diamond => 'd',
            Self::Heart => 'h',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

pub const ACE: Value = 14;

/// A card is a tuple of a value (deuce=2u8 ... ace=14u8) and a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

/// Compact two character form, e.g. `Ah`, `Td`, `7c`.
impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            14 => 'A',
            13 => 'K',
            12 => 'Q',
            11 => 'J',
            10 => 'T',
            v => char::from(b'0' + v),
        };
        write!(f, "{value}{}", self.1.code())
    }
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid card `{0}`")]
pub struct ParseCardError(pub String);

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(v), Some(su), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ParseCardError(s.to_string()));
        };
        let value = match v.to_ascii_uppercase() {
            'A' => 14,
            'K' => 13,
            'Q' => 12,
            'J' => 11,
            'T' => 10,
            d @ '2'..='9' => d as u8 - b'0',
            _ => return Err(ParseCardError(s.to_string())),
        };
        let suit = match su.to_ascii_lowercase() {
            'c' => Suit::Club,
            's' => Suit::Spade,
            'd' => Suit::Diamond,
            'h' => Suit::Heart,
            _ => return Err(ParseCardError(s.to_string())),
        };
        Ok(Card(value, suit))
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Rank {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "high card",
            Self::OnePair => "one pair",
            Self::TwoPair => "two pair",
            Self::ThreeOfAKind => "three of a kind",
            Self::Straight => "straight",
            Self::Flush => "flush",
            Self::FullHouse => "full house",
            Self::FourOfAKind => "four of a kind",
            Self::StraightFlush => "straight flush",
        };
        write!(f, "{repr}")
    }
}

/// One component of an evaluated hand. A full hand is a list of
/// subhands ordered by significance, so two hands compare
/// lexicographically.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SubHand {
    pub rank: Rank,
    pub values: Vec<Value>,
}

#[derive(Debug)]
pub struct Deck {
    cards: [Card; 52],
    pub deck_idx: usize,
}

impl Deck {
    /// Deals the next card. A deck never deals more than 52 cards in a
    /// hand of hold'em (at most 9 * 2 + 5), so running off the end wraps
    /// around rather than panicking.
    pub fn deal_card(&mut self) -> Card {
        let card = self.cards[self.deck_idx % self.cards.len()];
        self.deck_idx += 1;
        card
    }

    pub fn deal(&mut self, n: usize) -> Vec<Card> {
        (0..n).map(|_| self.deal_card()).collect()
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::rng());
        self.deck_idx = 0;
    }

    /// Shuffles, then moves `top` to the top of the deck in the given
    /// order. Cards not in a standard deck are ignored.
    pub fn shuffle_with_top(&mut self, top: &[Card]) {
        self.shuffle();
        let mut pos = 0;
        for card in top {
            if let Some(idx) = self.cards[pos..].iter().position(|c| c == card) {
                self.cards.swap(pos, pos + idx);
                pos += 1;
            }
        }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.deck_idx)
    }
}

impl Default for Deck {
    fn default() -> Self {
        let mut cards: [Card; 52] = [Card(2, Suit::Club); 52];
        for (i, value) in (2u8..=ACE).enumerate() {
            for (j, suit) in Suit::ALL.into_iter().enumerate() {
                cards[4 * i + j] = Card(value, suit);
            }
        }
        Self { cards, deck_idx: 0 }
    }
}

/// Type alias for whole chips. All bets and player stacks are
/// represented as whole chips.
pub type Usd = u32;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Self {
        let username = s
            .trim()
            .chars()
            .map(|c| if c.is_ascii_whitespace() { '_' } else { c })
            .take(constants::MAX_USERNAME_LENGTH)
            .collect();
        Self(username)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Type alias for seat positions at the table.
pub type SeatIndex = usize;

/// Picks a random seat from `open`, if any.
pub fn random_seat(open: &[SeatIndex]) -> Option<SeatIndex> {
    if open.is_empty() {
        return None;
    }
    Some(open[rand::rng().random_range(0..open.len())])
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Blinds {
    pub small: Usd,
    pub big: Usd,
}

impl fmt::Display for Blinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.small, self.big)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Street {
    #[default]
    BetweenHands,
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    /// The street that follows this one. The river and the gap between
    /// hands have no successor.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Preflop => Self::Flop,
            Self::Flop => Self::Turn,
            Self::Turn => Self::River,
            other => other,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::BetweenHands => "between hands",
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub seat: SeatIndex,
    pub user: Username,
    pub chips: Usd,
    /// Chips committed on the current street.
    pub chips_in_pot: Usd,
    /// Most this player can take from the pot this hand.
    pub max_win: Usd,
    /// Whether `max_win` was fixed by going all-in.
    pub(crate) max_win_capped: bool,
    pub time_bank: u32,
    pub hole_cards: Vec<Card>,
    pub sitting_out: bool,
}

impl Player {
    #[must_use]
    pub fn new(user: Username, seat: SeatIndex, chips: Usd, time_bank: u32) -> Self {
        Self {
            seat,
            user,
            chips,
            chips_in_pot: 0,
            max_win: 0,
            max_win_capped: false,
            time_bank,
            hole_cards: Vec::with_capacity(2),
            sitting_out: false,
        }
    }

    pub fn is_all_in(&self) -> bool {
        self.chips == 0
    }

    pub fn reset(&mut self) {
        self.hole_cards.clear();
        self.chips_in_pot = 0;
        self.max_win = 0;
        self.max_win_capped = false;
    }
}
