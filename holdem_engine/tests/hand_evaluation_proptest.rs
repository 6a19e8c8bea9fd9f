/// Property-based tests for hand evaluation using proptest
///
/// Random hands check the structural guarantees of `eval` and `argmax`;
/// fixed suits and values pin the category ordering.
use holdem_engine::game::{
    entities::{ACE, Card, Rank, SubHand, Suit},
    functional::{argmax, eval},
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn suit_strategy() -> impl Strategy<Value = Suit> {
    prop::sample::select(Suit::ALL.to_vec())
}

// Deuce is 2, ace is 14
fn card_strategy() -> impl Strategy<Value = Card> {
    (2u8..=ACE, suit_strategy()).prop_map(|(value, suit)| Card(value, suit))
}

fn unique_cards_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(card_strategy(), min..=max).prop_filter("Cards must be unique", |cards| {
        let set: BTreeSet<_> = cards.iter().collect();
        set.len() == cards.len()
    })
}

// Two hole cards plus a full board
fn seven_card_hand_strategy() -> impl Strategy<Value = Vec<Card>> {
    unique_cards_strategy(7, 7)
}

fn cards(s: &str) -> Vec<Card> {
    s.split_whitespace().map(|c| c.parse().unwrap()).collect()
}

fn beats(a: &[Card], b: &[Card]) -> bool {
    argmax(&[eval(a), eval(b)]) == vec![0]
}

proptest! {
    #[test]
    fn test_eval_uses_at_most_five_cards(cards in seven_card_hand_strategy()) {
        let hand = eval(&cards);
        prop_assert!(!hand.is_empty());

        let used: usize = hand
            .iter()
            .map(|sub| match sub.rank {
                Rank::HighCard => sub.values.len(),
                Rank::OnePair => 2,
                Rank::TwoPair => 4,
                Rank::ThreeOfAKind => 3,
                Rank::FourOfAKind => 4,
                _ => 5,
            })
            .sum();
        prop_assert!(used <= 5, "{hand:?} plays {used} cards");
    }

    #[test]
    fn test_eval_ignores_card_order(cards in seven_card_hand_strategy()) {
        let mut reversed = cards.clone();
        reversed.reverse();
        prop_assert_eq!(eval(&cards), eval(&reversed));
    }

    #[test]
    fn test_eval_handles_two_cards(cards in unique_cards_strategy(2, 2)) {
        let hand = eval(&cards);
        prop_assert!(!hand.is_empty());
        prop_assert!(hand[0].rank <= Rank::OnePair);
    }

    #[test]
    fn test_more_cards_never_weaken_a_hand(cards in seven_card_hand_strategy()) {
        // the five card prefix is a subset of the full seven
        let five = eval(&cards[..5]);
        let seven = eval(&cards);
        prop_assert!(seven >= five);
    }

    #[test]
    fn test_argmax_identical_hands_all_win(cards in seven_card_hand_strategy()) {
        let hand = eval(&cards);
        let winners = argmax(&[hand.clone(), hand.clone(), hand]);
        prop_assert_eq!(winners, vec![0, 1, 2]);
    }

    #[test]
    fn test_argmax_returns_sorted_valid_indices(
        hands in prop::collection::vec(seven_card_hand_strategy(), 2..=9)
    ) {
        let evaluated: Vec<Vec<SubHand>> = hands.iter().map(|h| eval(h)).collect();
        let winners = argmax(&evaluated);

        prop_assert!(!winners.is_empty());
        prop_assert!(winners.windows(2).all(|w| w[0] < w[1]));
        let best = &evaluated[winners[0]];
        for (i, hand) in evaluated.iter().enumerate() {
            if winners.contains(&i) {
                prop_assert_eq!(hand, best);
            } else {
                prop_assert!(hand < best);
            }
        }
    }

    #[test]
    fn test_hand_comparison_transitive(
        a in seven_card_hand_strategy(),
        b in seven_card_hand_strategy(),
        c in seven_card_hand_strategy()
    ) {
        if beats(&a, &b) && beats(&b, &c) {
            prop_assert!(beats(&a, &c));
        }
    }

    #[test]
    fn test_straight_flush_beats_four_of_a_kind(suit in suit_strategy(), high in 5u8..=ACE) {
        let straight_flush: Vec<Card> = (high - 4..=high)
            .map(|v| Card(if v == 1 { ACE } else { v }, suit))
            .collect();
        let quads = cards("Kc Ks Kd Kh Qc");
        prop_assume!(straight_flush.iter().all(|c| !quads.contains(c)));

        prop_assert_eq!(eval(&straight_flush)[0].rank, Rank::StraightFlush);
        prop_assert!(beats(&straight_flush, &quads));
    }

    #[test]
    fn test_four_of_a_kind_beats_full_house(quad in 2u8..=ACE, trip in 2u8..=ACE) {
        prop_assume!(quad != trip);
        let four_kind: Vec<Card> = Suit::ALL
            .into_iter()
            .map(|suit| Card(quad, suit))
            .chain([Card(trip, Suit::Club)])
            .collect();
        let full_house = vec![
            Card(trip, Suit::Club),
            Card(trip, Suit::Diamond),
            Card(trip, Suit::Heart),
            Card(quad, Suit::Club),
            Card(quad, Suit::Diamond),
        ];
        prop_assert!(beats(&four_kind, &full_house));
    }

    #[test]
    fn test_flush_beats_straight(suit in suit_strategy()) {
        let flush: Vec<Card> = [2, 5, 8, 10, 13].into_iter().map(|v| Card(v, suit)).collect();
        let straight = cards("7c 8d 9h Ts Jc");
        prop_assert_eq!(eval(&flush)[0].rank, Rank::Flush);
        prop_assert!(beats(&flush, &straight));
    }

    #[test]
    fn test_three_of_a_kind_beats_two_pair(trip in 2u8..=ACE, high in 2u8..=ACE, low in 2u8..=ACE) {
        prop_assume!(trip != high && trip != low && high != low);
        let three_kind = vec![
            Card(trip, Suit::Club),
            Card(trip, Suit::Diamond),
            Card(trip, Suit::Heart),
            Card(high, Suit::Spade),
            Card(low, Suit::Diamond),
        ];
        let two_pair = vec![
            Card(high, Suit::Club),
            Card(high, Suit::Diamond),
            Card(low, Suit::Heart),
            Card(low, Suit::Spade),
            Card(trip, Suit::Spade),
        ];
        prop_assert!(beats(&three_kind, &two_pair));
    }

    #[test]
    fn test_pair_kicker_decides(pair in 2u8..=ACE, kicker in 2u8..ACE) {
        prop_assume!(pair != kicker && pair != kicker + 1);
        let board = vec![Card(pair, Suit::Club), Card(pair, Suit::Diamond)];
        let mut stronger = board.clone();
        stronger.push(Card(kicker + 1, Suit::Heart));
        let mut weaker = board;
        weaker.push(Card(kicker, Suit::Heart));
        prop_assert!(beats(&stronger, &weaker));
    }
}

#[test]
fn test_wheel_loses_to_six_high_straight() {
    let wheel = cards("Ac 2d 3h 4s 5c");
    let six_high = cards("2c 3d 4h 5s 6c");
    assert_eq!(eval(&wheel)[0].values, vec![5]);
    assert!(beats(&six_high, &wheel));
}

#[test]
fn test_board_plays_for_both() {
    let board = "Ts Js Qd Kc Ah";
    let a = cards(&format!("{board} 2c 3d"));
    let b = cards(&format!("{board} 4c 5d"));
    assert_eq!(argmax(&[eval(&a), eval(&b)]), vec![0, 1]);
}
