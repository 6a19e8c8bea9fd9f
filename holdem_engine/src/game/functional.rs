//! Pure hand evaluation. Nothing in here touches table state.

use super::entities::{ACE, Card, Rank, SubHand, Suit, Value};

/// Bitmask of the values present, with the ace also set at bit 1 so the
/// wheel (A-2-3-4-5) reads as a run.
fn value_mask(values: impl Iterator<Item = Value>) -> u16 {
    values.fold(0u16, |mask, v| {
        let mask = mask | (1 << v);
        if v == ACE { mask | (1 << 1) } else { mask }
    })
}

/// Highest card of the best straight in `mask`, if any.
fn straight_high(mask: u16) -> Option<Value> {
    (5..=ACE).rev().find(|&high| {
        let run = 0b11111u16 << (high - 4);
        mask & run == run
    })
}

/// Values in descending order, skipping those in `exclude`, at most `n`.
fn kickers(counts: &[u8; 15], exclude: &[Value], n: usize) -> Vec<Value> {
    (2..=ACE)
        .rev()
        .filter(|v| counts[*v as usize] > 0 && !exclude.contains(v))
        .take(n)
        .collect()
}

/// Evaluates the best five card hand contained in `cards` (any number of
/// cards, normally two hole cards plus up to five on the board).
///
/// The result is a list of subhands in decreasing significance, so two
/// results can be compared directly with `Ord`.
#[must_use]
pub fn eval(cards: &[Card]) -> Vec<SubHand> {
    let mut counts = [0u8; 15];
    for card in cards {
        counts[card.0 as usize] += 1;
    }

    let flush_values = Suit::ALL.into_iter().find_map(|suit| {
        let mut values: Vec<Value> = cards
            .iter()
            .filter(|c| c.1 == suit)
            .map(|c| c.0)
            .collect();
        (values.len() >= 5).then(|| {
            values.sort_unstable_by(|a, b| b.cmp(a));
            values
        })
    });

    if let Some(values) = &flush_values
        && let Some(high) = straight_high(value_mask(values.iter().copied()))
    {
        return vec![SubHand {
            rank: Rank::StraightFlush,
            values: vec![high],
        }];
    }

    let with_count = |n: u8| -> Vec<Value> {
        (2..=ACE)
            .rev()
            .filter(|v| counts[*v as usize] == n)
            .collect()
    };
    let quads = with_count(4);
    let trips = with_count(3);
    let pairs = with_count(2);

    if let Some(&quad) = quads.first() {
        return vec![
            SubHand {
                rank: Rank::FourOfAKind,
                values: vec![quad],
            },
            SubHand {
                rank: Rank::HighCard,
                values: kickers(&counts, &[quad], 1),
            },
        ];
    }

    if let Some(&trip) = trips.first() {
        // A second set of trips plays as the pair.
        let pair = trips
            .iter()
            .skip(1)
            .chain(pairs.iter())
            .copied()
            .max();
        if let Some(pair) = pair {
            return vec![SubHand {
                rank: Rank::FullHouse,
                values: vec![trip, pair],
            }];
        }
    }

    if let Some(mut values) = flush_values {
        values.truncate(5);
        return vec![SubHand {
            rank: Rank::Flush,
            values,
        }];
    }

    if let Some(high) = straight_high(value_mask(cards.iter().map(|c| c.0))) {
        return vec![SubHand {
            rank: Rank::Straight,
            values: vec![high],
        }];
    }

    if let Some(&trip) = trips.first() {
        return vec![
            SubHand {
                rank: Rank::ThreeOfAKind,
                values: vec![trip],
            },
            SubHand {
                rank: Rank::HighCard,
                values: kickers(&counts, &[trip], 2),
            },
        ];
    }

    match pairs.as_slice() {
        [high, low, ..] => vec![
            SubHand {
                rank: Rank::TwoPair,
                values: vec![*high, *low],
            },
            SubHand {
                rank: Rank::HighCard,
                values: kickers(&counts, &[*high, *low], 1),
            },
        ],
        [pair] => vec![
            SubHand {
                rank: Rank::OnePair,
                values: vec![*pair],
            },
            SubHand {
                rank: Rank::HighCard,
                values: kickers(&counts, &[*pair], 3),
            },
        ],
        [] => vec![SubHand {
            rank: Rank::HighCard,
            values: kickers(&counts, &[], 5),
        }],
    }
}

/// Indices of every hand tied for best.
#[must_use]
pub fn argmax(hands: &[Vec<SubHand>]) -> Vec<usize> {
    let Some(best) = hands.iter().max() else {
        return Vec::new();
    };
    hands
        .iter()
        .enumerate()
        .filter(|(_, hand)| *hand == best)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(s: &str) -> Vec<Card> {
        s.split_whitespace().map(|c| c.parse().unwrap()).collect()
    }

    fn rank_of(s: &str) -> Rank {
        eval(&cards(s))[0].rank
    }

    #[test]
    fn test_eval_categories() {
        assert_eq!(rank_of("Ah Kh Qh Jh Th 2c 3d"), Rank::StraightFlush);
        assert_eq!(rank_of("9s 9h 9d 9c Kh 2c 3d"), Rank::FourOfAKind);
        assert_eq!(rank_of("9s 9h 9d Kc Kh 2c 3d"), Rank::FullHouse);
        assert_eq!(rank_of("2h 7h 9h Jh Kh Ac Ad"), Rank::Flush);
        assert_eq!(rank_of("5s 6h 7d 8c 9h Ac Kd"), Rank::Straight);
        assert_eq!(rank_of("5s 5h 5d 8c 9h Ac Kd"), Rank::ThreeOfAKind);
        assert_eq!(rank_of("5s 5h 8d 8c 9h Ac Kd"), Rank::TwoPair);
        assert_eq!(rank_of("5s 5h 7d 8c 9h Ac Kd"), Rank::OnePair);
        assert_eq!(rank_of("2s 5h 7d 8c 9h Ac Kd"), Rank::HighCard);
    }

    #[test]
    fn test_wheel_straight() {
        let hand = eval(&cards("Ac 2d 3h 4s 5c Kd Qh"));
        assert_eq!(
            hand,
            vec![SubHand {
                rank: Rank::Straight,
                values: vec![5],
            }]
        );
        assert!(hand < eval(&cards("2d 3h 4s 5c 6d Kd Qh")));
    }

    #[test]
    fn test_steel_wheel() {
        let hand = eval(&cards("Ah 2h 3h 4h 5h Kd Qd"));
        assert_eq!(hand[0].rank, Rank::StraightFlush);
        assert_eq!(hand[0].values, vec![5]);
    }

    #[test]
    fn test_two_trips_make_full_house() {
        let hand = eval(&cards("9s 9h 9d Kc Kh Kd 3d"));
        assert_eq!(
            hand,
            vec![SubHand {
                rank: Rank::FullHouse,
                values: vec![13, 9],
            }]
        );
    }

    #[test]
    fn test_three_pairs_use_best_kicker() {
        let hand = eval(&cards("5s 5h 8d 8c Ah Ac 9d"));
        assert_eq!(hand[0].values, vec![14, 8]);
        assert_eq!(hand[1].values, vec![9]);
    }

    #[test]
    fn test_kickers_break_ties() {
        let board = "Ks Kh 7d 4c 2h";
        let ace_kicker = eval(&cards(&format!("{board} Ad 9c")));
        let queen_kicker = eval(&cards(&format!("{board} Qd 9c")));
        assert!(ace_kicker > queen_kicker);
        assert_eq!(argmax(&[queen_kicker, ace_kicker]), vec![1]);
    }

    #[test]
    fn test_board_plays_splits() {
        let board = "Ts Js Qd Kc Ah";
        let a = eval(&cards(&format!("{board} 2c 3d")));
        let b = eval(&cards(&format!("{board} 4c 5d")));
        assert_eq!(argmax(&[a, b]), vec![0, 1]);
    }

    #[test]
    fn test_argmax_empty() {
        assert!(argmax(&[]).is_empty());
    }
}
