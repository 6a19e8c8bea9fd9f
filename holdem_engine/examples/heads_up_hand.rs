//! Heads-Up Hand Example
//!
//! Plays one hand between two players on a stacked deck, printing the
//! table after every phase that changes it.

use holdem_engine::{
    Card, Command, CommandKind, Engine, EngineState, EngineTiming, TableConfig,
    functional::eval,
};
use std::time::Duration;

fn main() {
    println!("=== Heads-Up Hand Example ===\n");

    let mut engine = Engine::new(
        &TableConfig::new("example", 1, 2),
        EngineTiming::uniform(Duration::ZERO),
    );
    for (user, seat) in [("alice", 0), ("bob", 1)] {
        engine.queue_command(Command::new(user, CommandKind::Join { seat: Some(seat), chips: 100 }));
    }
    engine.queue_command(Command::new("alice", CommandKind::StartGame));

    // alice is dealt first, then bob, then the board
    let deck: Vec<Card> = "Ah Kd 9s 9c As 7h 2d Ks 3c"
        .split_whitespace()
        .filter_map(|c| c.parse().ok())
        .collect();
    engine.stack_deck(deck);

    // bob has the button and acts first before the flop, alice after it
    engine.queue_command(Command::new("bob", CommandKind::Call));
    engine.queue_command(Command::new("alice", CommandKind::Check));
    for _ in 0..3 {
        engine.queue_command(Command::new("alice", CommandKind::Check));
        engine.queue_command(Command::new("bob", CommandKind::Check));
    }

    for _ in 0..200 {
        engine.tick();
        if let Some(snapshot) = engine.snapshot_if_changed() {
            println!(
                "{:<22} street={:?} pot={} board={:?}",
                engine.phase().to_string(),
                snapshot.street,
                snapshot.pot,
                snapshot.community_cards
            );
        }
        if matches!(engine.phase(), EngineState::PauseAfterEndHand(_)) {
            break;
        }
    }

    println!();
    for player in engine.table().players() {
        println!("{:<6} {:>4} chips", player.user, player.chips);
    }

    let board: Vec<Card> = "As 7h 2d Ks 3c".split_whitespace().filter_map(|c| c.parse().ok()).collect();
    for (name, hole) in [("alice", "Ah Kd"), ("bob", "9s 9c")] {
        let mut cards: Vec<Card> = hole.split_whitespace().filter_map(|c| c.parse().ok()).collect();
        cards.extend(&board);
        println!("{name} held {}", eval(&cards)[0].rank);
    }
}
