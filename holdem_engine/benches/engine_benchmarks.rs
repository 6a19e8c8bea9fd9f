use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use holdem_engine::{
    Command, CommandKind, Engine, EngineState, EngineTiming, TableConfig,
    entities::{Card, Suit},
    functional::{argmax, eval},
};
use std::time::Duration;

/// Engine with `n` players seated in seats `0..n` and the game started
fn setup_engine_with_players(n: usize) -> Engine {
    let mut engine = Engine::new(
        &TableConfig::new("bench", 10, 20),
        EngineTiming::uniform(Duration::ZERO),
    );
    for seat in 0..n {
        engine.queue_command(Command::new(
            format!("player{seat}"),
            CommandKind::Join {
                seat: Some(seat),
                chips: 1000,
            },
        ));
    }
    engine.queue_command(Command::new("player0", CommandKind::StartGame));
    engine
}

/// Plays one hand where everyone folds to the big blind.
fn play_fold_around(mut engine: Engine, n: usize) -> Engine {
    // dealer moves to seat 1; heads-up the dealer acts first,
    // otherwise the player after the big blind does
    let first = if n == 2 { 1 } else { 4 % n };
    for i in 0..n - 1 {
        let seat = (first + i) % n;
        engine.queue_command(Command::new(format!("player{seat}"), CommandKind::Fold));
    }
    for _ in 0..200 {
        if matches!(engine.phase(), EngineState::PauseAfterEndHand(_)) {
            break;
        }
        engine.tick();
    }
    engine
}

/// Benchmark hand evaluation with 7 cards (hole cards + board)
fn bench_hand_eval_7_cards(c: &mut Criterion) {
    let cards = vec![
        Card(14, Suit::Spade),
        Card(13, Suit::Spade),
        Card(12, Suit::Spade),
        Card(11, Suit::Spade),
        Card(10, Suit::Spade),
        Card(2, Suit::Heart),
        Card(3, Suit::Diamond),
    ];

    c.bench_function("hand_eval_7_cards", |b| {
        b.iter(|| eval(std::hint::black_box(&cards)));
    });
}

/// Benchmark picking winners across a full table
fn bench_hand_comparison(c: &mut Criterion) {
    let board = [
        Card(2, Suit::Club),
        Card(7, Suit::Diamond),
        Card(9, Suit::Heart),
        Card(11, Suit::Club),
        Card(3, Suit::Spade),
    ];
    let hands: Vec<_> = (2..=10)
        .map(|v| {
            let mut cards = board.to_vec();
            cards.extend([Card(v, Suit::Heart), Card(v + 4, Suit::Spade)]);
            eval(&cards)
        })
        .collect();

    c.bench_function("hand_comparison_9_hands", |b| {
        b.iter(|| argmax(std::hint::black_box(&hands)));
    });
}

/// Benchmark a whole hand through the engine with different player counts
fn bench_fold_around_hand(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold_around_hand");

    for n_players in [2, 6, 9].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_players", n_players)),
            n_players,
            |b, &n| {
                b.iter_batched(
                    || setup_engine_with_players(n),
                    |engine| play_fold_around(engine, n),
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// Benchmark snapshot building on a busy table
fn bench_snapshot(c: &mut Criterion) {
    let mut engine = setup_engine_with_players(9);
    for _ in 0..20 {
        engine.tick();
    }

    c.bench_function("snapshot_9_players", |b| {
        b.iter(|| engine.snapshot());
    });
}

criterion_group!(hand_evaluation, bench_hand_eval_7_cards, bench_hand_comparison);

criterion_group!(engine_operations, bench_fold_around_hand, bench_snapshot);

criterion_main!(hand_evaluation, engine_operations);
