//! Table actors and the registry, driven through their async handles.

use holdem_engine::{
    Command, CommandKind, EngineTiming, TableConfig, TableHandle, TableManager,
    TableManagerError, TableSnapshot,
};
use std::time::Duration;
use tokio::time::{sleep, timeout};

const WAIT: Duration = Duration::from_secs(5);

fn fast_timing() -> EngineTiming {
    EngineTiming::uniform(Duration::from_millis(1))
}

/// Fast streets, but the table holds between hands.
fn hold_between_hands() -> EngineTiming {
    EngineTiming {
        pause_long: Duration::from_secs(60),
        ..fast_timing()
    }
}

async fn join(table: &TableHandle, user: &str, seat: usize, chips: u32) {
    table
        .queue_command(Command::new(
            user,
            CommandKind::Join {
                seat: Some(seat),
                chips,
            },
        ))
        .await
        .unwrap();
}

/// Polls snapshots until `done` holds.
async fn wait_for(table: &TableHandle, done: impl Fn(&TableSnapshot) -> bool) -> TableSnapshot {
    timeout(WAIT, async {
        loop {
            let snapshot = table.snapshot().await.unwrap();
            if done(&snapshot) {
                return snapshot;
            }
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("table never reached the expected state")
}

#[tokio::test]
async fn test_create_and_reject_duplicate_room() {
    let manager = TableManager::new(fast_timing());
    let table = manager
        .create_table(TableConfig::new("main", 1, 2))
        .await
        .unwrap();
    assert_eq!(table.room_name(), "main");

    let duplicate = manager.create_table(TableConfig::new("main", 5, 10)).await;
    assert!(matches!(duplicate, Err(TableManagerError::DuplicateRoom(room)) if room == "main"));
    assert_eq!(manager.active_table_count().await, 1);
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let manager = TableManager::new(fast_timing());
    let result = manager.create_table(TableConfig::new("backwards", 10, 5)).await;
    assert!(matches!(result, Err(TableManagerError::InvalidConfig(_))));

    let result = manager.create_table(TableConfig::new("", 1, 2)).await;
    assert!(matches!(result, Err(TableManagerError::InvalidConfig(_))));
    assert_eq!(manager.active_table_count().await, 0);
}

#[tokio::test]
async fn test_list_tables_sorted() {
    let manager = TableManager::new(fast_timing());
    for room in ["zeta", "alpha", "mid"] {
        manager
            .create_table(TableConfig::new(room, 1, 2))
            .await
            .unwrap();
    }

    let rooms: Vec<String> = manager
        .list_tables()
        .await
        .into_iter()
        .map(|meta| meta.room_name)
        .collect();
    assert_eq!(rooms, vec!["alpha", "mid", "zeta"]);
    assert_eq!(manager.active_table_count().await, 3);
}

#[tokio::test]
async fn test_close_table_removes_it() {
    let manager = TableManager::new(fast_timing());
    let table = manager
        .create_table(TableConfig::new("closing", 1, 2))
        .await
        .unwrap();

    manager.close_table("closing").await.unwrap();
    assert!(manager.get_table("closing").await.is_none());
    timeout(WAIT, async {
        while !table.is_closed() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
    assert!(table.snapshot().await.is_err());

    let missing = manager.close_table("closing").await;
    assert!(matches!(missing, Err(TableManagerError::TableNotFound(_))));

    // the room is free again
    manager
        .create_table(TableConfig::new("closing", 1, 2))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_closed_actor_leaves_registry() {
    let manager = TableManager::new(fast_timing());
    let table = manager
        .create_table(TableConfig::new("self-close", 1, 2))
        .await
        .unwrap();

    table.close().await.unwrap();
    timeout(WAIT, async {
        while manager.get_table("self-close").await.is_some() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_subscriber_sees_current_then_changed_state() {
    let manager = TableManager::new(fast_timing());
    let table = manager
        .create_table(TableConfig::new("watched", 1, 2))
        .await
        .unwrap();

    let mut snapshots = table.subscribe().await.unwrap();
    let first = timeout(WAIT, snapshots.recv()).await.unwrap().unwrap();
    assert!(first.players.is_empty());
    assert!(first.game_stopped);
    assert_eq!(first.big_blind, 2);

    join(&table, "alice", 3, 100).await;
    let joined = timeout(WAIT, async {
        loop {
            let snapshot = snapshots.recv().await.unwrap();
            if !snapshot.players.is_empty() {
                return snapshot;
            }
        }
    })
    .await
    .unwrap();
    assert_eq!(joined.players[&3].user, "alice");
    assert_eq!(joined.players[&3].chips, 100);
}

#[tokio::test]
async fn test_heads_up_hand_through_actor() {
    let manager = TableManager::new(hold_between_hands());
    let table = manager
        .create_table(TableConfig::new("heads-up", 1, 2))
        .await
        .unwrap();

    join(&table, "alice", 0, 100).await;
    join(&table, "bob", 1, 100).await;
    table
        .queue_command(Command::new("alice", CommandKind::StartGame))
        .await
        .unwrap();

    let live = wait_for(&table, |s| s.players.get(&1).is_some_and(|p| p.spotlight)).await;
    assert!(!live.game_stopped);
    assert_eq!(live.pot, 3);
    assert!(live.players[&1].dealer);

    table
        .queue_command(Command::new("bob", CommandKind::Fold))
        .await
        .unwrap();
    let settled = wait_for(&table, |s| s.players[&0].chips == 101).await;
    assert_eq!(settled.players[&1].chips, 99);
    assert_eq!(settled.pot, 0);
}
