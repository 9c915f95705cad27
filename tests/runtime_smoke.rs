use std::time::Duration;

use rankboard::{
    engine::leaderboard::{EngineError, Leaderboard},
    runtime::{
        events::BoardEvent,
        handle::{RuntimeConfig, RuntimeError, spawn_leaderboard},
    },
    store::memory::{MemoryRanked, MemoryRecords},
};

fn engine() -> Leaderboard<MemoryRecords, MemoryRanked> {
    Leaderboard::new(MemoryRecords::new(), MemoryRanked::new())
}

#[tokio::test]
async fn runtime_mutations_queries_and_events_ordered() {
    let handle = spawn_leaderboard(engine(), RuntimeConfig::default());
    let mut sub = handle.subscribe();

    handle
        .upsert_user("Aman", "India", "aman@redis.in")
        .await
        .expect("upsert");
    handle
        .upsert_score("aman@redis.in", 30.91)
        .await
        .expect("score");

    let top = handle.get_top(1, None).await.expect("top");
    assert_eq!(top[0].0.email, "aman@redis.in");
    assert_eq!(top[0].0.score, 30.91);
    assert_eq!(top[0].1, 1);

    let found = handle
        .search(Some("Aman".to_string()), None, None)
        .await
        .expect("search");
    assert_eq!(found.len(), 1);

    let evt1 = tokio::time::timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("event 1")
        .expect("recv 1");
    let evt2 = tokio::time::timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("event 2")
        .expect("recv 2");
    assert_eq!(
        evt1,
        BoardEvent::UserAdded {
            email: "aman@redis.in".to_string(),
        }
    );
    assert_eq!(
        evt2,
        BoardEvent::ScoreUpdated {
            email: "aman@redis.in".to_string(),
            score: 30.91,
        }
    );

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn failures_surface_through_the_handle_without_events() {
    let handle = spawn_leaderboard(engine(), RuntimeConfig::default());
    let mut sub = handle.subscribe();

    handle
        .upsert_user("Zaid", "Pakistan", "zaid@git.pk")
        .await
        .expect("upsert");

    let conflict = handle.upsert_user("Other", "USA", "zaid@git.pk").await;
    assert!(matches!(
        conflict,
        Err(RuntimeError::Engine(EngineError::AlreadyExists(_)))
    ));

    let missing = handle.remove_user("ghost@x").await;
    assert!(matches!(
        missing,
        Err(RuntimeError::Engine(EngineError::NoSuchUser(_)))
    ));

    // Only the successful mutation produced an event.
    let evt = tokio::time::timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("event")
        .expect("recv");
    assert_eq!(
        evt,
        BoardEvent::UserAdded {
            email: "zaid@git.pk".to_string(),
        }
    );
    assert!(
        tokio::time::timeout(Duration::from_millis(100), sub.recv())
            .await
            .is_err()
    );

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn concurrent_readers_never_observe_partial_mutations() {
    let handle = spawn_leaderboard(engine(), RuntimeConfig::default());
    handle
        .upsert_user("Dean", "USA", "dean@me.us")
        .await
        .expect("seed");
    handle.upsert_score("dean@me.us", 49.1).await.expect("seed score");

    let writer = {
        let handle = handle.clone();
        tokio::spawn(async move {
            for i in 0..50u32 {
                handle
                    .upsert_user("Flicker", "India", "flicker@x")
                    .await
                    .expect("add");
                handle
                    .upsert_score("flicker@x", f64::from(i))
                    .await
                    .expect("score");
                handle.remove_user("flicker@x").await.expect("remove");
            }
        })
    };

    let reader = {
        let handle = handle.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                let rows = handle.get_top(10, None).await.expect("top");
                for (user, _) in &rows {
                    // A listed member always carries its full profile; a
                    // half-applied mutation would surface as a skipped row
                    // or a row with the wrong fields.
                    if user.email == "flicker@x" {
                        assert_eq!(user.name, "Flicker");
                        assert_eq!(user.country, "India");
                    }
                }
                assert!(rows.iter().any(|(u, _)| u.email == "dean@me.us"));
            }
        })
    };

    writer.await.expect("writer");
    reader.await.expect("reader");
    handle.shutdown().await.expect("shutdown");
}
