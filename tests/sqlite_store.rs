use std::path::Path;

use tempfile::TempDir;

use rankboard::{engine::leaderboard::Leaderboard, persist::sqlite::SqliteStore};

fn open_engine(path: &Path) -> Leaderboard<SqliteStore, SqliteStore> {
    let records = SqliteStore::open(path).expect("open records");
    let boards = SqliteStore::open(path).expect("open boards");
    Leaderboard::new(records, boards)
}

fn seed(board: &mut Leaderboard<SqliteStore, SqliteStore>) {
    for (name, country, email, score) in [
        ("Aman", "India", "aman@redis.in", 30.91),
        ("Zaid", "Pakistan", "zaid@git.pk", 18.2),
        ("Dean", "USA", "dean@me.us", 49.1),
        ("Saurbhi", "India", "sara@test.in", 37.10),
    ] {
        board.upsert_user(name, country, email).expect("add");
        board.upsert_score(email, score).expect("score");
    }
}

#[test]
fn state_survives_reopen_with_stable_order() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("board.db");

    {
        let mut board = open_engine(&db_path);
        seed(&mut board);

        // Tie pair: both at 3.3, first inserted ranks first.
        board.upsert_user("Xan", "Japan", "xan@jp").expect("add xan");
        board.upsert_user("Yui", "Japan", "yui@jp").expect("add yui");
        board.upsert_score("xan@jp", 3.3).expect("score xan");
        board.upsert_score("yui@jp", 3.3).expect("score yui");
    }

    let board = open_engine(&db_path);
    let all = board.get_top(10, None).expect("all");
    let emails: Vec<&str> = all.iter().map(|(u, _)| u.email.as_str()).collect();
    assert_eq!(
        emails,
        [
            "dean@me.us",
            "sara@test.in",
            "aman@redis.in",
            "zaid@git.pk",
            "xan@jp",
            "yui@jp",
        ]
    );

    let india = board.get_top(1, Some("India")).expect("india");
    assert_eq!(india[0].0.email, "sara@test.in");
    assert_eq!(india[0].0.score, 37.10);

    let tied = board.get_users_with_score(3.3).expect("tied");
    let tied_emails: Vec<&str> = tied.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(tied_emails, ["xan@jp", "yui@jp"]);
}

#[test]
fn remove_and_rescore_round_trip() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("board.db");

    {
        let mut board = open_engine(&db_path);
        seed(&mut board);
        board.remove_user("dean@me.us").expect("remove");
        board.upsert_score("zaid@git.pk", 60.0).expect("rescore");
    }

    let board = open_engine(&db_path);
    let all = board.get_top(10, None).expect("all");
    let emails: Vec<&str> = all.iter().map(|(u, _)| u.email.as_str()).collect();
    assert_eq!(emails, ["zaid@git.pk", "sara@test.in", "aman@redis.in"]);

    assert!(board.get_top(5, Some("USA")).expect("usa").is_empty());
    assert!(board.get_users_with_score(49.1).expect("old dean").is_empty());
    assert!(board.get_users_with_score(18.2).expect("old zaid").is_empty());

    let pakistan = board.get_top(1, Some("Pakistan")).expect("pakistan");
    assert_eq!(pakistan[0].0.email, "zaid@git.pk");
    assert_eq!(pakistan[0].0.score, 60.0);
}

#[test]
fn search_behaves_the_same_over_sqlite() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("board.db");

    let mut board = open_engine(&db_path);
    seed(&mut board);

    let full = board
        .search(Some("Saurbhi"), Some(37.10), Some("india"))
        .expect("full");
    assert_eq!(full.len(), 1);
    assert_eq!(full[0].email, "sara@test.in");

    let by_name = board.search(Some("Dean"), None, None).expect("name only");
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].email, "dean@me.us");

    assert!(board.search(None, None, None).expect("no anchor").is_empty());
}
