//! Command-driven leaderboard engine over pluggable ranked-set storage.
//!
//! Users are ranked by score on a global board and on one board per country;
//! queries go by rank, by exact score, or by combined filters. Storage sits
//! behind two collaborator traits with an in-memory backend and a SQLite
//! backend.
//!
//! # Examples
//!
//! In-memory usage with [`engine::leaderboard::Leaderboard`]:
//! ```
//! use rankboard::{
//!     engine::leaderboard::Leaderboard,
//!     store::memory::{MemoryRanked, MemoryRecords},
//! };
//!
//! let mut board = Leaderboard::new(MemoryRecords::new(), MemoryRanked::new());
//! board.upsert_user("Aman", "India", "aman@redis.in").expect("upsert");
//! board.upsert_score("aman@redis.in", 30.91).expect("score");
//!
//! let top = board.get_top(1, None).expect("top");
//! assert_eq!(top[0].0.email, "aman@redis.in");
//! assert_eq!(top[0].1, 1);
//! ```
//!
//! Runtime usage with the SQLite backend:
//! ```no_run
//! use rankboard::{
//!     engine::leaderboard::Leaderboard,
//!     persist::sqlite::SqliteStore,
//!     runtime::handle::{RuntimeConfig, spawn_leaderboard},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let records = SqliteStore::open("board.db").expect("open records");
//! let boards = SqliteStore::open("board.db").expect("open boards");
//! let handle = spawn_leaderboard(Leaderboard::new(records, boards), RuntimeConfig::default());
//!
//! handle.upsert_user("Dean", "USA", "dean@me.us").await.expect("upsert");
//! let top = handle.get_top(3, None).await.expect("top");
//! assert_eq!(top.len(), 1);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```

/// Validated command vocabulary, parsing, and dispatch.
pub mod command;
/// Ranking and query engine.
pub mod engine;
/// SQLite-backed persistent storage.
pub mod persist;
/// Single-writer async runtime and event stream APIs.
pub mod runtime;
/// Collaborator contracts and the in-memory backend.
pub mod store;
/// Shared primitive aliases.
pub mod types;
/// User records and country normalization.
pub mod user;
