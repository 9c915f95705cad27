//! Ranking and query engine.

/// Leaderboard engine over injected record and ranked-index backends.
pub mod leaderboard;
