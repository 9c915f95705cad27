//! Collaborator contracts for profile records and ranked boards.

/// In-memory backend for both contracts.
pub mod memory;

use crate::{types::Score, user::UserProfile};

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Serde(serde_json::Error),
    Unavailable(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value storage of user profiles keyed by email.
pub trait RecordStore {
    fn exists(&self, id: &str) -> StoreResult<bool>;
    fn get(&self, id: &str) -> StoreResult<Option<UserProfile>>;
    fn set(&mut self, id: &str, profile: &UserProfile) -> StoreResult<()>;
    fn delete(&mut self, id: &str) -> StoreResult<bool>;
}

/// Named ordered sets of (member, score) pairs, queried in descending score
/// order. Board names address independent sets; querying a board that was
/// never written yields empty results.
pub trait RankedIndex {
    /// Inserts `member` at `score`, replacing any previous position.
    fn upsert(&mut self, board: &str, member: &str, score: Score) -> StoreResult<()>;
    /// Removes `member`; true when it was present.
    fn remove(&mut self, board: &str, member: &str) -> StoreResult<bool>;
    /// Members at 0-based rank positions `from..=to`.
    fn range_by_rank_desc(&self, board: &str, from: u64, to: u64)
    -> StoreResult<Vec<(String, Score)>>;
    /// Members whose score lies in `[min, max]`.
    fn range_by_score_desc(&self, board: &str, min: Score, max: Score)
    -> StoreResult<Vec<(String, Score)>>;
    /// Every member of the board.
    fn range_all_desc(&self, board: &str) -> StoreResult<Vec<(String, Score)>>;
}
