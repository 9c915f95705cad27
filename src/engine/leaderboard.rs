use tracing::warn;

use crate::{
    store::{RankedIndex, RecordStore, StoreError},
    types::{Rank, Score},
    user::{User, UserProfile, normalize_country},
};

/// Board holding every scored user.
pub const GLOBAL_BOARD: &str = "leaderboard";
/// Prefix completed by a normalized country name.
pub const COUNTRY_BOARD_PREFIX: &str = "leaderboard_country_";

/// Composes the board name for a normalized country.
pub fn country_board(country: &str) -> String {
    format!("{COUNTRY_BOARD_PREFIX}{country}")
}

#[derive(Debug)]
pub enum EngineError {
    EmptyEmail,
    NonFiniteScore(Score),
    NoSuchUser(String),
    AlreadyExists(String),
    Store(StoreError),
}

impl From<StoreError> for EngineError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Leaderboard engine owning its two collaborators: a record store for
/// profiles and a ranked index holding the global board plus one board per
/// country. Every scored user appears on the global board and on exactly the
/// board of their stored country, same score on both.
pub struct Leaderboard<R, Z> {
    records: R,
    boards: Z,
}

impl<R: RecordStore, Z: RankedIndex> Leaderboard<R, Z> {
    pub fn new(records: R, boards: Z) -> Self {
        Self { records, boards }
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    pub fn boards(&self) -> &Z {
        &self.boards
    }

    /// Creates a user at score 0 on the global board and their country board.
    ///
    /// An existing email is a conflict and mutates nothing, including score.
    pub fn upsert_user(&mut self, name: &str, country: &str, email: &str) -> Result<(), EngineError> {
        if email.is_empty() {
            return Err(EngineError::EmptyEmail);
        }
        if self.records.exists(email)? {
            return Err(EngineError::AlreadyExists(email.to_string()));
        }

        let country = normalize_country(country);
        self.records.set(
            email,
            &UserProfile {
                name: name.to_string(),
                country: country.clone(),
            },
        )?;
        self.write_score(email, 0.0, &country)
    }

    /// Replaces the user's score on both boards. The stored country field is
    /// never changed by this operation.
    pub fn upsert_score(&mut self, email: &str, score: Score) -> Result<(), EngineError> {
        if !score.is_finite() {
            return Err(EngineError::NonFiniteScore(score));
        }
        let profile = self
            .records
            .get(email)?
            .ok_or_else(|| EngineError::NoSuchUser(email.to_string()))?;
        self.write_score(email, score, &profile.country)
    }

    /// Erases the record and the member's entries on both boards.
    pub fn remove_user(&mut self, email: &str) -> Result<(), EngineError> {
        let profile = self
            .records
            .get(email)?
            .ok_or_else(|| EngineError::NoSuchUser(email.to_string()))?;
        self.boards.remove(GLOBAL_BOARD, email)?;
        self.boards.remove(&country_board(&profile.country), email)?;
        self.records.delete(email)?;
        Ok(())
    }

    /// Top `k` rows of the global board, or of one country's board. Ranks are
    /// 1-based. An unknown country partition yields an empty listing.
    pub fn get_top(&self, k: u64, country: Option<&str>) -> Result<Vec<(User, Rank)>, EngineError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let entries = match country {
            None => self.boards.range_by_rank_desc(GLOBAL_BOARD, 0, k - 1)?,
            Some(raw) => {
                let board = country_board(&normalize_country(raw));
                self.boards.range_by_rank_desc(&board, 0, k - 1)?
            }
        };
        let users = self.hydrate(&entries)?;
        Ok(users.into_iter().zip(1u64..).collect())
    }

    /// Every global-board member whose score equals `score` exactly,
    /// expressed as a zero-width score range.
    pub fn get_users_with_score(&self, score: Score) -> Result<Vec<User>, EngineError> {
        let entries = self
            .boards
            .range_by_score_desc(GLOBAL_BOARD, score, score)?;
        self.hydrate(&entries)
    }

    /// Filtered search anchored on `name`. With a score the listing comes
    /// from the matching board (country board when a country is given,
    /// global otherwise) narrowed to that score; with only a name the whole
    /// global board is scanned. A country without a score is ignored, and
    /// without a name the search yields nothing.
    pub fn search(
        &self,
        name: Option<&str>,
        score: Option<Score>,
        country: Option<&str>,
    ) -> Result<Vec<User>, EngineError> {
        let Some(name) = name else {
            return Ok(Vec::new());
        };

        let entries = match (score, country) {
            (Some(score), Some(raw)) => {
                let board = country_board(&normalize_country(raw));
                self.boards.range_by_score_desc(&board, score, score)?
            }
            (Some(score), None) => self
                .boards
                .range_by_score_desc(GLOBAL_BOARD, score, score)?,
            (None, _) => self.boards.range_all_desc(GLOBAL_BOARD)?,
        };

        let users = self.hydrate(&entries)?;
        Ok(users.into_iter().filter(|u| u.name == name).collect())
    }

    fn write_score(&mut self, email: &str, score: Score, country: &str) -> Result<(), EngineError> {
        self.boards.upsert(GLOBAL_BOARD, email, score)?;
        self.boards.upsert(&country_board(country), email, score)?;
        Ok(())
    }

    /// Resolves (member, score) pairs into rows. A member with no stored
    /// profile is skipped with a diagnostic; the rest of the listing stands.
    fn hydrate(&self, entries: &[(String, Score)]) -> Result<Vec<User>, EngineError> {
        let mut users = Vec::with_capacity(entries.len());
        for (email, score) in entries {
            match self.records.get(email)? {
                Some(profile) => users.push(User {
                    name: profile.name,
                    email: email.clone(),
                    country: profile.country,
                    score: *score,
                }),
                None => warn!(email = %email, "ranked member has no stored profile, skipping"),
            }
        }
        Ok(users)
    }
}
