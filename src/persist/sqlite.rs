//! SQLite-backed record store and ranked index.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::{
    store::{RankedIndex, RecordStore, StoreError, StoreResult},
    types::Score,
    user::UserProfile,
};

const PROFILE_FORMAT_VERSION: u16 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileEnvelope {
    format_version: u16,
    profile: UserProfile,
}

/// SQLite implementation of [`crate::store::RecordStore`] and
/// [`crate::store::RankedIndex`] over a single connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates a store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory SQLite store.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    fn decode_profile(payload: &[u8]) -> StoreResult<UserProfile> {
        let env: ProfileEnvelope = serde_json::from_slice(payload)?;
        if env.format_version != PROFILE_FORMAT_VERSION {
            return Err(StoreError::Unavailable(format!(
                "unsupported profile format version: {}",
                env.format_version
            )));
        }
        Ok(env.profile)
    }

    fn collect_rows(
        &self,
        sql: &str,
        bind: impl FnOnce(&mut rusqlite::Statement<'_>) -> rusqlite::Result<Vec<(String, Score)>>,
    ) -> StoreResult<Vec<(String, Score)>> {
        let mut stmt = self.conn.prepare(sql)?;
        Ok(bind(&mut stmt)?)
    }
}

impl RecordStore for SqliteStore {
    fn exists(&self, id: &str) -> StoreResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM profiles WHERE email = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    fn get(&self, id: &str) -> StoreResult<Option<UserProfile>> {
        let payload: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT payload FROM profiles WHERE email = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(payload) => Ok(Some(Self::decode_profile(&payload)?)),
            None => Ok(None),
        }
    }

    fn set(&mut self, id: &str, profile: &UserProfile) -> StoreResult<()> {
        let env = ProfileEnvelope {
            format_version: PROFILE_FORMAT_VERSION,
            profile: profile.clone(),
        };
        let payload = serde_json::to_vec(&env)?;
        self.conn.execute(
            "INSERT INTO profiles (email, payload) VALUES (?1, ?2)
             ON CONFLICT (email) DO UPDATE SET payload = excluded.payload",
            params![id, payload],
        )?;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let count = self
            .conn
            .execute("DELETE FROM profiles WHERE email = ?1", params![id])?;
        Ok(count > 0)
    }
}

impl RankedIndex for SqliteStore {
    fn upsert(&mut self, board: &str, member: &str, score: Score) -> StoreResult<()> {
        // seq is assigned on first insert and kept on update so tie order
        // stays by insertion sequence.
        let seq: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(seq), 0) + 1 FROM scores WHERE board = ?1",
            params![board],
            |row| row.get(0),
        )?;
        self.conn.execute(
            "INSERT INTO scores (board, member, score, seq) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (board, member) DO UPDATE SET score = excluded.score",
            params![board, member, score, seq],
        )?;
        Ok(())
    }

    fn remove(&mut self, board: &str, member: &str) -> StoreResult<bool> {
        let count = self.conn.execute(
            "DELETE FROM scores WHERE board = ?1 AND member = ?2",
            params![board, member],
        )?;
        Ok(count > 0)
    }

    fn range_by_rank_desc(
        &self,
        board: &str,
        from: u64,
        to: u64,
    ) -> StoreResult<Vec<(String, Score)>> {
        if to < from {
            return Ok(Vec::new());
        }
        let limit = (to - from + 1) as i64;
        self.collect_rows(
            "SELECT member, score FROM scores WHERE board = ?1
             ORDER BY score DESC, seq ASC LIMIT ?2 OFFSET ?3",
            |stmt| {
                let rows = stmt.query_map(params![board, limit, from as i64], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
                })?;
                rows.collect()
            },
        )
    }

    fn range_by_score_desc(
        &self,
        board: &str,
        min: Score,
        max: Score,
    ) -> StoreResult<Vec<(String, Score)>> {
        self.collect_rows(
            "SELECT member, score FROM scores WHERE board = ?1 AND score BETWEEN ?2 AND ?3
             ORDER BY score DESC, seq ASC",
            |stmt| {
                let rows = stmt.query_map(params![board, min, max], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
                })?;
                rows.collect()
            },
        )
    }

    fn range_all_desc(&self, board: &str) -> StoreResult<Vec<(String, Score)>> {
        self.collect_rows(
            "SELECT member, score FROM scores WHERE board = ?1
             ORDER BY score DESC, seq ASC",
            |stmt| {
                let rows = stmt.query_map(params![board], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
                })?;
                rows.collect()
            },
        )
    }
}
