use std::cmp::Ordering;
use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::{
    store::{RankedIndex, RecordStore, StoreResult},
    types::Score,
    user::UserProfile,
};

/// Hash-map record store, also the substitutable test backend.
#[derive(Debug, Default)]
pub struct MemoryRecords {
    profiles: HashMap<String, UserProfile>,
}

impl MemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecords {
    fn exists(&self, id: &str) -> StoreResult<bool> {
        Ok(self.profiles.contains_key(id))
    }

    fn get(&self, id: &str) -> StoreResult<Option<UserProfile>> {
        Ok(self.profiles.get(id).cloned())
    }

    fn set(&mut self, id: &str, profile: &UserProfile) -> StoreResult<()> {
        self.profiles.insert(id.to_string(), profile.clone());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> StoreResult<bool> {
        Ok(self.profiles.remove(id).is_some())
    }
}

/// Ordering key for one board entry. Higher scores sort first; equal scores
/// resolve by insertion sequence, which a member keeps across score updates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct EntryKey {
    score: Score,
    seq: u64,
}

impl Eq for EntryKey {}

impl Ord for EntryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for EntryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
struct Board {
    ordered: BTreeMap<EntryKey, String>,
    members: HashMap<String, EntryKey>,
    next_seq: u64,
}

impl Board {
    fn upsert(&mut self, member: &str, score: Score) {
        let seq = match self.members.get(member) {
            Some(key) => {
                let seq = key.seq;
                self.ordered.remove(key);
                seq
            }
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };

        let key = EntryKey { score, seq };
        self.ordered.insert(key, member.to_string());
        self.members.insert(member.to_string(), key);
    }

    fn remove(&mut self, member: &str) -> bool {
        match self.members.remove(member) {
            Some(key) => {
                self.ordered.remove(&key);
                true
            }
            None => false,
        }
    }
}

/// Named descending scoreboards over an in-process ordered structure.
#[derive(Debug, Default)]
pub struct MemoryRanked {
    boards: HashMap<String, Board>,
}

impl MemoryRanked {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RankedIndex for MemoryRanked {
    fn upsert(&mut self, board: &str, member: &str, score: Score) -> StoreResult<()> {
        self.boards
            .entry(board.to_string())
            .or_default()
            .upsert(member, score);
        Ok(())
    }

    fn remove(&mut self, board: &str, member: &str) -> StoreResult<bool> {
        Ok(self
            .boards
            .get_mut(board)
            .is_some_and(|b| b.remove(member)))
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
        let Some(board) = self.boards.get(board) else {
            return Ok(Vec::new());
        };
        Ok(board
            .ordered
            .iter()
            .skip(from as usize)
            .take((to - from + 1) as usize)
            .map(|(key, member)| (member.clone(), key.score))
            .collect())
    }

    fn range_by_score_desc(
        &self,
        board: &str,
        min: Score,
        max: Score,
    ) -> StoreResult<Vec<(String, Score)>> {
        if min > max {
            return Ok(Vec::new());
        }
        let Some(board) = self.boards.get(board) else {
            return Ok(Vec::new());
        };

        // Entries sharing a score are contiguous under the key order, so the
        // band [max, min] maps to one key range.
        let lo = EntryKey { score: max, seq: 0 };
        let hi = EntryKey {
            score: min,
            seq: u64::MAX,
        };
        Ok(board
            .ordered
            .range(lo..=hi)
            .map(|(key, member)| (member.clone(), key.score))
            .collect())
    }

    fn range_all_desc(&self, board: &str) -> StoreResult<Vec<(String, Score)>> {
        let Some(board) = self.boards.get(board) else {
            return Ok(Vec::new());
        };
        Ok(board
            .ordered
            .iter()
            .map(|(key, member)| (member.clone(), key.score))
            .collect())
    }
}
