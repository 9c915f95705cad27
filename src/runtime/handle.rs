use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{
    engine::leaderboard::{EngineError, Leaderboard},
    store::{RankedIndex, RecordStore},
    types::{Rank, Score},
    user::User,
};

use super::events::BoardEvent;

#[derive(Debug)]
pub enum RuntimeError {
    Engine(EngineError),
    ChannelClosed,
}

impl From<EngineError> for RuntimeError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub command_queue_bound: usize,
    pub events_buffer: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            events_buffer: 1024,
        }
    }
}

/// Cloneable handle to the single-writer leaderboard task.
pub struct LeaderboardHandle {
    msg_tx: mpsc::Sender<Msg>,
    events_tx: broadcast::Sender<BoardEvent>,
}

impl Clone for LeaderboardHandle {
    fn clone(&self) -> Self {
        Self {
            msg_tx: self.msg_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Msg {
    UpsertUser {
        name: String,
        country: String,
        email: String,
        resp: oneshot::Sender<Result<(), EngineError>>,
    },
    UpsertScore {
        email: String,
        score: Score,
        resp: oneshot::Sender<Result<(), EngineError>>,
    },
    RemoveUser {
        email: String,
        resp: oneshot::Sender<Result<(), EngineError>>,
    },
    GetTop {
        k: u64,
        country: Option<String>,
        resp: oneshot::Sender<Result<Vec<(User, Rank)>, EngineError>>,
    },
    GetUsersWithScore {
        score: Score,
        resp: oneshot::Sender<Result<Vec<User>, EngineError>>,
    },
    Search {
        name: Option<String>,
        score: Option<Score>,
        country: Option<String>,
        resp: oneshot::Sender<Result<Vec<User>, EngineError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `engine` into a single-writer task and returns its handle.
///
/// Every mutation and query runs on the one task, so a concurrent reader can
/// never observe a record without its board entries or a half-applied
/// removal.
pub fn spawn_leaderboard<R, Z>(engine: Leaderboard<R, Z>, config: RuntimeConfig) -> LeaderboardHandle
where
    R: RecordStore + Send + 'static,
    Z: RankedIndex + Send + 'static,
{
    let (msg_tx, mut msg_rx) = mpsc::channel::<Msg>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<BoardEvent>(config.events_buffer);
    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut engine = engine;
        while let Some(msg) = msg_rx.recv().await {
            let done = handle_msg(msg, &mut engine, &events_tx_loop);
            if done {
                break;
            }
        }
    });

    LeaderboardHandle { msg_tx, events_tx }
}

fn handle_msg<R: RecordStore, Z: RankedIndex>(
    msg: Msg,
    engine: &mut Leaderboard<R, Z>,
    events_tx: &broadcast::Sender<BoardEvent>,
) -> bool {
    match msg {
        Msg::UpsertUser {
            name,
            country,
            email,
            resp,
        } => {
            let res = engine.upsert_user(&name, &country, &email);
            if res.is_ok() {
                let _ = events_tx.send(BoardEvent::UserAdded { email });
            }
            let _ = resp.send(res);
        }
        Msg::UpsertScore { email, score, resp } => {
            let res = engine.upsert_score(&email, score);
            if res.is_ok() {
                let _ = events_tx.send(BoardEvent::ScoreUpdated { email, score });
            }
            let _ = resp.send(res);
        }
        Msg::RemoveUser { email, resp } => {
            let res = engine.remove_user(&email);
            if res.is_ok() {
                let _ = events_tx.send(BoardEvent::UserRemoved { email });
            }
            let _ = resp.send(res);
        }
        Msg::GetTop { k, country, resp } => {
            let _ = resp.send(engine.get_top(k, country.as_deref()));
        }
        Msg::GetUsersWithScore { score, resp } => {
            let _ = resp.send(engine.get_users_with_score(score));
        }
        Msg::Search {
            name,
            score,
            country,
            resp,
        } => {
            let _ = resp.send(engine.search(name.as_deref(), score, country.as_deref()));
        }
        Msg::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}

impl LeaderboardHandle {
    /// Subscribes to the runtime event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events_tx.subscribe()
    }

    pub async fn upsert_user(
        &self,
        name: impl Into<String>,
        country: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.msg_tx
            .send(Msg::UpsertUser {
                name: name.into(),
                country: country.into(),
                email: email.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await
            .map_err(|_| RuntimeError::ChannelClosed)?
            .map_err(RuntimeError::from)
    }

    pub async fn upsert_score(
        &self,
        email: impl Into<String>,
        score: Score,
    ) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.msg_tx
            .send(Msg::UpsertScore {
                email: email.into(),
                score,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await
            .map_err(|_| RuntimeError::ChannelClosed)?
            .map_err(RuntimeError::from)
    }

    pub async fn remove_user(&self, email: impl Into<String>) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.msg_tx
            .send(Msg::RemoveUser {
                email: email.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await
            .map_err(|_| RuntimeError::ChannelClosed)?
            .map_err(RuntimeError::from)
    }

    pub async fn get_top(
        &self,
        k: u64,
        country: Option<String>,
    ) -> Result<Vec<(User, Rank)>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.msg_tx
            .send(Msg::GetTop {
                k,
                country,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await
            .map_err(|_| RuntimeError::ChannelClosed)?
            .map_err(RuntimeError::from)
    }

    pub async fn get_users_with_score(&self, score: Score) -> Result<Vec<User>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.msg_tx
            .send(Msg::GetUsersWithScore { score, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await
            .map_err(|_| RuntimeError::ChannelClosed)?
            .map_err(RuntimeError::from)
    }

    pub async fn search(
        &self,
        name: Option<String>,
        score: Option<Score>,
        country: Option<String>,
    ) -> Result<Vec<User>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.msg_tx
            .send(Msg::Search {
                name,
                score,
                country,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await
            .map_err(|_| RuntimeError::ChannelClosed)?
            .map_err(RuntimeError::from)
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.msg_tx
            .send(Msg::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}
