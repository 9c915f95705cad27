//! Validated command vocabulary and dispatch.

use crate::{
    engine::leaderboard::{EngineError, Leaderboard},
    store::{RankedIndex, RecordStore},
    types::{Rank, Score},
    user::User,
};

/// One leaderboard command, fully validated.
///
/// Produced by [`Command::parse`]; every downstream handler matches the
/// closed set exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a user at score 0.
    UpsertUser {
        /// Display name.
        name: String,
        /// Country, any casing.
        country: String,
        /// Unique identity.
        email: String,
    },
    /// Replace a user's score on the global and country boards.
    UpsertScore {
        /// Target identity.
        email: String,
        /// New score.
        score: Score,
    },
    /// Top `k` of the global board, or of one country's board.
    GetTop {
        /// Number of rows requested.
        k: u64,
        /// Optional country filter, any casing.
        country: Option<String>,
    },
    /// Every user whose score equals `score` exactly.
    GetUsersWithScore {
        /// Score to match.
        score: Score,
    },
    /// Filtered search; `name` anchors the query.
    Search {
        /// Exact display name to match.
        name: Option<String>,
        /// Optional exact-score filter.
        score: Option<Score>,
        /// Optional country filter, any casing.
        country: Option<String>,
    },
    /// Remove a user from the record store and both boards.
    RemoveUser {
        /// Target identity.
        email: String,
    },
}

/// Rejection produced before any engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No tokens at all.
    Empty,
    /// First token is not a known command name.
    UnknownCommand(String),
    /// Fewer arguments than the command requires.
    MissingArgs {
        /// Command being parsed.
        command: &'static str,
        /// Number of required arguments.
        required: usize,
        /// Number of arguments supplied.
        given: usize,
    },
    /// A numeric argument failed to parse.
    InvalidNumber {
        /// Command being parsed.
        command: &'static str,
        /// Argument name.
        arg: &'static str,
        /// Offending token.
        value: String,
    },
}

impl Command {
    /// Parses a token list (command name first) into a validated command.
    ///
    /// Optional arguments are positional; surplus tokens are ignored.
    pub fn parse(tokens: &[&str]) -> Result<Self, ParseError> {
        let (&head, args) = tokens.split_first().ok_or(ParseError::Empty)?;

        match head {
            "UPSERT_USER" => {
                require("UPSERT_USER", args, 3)?;
                Ok(Self::UpsertUser {
                    name: args[0].to_string(),
                    country: args[1].to_string(),
                    email: args[2].to_string(),
                })
            }
            "UPSERT_SCORE" => {
                require("UPSERT_SCORE", args, 2)?;
                Ok(Self::UpsertScore {
                    email: args[0].to_string(),
                    score: parse_score("UPSERT_SCORE", "score", args[1])?,
                })
            }
            "GET_TOP" => {
                require("GET_TOP", args, 1)?;
                Ok(Self::GetTop {
                    k: parse_count("GET_TOP", "k", args[0])?,
                    country: args.get(1).map(|s| s.to_string()),
                })
            }
            "GET_USERS_WITH_SCORE" => {
                require("GET_USERS_WITH_SCORE", args, 1)?;
                Ok(Self::GetUsersWithScore {
                    score: parse_score("GET_USERS_WITH_SCORE", "score", args[0])?,
                })
            }
            "SEARCH" => {
                let score = match args.get(1) {
                    Some(value) => Some(parse_score("SEARCH", "score", value)?),
                    None => None,
                };
                Ok(Self::Search {
                    name: args.first().map(|s| s.to_string()),
                    score,
                    country: args.get(2).map(|s| s.to_string()),
                })
            }
            "REMOVE_USER" => {
                require("REMOVE_USER", args, 1)?;
                Ok(Self::RemoveUser {
                    email: args[0].to_string(),
                })
            }
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

fn require(command: &'static str, args: &[&str], required: usize) -> Result<(), ParseError> {
    if args.len() < required {
        return Err(ParseError::MissingArgs {
            command,
            required,
            given: args.len(),
        });
    }
    Ok(())
}

fn parse_score(command: &'static str, arg: &'static str, value: &str) -> Result<Score, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        command,
        arg,
        value: value.to_string(),
    })
}

fn parse_count(command: &'static str, arg: &'static str, value: &str) -> Result<u64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        command,
        arg,
        value: value.to_string(),
    })
}

/// Successful outcome of one executed command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// User created at score 0.
    Created {
        /// New user's identity.
        email: String,
    },
    /// Score written to both boards.
    ScoreSet {
        /// Rescored user's identity.
        email: String,
        /// Score written.
        score: Score,
    },
    /// User removed everywhere.
    Removed {
        /// Removed user's identity.
        email: String,
    },
    /// Ranked listing with 1-based positions.
    Ranked(Vec<(User, Rank)>),
    /// Unranked listing.
    Users(Vec<User>),
}

/// Runs a validated command against the engine.
pub fn execute<R: RecordStore, Z: RankedIndex>(
    engine: &mut Leaderboard<R, Z>,
    command: Command,
) -> Result<Reply, EngineError> {
    match command {
        Command::UpsertUser {
            name,
            country,
            email,
        } => {
            engine.upsert_user(&name, &country, &email)?;
            Ok(Reply::Created { email })
        }
        Command::UpsertScore { email, score } => {
            engine.upsert_score(&email, score)?;
            Ok(Reply::ScoreSet { email, score })
        }
        Command::GetTop { k, country } => {
            Ok(Reply::Ranked(engine.get_top(k, country.as_deref())?))
        }
        Command::GetUsersWithScore { score } => {
            Ok(Reply::Users(engine.get_users_with_score(score)?))
        }
        Command::Search {
            name,
            score,
            country,
        } => Ok(Reply::Users(engine.search(
            name.as_deref(),
            score,
            country.as_deref(),
        )?)),
        Command::RemoveUser { email } => {
            engine.remove_user(&email)?;
            Ok(Reply::Removed { email })
        }
    }
}
