//! Persistent backends for the collaborator contracts.

/// SQLite implementation of both store contracts.
pub mod sqlite;
