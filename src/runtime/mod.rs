//! Single-writer async runtime and event stream APIs.

/// Event payloads broadcast by the runtime.
pub mod events;
/// Handle and message loop implementation.
pub mod handle;
