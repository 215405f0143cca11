/**
 * Responsibility
 * - what a repo tells the layers above when something goes wrong
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("conflict on {field}")]
    Conflict { field: &'static str },
    /// The backing store could not serve the call. The in-memory store never
    /// produces this, other `UserLookup` backends may.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
