//! Error types for ChiTieu.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Malformed oracle response: {0}")]
    MalformedOracleResponse(String),

    #[error("No amount could be resolved from the message")]
    AmountUnresolved,

    #[error("No prior expense to edit")]
    NoPriorExpense,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BotError {
    /// Oracle-side failures are downgraded to an `Unclear` intent by the
    /// classifier instead of propagating to the caller.
    pub fn is_oracle_failure(&self) -> bool {
        matches!(
            self,
            BotError::OracleUnavailable(_) | BotError::MalformedOracleResponse(_)
        )
    }
}
