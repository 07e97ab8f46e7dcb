// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    /// `advance()` was called with nobody holding the turn
    #[error("Cannot advance an empty queue")]
    EmptyQueue,
}

pub type Result<T> = std::result::Result<T, DomainError>;
