use daovote_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("address {0} has no registered voting power")]
    UnknownAddress(String),

    #[error("voter {0} has no registered voting power")]
    UnknownVoter(String),

    #[error("address {0} is already registered")]
    AlreadyExists(String),

    #[error("address {0} is not registered")]
    NotFound(String),

    #[error("proposal {0} not found")]
    ProposalNotFound(u64),

    #[error("division undefined: {0} is zero")]
    DivisionUndefined(&'static str),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
