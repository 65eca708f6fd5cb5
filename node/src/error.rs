use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("governance error: {0}")]
    Governance(#[from] daovote_governance::GovernanceError),

    #[error("store error: {0}")]
    Store(#[from] daovote_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] daovote_store_lmdb::LmdbError),

    #[error("config error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP server error: {0}")]
    Rpc(#[from] daovote_rpc::RpcError),
}
