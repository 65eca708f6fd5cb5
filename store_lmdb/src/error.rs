use daovote_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<bincode::Error> for LmdbError {
    fn from(e: bincode::Error) -> Self {
        LmdbError::Serialization(e.to_string())
    }
}

impl From<LmdbError> for StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::NotFound(what) => StoreError::NotFound(what),
            LmdbError::Serialization(msg) => StoreError::Serialization(msg),
            LmdbError::Heed(msg) => StoreError::Backend(msg),
        }
    }
}
