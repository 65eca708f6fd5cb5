//! DAO vote service node.
//!
//! Loads configuration, initialises logging, opens the vote store and
//! serves the HTTP API until a shutdown signal arrives.

pub mod config;
pub mod error;
pub mod logging;
pub mod node;
pub mod shutdown;

pub use config::{NodeConfig, StoreBackend};
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use node::DaoNode;
pub use shutdown::ShutdownController;
