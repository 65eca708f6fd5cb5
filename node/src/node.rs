//! Node wiring: storage, collaborators and the HTTP API behind one handle.

use crate::config::{NodeConfig, StoreBackend};
use crate::error::NodeError;
use crate::shutdown::ShutdownController;
use daovote_clients::{
    AuthClient, ExplorerClient, FundsTransfer, IdentityProvider, LedgerSource, WithdrawClient,
};
use daovote_governance::{DaoService, TallyEngine};
use daovote_rpc::{ApiSettings, AppState, RpcServer};
use daovote_store::{MemoryStore, VoteStore};
use daovote_store_lmdb::LmdbEnvironment;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// A running DAO vote service.
pub struct DaoNode {
    pub config: NodeConfig,
    state: Arc<AppState>,
    shutdown: Arc<ShutdownController>,
}

impl DaoNode {
    /// Open the configured store and build the HTTP clients for the
    /// explorer, identity and withdraw services.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let timeout = config.request_timeout();
        let ledger: Arc<dyn LedgerSource> =
            Arc::new(ExplorerClient::with_timeout(config.explorer_url.clone(), timeout));
        let identity: Arc<dyn IdentityProvider> =
            Arc::new(AuthClient::with_timeout(config.auth_url.clone(), timeout));
        let transfer: Arc<dyn FundsTransfer> = Arc::new(
            WithdrawClient::new(config.withdraw_url.clone(), config.transactions_url.clone())
                .with_timeout(timeout)
                .with_polling(config.poll_delay(), config.poll_attempts),
        );
        Self::with_collaborators(config, ledger, identity, transfer)
    }

    /// Build a node around caller-supplied collaborators.
    pub fn with_collaborators(
        config: NodeConfig,
        ledger: Arc<dyn LedgerSource>,
        identity: Arc<dyn IdentityProvider>,
        transfer: Arc<dyn FundsTransfer>,
    ) -> Result<Self, NodeError> {
        let store = open_store(&config)?;
        let engine = TallyEngine::new(config.tally_params()?);
        let service = DaoService::bootstrap(config.voting_power_table()?, store, engine)?;

        let settings = ApiSettings {
            ballot_transfer_amount: config.ballot_transfer_amount,
            admin_token: config.admin_token.clone(),
        };
        let state = Arc::new(AppState::new(service, ledger, identity, transfer, settings));

        Ok(Self {
            config,
            state,
            shutdown: Arc::new(ShutdownController::new()),
        })
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        self.shutdown.clone()
    }

    /// Bind the configured port and serve until shutdown.
    pub async fn run(&self) -> Result<(), NodeError> {
        self.log_start();
        let server = RpcServer::new(self.config.port, self.state.clone());
        server.start(self.shutdown.signalled()).await?;
        info!("DAO vote node stopped");
        Ok(())
    }

    /// Serve on an already bound listener until shutdown.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), NodeError> {
        self.log_start();
        let server = RpcServer::new(self.config.port, self.state.clone());
        server.serve(listener, self.shutdown.signalled()).await?;
        info!("DAO vote node stopped");
        Ok(())
    }

    fn log_start(&self) {
        info!(
            members = self.state.service.member_count(),
            store = ?self.config.store,
            "DAO vote node starting"
        );
    }
}

fn open_store(config: &NodeConfig) -> Result<Arc<dyn VoteStore>, NodeError> {
    match config.store {
        StoreBackend::Memory => {
            info!("using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Lmdb => {
            let env = LmdbEnvironment::open_default(&config.data_dir)?;
            info!(path = %env.path().display(), "opened LMDB store");
            Ok(Arc::new(env))
        }
    }
}
