//! Shared application state handed to every handler.

use crate::metrics::RpcMetrics;
use daovote_clients::{FundsTransfer, IdentityProvider, LedgerSource};
use daovote_governance::DaoService;
use std::sync::Arc;

/// Request-independent knobs of the API.
#[derive(Clone, Debug, Default)]
pub struct ApiSettings {
    /// Amount sent to the proposal wallet after each ballot.
    pub ballot_transfer_amount: u64,
    /// When set, admin routes require `Authorization: Bearer <token>`.
    pub admin_token: Option<String>,
}

pub struct AppState {
    pub service: DaoService,
    pub ledger: Arc<dyn LedgerSource>,
    pub identity: Arc<dyn IdentityProvider>,
    pub transfer: Arc<dyn FundsTransfer>,
    pub metrics: RpcMetrics,
    pub settings: ApiSettings,
}

impl AppState {
    pub fn new(
        service: DaoService,
        ledger: Arc<dyn LedgerSource>,
        identity: Arc<dyn IdentityProvider>,
        transfer: Arc<dyn FundsTransfer>,
        settings: ApiSettings,
    ) -> Self {
        let metrics = RpcMetrics::new();
        metrics.voting_members.set(service.member_count() as i64);
        Self {
            service,
            ledger,
            identity,
            transfer,
            metrics,
            settings,
        }
    }
}
