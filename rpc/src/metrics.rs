//! Prometheus metrics for the vote API.
//!
//! [`RpcMetrics`] owns a dedicated [`Registry`] that `GET /metrics` encodes
//! into the Prometheus text exposition format.

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

use daovote_governance::TallyResult;

use crate::RpcError;

pub struct RpcMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Tallies computed, for the DAO wallet and for proposals.
    pub tallies_computed: IntCounter,
    /// Transactions classified, labelled by bucket.
    pub transactions_classified: IntCounterVec,
    pub proposals_created: IntCounter,
    pub proposals_deleted: IntCounter,
    pub ballots_recorded: IntCounter,
    /// Ballot transfers the withdraw service refused or failed.
    pub transfers_failed: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Addresses currently holding voting power.
    pub voting_members: IntGauge,
}

impl RpcMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let tallies_computed = register_int_counter_with_registry!(
            Opts::new("daovote_tallies_computed_total", "Total tallies computed"),
            registry
        )
        .expect("failed to register tallies_computed counter");

        let transactions_classified = register_int_counter_vec_with_registry!(
            Opts::new(
                "daovote_transactions_classified_total",
                "Transactions classified, by bucket"
            ),
            &["bucket"],
            registry
        )
        .expect("failed to register transactions_classified counter");

        let proposals_created = register_int_counter_with_registry!(
            Opts::new("daovote_proposals_created_total", "Total proposals created"),
            registry
        )
        .expect("failed to register proposals_created counter");

        let proposals_deleted = register_int_counter_with_registry!(
            Opts::new("daovote_proposals_deleted_total", "Total proposals deleted"),
            registry
        )
        .expect("failed to register proposals_deleted counter");

        let ballots_recorded = register_int_counter_with_registry!(
            Opts::new("daovote_ballots_recorded_total", "Total ballots recorded"),
            registry
        )
        .expect("failed to register ballots_recorded counter");

        let transfers_failed = register_int_counter_with_registry!(
            Opts::new(
                "daovote_ballot_transfers_failed_total",
                "Ballot transfers that did not complete"
            ),
            registry
        )
        .expect("failed to register transfers_failed counter");

        let voting_members = register_int_gauge_with_registry!(
            Opts::new(
                "daovote_voting_members",
                "Addresses currently holding voting power"
            ),
            registry
        )
        .expect("failed to register voting_members gauge");

        Self {
            registry,
            tallies_computed,
            transactions_classified,
            proposals_created,
            proposals_deleted,
            ballots_recorded,
            transfers_failed,
            voting_members,
        }
    }

    /// Count one tally and its bucket sizes.
    pub fn observe_tally(&self, result: &TallyResult) {
        self.tallies_computed.inc();
        for (classification, count) in result.classification_counts() {
            self.transactions_classified
                .with_label_values(&[classification.as_str()])
                .inc_by(count as u64);
        }
    }

    /// Encode all metrics in the Prometheus text format.
    pub fn encode(&self) -> Result<String, RpcError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|e| RpcError::Server(format!("metrics encoding failed: {e}")))?;
        String::from_utf8(buf).map_err(|e| RpcError::Server(e.to_string()))
    }
}

impl Default for RpcMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daovote_governance::{TallyEngine, VotingPowerTable};
    use daovote_types::{Transaction, WalletAddress};

    #[test]
    fn encodes_registered_metrics() {
        let metrics = RpcMetrics::new();
        metrics.proposals_created.inc();
        let text = metrics.encode().unwrap();
        assert!(text.contains("daovote_proposals_created_total 1"));
        assert!(text.contains("daovote_voting_members"));
    }

    #[test]
    fn tally_buckets_are_counted() {
        let metrics = RpcMetrics::new();
        let mut table = VotingPowerTable::default();
        table.add(WalletAddress::new("alice"), 10).unwrap();
        table.add(WalletAddress::new("bob"), 10).unwrap();
        let result = TallyEngine::default().tally(
            &[
                Transaction::new("nobody", "за", "h1"),
                Transaction::new("alice", "за", "h2"),
                Transaction::new("bob", "нет", "h3"),
            ],
            &table,
        );
        metrics.observe_tally(&result);
        assert_eq!(metrics.tallies_computed.get(), 1);
        assert_eq!(
            metrics
                .transactions_classified
                .with_label_values(&["zero_weight"])
                .get(),
            1
        );
        for label in ["vote_for", "vote_against"] {
            assert_eq!(
                metrics.transactions_classified.with_label_values(&[label]).get(),
                1,
                "{label}"
            );
        }
    }
}
