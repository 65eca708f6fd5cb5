//! HTTP request handlers and their request/response bodies.

use crate::error::RpcError;
use crate::pagination::{effective_limit, PageParams, TallyQuery};
use crate::state::AppState;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use daovote_clients::TransferReceipt;
use daovote_governance::{ProposalDraft, TallyResult, VotingPowerEntry};
use daovote_store::{Ballot, Proposal, ProposalId};
use daovote_types::{Transaction, VoteChoice, WalletAddress};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

// ── Tally ────────────────────────────────────────────────────────────────

/// Tally response, field names as the DAO dashboard expects them.
#[derive(Debug, Serialize, Deserialize)]
pub struct TallyReport {
    pub dao_members: usize,
    pub total_transactions: usize,
    pub voted_members: usize,
    /// `"<pct>%"`
    pub turnout: String,
    /// `"<for>/<total voices> (<pct>%)"`
    pub votes_for: String,
    /// `"<against> (<pct>%)"`
    pub votes_against: String,
    pub voting_status: String,
    pub resolution: String,
    pub transactions: Vec<Transaction>,
    pub rejected_transactions: Vec<Transaction>,
    pub null_vote_power_transactions: Vec<Transaction>,
    pub invalid_message_transactions: Vec<Transaction>,
}

impl From<&TallyResult> for TallyReport {
    fn from(result: &TallyResult) -> Self {
        Self {
            dao_members: result.total_members,
            total_transactions: result.total_transactions,
            voted_members: result.voted_members,
            turnout: format!("{:.2}%", result.turnout_pct),
            votes_for: format!(
                "{}/{} ({:.2}%)",
                result.for_strength, result.total_voices, result.for_pct
            ),
            votes_against: format!("{} ({:.2}%)", result.against_strength, result.against_pct),
            voting_status: result.status.as_str().to_string(),
            resolution: result.resolution.as_str().to_string(),
            transactions: result.buckets.valid.clone(),
            rejected_transactions: result.buckets.duplicate.clone(),
            null_vote_power_transactions: result.buckets.zero_weight.clone(),
            invalid_message_transactions: result.buckets.invalid_memo.clone(),
        }
    }
}

async fn tally_wallet(
    state: &AppState,
    wallet: &WalletAddress,
    limit: Option<usize>,
    offset: Option<usize>,
) -> Result<TallyReport, RpcError> {
    let limit = effective_limit(limit, state.service.member_count());
    let txs = state
        .ledger
        .transactions(wallet, limit, offset.unwrap_or(0))
        .await?;
    let result = state.service.tally(&txs);
    state.metrics.observe_tally(&result);
    info!(
        wallet = %wallet,
        transactions = result.total_transactions,
        status = result.status.as_str(),
        resolution = result.resolution.as_str(),
        "tally computed"
    );
    Ok(TallyReport::from(&result))
}

/// `GET /dao-team-vote-results?wallet_address=&offset=&limit=`
pub async fn dao_vote_results(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TallyQuery>,
) -> Result<Json<TallyReport>, RpcError> {
    let wallet = query
        .wallet_address
        .as_deref()
        .map(WalletAddress::parse)
        .transpose()
        .map_err(|e| RpcError::InvalidRequest(e.to_string()))?
        .ok_or_else(|| RpcError::InvalidRequest("wallet_address is required".to_string()))?;
    let report = tally_wallet(&state, &wallet, query.limit, query.offset).await?;
    Ok(Json(report))
}

// ── Proposals ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateVoteRequest {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    pub choice: String,
    pub wallet_address: String,
}

/// The raw `Authorization` header, forwarded verbatim to the identity and
/// withdraw services.
fn authorization(headers: &HeaderMap) -> Result<&str, RpcError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| RpcError::Unauthorized("authorization token is required".to_string()))
}

fn parse_choice(raw: &str) -> Result<VoteChoice, RpcError> {
    raw.parse()
        .map_err(|_| RpcError::InvalidRequest(format!("unrecognized choice {raw:?}")))
}

/// `POST /votes`
pub async fn create_vote(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateVoteRequest>,
) -> Result<(StatusCode, Json<Proposal>), RpcError> {
    let token = authorization(&headers)?;
    if req.title.trim().is_empty() {
        return Err(RpcError::InvalidRequest("title is required".to_string()));
    }
    let choice = parse_choice(&req.choice)?;
    let wallet_address = WalletAddress::parse(&req.wallet_address)
        .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;
    let creator = state.identity.wallet_of(token).await?;

    let proposal = state.service.create_proposal(ProposalDraft {
        title: req.title,
        subtitle: req.subtitle,
        description: req.description,
        creator,
        choice,
        wallet_address,
    })?;
    state.metrics.proposals_created.inc();
    Ok((StatusCode::CREATED, Json(proposal)))
}

/// `GET /votes/:id`
pub async fn get_vote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ProposalId>,
) -> Result<Json<Proposal>, RpcError> {
    Ok(Json(state.service.get_proposal(id)?))
}

/// `DELETE /votes/:id`
pub async fn delete_vote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ProposalId>,
) -> Result<StatusCode, RpcError> {
    state.service.delete_proposal(id)?;
    state.metrics.proposals_deleted.inc();
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /votes/:id/results`: tally of the memo votes sent to the
/// proposal's wallet.
pub async fn vote_results(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ProposalId>,
    Query(page): Query<PageParams>,
) -> Result<Json<TallyReport>, RpcError> {
    let proposal = state.service.get_proposal(id)?;
    let report = tally_wallet(&state, &proposal.wallet_address, page.limit, page.offset).await?;
    Ok(Json(report))
}

// ── Ballots ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CastBallotRequest {
    pub choice: String,
}

/// What happened to the transfer that follows a ballot.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransferOutcome {
    Completed(TransferReceipt),
    Failed { error: String },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CastBallotResponse {
    pub ballot: Ballot,
    pub transfer: TransferOutcome,
}

/// `POST /votes/:id/vote`
///
/// The ballot is recorded first; the transfer to the proposal wallet is
/// attempted afterwards and its failure does not undo the ballot.
pub async fn cast_ballot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ProposalId>,
    headers: HeaderMap,
    Json(req): Json<CastBallotRequest>,
) -> Result<(StatusCode, Json<CastBallotResponse>), RpcError> {
    let token = authorization(&headers)?;
    let choice = parse_choice(&req.choice)?;
    let voter = state.identity.wallet_of(token).await?;

    let proposal = state.service.get_proposal(id)?;
    let ballot = state.service.add_ballot(id, voter, choice)?;
    state.metrics.ballots_recorded.inc();

    let transfer = match state
        .transfer
        .transfer(
            token,
            state.settings.ballot_transfer_amount,
            &proposal.wallet_address,
        )
        .await
    {
        Ok(receipt) => TransferOutcome::Completed(receipt),
        Err(e) => {
            warn!(ballot = ballot.id, proposal = id, "ballot transfer failed: {e}");
            state.metrics.transfers_failed.inc();
            TransferOutcome::Failed {
                error: e.to_string(),
            }
        }
    };

    Ok((StatusCode::CREATED, Json(CastBallotResponse { ballot, transfer })))
}

/// `GET /votes/:id/votes`
pub async fn list_ballots(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ProposalId>,
) -> Result<Json<Vec<Ballot>>, RpcError> {
    Ok(Json(state.service.list_ballots(id)?))
}

// ── Admin ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddWalletRequest {
    pub wallet_address: String,
    pub vote_power: u64,
}

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), RpcError> {
    let Some(expected) = state.settings.admin_token.as_deref() else {
        return Ok(());
    };
    let presented = authorization(headers)?;
    match presented.strip_prefix("Bearer ") {
        Some(token) if token == expected => Ok(()),
        _ => Err(RpcError::Unauthorized("invalid admin token".to_string())),
    }
}

/// `POST /admin/wallets`
pub async fn add_wallet(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<AddWalletRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), RpcError> {
    require_admin(&state, &headers)?;
    let address = WalletAddress::parse(&req.wallet_address)
        .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;
    state.service.add_member(address, req.vote_power)?;
    state
        .metrics
        .voting_members
        .set(state.service.member_count() as i64);
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Wallet added successfully" })),
    ))
}

/// `DELETE /admin/wallets/:wallet_address`
pub async fn delete_wallet(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(wallet_address): Path<String>,
) -> Result<Json<serde_json::Value>, RpcError> {
    require_admin(&state, &headers)?;
    let address = WalletAddress::parse(&wallet_address)
        .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;
    state.service.remove_member(&address)?;
    state
        .metrics
        .voting_members
        .set(state.service.member_count() as i64);
    Ok(Json(
        serde_json::json!({ "message": "Wallet deleted successfully" }),
    ))
}

/// `GET /admin/wallets`
pub async fn list_wallets(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<VotingPowerEntry>>, RpcError> {
    require_admin(&state, &headers)?;
    Ok(Json(state.service.members()))
}

// ── Telemetry ────────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /metrics`
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, RpcError> {
    let body = state.metrics.encode()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
