//! Drives the `reqwest` clients against a local axum server standing in for
//! the explorer, identity and withdraw services.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use daovote_clients::{
    AuthClient, ClientError, ExplorerClient, FundsTransfer, IdentityProvider, LedgerSource,
    WithdrawClient,
};
use daovote_types::WalletAddress;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct Upstream {
    hash_lookups: AtomicU32,
    /// Lookups answered with an empty hash before the real one.
    pending_lookups: u32,
}

async fn txs(
    Path(wallet): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    Json(json!({
        "result": {
            "txs": [
                {"from": "d0alice", "message": "за", "hash": format!("{wallet}-1")},
                {"from": "d0bob", "message": params.get("limit").cloned().unwrap_or_default(), "hash": "x"}
            ]
        }
    }))
}

async fn degenerate_txs() -> Json<Value> {
    Json(json!({
        "result": {
            "txs": [
                {"from": "d0alice", "message": "за", "hash": "ok"},
                {"from": "d0bob", "message": null, "hash": "null-memo"},
                {"message": "против", "hash": "no-sender"}
            ]
        }
    }))
}

async fn me(headers: HeaderMap) -> impl IntoResponse {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer good") => (
            StatusCode::OK,
            Json(json!({"data": {"login": "alice", "wallet": "d0alice"}})),
        ),
        Some("Bearer walletless") => (StatusCode::OK, Json(json!({"data": {"wallet": ""}}))),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({"message": "Unauthenticated."}))),
    }
}

async fn withdraw(Json(body): Json<Value>) -> Json<Value> {
    if body["address"] == "d0broke" {
        return Json(json!({"type": "error", "message": "no funds", "data": {}}));
    }
    Json(json!({"type": "success", "data": {"transaction_id": 42}}))
}

async fn transaction(
    State(upstream): State<Arc<Upstream>>,
    Path(id): Path<u64>,
) -> Json<Value> {
    let n = upstream.hash_lookups.fetch_add(1, Ordering::SeqCst);
    let hash = if n < upstream.pending_lookups {
        String::new()
    } else {
        format!("HASH{id}")
    };
    Json(json!({"data": {"hash": hash}}))
}

async fn spawn_upstream(pending_lookups: u32) -> (String, Arc<Upstream>) {
    let upstream = Arc::new(Upstream {
        pending_lookups,
        ..Default::default()
    });
    let app = Router::new()
        .route("/address/:wallet/txs", get(txs))
        .route("/degenerate/address/:wallet/txs", get(degenerate_txs))
        .route("/me", get(me))
        .route("/withdraw", post(withdraw))
        .route("/transactions/:id", get(transaction))
        .with_state(upstream.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), upstream)
}

fn withdraw_client(base: &str) -> WithdrawClient {
    WithdrawClient::new(format!("{base}/withdraw"), format!("{base}/transactions"))
        .with_polling(Duration::from_millis(5), 3)
}

#[tokio::test]
async fn explorer_client_fetches_transactions() {
    let (base, _) = spawn_upstream(0).await;
    let client = ExplorerClient::new(base);
    let txs = client
        .transactions(&WalletAddress::new("d0dao"), 58, 0)
        .await
        .unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].hash.as_str(), "d0dao-1");
    // The server echoes the limit back in the second memo.
    assert_eq!(txs[1].message, "58");
}

#[tokio::test]
async fn explorer_client_keeps_degenerate_entries() {
    let (base, _) = spawn_upstream(0).await;
    let client = ExplorerClient::new(format!("{base}/degenerate"));
    let txs = client
        .transactions(&WalletAddress::new("d0dao"), 10, 0)
        .await
        .unwrap();
    assert_eq!(txs.len(), 3);
    assert_eq!(txs[1].message, "");
    assert_eq!(txs[2].from.as_str(), "");
    assert_eq!(txs[2].hash.as_str(), "no-sender");
}

#[tokio::test]
async fn auth_client_resolves_wallet() {
    let (base, _) = spawn_upstream(0).await;
    let client = AuthClient::new(base);
    assert_eq!(client.wallet_of("Bearer good").await.unwrap().as_str(), "d0alice");
    assert!(matches!(
        client.wallet_of("Bearer bad").await,
        Err(ClientError::Unauthorized(_))
    ));
    assert!(matches!(
        client.wallet_of("Bearer walletless").await,
        Err(ClientError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn withdraw_polls_until_hash_appears() {
    let (base, upstream) = spawn_upstream(2).await;
    let receipt = withdraw_client(&base)
        .transfer("Bearer good", 1, &WalletAddress::new("d0dao"))
        .await
        .unwrap();
    assert_eq!(receipt.transaction_id, 42);
    assert_eq!(receipt.hash.as_deref(), Some("HASH42"));
    assert_eq!(upstream.hash_lookups.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn withdraw_without_hash_still_succeeds() {
    let (base, upstream) = spawn_upstream(10).await;
    let receipt = withdraw_client(&base)
        .transfer("Bearer good", 1, &WalletAddress::new("d0dao"))
        .await
        .unwrap();
    assert_eq!(receipt.transaction_id, 42);
    assert_eq!(receipt.hash, None);
    assert_eq!(upstream.hash_lookups.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn withdraw_without_transaction_id_fails() {
    let (base, _) = spawn_upstream(0).await;
    let result = withdraw_client(&base)
        .transfer("Bearer good", 1, &WalletAddress::new("d0broke"))
        .await;
    assert!(matches!(result, Err(ClientError::InvalidResponse(_))));
}

#[tokio::test]
async fn unreachable_explorer_maps_to_unreachable() {
    // Bind then drop so nothing listens on the port.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ExplorerClient::with_timeout(format!("http://{addr}"), Duration::from_secs(2));
    let result = client.transactions(&WalletAddress::new("d0dao"), 10, 0).await;
    assert!(matches!(result, Err(ClientError::Unreachable(_))));
}
