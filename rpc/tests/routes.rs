use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use daovote_governance::{
    DaoService, TallyEngine, TallyParams, TotalVoices, VotingPowerEntry, VotingPowerTable,
};
use daovote_nullables::{NullIdentity, NullLedger, NullTransfer};
use daovote_rpc::{router, ApiSettings, AppState};
use daovote_store::MemoryStore;
use daovote_types::{Transaction, WalletAddress};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct Harness {
    app: Router,
    ledger: Arc<NullLedger>,
    transfer: Arc<NullTransfer>,
}

fn harness_with(admin_token: Option<&str>) -> Harness {
    let table = VotingPowerTable::from_entries(
        [("alice", 100), ("bob", 200)].map(|(address, weight)| VotingPowerEntry {
            address: WalletAddress::new(address),
            weight,
        }),
        TotalVoices::Sum,
    )
    .unwrap();
    let service = DaoService::bootstrap(
        table,
        Arc::new(MemoryStore::new()),
        TallyEngine::new(TallyParams::default()),
    )
    .unwrap();

    let ledger = Arc::new(NullLedger::new());
    let transfer = Arc::new(NullTransfer::new());
    let identity = Arc::new(
        NullIdentity::new()
            .with_user("alice-token", "alice")
            .with_user("bob-token", "bob")
            .with_user("mallory-token", "mallory"),
    );
    let state = AppState::new(
        service,
        ledger.clone(),
        identity,
        transfer.clone(),
        ApiSettings {
            ballot_transfer_amount: 1,
            admin_token: admin_token.map(str::to_string),
        },
    );
    Harness {
        app: router(Arc::new(state)),
        ledger,
        transfer,
    }
}

fn harness() -> Harness {
    harness_with(None)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn proposal_body() -> Value {
    json!({
        "title": "Budget",
        "subtitle": "Q3",
        "description": "Fund the hackathon",
        "choice": "За",
        "wallet_address": "proposal-wallet"
    })
}

async fn create_proposal(app: &Router) -> u64 {
    let (status, body) = send(
        app,
        json_request("POST", "/votes", Some("alice-token"), proposal_body()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_u64().unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let h = harness();
    let (status, body) = send(&h.app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn dao_results_tally_the_wallet_transactions() {
    let h = harness();
    h.ledger.set_transactions(
        WalletAddress::new("dao"),
        vec![
            Transaction::new("alice", "за", "h1"),
            Transaction::new("bob", "против", "h2"),
            Transaction::new("alice", "za", "h3"),
            Transaction::new("stranger", "да", "h4"),
            Transaction::new("bob", "", "h5"),
        ],
    );

    let (status, body) = send(
        &h.app,
        get("/dao-team-vote-results?wallet_address=dao&limit=10"),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["dao_members"], 2);
    assert_eq!(body["total_transactions"], 5);
    assert_eq!(body["voted_members"], 2);
    assert_eq!(body["turnout"], "100.00%");
    assert_eq!(body["votes_for"], "100/300 (33.33%)");
    assert_eq!(body["votes_against"], "200 (66.67%)");
    assert_eq!(body["voting_status"], "Completed");
    assert_eq!(body["resolution"], "Rejected");
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(body["rejected_transactions"][0]["hash"], "h3");
    assert_eq!(body["null_vote_power_transactions"][0]["from"], "stranger");
    assert_eq!(body["null_vote_power_transactions"][0]["vote_power"], 0);
    assert_eq!(body["invalid_message_transactions"][0]["hash"], "h5");
    assert_eq!(h.ledger.queries(), vec![(WalletAddress::new("dao"), 10, 0)]);
}

#[tokio::test]
async fn dao_results_bucket_degenerate_transactions() {
    let h = harness();
    h.ledger.set_transactions(
        WalletAddress::new("dao"),
        vec![
            Transaction::new("", "за", "no-sender"),
            Transaction::new("alice", "", "no-memo"),
            Transaction::new("", "", "blank"),
            Transaction::new("alice", "да", "h1"),
            Transaction::new("bob", "против", "h2"),
        ],
    );

    let (status, body) = send(
        &h.app,
        get("/dao-team-vote-results?wallet_address=dao&limit=10"),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["total_transactions"], 5);
    assert_eq!(body["voted_members"], 2);
    assert_eq!(body["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(body["null_vote_power_transactions"].as_array().unwrap().len(), 2);
    assert_eq!(body["null_vote_power_transactions"][0]["hash"], "no-sender");
    assert_eq!(body["null_vote_power_transactions"][1]["hash"], "blank");
    assert_eq!(body["invalid_message_transactions"].as_array().unwrap().len(), 1);
    assert_eq!(body["invalid_message_transactions"][0]["hash"], "no-memo");
    assert!(body["rejected_transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn dao_results_pass_paging_through() {
    let h = harness();
    // Limit defaults to the member count.
    let (status, _) = send(&h.app, get("/dao-team-vote-results?wallet_address=dao")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &h.app,
        get("/dao-team-vote-results?wallet_address=dao&offset=5&limit=5000"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        h.ledger.queries(),
        vec![
            (WalletAddress::new("dao"), 2, 0),
            (WalletAddress::new("dao"), 1000, 5),
        ]
    );
}

#[tokio::test]
async fn dao_results_require_wallet() {
    let h = harness();
    let (status, body) = send(&h.app, get("/dao-team-vote-results")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("wallet_address"));
}

#[tokio::test]
async fn dao_results_report_upstream_failure() {
    let h = harness();
    h.ledger.set_unreachable(true);
    let (status, _) = send(&h.app, get("/dao-team-vote-results?wallet_address=dao")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn proposal_lifecycle() {
    let h = harness();
    let id = create_proposal(&h.app).await;
    assert_eq!(id, 1);

    let (status, body) = send(&h.app, get("/votes/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Budget");
    assert_eq!(body["voter"], "alice");
    assert_eq!(body["choice"], "За");
    assert_eq!(body["vote_power"], 100);
    assert_eq!(body["wallet_address"], "proposal-wallet");

    let delete = Request::delete("/votes/1").body(Body::empty()).unwrap();
    let (status, _) = send(&h.app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&h.app, get("/votes/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let delete = Request::delete("/votes/1").body(Body::empty()).unwrap();
    let (status, _) = send(&h.app, delete).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_proposal_validates_input() {
    let h = harness();

    let (status, _) = send(&h.app, json_request("POST", "/votes", None, proposal_body())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &h.app,
        json_request("POST", "/votes", Some("unknown-token"), proposal_body()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &h.app,
        json_request("POST", "/votes", Some("mallory-token"), proposal_body()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = proposal_body();
    body["choice"] = json!("maybe");
    let (status, _) = send(&h.app, json_request("POST", "/votes", Some("alice-token"), body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ballot_is_recorded_and_funds_sent() {
    let h = harness();
    let id = create_proposal(&h.app).await;

    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            &format!("/votes/{id}/vote"),
            Some("bob-token"),
            json!({"choice": "против"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["ballot"]["vote_id"], id);
    assert_eq!(body["ballot"]["voter"], "bob");
    assert_eq!(body["ballot"]["choice"], "Против");
    assert_eq!(body["ballot"]["vote_power"], 200);
    assert_eq!(body["transfer"]["status"], "completed");

    let sent = h.transfer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].amount, 1);
    assert_eq!(sent[0].to.as_str(), "proposal-wallet");
    assert_eq!(sent[0].authorization, "Bearer bob-token");

    let (status, body) = send(&h.app, get(&format!("/votes/{id}/votes"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_transfer_keeps_the_ballot() {
    let h = harness();
    let id = create_proposal(&h.app).await;
    h.transfer.set_failing(true);

    let (status, body) = send(
        &h.app,
        json_request(
            "POST",
            &format!("/votes/{id}/vote"),
            Some("alice-token"),
            json!({"choice": "да"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["transfer"]["status"], "failed");

    let (_, body) = send(&h.app, get(&format!("/votes/{id}/votes"))).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn ballot_errors() {
    let h = harness();

    let (status, _) = send(
        &h.app,
        json_request("POST", "/votes/9/vote", Some("bob-token"), json!({"choice": "за"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = create_proposal(&h.app).await;
    let (status, _) = send(
        &h.app,
        json_request(
            "POST",
            &format!("/votes/{id}/vote"),
            Some("mallory-token"),
            json!({"choice": "за"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.transfer.sent().is_empty());

    let (status, _) = send(&h.app, get("/votes/9/votes")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn proposal_results_tally_the_proposal_wallet() {
    let h = harness();
    let id = create_proposal(&h.app).await;
    h.ledger.set_transactions(
        WalletAddress::new("proposal-wallet"),
        vec![
            Transaction::new("alice", "да", "p1"),
            Transaction::new("bob", "z", "p2"),
        ],
    );

    let (status, body) = send(&h.app, get(&format!("/votes/{id}/results"))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["votes_for"], "300/300 (100.00%)");
    assert_eq!(body["resolution"], "Accepted");

    let (status, _) = send(&h.app, get("/votes/42/results")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_wallets_manage_voting_power() {
    let h = harness();

    let (status, _) = send(
        &h.app,
        json_request(
            "POST",
            "/admin/wallets",
            None,
            json!({"wallet_address": "carol", "vote_power": 50}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &h.app,
        json_request(
            "POST",
            "/admin/wallets",
            None,
            json!({"wallet_address": "carol", "vote_power": 60}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&h.app, get("/admin/wallets")).await;
    let addresses: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["address"].as_str().unwrap())
        .collect();
    assert_eq!(addresses, ["alice", "bob", "carol"]);

    let delete = Request::delete("/admin/wallets/alice").body(Body::empty()).unwrap();
    let (status, _) = send(&h.app, delete).await;
    assert_eq!(status, StatusCode::OK);
    let delete = Request::delete("/admin/wallets/alice").body(Body::empty()).unwrap();
    let (status, _) = send(&h.app, delete).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, text) = send(&h.app, get("/metrics")).await;
    assert!(text.as_str().unwrap().contains("daovote_voting_members 2"));
}

#[tokio::test]
async fn admin_token_is_enforced_when_configured() {
    let h = harness_with(Some("s3cret"));

    let (status, _) = send(&h.app, get("/admin/wallets")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::get("/admin/wallets")
        .header(header::AUTHORIZATION, "Bearer wrong")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::get("/admin/wallets")
        .header(header::AUTHORIZATION, "Bearer s3cret")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&h.app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let h = harness();
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/votes")
        .header(header::ORIGIN, "https://dao.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
