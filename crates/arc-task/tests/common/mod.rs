/*
[INPUT]:  Simulated ledger, static wallets, mock JSON-RPC server
[OUTPUT]: Shared fixtures for view-model, session and config tests
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for arc-task tests

use std::sync::Arc;
use std::time::Duration;

use arc_task::app::effect::Executor;
use arc_task::app::event::Action;
use arc_task::app::state::{AppState, Notice, NoticeLevel, Screen};
use arc_task::{App, SyncPolicy};
use arc_task_adapter::sim::default_contracts;
use arc_task_adapter::{
    Address, LedgerClient, MiningMode, SimulatedLedger, StaticWallet, TOKEN_DECIMALS, TokenAmount,
};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answer every `rpc_method` request with `result`
#[allow(dead_code)]
pub async fn mock_rpc_result(server: &MockServer, rpc_method: &str, result: Value) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": result,
        })))
        .mount(server)
        .await;
}

/// Answer every `rpc_method` request with a JSON-RPC error object
#[allow(dead_code)]
pub async fn mock_rpc_error(server: &MockServer, rpc_method: &str, code: i64, message: &str) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": code, "message": message },
        })))
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub fn poster() -> Address {
    Address::repeat_byte(0xa1)
}

#[allow(dead_code)]
pub fn worker() -> Address {
    Address::repeat_byte(0xb2)
}

#[allow(dead_code)]
pub fn usdc(input: &str) -> TokenAmount {
    TokenAmount::parse(input, TOKEN_DECIMALS).unwrap()
}

/// Polling fast enough for tests; `timeout_ms` bounds each confirmation wait
#[allow(dead_code)]
pub fn policy(timeout_ms: u64) -> SyncPolicy {
    SyncPolicy {
        poll_interval: Duration::from_millis(5),
        timeout: Duration::from_millis(timeout_ms),
    }
}

/// Simulated deployment where the poster holds 100 USDC and the worker 5 USDC
#[allow(dead_code)]
pub async fn funded_sim(mining: MiningMode) -> (Arc<SimulatedLedger>, LedgerClient) {
    let sim = Arc::new(SimulatedLedger::with_mining(default_contracts(), mining));
    sim.mint(poster(), usdc("100")).await;
    sim.mint(worker(), usdc("5")).await;
    let client = LedgerClient::new(sim.clone(), default_contracts());
    (sim, client)
}

/// View-model driver acting as `account` through a static wallet
#[allow(dead_code)]
pub fn app_as(client: &LedgerClient, account: Address, screen: Screen, sync: SyncPolicy) -> App {
    app_with_wallet(client, Arc::new(StaticWallet::new(account)), screen, sync)
}

#[allow(dead_code)]
pub fn app_with_wallet(
    client: &LedgerClient,
    wallet: Arc<StaticWallet>,
    screen: Screen,
    sync: SyncPolicy,
) -> App {
    let executor = Executor::new(client.clone(), wallet, sync, CancellationToken::new());
    App::new(AppState::new(screen), executor)
}

/// Connected app with the active screen loaded and the connect notice cleared
#[allow(dead_code)]
pub async fn connected(client: &LedgerClient, account: Address, screen: Screen) -> App {
    let mut app = app_as(client, account, screen, policy(2_000));
    app.dispatch(Action::Connect).await;
    assert_eq!(app.state().account, Some(account));
    app.dispatch(Action::DismissNotices).await;
    app
}

/// Next effect result from a detached dispatch, fed back into the app
#[allow(dead_code)]
pub async fn pump(
    app: &mut App,
    tx: &mpsc::UnboundedSender<Action>,
    rx: &mut mpsc::UnboundedReceiver<Action>,
) -> Action {
    let action = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for an effect result")
        .expect("action channel closed");
    app.dispatch_detached(action.clone(), tx);
    action
}

#[allow(dead_code)]
pub fn errors(state: &AppState) -> Vec<&Notice> {
    state
        .notices
        .iter()
        .filter(|notice| notice.level == NoticeLevel::Error)
        .collect()
}
