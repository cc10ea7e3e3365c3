/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for arc-task-adapter tests

use std::sync::Arc;

use arc_task_adapter::sim::default_contracts;
use arc_task_adapter::{Address, LedgerClient, MiningMode, SimulatedLedger, TokenAmount};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

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
pub fn outsider() -> Address {
    Address::repeat_byte(0xc3)
}

/// Simulated deployment where the poster holds 100 USDC
#[allow(dead_code)]
pub async fn funded_sim(mining: MiningMode) -> (Arc<SimulatedLedger>, LedgerClient) {
    let sim = Arc::new(SimulatedLedger::with_mining(default_contracts(), mining));
    sim.mint(poster(), TokenAmount::from_units(100_000_000))
        .await;
    let client = LedgerClient::new(sim.clone(), default_contracts());
    (sim, client)
}
