/*
[INPUT]:  Mock JSON-RPC responses
[OUTPUT]: Test results for the JSON-RPC ledger and wallet
[POS]:    Integration tests - Ethereum JSON-RPC endpoints
[UPDATE]: When RPC methods or error mapping change
*/

mod common;

use std::sync::Arc;

use alloy_primitives::U256;
use alloy_sol_types::SolValue;
use arc_task_adapter::contract::abi::IMarketplace;
use arc_task_adapter::sim::default_contracts;
use arc_task_adapter::{
    ContractCall, ErrorKind, LedgerClient, LedgerError, RpcClient, RpcWallet, TaskStatus,
    TxStatus, Wallet,
};
use common::{mock_rpc_error, mock_rpc_result, poster, setup_mock_server, worker};
use serde_json::json;
use tokio_test::assert_ok;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, ResponseTemplate};

fn hex_data(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

fn ledger_over(server_uri: &str) -> LedgerClient {
    let client = assert_ok!(RpcClient::new(server_uri));
    LedgerClient::new(Arc::new(client), default_contracts())
}

#[tokio::test]
async fn test_chain_id() {
    let server = setup_mock_server().await;
    mock_rpc_result(&server, "eth_chainId", json!("0x45c")).await;

    let client = assert_ok!(RpcClient::new(&server.uri()));
    assert_eq!(assert_ok!(client.chain_id().await), 1116);
}

#[tokio::test]
async fn test_token_balance_via_eth_call() {
    let server = setup_mock_server().await;
    let encoded = U256::from(1_500_000u64).abi_encode();
    mock_rpc_result(&server, "eth_call", json!(hex_data(&encoded))).await;

    let ledger = ledger_over(&server.uri());
    let balance = assert_ok!(ledger.token_balance(poster()).await);
    assert_eq!(balance.units(), 1_500_000);
    assert_eq!(balance.to_string(), "1.50");
}

#[tokio::test]
async fn test_eth_call_targets_contract_with_selector() {
    let server = setup_mock_server().await;
    let contracts = default_contracts();
    let tasks = vec![IMarketplace::Task {
        id: U256::from(1u64),
        poster: poster(),
        worker: worker(),
        title: "Audit".to_string(),
        description: String::new(),
        bounty: U256::from(1_500_000u64),
        status: 1,
        createdAt: U256::from(1_700_000_000u64),
    }];
    let encoded = (tasks,).abi_encode_params();
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "eth_call",
            "params": [{ "to": contracts.marketplace }],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": hex_data(&encoded),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ledger = ledger_over(&server.uri());
    let tasks = assert_ok!(ledger.market_tasks().await);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::InProgress);
    assert_eq!(tasks[0].worker, Some(worker()));
}

#[tokio::test]
async fn test_send_transaction_returns_hash() {
    let server = setup_mock_server().await;
    let hash = format!("0x{}", "ab".repeat(32));
    mock_rpc_result(&server, "eth_sendTransaction", json!(hash)).await;

    let ledger = ledger_over(&server.uri());
    let submitted = assert_ok!(
        ledger
            .submit(worker(), &ContractCall::TakeTask { id: 1 })
            .await
    );
    assert_eq!(submitted.to_string(), hash);
}

#[tokio::test]
async fn test_user_rejection_is_wallet_rejected() {
    let server = setup_mock_server().await;
    mock_rpc_error(
        &server,
        "eth_sendTransaction",
        4001,
        "User rejected the request.",
    )
    .await;

    let ledger = ledger_over(&server.uri());
    let err = ledger
        .submit(worker(), &ContractCall::TakeTask { id: 1 })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::WalletRejected { .. }));
    assert_eq!(err.kind(), ErrorKind::WalletRejected);
}

#[tokio::test]
async fn test_revert_is_ledger_rejected() {
    let server = setup_mock_server().await;
    mock_rpc_error(&server, "eth_sendTransaction", 3, "execution reverted: Task not open").await;

    let ledger = ledger_over(&server.uri());
    let err = ledger
        .submit(worker(), &ContractCall::TakeTask { id: 1 })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LedgerRejected);
    assert!(err.to_string().contains("Task not open"));
}

#[tokio::test]
async fn test_receipt_states() {
    let server = setup_mock_server().await;
    let ledger = ledger_over(&server.uri());
    let hash = format!("0x{}", "cd".repeat(32)).parse().unwrap();

    mock_rpc_result(&server, "eth_getTransactionReceipt", json!(null)).await;
    assert_eq!(
        assert_ok!(ledger.transaction_status(hash).await),
        TxStatus::Pending
    );

    server.reset().await;
    mock_rpc_result(
        &server,
        "eth_getTransactionReceipt",
        json!({ "transactionHash": hash, "blockNumber": "0x2a", "status": "0x0" }),
    )
    .await;
    assert!(matches!(
        assert_ok!(ledger.transaction_status(hash).await),
        TxStatus::Failed { .. }
    ));

    server.reset().await;
    mock_rpc_result(
        &server,
        "eth_getTransactionReceipt",
        json!({ "transactionHash": hash, "blockNumber": "0x2a", "status": "0x1" }),
    )
    .await;
    assert_eq!(
        assert_ok!(ledger.transaction_status(hash).await),
        TxStatus::Confirmed { block: 42 }
    );
}

#[tokio::test]
async fn test_http_failure_is_network_error() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let ledger = ledger_over(&server.uri());
    let err = ledger.market_tasks().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_rpc_wallet_connects_first_account() {
    let server = setup_mock_server().await;
    mock_rpc_result(&server, "eth_requestAccounts", json!([poster(), worker()])).await;

    let client = Arc::new(assert_ok!(RpcClient::new(&server.uri())));
    let wallet = RpcWallet::new(client);
    assert_eq!(assert_ok!(wallet.connect().await), poster());
}

#[tokio::test]
async fn test_rpc_wallet_falls_back_to_eth_accounts() {
    let server = setup_mock_server().await;
    mock_rpc_error(&server, "eth_requestAccounts", -32601, "method not found").await;
    mock_rpc_result(&server, "eth_accounts", json!([worker()])).await;

    let client = Arc::new(assert_ok!(RpcClient::new(&server.uri())));
    let wallet = RpcWallet::new(client);
    assert_eq!(assert_ok!(wallet.connect().await), worker());
}

#[tokio::test]
async fn test_rpc_wallet_rejection_does_not_fall_back() {
    let server = setup_mock_server().await;
    mock_rpc_error(&server, "eth_requestAccounts", 4001, "User rejected").await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_accounts" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = Arc::new(assert_ok!(RpcClient::new(&server.uri())));
    let err = RpcWallet::new(client).connect().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WalletRejected);
}

#[tokio::test]
async fn test_rpc_wallet_without_accounts() {
    let server = setup_mock_server().await;
    mock_rpc_result(&server, "eth_requestAccounts", json!([])).await;

    let client = Arc::new(assert_ok!(RpcClient::new(&server.uri())));
    let err = RpcWallet::new(client).connect().await.unwrap_err();
    assert!(matches!(err, LedgerError::NotConnected));
}
