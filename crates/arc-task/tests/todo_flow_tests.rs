/*
[INPUT]:  View-model driven against the simulated todo list
[OUTPUT]: Test results for create / complete / delete, session errors and in-flight rules
[POS]:    Integration tests - todo screen and session actions
[UPDATE]: When the todo reducer, connection handling or feedback rules change
*/

mod common;

use std::sync::Arc;

use arc_task::App;
use arc_task::app::event::Action;
use arc_task::app::state::{NoticeLevel, Screen, TodoFilter};
use arc_task::sync::Confirmation;
use arc_task_adapter::{
    ContractCall, ErrorKind, LedgerClient, MiningMode, Priority, StaticWallet, TaskId,
};
use common::{app_with_wallet, connected, errors, funded_sim, policy, poster, pump};
use tokio::sync::mpsc;
use tokio_test::assert_ok;

async fn create(app: &mut App, title: &str, priority: Priority) {
    app.dispatch(Action::EditTodoTitle(title.to_string())).await;
    app.dispatch(Action::EditTodoDescription("from the test".to_string()))
        .await;
    app.dispatch(Action::SetTodoPriority(priority)).await;
    app.dispatch(Action::SubmitTodo).await;
}

async fn todo_app_with_task(client: &LedgerClient) -> (App, TaskId) {
    let mut app = connected(client, poster(), Screen::Todo).await;
    create(&mut app, "Buy milk", Priority::High).await;
    let id = app.state().todo.tasks[0].id;
    app.dispatch(Action::DismissNotices).await;
    (app, id)
}

#[tokio::test]
async fn test_create_confirms_and_rereads() {
    let (sim, client) = funded_sim(MiningMode::Instant).await;
    let mut app = connected(&client, poster(), Screen::Todo).await;
    assert!(app.state().todo.loaded);
    assert!(app.state().todo.tasks.is_empty());

    create(&mut app, "  Buy milk  ", Priority::High).await;

    let state = app.state();
    assert_eq!(state.todo.tasks.len(), 1);
    let task = &state.todo.tasks[0];
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description, "from the test");
    assert_eq!(task.priority, Priority::High);
    assert!(!task.completed);
    let stats = state.todo.stats.unwrap();
    assert_eq!((stats.total, stats.completed, stats.pending), (1, 0, 1));
    assert_eq!(state.todo.form, Default::default());
    assert_eq!(state.todo.in_flight, None);

    let last = state.last_notice().unwrap();
    assert_eq!(last.level, NoticeLevel::Success);
    assert!(last.message.starts_with("Create task \"Buy milk\" confirmed in block"));
    assert!(last.tx_hash.is_some());

    let calls = sim.submitted_calls().await;
    assert!(matches!(&calls[..], [(from, ContractCall::CreateTodo { .. })] if *from == poster()));
}

#[tokio::test]
async fn test_complete_once_then_refused() {
    let (sim, client) = funded_sim(MiningMode::Instant).await;
    let (mut app, id) = todo_app_with_task(&client).await;

    app.dispatch(Action::CompleteTodo(id)).await;
    let state = app.state();
    assert!(state.todo.task(id).unwrap().completed);
    let stats = state.todo.stats.unwrap();
    assert_eq!((stats.total, stats.completed, stats.pending), (1, 1, 0));
    assert!(!state.todo.can_complete(state.todo.task(id).unwrap()));
    assert!(errors(state).is_empty());

    let submitted = sim.submitted_calls().await.len();
    app.dispatch(Action::CompleteTodo(id)).await;
    let last = app.state().last_notice().unwrap();
    assert_eq!(last.kind, Some(ErrorKind::Invalid));
    assert_eq!(sim.submitted_calls().await.len(), submitted);
}

#[tokio::test]
async fn test_delete_removes_task_and_updates_stats() {
    let (_sim, client) = funded_sim(MiningMode::Instant).await;
    let (mut app, id) = todo_app_with_task(&client).await;
    create(&mut app, "Walk dog", Priority::Low).await;
    assert_eq!(app.state().todo.tasks.len(), 2);

    app.dispatch(Action::DeleteTodo(id)).await;

    let state = app.state();
    assert!(state.todo.task(id).is_none());
    assert_eq!(state.todo.tasks.len(), 1);
    assert_eq!(state.todo.tasks[0].title, "Walk dog");
    assert_eq!(state.todo.stats.unwrap().total, 1);
}

#[tokio::test]
async fn test_filter_selects_visible_tasks() {
    let (_sim, client) = funded_sim(MiningMode::Instant).await;
    let (mut app, id) = todo_app_with_task(&client).await;
    create(&mut app, "Walk dog", Priority::Low).await;
    app.dispatch(Action::CompleteTodo(id)).await;

    app.dispatch(Action::SetTodoFilter(TodoFilter::Completed)).await;
    let titles: Vec<_> = app.state().todo.visible_tasks().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Buy milk"]);

    app.dispatch(Action::SetTodoFilter(TodoFilter::Pending)).await;
    let titles: Vec<_> = app.state().todo.visible_tasks().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Walk dog"]);
}

#[tokio::test]
async fn test_wallet_rejection_keeps_form_and_skips_polling() {
    let (sim, client) = funded_sim(MiningMode::Instant).await;
    let mut app = connected(&client, poster(), Screen::Todo).await;

    sim.reject_next_signature().await;
    create(&mut app, "Buy milk", Priority::Medium).await;

    let state = app.state();
    assert_eq!(state.todo.in_flight, None);
    assert_eq!(state.todo.form.title, "Buy milk");
    assert!(state.todo.tasks.is_empty());
    let last = state.last_notice().unwrap();
    assert_eq!(last.kind, Some(ErrorKind::WalletRejected));
    assert_eq!(last.tx_hash, None);
    assert!(last.hint().unwrap().contains("rejected in the wallet"));
    assert!(sim.submitted_calls().await.is_empty());
}

#[tokio::test]
async fn test_blank_title_is_refused() {
    let (sim, client) = funded_sim(MiningMode::Instant).await;
    let mut app = connected(&client, poster(), Screen::Todo).await;

    create(&mut app, "   ", Priority::Low).await;

    let last = app.state().last_notice().unwrap();
    assert_eq!(last.kind, Some(ErrorKind::Invalid));
    assert_eq!(last.message, "Title is required");
    assert!(sim.submitted_calls().await.is_empty());
}

#[tokio::test]
async fn test_writes_require_a_connected_wallet() {
    let (sim, client) = funded_sim(MiningMode::Instant).await;
    let wallet = Arc::new(StaticWallet::new(poster()));
    let mut app = app_with_wallet(&client, wallet, Screen::Todo, policy(1_000));

    create(&mut app, "Buy milk", Priority::Low).await;

    let last = app.state().last_notice().unwrap();
    assert_eq!(last.kind, Some(ErrorKind::Invalid));
    assert_eq!(last.message, "Connect a wallet first");
    assert!(sim.submitted_calls().await.is_empty());
}

#[tokio::test]
async fn test_refused_connection_reports_wallet_rejection() {
    let (_sim, client) = funded_sim(MiningMode::Instant).await;
    let wallet = Arc::new(StaticWallet::new(poster()));
    wallet.set_rejecting(true);
    let mut app = app_with_wallet(&client, wallet.clone(), Screen::Todo, policy(1_000));

    app.dispatch(Action::Connect).await;
    let state = app.state();
    assert_eq!(state.account, None);
    assert!(!state.connecting);
    assert_eq!(state.last_notice().unwrap().kind, Some(ErrorKind::WalletRejected));

    wallet.set_rejecting(false);
    app.dispatch(Action::Connect).await;
    assert_eq!(app.state().account, Some(poster()));
    assert!(app.state().todo.loaded);
}

#[tokio::test]
async fn test_read_failure_is_reported_as_network() {
    let (sim, client) = funded_sim(MiningMode::Instant).await;
    let mut app = connected(&client, poster(), Screen::Todo).await;

    sim.set_offline(true).await;
    app.dispatch(Action::Refresh).await;

    let state = app.state();
    assert!(!state.todo.loading);
    let last = state.last_notice().unwrap();
    assert_eq!(last.level, NoticeLevel::Error);
    assert_eq!(last.kind, Some(ErrorKind::Network));
}

#[tokio::test]
async fn test_switching_screens_loads_marketplace_once() {
    let (_sim, client) = funded_sim(MiningMode::Instant).await;
    let mut app = connected(&client, poster(), Screen::Todo).await;
    assert!(!app.state().market.loaded);

    app.dispatch(Action::SwitchScreen(Screen::Market)).await;
    assert_eq!(app.state().screen, Screen::Market);
    assert!(app.state().market.loaded);
    assert!(app.state().market.balance.is_some());
}

#[tokio::test]
async fn test_second_write_blocked_while_confirming() {
    let (sim, client) = funded_sim(MiningMode::Manual).await;
    let mut app = connected(&client, poster(), Screen::Todo).await;
    app.dispatch(Action::EditTodoTitle("Buy milk".to_string())).await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    app.dispatch_detached(Action::SubmitTodo, &tx);
    pump(&mut app, &tx, &mut rx).await;
    assert_eq!(app.state().todo.in_flight.as_ref().unwrap().phase(), "confirming");

    app.dispatch(Action::SubmitTodo).await;
    let last = app.state().last_notice().unwrap();
    assert_eq!(last.kind, Some(ErrorKind::Invalid));
    assert!(last.message.contains("still confirming"), "{}", last.message);
    assert_eq!(sim.submitted_calls().await.len(), 1);

    // the marketplace keeps its own in-flight flag
    assert!(app.state().in_flight(Screen::Market).is_none());

    sim.mine().await;
    let action = pump(&mut app, &tx, &mut rx).await;
    assert!(matches!(
        action,
        Action::TxSettled { confirmation: Confirmation::Confirmed { .. }, .. }
    ));
    assert_eq!(app.state().todo.in_flight, None);
}

#[tokio::test]
async fn test_shutdown_interrupts_confirmation_without_reread() {
    let (_sim, client) = funded_sim(MiningMode::Manual).await;
    let mut app = connected(&client, poster(), Screen::Todo).await;
    app.dispatch(Action::EditTodoTitle("Buy milk".to_string())).await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    app.dispatch_detached(Action::SubmitTodo, &tx);
    pump(&mut app, &tx, &mut rx).await;

    app.executor().shutdown_token().cancel();
    let action = pump(&mut app, &tx, &mut rx).await;
    assert!(matches!(
        action,
        Action::TxSettled { confirmation: Confirmation::Interrupted, .. }
    ));

    let state = app.state();
    assert_eq!(state.todo.in_flight, None);
    assert_eq!(state.last_notice().unwrap().level, NoticeLevel::Info);
    assert!(!state.todo.loading);
    assert!(rx.try_recv().is_err());
    assert_ok!(client.todo_tasks(poster()).await);
}
