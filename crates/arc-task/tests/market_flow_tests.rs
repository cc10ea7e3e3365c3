/*
[INPUT]:  View-model driven against the simulated marketplace
[OUTPUT]: Test results for the two-phase post flow, lifecycle transitions and failure feedback
[POS]:    Integration tests - marketplace screen
[UPDATE]: When the post flow, marketplace reducer or feedback rules change
*/

mod common;

use arc_task::App;
use arc_task::app::event::Action;
use arc_task::app::posting::{PostFlow, PostStage};
use arc_task::app::state::{NoticeLevel, Screen};
use arc_task::sync::Confirmation;
use arc_task_adapter::{
    ContractCall, ErrorKind, LedgerClient, MarketAction, MiningMode, TaskId, TaskStatus,
};
use common::{app_as, connected, errors, funded_sim, policy, poster, pump, usdc, worker};
use rstest::rstest;
use tokio::sync::mpsc;

async fn fill_post_form(app: &mut App, title: &str, bounty: &str) {
    app.dispatch(Action::EditPostTitle(title.to_string())).await;
    app.dispatch(Action::EditPostDescription("Ship it".to_string()))
        .await;
    app.dispatch(Action::EditPostBounty(bounty.to_string())).await;
}

/// Post a 1.50 bounty through the view-model and return the new task id
async fn post_as_poster(client: &LedgerClient) -> (App, TaskId) {
    let mut app = connected(client, poster(), Screen::Market).await;
    fill_post_form(&mut app, "Write docs", "1.50").await;
    app.dispatch(Action::SubmitPost).await;
    let id = app.state().market.tasks.last().map(|task| task.id).unwrap();
    app.dispatch(Action::DismissNotices).await;
    (app, id)
}

fn status_of(app: &App, id: TaskId) -> TaskStatus {
    app.state().market.task(id).unwrap().status
}

#[tokio::test]
async fn test_post_flow_approves_then_posts_and_rereads() {
    let (sim, client) = funded_sim(MiningMode::Instant).await;
    let mut app = connected(&client, poster(), Screen::Market).await;
    assert_eq!(app.state().market.balance, Some(usdc("100")));

    fill_post_form(&mut app, "Write docs", "1.50").await;
    app.dispatch(Action::SubmitPost).await;

    let state = app.state();
    assert!(matches!(state.market.flow, PostFlow::Done { ref title, .. } if title == "Write docs"));
    assert_eq!(state.market.in_flight, None);
    assert_eq!(state.market.form, Default::default());
    assert_eq!(state.market.balance, Some(usdc("98.5")));
    assert_eq!(state.market.tasks.len(), 1);
    assert_eq!(state.market.tasks[0].bounty.units(), 1_500_000);
    assert_eq!(state.market.tasks[0].status, TaskStatus::Open);
    assert!(errors(state).is_empty());

    let calls = sim.submitted_calls().await;
    assert_eq!(calls.len(), 2);
    assert!(matches!(
        &calls[0],
        (from, ContractCall::ApproveSpend { spender, amount })
            if *from == poster()
                && *spender == client.contracts().marketplace
                && *amount == usdc("1.5")
    ));
    assert!(matches!(&calls[1].1, ContractCall::PostTask { title, .. } if title == "Write docs"));
}

#[tokio::test]
async fn test_post_is_never_submitted_before_approval_confirms() {
    let (sim, client) = funded_sim(MiningMode::Manual).await;
    let mut app = connected(&client, poster(), Screen::Market).await;
    fill_post_form(&mut app, "Write docs", "2").await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    app.dispatch_detached(Action::SubmitPost, &tx);

    let action = pump(&mut app, &tx, &mut rx).await;
    assert!(matches!(action, Action::TxSubmitted { screen: Screen::Market, .. }));
    assert_eq!(app.state().market.flow.label(), "AWAITING_APPROVAL");

    tokio::time::sleep(std::time::Duration::from_millis(40)).await;
    assert_eq!(sim.submitted_calls().await.len(), 1);
    assert_eq!(sim.pending_count().await, 1);
    assert!(rx.try_recv().is_err());

    assert_eq!(sim.mine().await, 1);
    let action = pump(&mut app, &tx, &mut rx).await;
    assert!(matches!(
        action,
        Action::TxSettled { confirmation: Confirmation::Confirmed { .. }, .. }
    ));
    assert_eq!(app.state().market.flow.label(), "APPROVAL_CONFIRMED");

    let action = pump(&mut app, &tx, &mut rx).await;
    assert!(matches!(action, Action::TxSubmitted { .. }));
    assert_eq!(app.state().market.flow.label(), "SUBMITTING_TASK");
    let calls = sim.submitted_calls().await;
    assert!(matches!(calls[1].1, ContractCall::PostTask { .. }));

    sim.mine().await;
    pump(&mut app, &tx, &mut rx).await;
    assert_eq!(app.state().market.flow.label(), "DONE");
    let action = pump(&mut app, &tx, &mut rx).await;
    assert!(matches!(action, Action::MarketLoaded { .. }));
    assert_eq!(app.state().market.tasks.len(), 1);
}

#[tokio::test]
async fn test_rejected_approval_never_posts() {
    let (sim, client) = funded_sim(MiningMode::Instant).await;
    let mut app = connected(&client, poster(), Screen::Market).await;
    fill_post_form(&mut app, "Write docs", "1.50").await;

    sim.reject_next_signature().await;
    app.dispatch(Action::SubmitPost).await;

    let state = app.state();
    assert!(matches!(
        state.market.flow,
        PostFlow::Failed { stage: PostStage::Approval, .. }
    ));
    assert_eq!(state.market.in_flight, None);
    let errors = errors(state);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, Some(ErrorKind::WalletRejected));
    assert!(sim.submitted_calls().await.is_empty());
    assert!(state.market.tasks.is_empty());
    // form kept so the user can retry
    assert_eq!(state.market.form.title, "Write docs");
    assert_eq!(sim.balance_of(poster()).await, usdc("100"));
}

#[tokio::test]
async fn test_approval_timeout_fails_flow_without_posting() {
    let (sim, client) = funded_sim(MiningMode::Manual).await;
    let mut app = app_as(&client, poster(), Screen::Market, policy(50));
    app.dispatch(Action::Connect).await;
    fill_post_form(&mut app, "Write docs", "1.50").await;

    app.dispatch(Action::SubmitPost).await;

    let state = app.state();
    assert!(matches!(
        state.market.flow,
        PostFlow::Failed { stage: PostStage::Approval, .. }
    ));
    let last = state.last_notice().unwrap();
    assert_eq!(last.kind, Some(ErrorKind::Network));
    assert!(last.tx_hash.is_some());
    let calls = sim.submitted_calls().await;
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0].1, ContractCall::ApproveSpend { .. }));
}

#[rstest]
#[case::exceeds_balance("250", "exceeds your balance")]
#[case::zero("0", "Bounty")]
#[case::below_one_unit("0.0000001", "Bounty")]
#[case::not_a_number("lots", "Bounty")]
#[tokio::test]
async fn test_invalid_bounty_is_refused_locally(#[case] bounty: &str, #[case] expected: &str) {
    let (sim, client) = funded_sim(MiningMode::Instant).await;
    let mut app = connected(&client, poster(), Screen::Market).await;
    fill_post_form(&mut app, "Write docs", bounty).await;

    app.dispatch(Action::SubmitPost).await;

    let state = app.state();
    assert_eq!(state.market.flow, PostFlow::Idle);
    let last = state.last_notice().unwrap();
    assert_eq!(last.kind, Some(ErrorKind::Invalid));
    assert!(last.message.contains(expected), "{}", last.message);
    assert!(sim.submitted_calls().await.is_empty());
}

#[tokio::test]
async fn test_full_lifecycle_pays_the_worker() {
    let (sim, client) = funded_sim(MiningMode::Instant).await;
    let (mut poster_app, id) = post_as_poster(&client).await;

    let mut worker_app = connected(&client, worker(), Screen::Market).await;
    let task = worker_app.state().market.task(id).unwrap();
    assert_eq!(
        worker_app.state().market.controls(task, Some(worker())),
        vec![MarketAction::Take]
    );

    worker_app
        .dispatch(Action::Market { action: MarketAction::Take, id })
        .await;
    assert_eq!(status_of(&worker_app, id), TaskStatus::InProgress);
    assert_eq!(
        worker_app.state().market.task(id).unwrap().worker,
        Some(worker())
    );

    worker_app
        .dispatch(Action::Market { action: MarketAction::Complete, id })
        .await;
    assert_eq!(status_of(&worker_app, id), TaskStatus::Completed);

    poster_app.dispatch(Action::Refresh).await;
    let task = poster_app.state().market.task(id).unwrap();
    assert_eq!(
        poster_app.state().market.controls(task, Some(poster())),
        vec![MarketAction::Approve]
    );
    poster_app
        .dispatch(Action::Market { action: MarketAction::Approve, id })
        .await;
    assert_eq!(status_of(&poster_app, id), TaskStatus::Approved);
    assert!(errors(poster_app.state()).is_empty());

    assert_eq!(sim.balance_of(worker()).await, usdc("6.5"));
    assert!(sim.balance_of(client.contracts().marketplace).await.is_zero());

    worker_app.dispatch(Action::Refresh).await;
    assert_eq!(worker_app.state().market.balance, Some(usdc("6.5")));
    let task = worker_app.state().market.task(id).unwrap();
    assert!(worker_app.state().market.controls(task, Some(worker())).is_empty());
}

#[tokio::test]
async fn test_cancel_refunds_and_blocks_take() {
    let (sim, client) = funded_sim(MiningMode::Instant).await;
    let (mut poster_app, id) = post_as_poster(&client).await;
    let mut worker_app = connected(&client, worker(), Screen::Market).await;

    poster_app
        .dispatch(Action::Market { action: MarketAction::Cancel, id })
        .await;
    assert_eq!(status_of(&poster_app, id), TaskStatus::Cancelled);
    assert_eq!(poster_app.state().market.balance, Some(usdc("100")));

    // worker still sees the task as open and submits anyway
    assert_eq!(status_of(&worker_app, id), TaskStatus::Open);
    worker_app
        .dispatch(Action::Market { action: MarketAction::Take, id })
        .await;

    let state = worker_app.state();
    let errors = errors(state);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, Some(ErrorKind::LedgerRejected));
    assert!(errors[0].message.starts_with(&format!("Take task #{id} failed")));
    assert!(errors[0].tx_hash.is_some());
    assert_eq!(state.market.in_flight, None);
    assert_eq!(status_of(&worker_app, id), TaskStatus::Cancelled);

    // after the re-read the take is refused before reaching the ledger
    let submitted = sim.submitted_calls().await.len();
    worker_app.dispatch(Action::DismissNotices).await;
    worker_app
        .dispatch(Action::Market { action: MarketAction::Take, id })
        .await;
    let last = worker_app.state().last_notice().unwrap();
    assert_eq!(last.level, NoticeLevel::Error);
    assert_eq!(last.kind, Some(ErrorKind::Invalid));
    assert_eq!(sim.submitted_calls().await.len(), submitted);
}

#[tokio::test]
async fn test_poster_cannot_take_own_task() {
    let (sim, client) = funded_sim(MiningMode::Instant).await;
    let (mut poster_app, id) = post_as_poster(&client).await;
    let submitted = sim.submitted_calls().await.len();

    poster_app
        .dispatch(Action::Market { action: MarketAction::Take, id })
        .await;

    let last = poster_app.state().last_notice().unwrap();
    assert_eq!(last.kind, Some(ErrorKind::Invalid));
    assert_eq!(sim.submitted_calls().await.len(), submitted);
    assert_eq!(status_of(&poster_app, id), TaskStatus::Open);
}

#[tokio::test]
async fn test_marketplace_write_blocked_while_in_flight() {
    let (sim, client) = funded_sim(MiningMode::Manual).await;
    let mut poster_app = connected(&client, poster(), Screen::Market).await;
    fill_post_form(&mut poster_app, "Write docs", "1").await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    poster_app.dispatch_detached(Action::SubmitPost, &tx);
    pump(&mut poster_app, &tx, &mut rx).await;
    let in_flight = poster_app.state().market.in_flight.clone().unwrap();
    assert!(in_flight.tx.is_some());
    assert_eq!(in_flight.phase(), "confirming");

    poster_app.dispatch(Action::SubmitPost).await;
    let last = poster_app.state().last_notice().unwrap();
    assert_eq!(last.kind, Some(ErrorKind::Invalid));
    assert!(last.message.contains("still confirming"), "{}", last.message);
    assert_eq!(sim.submitted_calls().await.len(), 1);
}

#[tokio::test]
async fn test_only_mine_filters_listing() {
    let (_sim, client) = funded_sim(MiningMode::Instant).await;
    let (_poster_app, _id) = post_as_poster(&client).await;
    let mut worker_app = connected(&client, worker(), Screen::Market).await;

    assert_eq!(worker_app.state().market.visible_tasks(Some(worker())).len(), 1);
    worker_app.dispatch(Action::ToggleOnlyMine).await;
    assert!(worker_app.state().market.visible_tasks(Some(worker())).is_empty());
}
