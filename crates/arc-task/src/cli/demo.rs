/*
[INPUT]:  AppConfig (token display), shutdown token
[OUTPUT]: Narrated post / take / complete / approve run on the simulated ledger
[POS]:    Binary CLI layer - offline walkthrough of the bounty marketplace
[UPDATE]: When the marketplace flow or demo accounts change
*/

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use arc_task::app::event::Action;
use arc_task::app::state::Screen;
use arc_task::session::{DEV_ACCOUNT, SAMPLE_WORKER};
use arc_task::{App, AppConfig, Session, render};
use arc_task_adapter::{MarketAction, MiningMode, StaticWallet, TaskId};
use console::style;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::commands::{TxLinks, apply, connect};

const DEMO_TITLE: &str = "Write release notes";
const DEMO_BOUNTY: &str = "1.50";
const DEMO_POLL_INTERVAL_MS: u64 = 100;

fn heading(step: usize, text: &str) {
    println!("\n{} {}", style(format!("[{step}]")).bold().cyan(), style(text).bold());
}

fn posted_task_id(app: &App) -> Option<TaskId> {
    app.state()
        .market
        .tasks
        .iter()
        .filter(|task| task.poster == DEV_ACCOUNT && task.title == DEMO_TITLE)
        .map(|task| task.id)
        .max()
}

pub async fn run_demo(config: &AppConfig, shutdown: CancellationToken) -> Result<ExitCode> {
    let mut config = config.clone();
    config.sync.poll_interval_ms = DEMO_POLL_INTERVAL_MS;

    let session = Session::simulated(MiningMode::AfterPolls(2))
        .await
        .context("start simulated ledger")?;
    let links = TxLinks::new(&config, &session);
    let mut poster = session.app(&config, Screen::Market, shutdown.clone());
    let mut worker = session.app_for(
        Arc::new(StaticWallet::new(SAMPLE_WORKER)),
        &config,
        Screen::Market,
        shutdown,
    );

    println!("{}", style("arc-task marketplace demo (simulated ledger)").bold().cyan());

    heading(1, "Poster connects and posts a task");
    if !connect(&mut poster, &links).await {
        return Ok(ExitCode::FAILURE);
    }
    let post = vec![
        Action::EditPostTitle(DEMO_TITLE.to_string()),
        Action::EditPostDescription("Summarize the changes since the last tag".to_string()),
        Action::EditPostBounty(DEMO_BOUNTY.to_string()),
        Action::SubmitPost,
    ];
    let posted = apply(&mut poster, post, &links).await;
    if let Some(line) = render::post_flow(&poster.state().market.flow) {
        println!("{line}");
    }
    let Some(id) = posted_task_id(&poster).filter(|_| posted) else {
        println!("{}", style("Posting failed; stopping.").red());
        return Ok(ExitCode::FAILURE);
    };
    info!(task_id = id, "demo task posted");

    heading(2, "Worker takes and completes the task");
    if !connect(&mut worker, &links).await {
        return Ok(ExitCode::FAILURE);
    }
    let work = vec![
        Action::Market {
            action: MarketAction::Take,
            id,
        },
        Action::Market {
            action: MarketAction::Complete,
            id,
        },
    ];
    if !apply(&mut worker, work, &links).await {
        return Ok(ExitCode::FAILURE);
    }

    heading(3, "Poster approves and releases the bounty");
    let approve = vec![
        Action::Refresh,
        Action::Market {
            action: MarketAction::Approve,
            id,
        },
    ];
    if !apply(&mut poster, approve, &links).await {
        return Ok(ExitCode::FAILURE);
    }

    heading(4, "Final state");
    apply(&mut worker, vec![Action::Refresh], &links).await;
    println!("{}", render::market_list(poster.state()));
    if let Some(balance) = render::balance_line(worker.state()) {
        println!("worker {balance}");
    }
    Ok(ExitCode::SUCCESS)
}
