/*
[INPUT]:  Todo / market subcommands, Session, AppConfig
[OUTPUT]: Actions dispatched through the view-model and the rendered result
[POS]:    Binary CLI layer - one-shot renderer
[UPDATE]: When subcommands map to different actions or output
*/

use std::process::ExitCode;

use arc_task::app::event::Action;
use arc_task::app::state::{NoticeLevel, Screen};
use arc_task::{App, AppConfig, Session, render};
use arc_task_adapter::MarketAction;
use console::style;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{MarketCommand, TodoCommand};

/// Transaction links: explorer URLs against a real network, bare hashes otherwise
pub struct TxLinks {
    explorer: Option<AppConfig>,
}

impl TxLinks {
    pub fn new(config: &AppConfig, session: &Session) -> Self {
        let explorer = session.simulation().is_none().then(|| config.clone());
        Self { explorer }
    }

    pub fn url(&self, hash: &str) -> String {
        match &self.explorer {
            Some(config) => config.explorer_tx_url(hash),
            None => format!("tx {hash}"),
        }
    }
}

/// Print and drop the notices collected so far; `false` when any was an error
pub fn flush_notices(app: &mut App, links: &TxLinks) -> bool {
    let ok = !app
        .state()
        .notices
        .iter()
        .any(|notice| notice.level == NoticeLevel::Error);
    for notice in &app.state().notices {
        println!("{}", render::notice(notice, |hash| links.url(hash)));
    }
    ok
}

/// Connect the wallet and load the starting screen
pub async fn connect(app: &mut App, links: &TxLinks) -> bool {
    app.dispatch(Action::Connect).await;
    let ok = flush_notices(app, links) && app.state().account.is_some();
    app.dispatch(Action::DismissNotices).await;
    ok
}

/// Dispatch `actions` in order, each running to completion, then print the notices
pub async fn apply(app: &mut App, actions: Vec<Action>, links: &TxLinks) -> bool {
    for action in actions {
        debug!(?action, "cli dispatch");
        app.dispatch(action).await;
    }
    let ok = flush_notices(app, links);
    app.dispatch(Action::DismissNotices).await;
    ok
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

pub async fn run_todo(
    session: &Session,
    config: &AppConfig,
    command: TodoCommand,
    shutdown: CancellationToken,
) -> ExitCode {
    let links = TxLinks::new(config, session);
    let mut app = session.app(config, Screen::Todo, shutdown);
    if !connect(&mut app, &links).await {
        return ExitCode::FAILURE;
    }

    let stats_only = matches!(command, TodoCommand::Stats);
    let actions = match command {
        TodoCommand::List { filter } => vec![Action::SetTodoFilter(filter.into())],
        TodoCommand::Stats => Vec::new(),
        TodoCommand::Add {
            title,
            description,
            priority,
        } => vec![
            Action::EditTodoTitle(title),
            Action::EditTodoDescription(description),
            Action::SetTodoPriority(priority),
            Action::SubmitTodo,
        ],
        TodoCommand::Complete { id } => vec![Action::CompleteTodo(id)],
        TodoCommand::Delete { id } => vec![Action::DeleteTodo(id)],
    };
    let ok = apply(&mut app, actions, &links).await;

    if stats_only {
        match render::todo_stats(app.state()) {
            Some(stats) => println!("{stats}"),
            None => println!("{}", style("Stats unavailable.").yellow()),
        }
    } else {
        println!("{}", render::todo_list(app.state()));
    }
    exit_code(ok)
}

pub async fn run_market(
    session: &Session,
    config: &AppConfig,
    command: MarketCommand,
    shutdown: CancellationToken,
) -> ExitCode {
    let links = TxLinks::new(config, session);
    let mut app = session.app(config, Screen::Market, shutdown);
    if !connect(&mut app, &links).await {
        return ExitCode::FAILURE;
    }

    let balance_only = matches!(command, MarketCommand::Balance);
    let posting = matches!(command, MarketCommand::Post { .. });
    let transition = |action, id| vec![Action::Market { action, id }];
    let actions = match command {
        MarketCommand::List { mine } => {
            if mine {
                vec![Action::ToggleOnlyMine]
            } else {
                Vec::new()
            }
        }
        MarketCommand::Balance => Vec::new(),
        MarketCommand::Post {
            title,
            bounty,
            description,
        } => vec![
            Action::EditPostTitle(title),
            Action::EditPostDescription(description),
            Action::EditPostBounty(bounty),
            Action::SubmitPost,
        ],
        MarketCommand::Take { id } => transition(MarketAction::Take, id),
        MarketCommand::Complete { id } => transition(MarketAction::Complete, id),
        MarketCommand::Approve { id } => transition(MarketAction::Approve, id),
        MarketCommand::Cancel { id } => transition(MarketAction::Cancel, id),
    };
    let ok = apply(&mut app, actions, &links).await;

    if posting && let Some(line) = render::post_flow(&app.state().market.flow) {
        println!("{line}");
    }
    if balance_only {
        match render::balance_line(app.state()) {
            Some(line) => println!("{line}"),
            None => println!("{}", style("Balance unavailable.").yellow()),
        }
    } else {
        println!("{}", render::market_list(app.state()));
    }
    exit_code(ok)
}
