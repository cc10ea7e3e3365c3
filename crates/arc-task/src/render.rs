/*
[INPUT]:  AppState snapshots
[OUTPUT]: Styled plain-text listings, stats, balances and notices for the CLI
[POS]:    Presentation - one-shot console renderer over the view-model
[UPDATE]: When listing columns or notice formatting change
*/

use arc_task_adapter::{MarketTask, TaskStatus, TodoTask, short_address};
use console::{StyledObject, style};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::posting::PostFlow;
use crate::app::state::{AppState, Notice, NoticeLevel};

const TITLE_WIDTH: usize = 32;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Cut `text` to at most `width` display columns, marking the cut with `…`
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

fn timestamp(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value
        .map(|time| time.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn status_style(status: TaskStatus) -> StyledObject<&'static str> {
    let label = style(status.label());
    match status {
        TaskStatus::Open => label.cyan(),
        TaskStatus::InProgress => label.yellow(),
        TaskStatus::Completed => label.blue(),
        TaskStatus::Approved => label.green(),
        TaskStatus::Cancelled => label.dim(),
    }
}

fn todo_row(task: &TodoTask) -> String {
    let mark = if task.completed {
        style("[x]").green()
    } else {
        style("[ ]").yellow()
    };
    format!(
        "{mark} #{:<4} {} {:<6} {}",
        task.id,
        pad(&task.title, TITLE_WIDTH),
        task.priority.label(),
        style(timestamp(task.created_at_utc())).dim()
    )
}

/// Own todo tasks after the active filter, followed by the stats line
pub fn todo_list(state: &AppState) -> String {
    let mut lines = Vec::new();
    let tasks: Vec<&TodoTask> = state.todo.visible_tasks().collect();
    if tasks.is_empty() {
        lines.push(style("No tasks found.").yellow().to_string());
    }
    for task in tasks {
        lines.push(todo_row(task));
        if !task.description.is_empty() {
            lines.push(format!("       {}", style(&task.description).dim()));
        }
    }
    if let Some(stats) = todo_stats(state) {
        lines.push(String::new());
        lines.push(stats);
    }
    lines.join("\n")
}

pub fn todo_stats(state: &AppState) -> Option<String> {
    let stats = state.todo.stats?;
    Some(format!(
        "{} total {}  completed {}  pending {}",
        style("Stats:").bold(),
        stats.total,
        style(stats.completed).green(),
        style(stats.pending).yellow()
    ))
}

fn market_row(state: &AppState, task: &MarketTask) -> String {
    let worker = task
        .worker
        .map(|worker| short_address(&worker))
        .unwrap_or_else(|| "-".to_string());
    let mine = match state.account {
        Some(account) if task.is_poster(account) => style(" (posted)").magenta().to_string(),
        Some(account) if task.is_worker(account) => style(" (working)").magenta().to_string(),
        _ => String::new(),
    };
    format!(
        "#{:<4} {} {:>14}  {:<11}  poster {}  worker {}{}",
        task.id,
        pad(&task.title, TITLE_WIDTH),
        state.format_amount(task.bounty),
        status_style(task.status),
        short_address(&task.poster),
        worker,
        mine
    )
}

/// Marketplace listing with the controls the connected account may use
pub fn market_list(state: &AppState) -> String {
    let mut lines = Vec::new();
    let tasks = state.market.visible_tasks(state.account);
    if tasks.is_empty() {
        lines.push(style("No tasks found.").yellow().to_string());
    }
    for task in tasks {
        lines.push(market_row(state, task));
        let controls = state.market.controls(task, state.account);
        if !controls.is_empty() {
            let labels: Vec<&str> = controls.iter().map(|action| action.label()).collect();
            lines.push(format!("       {} {}", style("actions:").dim(), labels.join(", ")));
        }
    }
    if let Some(balance) = balance_line(state) {
        lines.push(String::new());
        lines.push(balance);
    }
    lines.join("\n")
}

pub fn balance_line(state: &AppState) -> Option<String> {
    let balance = state.market.balance?;
    Some(format!(
        "{} {}",
        style("Balance:").bold(),
        style(state.format_amount(balance)).green()
    ))
}

/// Current phase of the two-step post flow, when one has run
pub fn post_flow(flow: &PostFlow) -> Option<String> {
    match flow {
        PostFlow::Idle => None,
        PostFlow::Done { title, .. } => Some(format!(
            "{} {} \"{title}\"",
            style("Post:").bold(),
            style(flow.label()).green()
        )),
        PostFlow::Failed { stage, reason } => Some(format!(
            "{} {} during {stage}: {reason}",
            style("Post:").bold(),
            style(flow.label()).red()
        )),
        _ => Some(format!(
            "{} {}",
            style("Post:").bold(),
            style(flow.label()).yellow()
        )),
    }
}

/// One notice, with a hint line for classified errors
pub fn notice(notice: &Notice, explorer: impl Fn(&str) -> String) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => style("info").cyan(),
        NoticeLevel::Success => style("ok").green(),
        NoticeLevel::Error => style("error").red(),
    };
    let mut line = format!("[{tag}] {}", notice.message);
    if let Some(hash) = notice.tx_hash {
        line.push_str(&format!(
            "\n       {}",
            style(explorer(&hash.to_string())).dim()
        ));
    }
    if notice.level == NoticeLevel::Error
        && let Some(hint) = notice.hint()
    {
        line.push_str(&format!("\n       {}", style(hint).italic()));
    }
    line
}
