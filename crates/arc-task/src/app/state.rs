/*
[INPUT]:  Reducer mutations driven by actions
[OUTPUT]: Serializable view-model consumed by the CLI and TUI renderers
[POS]:    View-model layer - screen state, forms, in-flight flags, notices
[UPDATE]: When adding screen fields or derived view helpers
*/

use std::fmt;

use arc_task_adapter::lifecycle::TaskLifecycle;
use arc_task_adapter::{
    Address, ErrorKind, LedgerError, MarketAction, MarketTask, Priority, TOKEN_DECIMALS, TaskId,
    TaskStats, TodoTask, TokenAmount, TxHash,
};
use serde::{Deserialize, Serialize};

use crate::app::posting::PostFlow;

/// Maximum notices retained for display
pub const NOTICE_HISTORY: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Todo,
    Market,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Todo => "Todo",
            Screen::Market => "Marketplace",
        }
    }
}

/// A classified failure carried as data through the reducer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl Failure {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Invalid,
            message: message.into(),
        }
    }
}

impl From<&LedgerError> for Failure {
    fn from(err: &LedgerError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<LedgerError> for Failure {
    fn from(err: LedgerError) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// User-facing feedback line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub screen: Option<Screen>,
    /// Set for errors; selects the hint shown next to the message
    pub kind: Option<ErrorKind>,
    pub message: String,
    pub tx_hash: Option<TxHash>,
}

impl Notice {
    pub fn info(screen: Option<Screen>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            screen,
            kind: None,
            message: message.into(),
            tx_hash: None,
        }
    }

    pub fn success(screen: Screen, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            screen: Some(screen),
            kind: None,
            message: message.into(),
            tx_hash: None,
        }
    }

    pub fn error(screen: Option<Screen>, failure: &Failure) -> Self {
        Self {
            level: NoticeLevel::Error,
            screen,
            kind: Some(failure.kind),
            message: failure.message.clone(),
            tx_hash: None,
        }
    }

    pub fn with_tx(mut self, hash: TxHash) -> Self {
        self.tx_hash = Some(hash);
        self
    }

    pub fn hint(&self) -> Option<&'static str> {
        self.kind.map(ErrorKind::hint)
    }
}

/// What a pending transaction is for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "purpose", rename_all = "snake_case")]
pub enum TxPurpose {
    CreateTodo { title: String },
    CompleteTodo { id: TaskId },
    DeleteTodo { id: TaskId },
    ApproveBounty { bounty: TokenAmount },
    PostTask { title: String },
    Market { action: MarketAction, id: TaskId },
}

impl fmt::Display for TxPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxPurpose::CreateTodo { title } => write!(f, "Create task \"{title}\""),
            TxPurpose::CompleteTodo { id } => write!(f, "Complete task #{id}"),
            TxPurpose::DeleteTodo { id } => write!(f, "Delete task #{id}"),
            TxPurpose::ApproveBounty { bounty } => write!(f, "Approve {bounty} bounty"),
            TxPurpose::PostTask { title } => write!(f, "Post task \"{title}\""),
            TxPurpose::Market { action, id } => {
                let verb = match action {
                    MarketAction::Take => "Take",
                    MarketAction::Cancel => "Cancel",
                    MarketAction::Complete => "Complete",
                    MarketAction::Approve => "Approve",
                };
                write!(f, "{verb} task #{id}")
            }
        }
    }
}

/// Screen-global "transaction in flight" marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InFlight {
    pub purpose: TxPurpose,
    /// `None` while the wallet is signing
    pub tx: Option<TxHash>,
}

impl InFlight {
    pub fn signing(purpose: TxPurpose) -> Self {
        Self { purpose, tx: None }
    }

    pub fn phase(&self) -> &'static str {
        if self.tx.is_some() {
            "confirming"
        } else {
            "awaiting signature"
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TodoFilter {
    pub fn matches(self, task: &TodoTask) -> bool {
        match self {
            TodoFilter::All => true,
            TodoFilter::Pending => !task.completed,
            TodoFilter::Completed => task.completed,
        }
    }

    pub fn next(self) -> Self {
        match self {
            TodoFilter::All => TodoFilter::Pending,
            TodoFilter::Pending => TodoFilter::Completed,
            TodoFilter::Completed => TodoFilter::All,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoScreen {
    pub tasks: Vec<TodoTask>,
    pub stats: Option<TaskStats>,
    pub loaded: bool,
    pub loading: bool,
    pub filter: TodoFilter,
    pub form: TodoForm,
    pub in_flight: Option<InFlight>,
}

impl TodoScreen {
    pub fn visible_tasks(&self) -> impl Iterator<Item = &TodoTask> {
        self.tasks.iter().filter(|task| self.filter.matches(task))
    }

    pub fn task(&self, id: TaskId) -> Option<&TodoTask> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// "complete" is offered once per task and never while a transaction is in flight
    pub fn can_complete(&self, task: &TodoTask) -> bool {
        self.in_flight.is_none() && !task.completed
    }

    pub fn can_delete(&self, _task: &TodoTask) -> bool {
        self.in_flight.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub description: String,
    /// Human-entered bounty, parsed at submission
    pub bounty: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketScreen {
    pub tasks: Vec<MarketTask>,
    pub balance: Option<TokenAmount>,
    pub loaded: bool,
    pub loading: bool,
    pub only_mine: bool,
    pub form: PostForm,
    pub flow: PostFlow,
    pub in_flight: Option<InFlight>,
}

impl MarketScreen {
    pub fn visible_tasks(&self, account: Option<Address>) -> Vec<&MarketTask> {
        self.tasks
            .iter()
            .filter(|task| match (self.only_mine, account) {
                (true, Some(account)) => task.involves(account),
                (true, None) => false,
                (false, _) => true,
            })
            .collect()
    }

    pub fn task(&self, id: TaskId) -> Option<&MarketTask> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Controls offered for `task`; empty while disconnected or while a transaction is in flight
    pub fn controls(&self, task: &MarketTask, account: Option<Address>) -> Vec<MarketAction> {
        match account {
            Some(account) if self.in_flight.is_none() => {
                TaskLifecycle::of(task).allowed_actions(account)
            }
            _ => Vec::new(),
        }
    }
}

/// Complete view-model of both screens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub screen: Screen,
    pub account: Option<Address>,
    pub connecting: bool,
    pub token_symbol: String,
    pub token_decimals: u32,
    pub todo: TodoScreen,
    pub market: MarketScreen,
    pub notices: Vec<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Screen::Todo)
    }
}

impl AppState {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            account: None,
            connecting: false,
            token_symbol: "USDC".to_string(),
            token_decimals: TOKEN_DECIMALS,
            todo: TodoScreen::default(),
            market: MarketScreen::default(),
            notices: Vec::new(),
        }
    }

    pub fn with_token(mut self, symbol: impl Into<String>, decimals: u32) -> Self {
        self.token_symbol = symbol.into();
        self.token_decimals = decimals;
        self
    }

    pub fn in_flight(&self, screen: Screen) -> Option<&InFlight> {
        match screen {
            Screen::Todo => self.todo.in_flight.as_ref(),
            Screen::Market => self.market.in_flight.as_ref(),
        }
    }

    pub fn format_amount(&self, amount: TokenAmount) -> String {
        format!("{} {}", amount.display(self.token_decimals), self.token_symbol)
    }

    pub fn push_notice(&mut self, notice: Notice) {
        if self.notices.len() >= NOTICE_HISTORY {
            self.notices.remove(0);
        }
        self.notices.push(notice);
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }
}
