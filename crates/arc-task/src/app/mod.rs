/*
[INPUT]:  Actions from renderers and executed effects
[OUTPUT]: Updated AppState and the effects it requests; inline or spawned effect execution
[POS]:    View-model layer - unidirectional update cycle
[UPDATE]: When adding actions, effects or dispatch modes
*/

pub mod effect;
pub mod event;
pub mod market;
pub mod posting;
pub mod state;
pub mod todo;

use std::collections::VecDeque;

use arc_task_adapter::{ErrorKind, TxHash, short_address};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::sync::Confirmation;
use effect::{Effect, Executor};
use event::Action;
use state::{AppState, Failure, Notice, Screen, TxPurpose};

/// Reducer: apply `action` to `state` and return the effects to run
pub fn update(state: &mut AppState, action: Action) -> Vec<Effect> {
    match action {
        Action::Connect => {
            if state.connecting {
                return Vec::new();
            }
            state.connecting = true;
            vec![Effect::Connect]
        }
        Action::Connected(account) => {
            info!(%account, "wallet connected");
            state.connecting = false;
            state.account = Some(account);
            state.push_notice(Notice::info(
                None,
                format!("Connected as {}", short_address(&account)),
            ));
            load_screen(state, state.screen)
        }
        Action::ConnectFailed(failure) => {
            state.connecting = false;
            state.push_notice(Notice::error(None, &failure));
            Vec::new()
        }
        Action::SwitchScreen(screen) => {
            state.screen = screen;
            let loaded = match screen {
                Screen::Todo => state.todo.loaded || state.account.is_none(),
                Screen::Market => state.market.loaded,
            };
            if loaded {
                Vec::new()
            } else {
                load_screen(state, screen)
            }
        }
        Action::Refresh => load_screen(state, state.screen),
        Action::DismissNotices => {
            state.notices.clear();
            Vec::new()
        }
        Action::LoadFailed { screen, failure } => {
            match screen {
                Screen::Todo => state.todo.loading = false,
                Screen::Market => state.market.loading = false,
            }
            state.push_notice(Notice::error(Some(screen), &failure));
            Vec::new()
        }
        Action::TxSubmitted { screen, .. }
        | Action::TxRejected { screen, .. }
        | Action::TxSettled { screen, .. } => match screen {
            Screen::Todo => todo::update(state, action),
            Screen::Market => market::update(state, action),
        },
        Action::TodoLoaded { .. }
        | Action::EditTodoTitle(_)
        | Action::EditTodoDescription(_)
        | Action::SetTodoPriority(_)
        | Action::SetTodoFilter(_)
        | Action::SubmitTodo
        | Action::CompleteTodo(_)
        | Action::DeleteTodo(_) => todo::update(state, action),
        Action::MarketLoaded { .. }
        | Action::EditPostTitle(_)
        | Action::EditPostDescription(_)
        | Action::EditPostBounty(_)
        | Action::ToggleOnlyMine
        | Action::SubmitPost
        | Action::Market { .. } => market::update(state, action),
    }
}

fn load_screen(state: &mut AppState, screen: Screen) -> Vec<Effect> {
    match screen {
        Screen::Todo => todo::load(state),
        Screen::Market => market::load(state),
    }
}

/// Record a local validation failure; nothing is sent to the ledger
pub(crate) fn reject(state: &mut AppState, screen: Screen, message: impl Into<String>) -> Vec<Effect> {
    let failure = Failure::invalid(message);
    debug!(screen = screen.title(), reason = %failure, "request not sent");
    state.push_notice(Notice::error(Some(screen), &failure));
    Vec::new()
}

/// Notice for a terminal confirmation outcome
pub(crate) fn settle_notice(
    screen: Screen,
    purpose: &TxPurpose,
    hash: TxHash,
    confirmation: &Confirmation,
) -> Notice {
    let notice = match confirmation {
        Confirmation::Confirmed { block } => {
            Notice::success(screen, format!("{purpose} confirmed in block {block}"))
        }
        Confirmation::Failed { reason } => Notice::error(
            Some(screen),
            &Failure {
                kind: ErrorKind::LedgerRejected,
                message: format!("{purpose} failed: {reason}"),
            },
        ),
        Confirmation::TimedOut { waited_secs } => Notice::error(
            Some(screen),
            &Failure {
                kind: ErrorKind::Network,
                message: format!("{purpose} not confirmed after {waited_secs}s"),
            },
        ),
        Confirmation::Interrupted => {
            Notice::info(Some(screen), format!("{purpose}: stopped waiting for confirmation"))
        }
    };
    notice.with_tx(hash)
}

/// View-model plus the executor that runs its effects
pub struct App {
    state: AppState,
    executor: Executor,
}

impl App {
    pub fn new(state: AppState, executor: Executor) -> Self {
        Self { state, executor }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Apply `action` and run every resulting effect inline until the state settles
    pub async fn dispatch(&mut self, action: Action) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            for effect in update(&mut self.state, action) {
                queue.push_back(self.executor.perform(effect).await);
            }
        }
    }

    /// Apply `action`; effects run as tasks that report back on `actions`
    pub fn dispatch_detached(&mut self, action: Action, actions: &mpsc::UnboundedSender<Action>) {
        for effect in update(&mut self.state, action) {
            self.executor.spawn(effect, actions.clone());
        }
    }
}
