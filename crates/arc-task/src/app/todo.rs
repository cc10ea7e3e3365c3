/*
[INPUT]:  Todo-screen actions and transaction results
[OUTPUT]: Todo screen mutations plus submit / confirm / re-read effects
[POS]:    View-model layer - todo screen reducer
[UPDATE]: When todo operations or their validation change
*/

use arc_task_adapter::lifecycle::{TodoAction, check_todo};
use arc_task_adapter::{Address, ContractCall, TaskId, TxHash};
use tracing::{debug, warn};

use crate::app::effect::Effect;
use crate::app::event::Action;
use crate::app::state::{AppState, InFlight, Notice, Screen, TodoForm, TxPurpose};
use crate::app::{reject, settle_notice};
use crate::sync::Confirmation;

pub(super) fn load(state: &mut AppState) -> Vec<Effect> {
    let Some(account) = state.account else {
        return reject(state, Screen::Todo, "Connect a wallet to load your tasks");
    };
    state.todo.loading = true;
    vec![Effect::LoadTodo { account }]
}

pub(super) fn update(state: &mut AppState, action: Action) -> Vec<Effect> {
    match action {
        Action::TodoLoaded { tasks, stats } => {
            if !stats.is_consistent() {
                warn!(?stats, "ledger returned inconsistent stats");
            }
            state.todo.tasks = tasks;
            state.todo.stats = Some(stats);
            state.todo.loaded = true;
            state.todo.loading = false;
            Vec::new()
        }
        Action::EditTodoTitle(title) => {
            state.todo.form.title = title;
            Vec::new()
        }
        Action::EditTodoDescription(description) => {
            state.todo.form.description = description;
            Vec::new()
        }
        Action::SetTodoPriority(priority) => {
            state.todo.form.priority = priority;
            Vec::new()
        }
        Action::SetTodoFilter(filter) => {
            state.todo.filter = filter;
            Vec::new()
        }
        Action::SubmitTodo => submit_create(state),
        Action::CompleteTodo(id) => submit_existing(state, id, TodoAction::Complete),
        Action::DeleteTodo(id) => submit_existing(state, id, TodoAction::Delete),
        Action::TxSubmitted { hash, .. } => submitted(state, hash),
        Action::TxRejected { failure, .. } => {
            state.todo.in_flight = None;
            state.push_notice(Notice::error(Some(Screen::Todo), &failure));
            Vec::new()
        }
        Action::TxSettled {
            hash, confirmation, ..
        } => settled(state, hash, confirmation),
        other => {
            debug!(action = ?other, "action not handled by todo screen");
            Vec::new()
        }
    }
}

fn ready_account(state: &mut AppState) -> Result<Address, Vec<Effect>> {
    let Some(account) = state.account else {
        return Err(reject(state, Screen::Todo, "Connect a wallet first"));
    };
    if let Some(in_flight) = &state.todo.in_flight {
        let message = format!("{} is still {}", in_flight.purpose, in_flight.phase());
        return Err(reject(state, Screen::Todo, message));
    }
    Ok(account)
}

fn submit_create(state: &mut AppState) -> Vec<Effect> {
    let account = match ready_account(state) {
        Ok(account) => account,
        Err(effects) => return effects,
    };
    let title = state.todo.form.title.trim().to_string();
    if title.is_empty() {
        return reject(state, Screen::Todo, "Title is required");
    }

    let call = ContractCall::CreateTodo {
        title: title.clone(),
        description: state.todo.form.description.trim().to_string(),
        priority: state.todo.form.priority,
    };
    state.todo.in_flight = Some(InFlight::signing(TxPurpose::CreateTodo { title }));
    vec![Effect::Submit {
        screen: Screen::Todo,
        from: account,
        call,
    }]
}

fn submit_existing(state: &mut AppState, id: TaskId, action: TodoAction) -> Vec<Effect> {
    let account = match ready_account(state) {
        Ok(account) => account,
        Err(effects) => return effects,
    };
    let Some(task) = state.todo.task(id) else {
        return reject(state, Screen::Todo, format!("Task #{id} is not in your list"));
    };
    // Listed tasks come from getMyTasks, so the caller owns them
    if let Err(err) = check_todo(task.completed, true, action) {
        return reject(state, Screen::Todo, format!("Task #{id}: {err}"));
    }

    let (call, purpose) = match action {
        TodoAction::Complete => (
            ContractCall::CompleteTodo { id },
            TxPurpose::CompleteTodo { id },
        ),
        TodoAction::Delete => (ContractCall::DeleteTodo { id }, TxPurpose::DeleteTodo { id }),
    };
    state.todo.in_flight = Some(InFlight::signing(purpose));
    vec![Effect::Submit {
        screen: Screen::Todo,
        from: account,
        call,
    }]
}

fn submitted(state: &mut AppState, hash: TxHash) -> Vec<Effect> {
    match state.todo.in_flight.as_mut() {
        Some(in_flight) if in_flight.tx.is_none() => {
            in_flight.tx = Some(hash);
            let message = format!("{} submitted, waiting for confirmation", in_flight.purpose);
            state.push_notice(Notice::info(Some(Screen::Todo), message).with_tx(hash));
            vec![Effect::AwaitConfirmation {
                screen: Screen::Todo,
                hash,
            }]
        }
        _ => {
            warn!(tx_hash = %hash, "submission result without a pending todo request");
            Vec::new()
        }
    }
}

fn settled(state: &mut AppState, hash: TxHash, confirmation: Confirmation) -> Vec<Effect> {
    let in_flight = match state.todo.in_flight.take() {
        Some(in_flight) if in_flight.tx == Some(hash) => in_flight,
        other => {
            debug!(tx_hash = %hash, "ignoring stale confirmation");
            state.todo.in_flight = other;
            return Vec::new();
        }
    };

    if confirmation.is_confirmed() && matches!(in_flight.purpose, TxPurpose::CreateTodo { .. }) {
        state.todo.form = TodoForm::default();
    }
    let notice = settle_notice(Screen::Todo, &in_flight.purpose, hash, &confirmation);
    state.push_notice(notice);

    if confirmation == Confirmation::Interrupted {
        return Vec::new();
    }
    load(state)
}
