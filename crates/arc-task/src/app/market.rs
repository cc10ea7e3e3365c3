/*
[INPUT]:  Marketplace-screen actions and transaction results
[OUTPUT]: Marketplace mutations plus approve / post / transition / re-read effects
[POS]:    View-model layer - marketplace screen reducer
[UPDATE]: When marketplace operations, posting or validation change
*/

use arc_task_adapter::lifecycle::TaskLifecycle;
use arc_task_adapter::{Address, ContractCall, MarketAction, TaskId, TokenAmount, TxHash};
use tracing::{debug, info, warn};

use crate::app::effect::Effect;
use crate::app::event::Action;
use crate::app::posting::{PostDraft, PostFlow, PostStep};
use crate::app::state::{AppState, InFlight, Notice, PostForm, Screen, TxPurpose};
use crate::app::{reject, settle_notice};
use crate::sync::Confirmation;

pub(super) fn load(state: &mut AppState) -> Vec<Effect> {
    state.market.loading = true;
    vec![Effect::LoadMarket {
        account: state.account,
    }]
}

pub(super) fn update(state: &mut AppState, action: Action) -> Vec<Effect> {
    match action {
        Action::MarketLoaded { tasks, balance } => {
            state.market.tasks = tasks;
            state.market.balance = balance;
            state.market.loaded = true;
            state.market.loading = false;
            Vec::new()
        }
        Action::EditPostTitle(title) => {
            state.market.form.title = title;
            Vec::new()
        }
        Action::EditPostDescription(description) => {
            state.market.form.description = description;
            Vec::new()
        }
        Action::EditPostBounty(bounty) => {
            state.market.form.bounty = bounty;
            Vec::new()
        }
        Action::ToggleOnlyMine => {
            state.market.only_mine = !state.market.only_mine;
            Vec::new()
        }
        Action::SubmitPost => submit_post(state),
        Action::Market { action, id } => submit_transition(state, action, id),
        Action::TxSubmitted { hash, .. } => submitted(state, hash),
        Action::TxRejected { failure, .. } => {
            state.market.in_flight = None;
            if state.market.flow.is_active() {
                state.market.flow.rejected(failure.message.clone());
            }
            state.push_notice(Notice::error(Some(Screen::Market), &failure));
            Vec::new()
        }
        Action::TxSettled {
            hash, confirmation, ..
        } => settled(state, hash, confirmation),
        other => {
            debug!(action = ?other, "action not handled by marketplace screen");
            Vec::new()
        }
    }
}

fn ready_account(state: &mut AppState) -> Result<Address, Vec<Effect>> {
    let Some(account) = state.account else {
        return Err(reject(state, Screen::Market, "Connect a wallet first"));
    };
    if let Some(in_flight) = &state.market.in_flight {
        let message = format!("{} is still {}", in_flight.purpose, in_flight.phase());
        return Err(reject(state, Screen::Market, message));
    }
    Ok(account)
}

fn submit_post(state: &mut AppState) -> Vec<Effect> {
    let account = match ready_account(state) {
        Ok(account) => account,
        Err(effects) => return effects,
    };
    let title = state.market.form.title.trim().to_string();
    if title.is_empty() {
        return reject(state, Screen::Market, "Title is required");
    }
    let bounty = match TokenAmount::parse(&state.market.form.bounty, state.token_decimals) {
        Ok(bounty) => bounty,
        Err(err) => return reject(state, Screen::Market, format!("Bounty: {err}")),
    };
    if let Some(balance) = state.market.balance
        && balance < bounty
    {
        let message = format!(
            "Bounty {} exceeds your balance of {}",
            state.format_amount(bounty),
            state.format_amount(balance)
        );
        return reject(state, Screen::Market, message);
    }

    let draft = PostDraft {
        title,
        description: state.market.form.description.trim().to_string(),
        bounty,
    };
    if !state.market.flow.begin(draft) {
        return reject(state, Screen::Market, "A post is already in progress");
    }
    info!(bounty = %bounty, "requesting bounty approval");
    state.market.in_flight = Some(InFlight::signing(TxPurpose::ApproveBounty { bounty }));
    vec![Effect::ApproveBounty {
        from: account,
        amount: bounty,
    }]
}

fn submit_transition(state: &mut AppState, action: MarketAction, id: TaskId) -> Vec<Effect> {
    let account = match ready_account(state) {
        Ok(account) => account,
        Err(effects) => return effects,
    };
    let Some(task) = state.market.task(id) else {
        return reject(state, Screen::Market, format!("Task #{id} is not listed"));
    };
    if let Err(err) = TaskLifecycle::of(task).check(account, action) {
        return reject(state, Screen::Market, format!("Task #{id}: {err}"));
    }

    state.market.in_flight = Some(InFlight::signing(TxPurpose::Market { action, id }));
    vec![Effect::Submit {
        screen: Screen::Market,
        from: account,
        call: ContractCall::market(action, id),
    }]
}

fn submitted(state: &mut AppState, hash: TxHash) -> Vec<Effect> {
    let Some(in_flight) = state.market.in_flight.as_mut().filter(|f| f.tx.is_none()) else {
        warn!(tx_hash = %hash, "submission result without a pending marketplace request");
        return Vec::new();
    };
    in_flight.tx = Some(hash);
    let message = format!("{} submitted, waiting for confirmation", in_flight.purpose);
    if state.market.flow.is_active() {
        state.market.flow.submitted(hash);
    }
    state.push_notice(Notice::info(Some(Screen::Market), message).with_tx(hash));
    vec![Effect::AwaitConfirmation {
        screen: Screen::Market,
        hash,
    }]
}

fn settled(state: &mut AppState, hash: TxHash, confirmation: Confirmation) -> Vec<Effect> {
    let in_flight = match state.market.in_flight.take() {
        Some(in_flight) if in_flight.tx == Some(hash) => in_flight,
        other => {
            debug!(tx_hash = %hash, "ignoring stale confirmation");
            state.market.in_flight = other;
            return Vec::new();
        }
    };

    if state.market.flow.is_active() {
        return settled_post(state, in_flight, hash, confirmation);
    }

    let notice = settle_notice(Screen::Market, &in_flight.purpose, hash, &confirmation);
    state.push_notice(notice);
    if confirmation == Confirmation::Interrupted {
        return Vec::new();
    }
    load(state)
}

fn settled_post(
    state: &mut AppState,
    in_flight: InFlight,
    hash: TxHash,
    confirmation: Confirmation,
) -> Vec<Effect> {
    let notice = settle_notice(Screen::Market, &in_flight.purpose, hash, &confirmation);
    state.push_notice(notice);

    match state.market.flow.settled(hash, &confirmation) {
        PostStep::SubmitTask(call) => {
            let Some(account) = state.account else {
                state.market.flow.rejected("wallet disconnected");
                return Vec::new();
            };
            let title = match &call {
                ContractCall::PostTask { title, .. } => title.clone(),
                _ => String::new(),
            };
            state.market.in_flight = Some(InFlight::signing(TxPurpose::PostTask { title }));
            vec![Effect::Submit {
                screen: Screen::Market,
                from: account,
                call,
            }]
        }
        PostStep::Finished => {
            match &state.market.flow {
                PostFlow::Done { title, .. } => {
                    info!(%title, "task posted");
                    state.market.form = PostForm::default();
                }
                PostFlow::Failed { stage, reason } => {
                    warn!(%stage, %reason, "post flow failed");
                }
                _ => {}
            }
            if confirmation == Confirmation::Interrupted {
                return Vec::new();
            }
            load(state)
        }
        PostStep::Ignored => {
            warn!(tx_hash = %hash, phase = state.market.flow.label(), "confirmation did not match post flow");
            load(state)
        }
    }
}
