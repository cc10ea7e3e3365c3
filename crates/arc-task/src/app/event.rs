/*
[INPUT]:  User intents from renderers and results of executed effects
[OUTPUT]: Action enum fed to the reducer
[POS]:    View-model layer - the single input type of the update cycle
[UPDATE]: When adding user intents or effect results
*/

use arc_task_adapter::{
    Address, MarketAction, MarketTask, Priority, TaskId, TaskStats, TodoTask, TokenAmount, TxHash,
};

use crate::app::state::{Failure, Screen, TodoFilter};
use crate::sync::Confirmation;

/// All inputs of the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Session
    Connect,
    Connected(Address),
    ConnectFailed(Failure),
    SwitchScreen(Screen),
    /// Re-read the active screen
    Refresh,
    DismissNotices,

    // Reads
    TodoLoaded { tasks: Vec<TodoTask>, stats: TaskStats },
    MarketLoaded {
        tasks: Vec<MarketTask>,
        balance: Option<TokenAmount>,
    },
    LoadFailed { screen: Screen, failure: Failure },

    // Todo screen
    EditTodoTitle(String),
    EditTodoDescription(String),
    SetTodoPriority(Priority),
    SetTodoFilter(TodoFilter),
    SubmitTodo,
    CompleteTodo(TaskId),
    DeleteTodo(TaskId),

    // Marketplace screen
    EditPostTitle(String),
    EditPostDescription(String),
    EditPostBounty(String),
    ToggleOnlyMine,
    SubmitPost,
    Market { action: MarketAction, id: TaskId },

    // Transactions
    TxSubmitted { screen: Screen, hash: TxHash },
    /// Refused before submission (wallet rejection, transport failure, node-side revert)
    TxRejected { screen: Screen, failure: Failure },
    TxSettled {
        screen: Screen,
        hash: TxHash,
        confirmation: Confirmation,
    },
}
