/*
[INPUT]:  Key-driven navigation and the shared AppState
[OUTPUT]: Terminal-only presentation state (tab, selection, form focus)
[POS]:    TUI presentation state; everything durable lives in AppState
[UPDATE]: When adding tabs, form fields or selection rules
*/

use arc_task::app::state::{AppState, Screen};
use arc_task_adapter::{MarketTask, TaskId, TodoTask};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Tab {
    Todo,
    Market,
    Logs,
}

impl Tab {
    pub(super) const ALL: [Tab; 3] = [Tab::Todo, Tab::Market, Tab::Logs];

    pub(super) fn title(self) -> &'static str {
        match self {
            Tab::Todo => "Todo",
            Tab::Market => "Marketplace",
            Tab::Logs => "Logs",
        }
    }

    pub(super) fn index(self) -> usize {
        match self {
            Tab::Todo => 0,
            Tab::Market => 1,
            Tab::Logs => 2,
        }
    }

    pub(super) fn next(self) -> Self {
        match self {
            Tab::Todo => Tab::Market,
            Tab::Market => Tab::Logs,
            Tab::Logs => Tab::Todo,
        }
    }

    pub(super) fn screen(self) -> Option<Screen> {
        match self {
            Tab::Todo => Some(Screen::Todo),
            Tab::Market => Some(Screen::Market),
            Tab::Logs => None,
        }
    }
}

impl From<Screen> for Tab {
    fn from(screen: Screen) -> Self {
        match screen {
            Screen::Todo => Tab::Todo,
            Screen::Market => Tab::Market,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TodoField {
    Title,
    Description,
    Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PostField {
    Title,
    Description,
    Bounty,
}

/// Which form is open and which field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Mode {
    Normal,
    EditTodo(TodoField),
    EditPost(PostField),
}

#[derive(Debug)]
pub(super) struct View {
    pub(super) tab: Tab,
    pub(super) mode: Mode,
    pub(super) todo_selected: usize,
    pub(super) market_selected: usize,
}

impl View {
    pub(super) fn new(screen: Screen) -> Self {
        Self {
            tab: screen.into(),
            mode: Mode::Normal,
            todo_selected: 0,
            market_selected: 0,
        }
    }

    pub(super) fn selected_todo<'a>(&self, state: &'a AppState) -> Option<&'a TodoTask> {
        state.todo.visible_tasks().nth(self.todo_selected)
    }

    pub(super) fn selected_market<'a>(&self, state: &'a AppState) -> Option<&'a MarketTask> {
        state
            .market
            .visible_tasks(state.account)
            .get(self.market_selected)
            .copied()
    }

    pub(super) fn selected_id(&self, state: &AppState) -> Option<TaskId> {
        match self.tab {
            Tab::Todo => self.selected_todo(state).map(|task| task.id),
            Tab::Market => self.selected_market(state).map(|task| task.id),
            Tab::Logs => None,
        }
    }

    /// Move the selection of the active list by `delta`, clamped to its length
    pub(super) fn move_selection(&mut self, state: &AppState, delta: isize) {
        let (len, selected) = match self.tab {
            Tab::Todo => (state.todo.visible_tasks().count(), &mut self.todo_selected),
            Tab::Market => (
                state.market.visible_tasks(state.account).len(),
                &mut self.market_selected,
            ),
            Tab::Logs => return,
        };
        if len == 0 {
            *selected = 0;
            return;
        }
        let next = (*selected as isize + delta).clamp(0, len as isize - 1);
        *selected = next as usize;
    }

    /// Keep selections inside lists that shrank after a re-read
    pub(super) fn clamp(&mut self, state: &AppState) {
        let todo_len = state.todo.visible_tasks().count();
        self.todo_selected = self.todo_selected.min(todo_len.saturating_sub(1));
        let market_len = state.market.visible_tasks(state.account).len();
        self.market_selected = self.market_selected.min(market_len.saturating_sub(1));
    }
}
