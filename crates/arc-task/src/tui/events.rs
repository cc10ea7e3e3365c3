/*
[INPUT]:  Key events, View and the current AppState
[OUTPUT]: Actions for the reducer and a quit flag
[POS]:    TUI key routing - translates keys to view-model intents
[UPDATE]: When keybindings or form fields change
*/

use arc_task::app::event::Action;
use arc_task::app::state::AppState;
use arc_task_adapter::{MarketAction, Priority};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::view::{Mode, PostField, Tab, TodoField, View};

#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct KeyOutcome {
    pub(super) actions: Vec<Action>,
    pub(super) quit: bool,
}

impl KeyOutcome {
    fn none() -> Self {
        Self::default()
    }

    fn quit() -> Self {
        Self {
            actions: Vec::new(),
            quit: true,
        }
    }

    fn action(action: Action) -> Self {
        Self {
            actions: vec![action],
            quit: false,
        }
    }
}

/// Route a key press; forms capture every key while open
pub(super) fn handle_key(view: &mut View, state: &AppState, key: KeyEvent) -> KeyOutcome {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyOutcome::quit();
    }
    match view.mode {
        Mode::Normal => handle_normal(view, state, key.code),
        Mode::EditTodo(field) => handle_todo_form(view, state, field, key.code),
        Mode::EditPost(field) => handle_post_form(view, state, field, key.code),
    }
}

fn switch_tab(view: &mut View, tab: Tab) -> KeyOutcome {
    view.tab = tab;
    match tab.screen() {
        Some(screen) => KeyOutcome::action(Action::SwitchScreen(screen)),
        None => KeyOutcome::none(),
    }
}

fn handle_normal(view: &mut View, state: &AppState, key: KeyCode) -> KeyOutcome {
    match key {
        KeyCode::Char('q') => return KeyOutcome::quit(),
        KeyCode::Tab => return switch_tab(view, view.tab.next()),
        KeyCode::Char('1') => return switch_tab(view, Tab::Todo),
        KeyCode::Char('2') => return switch_tab(view, Tab::Market),
        KeyCode::Char('3') => return switch_tab(view, Tab::Logs),
        KeyCode::Char('w') => return KeyOutcome::action(Action::Connect),
        KeyCode::Char('r') => return KeyOutcome::action(Action::Refresh),
        KeyCode::Esc => return KeyOutcome::action(Action::DismissNotices),
        KeyCode::Up | KeyCode::Char('k') => {
            view.move_selection(state, -1);
            return KeyOutcome::none();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view.move_selection(state, 1);
            return KeyOutcome::none();
        }
        _ => {}
    }

    match view.tab {
        Tab::Todo => handle_todo_keys(view, state, key),
        Tab::Market => handle_market_keys(view, state, key),
        Tab::Logs => KeyOutcome::none(),
    }
}

fn handle_todo_keys(view: &mut View, state: &AppState, key: KeyCode) -> KeyOutcome {
    let selected = view.selected_todo(state);
    match (key, selected) {
        (KeyCode::Char('n'), _) => {
            view.mode = Mode::EditTodo(TodoField::Title);
            KeyOutcome::none()
        }
        (KeyCode::Char('f'), _) => {
            view.todo_selected = 0;
            KeyOutcome::action(Action::SetTodoFilter(state.todo.filter.next()))
        }
        (KeyCode::Char(' ') | KeyCode::Char('x'), Some(task)) if state.todo.can_complete(task) => {
            KeyOutcome::action(Action::CompleteTodo(task.id))
        }
        (KeyCode::Char('d'), Some(task)) if state.todo.can_delete(task) => {
            KeyOutcome::action(Action::DeleteTodo(task.id))
        }
        _ => KeyOutcome::none(),
    }
}

fn handle_market_keys(view: &mut View, state: &AppState, key: KeyCode) -> KeyOutcome {
    let selected = view.selected_id(state);
    let transition = |action| match selected {
        Some(id) => KeyOutcome::action(Action::Market { action, id }),
        None => KeyOutcome::none(),
    };
    match key {
        KeyCode::Char('n') => {
            view.mode = Mode::EditPost(PostField::Title);
            KeyOutcome::none()
        }
        KeyCode::Char('o') => {
            view.market_selected = 0;
            KeyOutcome::action(Action::ToggleOnlyMine)
        }
        KeyCode::Char('t') => transition(MarketAction::Take),
        KeyCode::Char('m') => transition(MarketAction::Complete),
        KeyCode::Char('a') => transition(MarketAction::Approve),
        KeyCode::Char('x') => transition(MarketAction::Cancel),
        _ => KeyOutcome::none(),
    }
}

fn edited(value: &str, key: KeyCode) -> Option<String> {
    match key {
        KeyCode::Char(ch) => {
            let mut value = value.to_string();
            value.push(ch);
            Some(value)
        }
        KeyCode::Backspace => {
            let mut value = value.to_string();
            value.pop();
            Some(value)
        }
        _ => None,
    }
}

fn cycle_priority(priority: Priority, forward: bool) -> Priority {
    let index = Priority::ALL
        .iter()
        .position(|p| *p == priority)
        .unwrap_or_default();
    let len = Priority::ALL.len();
    let next = if forward { (index + 1) % len } else { (index + len - 1) % len };
    Priority::ALL[next]
}

fn handle_todo_form(view: &mut View, state: &AppState, field: TodoField, key: KeyCode) -> KeyOutcome {
    let form = &state.todo.form;
    match key {
        KeyCode::Esc => {
            view.mode = Mode::Normal;
            KeyOutcome::none()
        }
        KeyCode::Enter => {
            view.mode = Mode::Normal;
            KeyOutcome::action(Action::SubmitTodo)
        }
        KeyCode::Tab | KeyCode::Down => {
            let next = match field {
                TodoField::Title => TodoField::Description,
                TodoField::Description => TodoField::Priority,
                TodoField::Priority => TodoField::Title,
            };
            view.mode = Mode::EditTodo(next);
            KeyOutcome::none()
        }
        KeyCode::Left | KeyCode::Right if field == TodoField::Priority => KeyOutcome::action(
            Action::SetTodoPriority(cycle_priority(form.priority, key == KeyCode::Right)),
        ),
        key => match field {
            TodoField::Title => edited(&form.title, key)
                .map(|value| KeyOutcome::action(Action::EditTodoTitle(value)))
                .unwrap_or_default(),
            TodoField::Description => edited(&form.description, key)
                .map(|value| KeyOutcome::action(Action::EditTodoDescription(value)))
                .unwrap_or_default(),
            TodoField::Priority => KeyOutcome::none(),
        },
    }
}

fn handle_post_form(view: &mut View, state: &AppState, field: PostField, key: KeyCode) -> KeyOutcome {
    let form = &state.market.form;
    match key {
        KeyCode::Esc => {
            view.mode = Mode::Normal;
            KeyOutcome::none()
        }
        KeyCode::Enter => {
            view.mode = Mode::Normal;
            KeyOutcome::action(Action::SubmitPost)
        }
        KeyCode::Tab | KeyCode::Down => {
            let next = match field {
                PostField::Title => PostField::Description,
                PostField::Description => PostField::Bounty,
                PostField::Bounty => PostField::Title,
            };
            view.mode = Mode::EditPost(next);
            KeyOutcome::none()
        }
        key => {
            let (value, make): (&str, fn(String) -> Action) = match field {
                PostField::Title => (form.title.as_str(), Action::EditPostTitle),
                PostField::Description => (form.description.as_str(), Action::EditPostDescription),
                PostField::Bounty => (form.bounty.as_str(), Action::EditPostBounty),
            };
            // bounty accepts digits and one decimal point only
            if field == PostField::Bounty
                && let KeyCode::Char(ch) = key
                && !(ch.is_ascii_digit() || (ch == '.' && !value.contains('.')))
            {
                return KeyOutcome::none();
            }
            edited(value, key)
                .map(|value| KeyOutcome::action(make(value)))
                .unwrap_or_default()
        }
    }
}
