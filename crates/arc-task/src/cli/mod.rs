/*
[INPUT]:  Parsed subcommands and their arguments
[OUTPUT]: Subcommand definitions and one-shot command runners
[POS]:    Binary CLI layer
[UPDATE]: When adding subcommands or arguments
*/

pub mod commands;
pub mod demo;
pub mod init;

use std::path::PathBuf;

use arc_task::app::state::{Screen, TodoFilter};
use arc_task_adapter::{Priority, TaskId};
use clap::{Subcommand, ValueEnum};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Personal todo list
    Todo {
        #[command(subcommand)]
        command: TodoCommand,
    },
    /// Bounty marketplace
    Market {
        #[command(subcommand)]
        command: MarketCommand,
    },
    /// Interactive terminal UI with both screens
    Tui {
        #[arg(long, value_enum, default_value_t = ScreenArg::Todo)]
        screen: ScreenArg,
    },
    /// Write a configuration file interactively
    Init {
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Run the marketplace happy path against the simulated ledger
    Demo,
}

#[derive(Subcommand, Debug)]
pub enum TodoCommand {
    /// List your tasks
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
    /// Show total / completed / pending counts
    Stats,
    /// Create a task
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },
    /// Mark a task completed
    Complete { id: TaskId },
    /// Delete a task
    Delete { id: TaskId },
}

#[derive(Subcommand, Debug)]
pub enum MarketCommand {
    /// List marketplace tasks
    List {
        /// Only tasks you posted or work on
        #[arg(long)]
        mine: bool,
    },
    /// Show your token balance
    Balance,
    /// Approve the bounty and post a task
    Post {
        title: String,
        #[arg(long)]
        bounty: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Take { id: TaskId },
    Complete { id: TaskId },
    Approve { id: TaskId },
    Cancel { id: TaskId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScreenArg {
    Todo,
    Market,
}

impl From<ScreenArg> for Screen {
    fn from(arg: ScreenArg) -> Self {
        match arg {
            ScreenArg::Todo => Screen::Todo,
            ScreenArg::Market => Screen::Market,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    All,
    Pending,
    Completed,
}

impl From<FilterArg> for TodoFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => TodoFilter::All,
            FilterArg::Pending => TodoFilter::Pending,
            FilterArg::Completed => TodoFilter::Completed,
        }
    }
}
