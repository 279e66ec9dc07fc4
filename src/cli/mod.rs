//! Command-line interface for taskr
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in [`task`].

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod task;

/// taskr - personal task tracker
///
/// Keeps a JSON task list with statuses, difficulties, categories and due
/// dates, and answers priority/overdue/related queries over it.
#[derive(Parser, Debug)]
#[command(name = "taskr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the task storage file (defaults to .taskr.toml, then tasks.json)
    #[arg(long, global = true, env = "TASKR_FILE")]
    pub file: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a task
    New {
        /// Task title (1-100 characters)
        title: String,

        /// Longer description (up to 500 characters)
        #[arg(short, long)]
        description: Option<String>,

        /// Status code (1-4) or label: pending, in-progress, completed, cancelled
        #[arg(short, long)]
        status: Option<String>,

        /// Difficulty code (1-3) or label: easy, medium, hard
        #[arg(long)]
        difficulty: Option<String>,

        /// Category code (1-5) or label: programming, study, work, leisure, other
        #[arg(short, long)]
        category: Option<String>,

        /// Due date (YYYY/MM/DD, YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks, sorted by title
    List {
        /// View: 1 all, 2 pending, 3 in-progress, 4 completed
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..=4))]
        view: i64,
    },

    /// Search tasks by title
    Search {
        /// Case-insensitive substring of the title
        term: String,
    },

    /// Show one task
    Show {
        /// Task ID
        id: String,
    },

    /// Edit fields of a task
    Edit {
        /// Task ID
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Status code (1-4) or label
        #[arg(short, long)]
        status: Option<String>,

        /// Difficulty code (1-3) or label
        #[arg(long)]
        difficulty: Option<String>,

        /// Category code (1-5) or label
        #[arg(short, long)]
        category: Option<String>,

        /// New due date
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },

    /// Soft-delete a task
    Delete {
        /// Task ID
        id: String,
    },

    /// Active tasks that are overdue or due soon
    Priority {
        /// Days ahead to include (default from .taskr.toml, else 3)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Tasks past their due date that are not completed
    Overdue,

    /// Tasks in the same category as the given one
    Related {
        /// Task ID
        id: String,
    },

    /// Counts per status and difficulty
    Stats,

    /// Storage file summary
    Info,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let file = self.file;
        let json = self.json;
        let quiet = self.quiet;

        match self.command {
            Commands::New {
                title,
                description,
                status,
                difficulty,
                category,
                due,
            } => task::run_new(task::NewOptions {
                title,
                description,
                status,
                difficulty,
                category,
                due,
                file,
                json,
                quiet,
            }),
            Commands::List { view } => task::run_list(task::ListOptions {
                view,
                file,
                json,
                quiet,
            }),
            Commands::Search { term } => task::run_search(task::SearchOptions {
                term,
                file,
                json,
                quiet,
            }),
            Commands::Show { id } => task::run_show(task::ShowOptions {
                id,
                file,
                json,
                quiet,
            }),
            Commands::Edit {
                id,
                title,
                description,
                status,
                difficulty,
                category,
                due,
                clear_due,
            } => task::run_edit(task::EditOptions {
                id,
                title,
                description,
                status,
                difficulty,
                category,
                due,
                clear_due,
                file,
                json,
                quiet,
            }),
            Commands::Delete { id } => task::run_delete(task::DeleteOptions {
                id,
                file,
                json,
                quiet,
            }),
            Commands::Priority { days } => task::run_priority(task::PriorityOptions {
                days,
                file,
                json,
                quiet,
            }),
            Commands::Overdue => task::run_overdue(task::OverdueOptions { file, json, quiet }),
            Commands::Related { id } => task::run_related(task::RelatedOptions {
                id,
                file,
                json,
                quiet,
            }),
            Commands::Stats => task::run_stats(task::StatsOptions { file, json, quiet }),
            Commands::Info => task::run_info(task::InfoOptions { file, json, quiet }),
        }
    }
}
