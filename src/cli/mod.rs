//! Command-line interface for the todo tracker.
//!
//! Thin glue over the store engine: each command maps to exactly one engine
//! call, and results render as pretty JSON (or a one-line message for
//! status-only operations).

mod run;


pub use run::{run, run_with_store, CliOutput};

use clap::{Parser, Subcommand};

/// Todo tracker CLI - manage todos without switching context.
///
/// Todos are addressed by their task text. Task text is not unique: `get`,
/// `update`, and `complete` act on the first match in creation order, while
/// `delete` removes every record with a listed name.
#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new todo.
    Add {
        /// Task description
        task: String,

        /// Assignee identifier for agent coordination
        #[arg(long)]
        assigned_to: Option<String>,

        /// Priority: high, medium, or low
        #[arg(long)]
        priority: Option<String>,

        /// Estimated time to complete in minutes
        #[arg(long)]
        estimated_minutes: Option<u32>,

        /// Actual time spent in minutes
        #[arg(long)]
        actual_minutes: Option<u32>,

        /// Parent todo id for hierarchical breakdown
        #[arg(long)]
        parent_task_id: Option<String>,

        /// Tag for categorization (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List todos with optional filters.
    List {
        /// Show only completed todos
        #[arg(long, conflicts_with = "incomplete")]
        completed: bool,

        /// Show only incomplete todos
        #[arg(long)]
        incomplete: bool,

        /// Filter by priority: high, medium, or low
        #[arg(long)]
        priority: Option<String>,

        /// Filter by assignee
        #[arg(long)]
        assigned_to: Option<String>,

        /// Filter by tag membership
        #[arg(long)]
        tag: Option<String>,
    },

    /// Get a todo by its task text (first match wins on duplicates).
    Get {
        /// Task text to look up
        task: String,
    },

    /// Show a todo by its id.
    Show {
        /// Todo id
        id: String,
    },

    /// Update a todo addressed by its current task text.
    ///
    /// Only specified fields change; others remain untouched. Each optional
    /// metadata field has a matching --clear flag to remove it.
    Update {
        /// Current task text identifying the todo
        task: String,

        /// New task text
        #[arg(long = "task")]
        new_task: Option<String>,

        /// New completion status (true or false)
        #[arg(long)]
        completed: Option<bool>,

        /// New assignee
        #[arg(long)]
        assigned_to: Option<String>,

        /// New priority: high, medium, or low
        #[arg(long)]
        priority: Option<String>,

        /// New estimated minutes
        #[arg(long)]
        estimated_minutes: Option<u32>,

        /// New actual minutes
        #[arg(long)]
        actual_minutes: Option<u32>,

        /// New parent todo id
        #[arg(long)]
        parent_task_id: Option<String>,

        /// Replacement tag (repeatable; replaces the whole tag list)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Remove the assignee
        #[arg(long, conflicts_with = "assigned_to")]
        clear_assigned_to: bool,

        /// Remove the priority
        #[arg(long, conflicts_with = "priority")]
        clear_priority: bool,

        /// Remove the estimated minutes
        #[arg(long, conflicts_with = "estimated_minutes")]
        clear_estimated_minutes: bool,

        /// Remove the actual minutes
        #[arg(long, conflicts_with = "actual_minutes")]
        clear_actual_minutes: bool,

        /// Remove the parent todo id
        #[arg(long, conflicts_with = "parent_task_id")]
        clear_parent_task_id: bool,

        /// Remove all tags
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
    },

    /// Mark a todo as completed by task text.
    Complete {
        /// Task text of the todo to complete
        task: String,
    },

    /// Delete todos by task text (removes every match for each name).
    Delete {
        /// Task names to delete
        #[arg(required = true)]
        tasks: Vec<String>,
    },

    /// Delete a single todo by its id.
    #[command(name = "delete-id")]
    DeleteId {
        /// Todo id
        id: String,
    },

    /// Show version information.
    Version,
}
