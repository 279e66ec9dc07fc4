//! taskr - personal task tracking library
//!
//! This library provides the core functionality for the taskr CLI tool:
//! validated task entities, a JSON-file repository with atomic saves, and
//! pure query functions over task collections.
//!
//! # Core Concepts
//!
//! - **Tasks**: Immutable values; edits and deletes produce new instances
//! - **Soft delete**: Deleted tasks stay in storage with `deleted = true`
//! - **Repository**: Loads/saves the whole collection and keeps a metadata summary
//! - **Queries**: Priority, overdue, related-by-category and listing views
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.taskr.toml`
//! - `dates`: Due date parsing
//! - `error`: Error types and result aliases
//! - `output`: Human and JSON output formatting
//! - `query`: Filters over task collections
//! - `stats`: Collection statistics
//! - `storage`: JSON repository and atomic file writes
//! - `task`: Task entity and its enums
//! - `validation`: Field validation rules and option tables

pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod output;
pub mod query;
pub mod stats;
pub mod storage;
pub mod task;
pub mod validation;

pub use error::{Error, Result};
