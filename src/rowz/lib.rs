//! # Rowz Architecture
//!
//! Rowz manages records in flat delimited text files (CSV): load, append, delete by
//! position, edit fields. It is a library first; the `rowz` binary (command line plus
//! an interactive shell) is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders tables, runs the shell         │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session (session.rs) + API Layer (api.rs)                  │
//! │  - Session: current file and snapshot for interactive UIs   │
//! │  - API: thin facade, normalizes selections, returns results │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Read-modify-write logic, shape checks                    │
//! │  - Folds every failure into a CmdResult + log diagnostic    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - RecordStore trait                                        │
//! │  - CsvStore (production), InMemoryStore (testing)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure reporting
//!
//! Nothing above the store returns `Err`. A failed operation yields a
//! [`commands::CmdResult`] with `success == false`, an error message and a `warn!`
//! log line. This keeps UIs simple but makes failures easy to miss: check the result.
//!
//! ## Indexes
//!
//! The store addresses records by 0-based position in the most recent full read.
//! Users see 1-based numbers (see [`index`]). Positions are not identities; any
//! mutation invalidates them. [`session::Session`] adds in-memory row ids and a
//! staleness check on top.
//!
//! ## Logging
//!
//! The library logs through the `log` facade (`debug!` for operations, `warn!` for
//! diagnostics). The binary installs `env_logger`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Logic for each operation
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`FieldSet`, `Record`, `Table`)
//! - [`index`]: Record numbering and selection parsing
//! - [`session`]: Explicit state for interactive front ends
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod model;
pub mod session;
pub mod store;
