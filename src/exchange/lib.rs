//! # Exchange Application Builder
//!
//! The part of an exchange-student platform where an applicant ranks up to five
//! partner universities and submits them. Like the rest of the platform this is
//! a **UI-agnostic library**: the same core backs a web page, the bundled CLI,
//! or a test.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, runs the interactive session           │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - The edit page: owns list, history, dialogs               │
//! │  - Normalizes inputs (names, ranks → ids)                   │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Components                                                 │
//! │  - choices.rs: ranked list, dense 1..N                      │
//! │  - overlay/: dialogs bound to ?modal=<key> and history      │
//! │  - search.rs, submission.rs: the two dialogs                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - ApplicationStore trait, the persistence collaborator     │
//! │  - FileStore (CLI), InMemoryStore (testing)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Single Source of Truth
//!
//! The [`choices::ChoiceList`] is the only place selection lives. The search
//! dialog reads it to decide what is selected and writes to it on every click;
//! the submit gate validates it. Overlays only own an open flag, and the
//! location is authoritative for that flag.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr, never exits the
//! process and never assumes a terminal. Everything is synchronous; the only
//! deferred effect is a history traversal, which the client commits through
//! [`api::BuilderApi::settle`].
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`choices`]: Ranked choice list
//! - [`overlay`]: History-synchronized overlay state machine
//! - [`search`]: University search dialog
//! - [`submission`]: Validate, confirm, persist
//! - [`store`]: Persistence abstraction and implementations
//! - [`catalog`]: Candidate universities
//! - [`model`]: Core data types (`University`, `Choice`, `Application`)
//! - [`config`]: Configuration management
//! - [`logging`]: Tracing subscriber setup
//! - [`error`]: Error types
//! - `cli`: Argument parsing, session loop and printing for the binary (not part of the lib API)

pub mod api;
pub mod catalog;
pub mod choices;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod overlay;
pub mod search;
pub mod store;
pub mod submission;
