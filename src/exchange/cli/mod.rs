//! # CLI Layer
//!
//! This module is **one possible UI client** for the builder. A web page would
//! drive the same [`exchange::api::BuilderApi`]; the terminal session here is
//! the one that ships with the crate.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, whether stdin is a tty)
//! - Uses `std::process::exit` (via `main.rs`)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## The Session Loop
//!
//! `session` reads one command per line from stdin, dispatches it to the API
//! and then calls `settle()`, so back/forward traversals land before the next
//! prompt. Scripts can pipe commands in; the prompt is only printed on a tty.
//!
//! ## Structure
//!
//! - `setup`: clap definitions
//! - `commands`: `run()`, context setup, per-command handlers, session loop
//! - `print`: output formatting

mod commands;
mod print;
mod setup;

pub use commands::run;
