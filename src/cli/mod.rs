//! Command Line Interface (CLI) layer for FESPRITE.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for single-pair and batch
//! compositing flows, plus the table/sheet maintenance flags. It wires
//! user-provided options to the underlying library functionality exposed
//! via `fesprite::api`.
//!
//! If you are embedding FESPRITE into another application, prefer using
//! the high-level `fesprite::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
