//! Ordered end-to-end verification of the IdeaCenter `Idea` API.
//!
//! A run authenticates once, executes a fixed sequence of create, list,
//! edit and delete checks against one [`http::client::Session`], and
//! reports each step's outcome.

pub mod auth;
pub mod cli;
pub mod environment;
pub mod error;
pub mod http;
pub mod ideas;
pub mod storage;
pub mod testing;

pub use environment::HarnessConfig;
pub use error::HarnessError;
pub use testing::{RunReport, run_suite};
