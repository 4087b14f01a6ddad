//! tagscript: the template language behind tag commands, welcome/leave
//! messages, moderation DMs and level-up announcements.
//!
//! The interpreter lives in [`script`]; [`context`] and [`markers`] are the
//! pieces callers use around it, and [`config`] loads bindings files for the
//! `tagscript` binary.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod markers;
pub mod script;

pub use error::{ConfigError, EvalError};
pub use script::{expand, render, BindingStore, Renderer, Value};
