//! CLI module
//!
//! Command-line interface for copying images between boorus.
//!
//! Every connection value can come from a flag, an environment variable,
//! or an interactive prompt, in that order.

mod commands;
mod input;
mod progress;
mod runner;

pub use commands::Cli;
pub use input::{parse_api_key, parse_booru_host};
pub use progress::ConsoleSink;
pub use runner::Runner;
