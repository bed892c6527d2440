//! Command-line interface.

pub mod args;

pub use args::{Args, BackfillArgs, Command, ExchangeArgs, RunArgs, WalkArgs};
