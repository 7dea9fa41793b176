//! CLI subcommand implementations for the pricewatch binary.

pub mod check_cmd;
pub mod history_cmd;
pub mod interval_cmd;
pub mod list_cmd;
pub mod output;
pub mod track_cmd;
pub mod untrack_cmd;
pub mod watch_cmd;
