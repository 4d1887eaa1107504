pub mod cli;
pub mod config;

pub use cli::{Cli, Commands, ConvertArgs};
pub use config::BiddsConfig;
