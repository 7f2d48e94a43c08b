//! Command-line arguments shared by bridge binaries.

use std::path::PathBuf;

use clap::{Command, CommandFactory, FromArgMatches, Parser};

#[derive(Parser, Debug, Clone)]
#[command(about = "SysMX management bridge")]
pub struct BridgeArgs {
    /// Path to the JSON5 configuration file.
    #[arg(short, long)]
    pub config: PathBuf,

    /// Log level or filter directive, overriding the config file.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl BridgeArgs {
    /// Parse the process arguments, making `--config` optional with the
    /// given default. Exits with usage on invalid arguments.
    pub fn parse_with_default(default_config: &'static str) -> Self {
        let matches = Self::command_with_default(default_config).get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    fn command_with_default(default_config: &'static str) -> Command {
        Self::command().mut_arg("config", |arg| {
            arg.required(false).default_value(default_config)
        })
    }
}
