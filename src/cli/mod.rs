pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(name = "newswire")]
#[command(about = "Polls RSS feeds into a database and serves the latest news over HTTP", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the configured feeds and serve the API (default)
    Serve,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Read one feed once and print its items
    Fetch {
        /// URL of the feed
        url: String,
    },
    /// Print the most recent stored items
    Recent {
        /// How many items to show
        #[arg(short = 'n', long, default_value_t = 10)]
        count: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::try_parse_from(["newswire"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["newswire", "recent", "-n", "3", "--config", "/etc/nw.toml"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/nw.toml"));
        assert!(matches!(cli.command, Some(Commands::Recent { count: 3 })));
    }
}
