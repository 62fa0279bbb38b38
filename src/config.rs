use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Five in a row with a friend, peer to peer")]
pub struct Config {
    /// Where the node identity is kept
    #[arg(long, default_value = "gomoku_data")]
    pub data_dir: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: Level,

    /// Prefix for invite links
    #[arg(long, default_value = "gomoku://play")]
    pub base_url: String,

    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Open a new room and print the invite link
    Host,
    /// Join a room from an invite link or ticket
    Join { invite: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["gomoku", "host"]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("gomoku_data"));
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.base_url, "gomoku://play");
        assert_eq!(config.mode, Mode::Host);
    }

    #[test]
    fn join_takes_an_invite() {
        let config = Config::try_parse_from([
            "gomoku",
            "--log-level",
            "debug",
            "join",
            "gomoku://play#channel=abc",
        ])
        .unwrap();
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(
            config.mode,
            Mode::Join {
                invite: "gomoku://play#channel=abc".into()
            }
        );
    }

    #[test]
    fn mode_is_required() {
        assert!(Config::try_parse_from(["gomoku"]).is_err());
        assert!(Config::try_parse_from(["gomoku", "join"]).is_err());
    }
}
