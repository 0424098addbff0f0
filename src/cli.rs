use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "honeygain-autoclaim")]
#[command(about = "Claims the Honeygain lucky pot and finished achievements")]
pub struct RootArgs {
    #[arg(
        long,
        default_value = "Config/HoneygainConfig.toml",
        value_name = "FILE",
        help = "Path to the TOML config (credentials, toggles, endpoint URLs)"
    )]
    pub config_path: PathBuf,

    #[arg(
        long,
        default_value = "Config/HoneygainToken.json",
        value_name = "FILE",
        help = "Path to the cached login response"
    )]
    pub token_path: PathBuf,

    #[arg(
        long,
        default_value = "Logs/HoneygainAutoClaim.log",
        value_name = "FILE",
        help = "Log file, truncated on every run"
    )]
    pub log_path: PathBuf,

    #[arg(
        long,
        help = "Read credentials from IsJWT/JWT_TOKEN/MAIL/PASS instead of prompting"
    )]
    pub unattended: bool,

    #[arg(
        long,
        default_value_t = 30,
        value_name = "SECS",
        help = "Timeout for every HTTP request"
    )]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    #[command(about = "Claim achievements and the lucky pot, then report the balance (default)")]
    Run,
    #[command(about = "Regenerate the config file and exit")]
    Setup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_legacy_layout() {
        let args = RootArgs::parse_from(["honeygain-autoclaim"]);
        assert_eq!(args.config_path, PathBuf::from("Config/HoneygainConfig.toml"));
        assert_eq!(args.token_path, PathBuf::from("Config/HoneygainToken.json"));
        assert!(!args.unattended);
        assert_eq!(args.timeout_secs, 30);
        assert_eq!(args.command, None);
    }

    #[test]
    fn setup_subcommand_parses() {
        let args = RootArgs::parse_from(["honeygain-autoclaim", "--unattended", "setup"]);
        assert!(args.unattended);
        assert_eq!(args.command, Some(Command::Setup));
    }
}
