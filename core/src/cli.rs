//! # Command Line Interface
//!
//! This module defines command line interface for binaries. `Clap` is used
//! for easy generation of help messages and handling arguments.

use crate::config::SpendConfig;
use crate::errors::SpendError;
use crate::spend::SpendMode;
use crate::utils;
use clap::Parser;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::exit;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing::Level;

/// Builds and signs spends of tag-commit P2WSH outputs.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// `prepare` prints a signing handoff, `sign` prints a signed transaction.
    pub mode: SpendMode,
    /// TOML formatted configuration file.
    pub config_file: Option<PathBuf>,
    /// Payload logged in sign mode.
    #[arg(short, long, default_value = "")]
    pub payload: String,
    /// Verbosity level, ranging from 0 (none) to 5 (highest)
    #[arg(short, long, default_value_t = 3)]
    pub verbose: u8,
}

/// Parse all the command line arguments and generate a `SpendConfig`.
fn parse() -> Result<Args, SpendError> {
    parse_from(env::args())
}

/// Parse given iterator. This is good for isolated environments, like tests.
fn parse_from<I, T>(itr: I) -> Result<Args, SpendError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(itr) {
        Ok(c) => Ok(c),
        Err(e) => Err(SpendError::ConfigError(e.to_string())),
    }
}

fn level_filter(verbose: u8) -> Option<LevelFilter> {
    match verbose {
        0 => None,
        other => Some(LevelFilter::from_level(
            Level::from_str(&other.to_string()).unwrap_or(Level::INFO),
        )),
    }
}

/// Gets configuration from CLI, for binaries. If there are any errors, prints
/// error and exits the program.
///
/// Steps:
///
/// 1. Get CLI arguments
/// 2. Initialize logger
/// 3. Get configuration, either from environment variables or configuration
///    file
///
/// # Returns
///
/// A tuple, containing:
///
/// - [`SpendConfig`] from CLI argument
/// - [`Args`] from CLI options
pub fn get_configuration_from_cli() -> (SpendConfig, Args) {
    let args = match parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            exit(1);
        }
    };

    if let Err(e) = utils::initialize_logger(level_filter(args.verbose)) {
        eprintln!("{e}");
        exit(1);
    }

    // Return early if environment variables are set.
    match SpendConfig::from_env() {
        Ok(config) => {
            tracing::info!(
                "All the environment variables are set. Using them instead of configuration file..."
            );

            return (config, args);
        }
        Err(SpendError::EnvVarNotSet(_, name)) => {
            tracing::info!("{name} is not set, using configuration file...");
        }
        Err(e) => {
            tracing::error!("Malformed value set to an environment variable: {e}");
            exit(1);
        }
    }

    let config_file = if let Some(config_file) = args.config_file.clone() {
        config_file
    } else {
        tracing::error!(
            "Neither environment variables are set nor a configuration file is provided!"
        );
        exit(1);
    };

    let config = match SpendConfig::try_parse_file(config_file) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Can't read configuration file: {e}");
            exit(1);
        }
    };

    (config, args)
}

#[cfg(test)]
mod tests {
    use super::{level_filter, parse_from};
    use crate::errors::SpendError;
    use crate::spend::SpendMode;
    use tracing::level_filters::LevelFilter;

    /// With help message flag, we should see the help message. Shocking.
    #[test]
    fn help_message() {
        match parse_from(vec!["tagspend", "--help"]) {
            Ok(_) => panic!("expected configuration error"),
            Err(SpendError::ConfigError(e)) => println!("{e}"),
            e => panic!("unexpected error {e:#?}"),
        }
    }

    /// With version flag, we should see the program version read from
    /// `Cargo.toml`.
    #[test]
    fn version() {
        match parse_from(vec!["tagspend", "--version"]) {
            Ok(_) => panic!("expected configuration error"),
            Err(SpendError::ConfigError(e)) => println!("{e}"),
            e => panic!("unexpected error {e:#?}"),
        }
    }

    #[test]
    fn mode_and_options() {
        let args = parse_from(vec!["tagspend", "sign", "spend.toml", "--payload", "hi"])
            .expect("valid arguments");
        assert_eq!(args.mode, SpendMode::Sign);
        assert_eq!(args.config_file, Some("spend.toml".into()));
        assert_eq!(args.payload, "hi");
        assert_eq!(args.verbose, 3);

        let args = parse_from(vec!["tagspend", "prepare", "-v", "0"]).expect("valid arguments");
        assert_eq!(args.mode, SpendMode::Prepare);
        assert!(args.config_file.is_none());

        assert!(parse_from(vec!["tagspend", "broadcast"]).is_err());
        assert!(parse_from(vec!["tagspend"]).is_err());
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_filter(0), None);
        assert_eq!(level_filter(1), Some(LevelFilter::ERROR));
        assert_eq!(level_filter(5), Some(LevelFilter::TRACE));
    }
}
