//! Scaffold CLI.
//!
//! Generates Galasa test projects from the built-in template bundle.
//!
//! # Architecture
//!
//! The CLI is organized around subcommands:
//! - `create` - Plan and write a new project
//! - `templates` - List the bundle's slots and candidate units
//! - `config` - Manage the configuration file
//! - `completions` - Generate shell completions
//!
//! # Examples
//!
//! ```bash
//! # Maven project with two test projects
//! scaffold create --package dev.galasa.bank --features payee,account
//!
//! # Gradle and Maven, z/OS flavour, with an OBR project
//! scaffold create --package dev.galasa.bank --gradle --maven --flavor zos --obr
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use scaffold_cli::ConfigAction;
use scaffold_cli::commands::{self, config::Config, create::CreateArgs};
use scaffold_core::cli::{ExitCode, OutputFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Scaffold - project generator for Galasa tests.
///
/// Lays out a parent project, one test project per feature and an optional
/// OBR project, with Maven and/or Gradle build files.
#[derive(Parser, Debug)]
#[command(name = "scaffold")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty); defaults to the configured format
    #[arg(long = "format", global = true)]
    format: Option<String>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new Galasa project.
    ///
    /// Existing files are never replaced unless `--force` is given.
    ///
    /// # Examples
    ///
    /// ```bash
    /// scaffold create --package dev.galasa.bank --features payee,account
    /// scaffold create --package dev.galasa.bank --output ./projects --dry-run
    /// ```
    Create(CreateArgs),

    /// List the built-in template slots, their selectors and tokens.
    Templates,

    /// Manage the configuration file.
    Config {
        /// Configuration action
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions.
    ///
    /// # Examples
    ///
    /// ```bash
    /// scaffold completions bash > /etc/bash_completion.d/scaffold
    /// ```
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = commands::config::load_config();
    let log_level = config
        .as_ref()
        .map_or("info", |c| c.general.log_level.as_str());
    init_logging(cli.verbose, log_level);

    let exit_code = match run(cli, config).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            commands::exit_code(&err)
        }
    };

    std::process::exit(exit_code.as_i32());
}

/// Initializes logging infrastructure.
///
/// `--verbose` forces debug level; otherwise `RUST_LOG` wins over the
/// configured level. Logs go to stderr so stdout stays parseable.
fn init_logging(verbose: bool, configured_level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured_level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli, config: Result<Config>) -> Result<ExitCode> {
    let config = config?;
    let output_format = match &cli.format {
        Some(format) => format.parse::<OutputFormat>()?,
        None => config.output_format(),
    };

    execute_command(cli.command, &config, output_format).await
}

/// Routes commands to their handlers and returns an exit code.
async fn execute_command(
    command: Commands,
    config: &Config,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    match command {
        Commands::Create(args) => commands::create::run(args, config, output_format).await,
        Commands::Templates => commands::templates::run(output_format).await,
        Commands::Config { action } => commands::config::run(action, output_format).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parsing_create() {
        let cli = Cli::parse_from([
            "scaffold",
            "create",
            "--package",
            "dev.galasa.bank",
            "--features",
            "payee,account",
            "--flavor",
            "zos",
            "--obr",
            "--gradle",
            "--output",
            "out",
        ]);

        if let Commands::Create(args) = cli.command {
            assert_eq!(args.package, "dev.galasa.bank");
            assert_eq!(args.features.as_deref(), Some("payee,account"));
            assert_eq!(args.flavors, vec!["zos"]);
            assert!(args.obr);
            assert!(args.gradle);
            assert!(!args.maven);
            assert_eq!(args.output, Some(PathBuf::from("out")));
            assert!(!args.dry_run);
        } else {
            panic!("Expected Create command");
        }
    }

    #[test]
    fn test_cli_parsing_create_requires_package() {
        let result = Cli::try_parse_from(["scaffold", "create", "--features", "a"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parsing_staged_conflicts_with_force() {
        let result = Cli::try_parse_from([
            "scaffold", "create", "--package", "a.b", "--staged", "--force",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parsing_dry_run() {
        let cli = Cli::parse_from(["scaffold", "create", "--package", "a.b", "--dry-run"]);
        assert!(matches!(cli.command, Commands::Create(CreateArgs { dry_run: true, .. })));
    }

    #[test]
    fn test_cli_parsing_templates() {
        let cli = Cli::parse_from(["scaffold", "templates"]);
        assert!(matches!(cli.command, Commands::Templates));
    }

    #[test]
    fn test_cli_parsing_config_set() {
        let cli = Cli::parse_from(["scaffold", "config", "set", "general.log_level", "debug"]);
        if let Commands::Config { action } = cli.command {
            assert_eq!(
                action,
                ConfigAction::Set {
                    key: "general.log_level".to_string(),
                    value: "debug".to_string(),
                }
            );
        } else {
            panic!("Expected Config command");
        }
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::parse_from(["scaffold", "completions", "fish"]);
        assert!(matches!(
            cli.command,
            Commands::Completions { shell: Shell::Fish }
        ));
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from(["scaffold", "--verbose", "--format", "json", "templates"]);
        assert!(cli.verbose);
        assert_eq!(cli.format.as_deref(), Some("json"));

        let cli = Cli::parse_from(["scaffold", "templates"]);
        assert!(cli.format.is_none());
    }

    #[tokio::test]
    async fn test_run_rejects_unknown_format() {
        let cli = Cli::parse_from(["scaffold", "--format", "yaml", "templates"]);
        let err = run(cli, Ok(Config::default())).await.unwrap_err();
        assert_eq!(commands::exit_code(&err), ExitCode::INVALID_INPUT);
    }

    #[tokio::test]
    async fn test_run_reports_config_error() {
        let cli = Cli::parse_from(["scaffold", "templates"]);
        let broken = Err(anyhow::Error::from(scaffold_core::Error::ConfigError {
            message: "bad".to_string(),
        }));
        let err = run(cli, broken).await.unwrap_err();
        assert_eq!(commands::exit_code(&err), ExitCode::INVALID_INPUT);
    }
}
