//! Shell completion generation command.
//!
//! Writes completion scripts for the shells `clap_complete` supports.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use scaffold_core::cli::ExitCode;
use std::io;
use tracing::info;

/// Generates shell completion script for the specified shell.
///
/// The script goes to stdout; source it or save it where the shell looks
/// for completions.
///
/// # Examples
///
/// ```no_run
/// use scaffold_cli::commands::completions;
/// use clap_complete::Shell;
/// use clap::Command;
///
/// let cmd = Command::new("scaffold");
/// completions::generate_completions(Shell::Bash, &mut cmd.clone());
/// ```
pub fn generate_completions(shell: Shell, cmd: &mut Command) {
    info!(%shell, "Generating completions");
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, &mut io::stdout());
}

/// Runs the completions command.
pub async fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    generate_completions(shell, cmd);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, Command};

    fn scaffold_command() -> Command {
        Command::new("scaffold").subcommand(
            Command::new("create").arg(Arg::new("package").long("package")),
        )
    }

    #[test]
    fn test_generate_completions_every_shell() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            generate_completions(shell, &mut scaffold_command());
        }
    }

    #[test]
    fn test_bash_script_names_subcommands() {
        let mut cmd = scaffold_command();
        let mut script = Vec::new();
        generate(Shell::Bash, &mut cmd, "scaffold", &mut script);

        let script = String::from_utf8(script).unwrap();
        assert!(script.contains("scaffold"));
        assert!(script.contains("create"));
        assert!(script.contains("--package"));
    }

    #[tokio::test]
    async fn test_run_zsh() {
        let result = run(Shell::Zsh, &mut scaffold_command()).await;
        assert_eq!(result.unwrap(), ExitCode::SUCCESS);
    }
}
