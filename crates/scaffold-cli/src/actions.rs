//! Action type definitions for CLI commands.

use clap::Subcommand;

/// Configuration file actions.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Write a configuration file with default values
    Init,

    /// Show the effective configuration
    Show,

    /// Print one configuration value
    Get {
        /// Dotted key, e.g. `project.build_tools`
        key: String,
    },

    /// Change one configuration value
    Set {
        /// Dotted key, e.g. `general.default_format`
        key: String,

        /// New value; lists are comma-separated
        value: String,
    },
}
