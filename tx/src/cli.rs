//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Triaxis - Three-Axis Coordination Engine
#[derive(Parser)]
#[command(
    name = "tx",
    about = "Bounded, deadline-aware coordinator for three-axis analytic sessions",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/triaxis/logs/triaxis.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Run concurrent coordinations against the reference collaborators
    Run {
        /// Number of sessions to submit at once
        #[arg(short = 'n', long, default_value = "3")]
        sessions: usize,

        /// Entity ID prefix; session i runs for "{entity}-{i}"
        #[arg(short, long, default_value = "entity")]
        entity: String,

        /// Thought content passed to every session
        #[arg(short, long, default_value = "")]
        thought: String,

        /// Override the per-session timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Call a single axis processor directly
    Axis {
        /// Axis to call (sequence, composition, thought)
        #[arg(value_name = "AXIS")]
        axis: AxisKind,

        /// Entity ID
        entity: String,

        /// Thought content (thought axis only)
        #[arg(long, default_value = "")]
        content: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the effective configuration as YAML
    Config,
}

/// Output format for run/axis commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Axis selector for the `axis` subcommand
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisKind {
    Sequence,
    Composition,
    Thought,
}

impl std::str::FromStr for AxisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequence" | "s" => Ok(Self::Sequence),
            "composition" | "c" => Ok(Self::Composition),
            "thought" | "t" => Ok(Self::Thought),
            _ => Err(format!("Unknown axis: {}. Use: sequence, composition or thought", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["tx"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::parse_from(["tx", "run"]);
        if let Some(Command::Run {
            sessions,
            entity,
            timeout_ms,
            format,
            ..
        }) = cli.command
        {
            assert_eq!(sessions, 3);
            assert_eq!(entity, "entity");
            assert!(timeout_ms.is_none());
            assert_eq!(format, OutputFormat::Text);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_run_options() {
        let cli = Cli::parse_from(["tx", "run", "-n", "5", "--timeout-ms", "50", "-f", "json"]);
        if let Some(Command::Run {
            sessions,
            timeout_ms,
            format,
            ..
        }) = cli.command
        {
            assert_eq!(sessions, 5);
            assert_eq!(timeout_ms, Some(50));
            assert_eq!(format, OutputFormat::Json);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_axis() {
        let cli = Cli::parse_from(["tx", "axis", "thought", "E1", "--content", "why"]);
        if let Some(Command::Axis { axis, entity, content, .. }) = cli.command {
            assert_eq!(axis, AxisKind::Thought);
            assert_eq!(entity, "E1");
            assert_eq!(content, "why");
        } else {
            panic!("Expected Axis command");
        }
    }

    #[test]
    fn test_cli_rejects_unknown_axis() {
        assert!(Cli::try_parse_from(["tx", "axis", "time", "E1"]).is_err());
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["tx", "-c", "/path/to/config.yml", "config"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.yml")));
        assert!(matches!(cli.command, Some(Command::Config)));
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("table".parse::<OutputFormat>().is_err());
        assert_eq!("c".parse::<AxisKind>(), Ok(AxisKind::Composition));
    }
}
