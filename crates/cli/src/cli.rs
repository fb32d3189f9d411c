use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Kind of GSD document handled by `convert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentKind {
    /// A slash command, converted to a Vibe skill.
    Command,
    /// An agent definition, converted to a system prompt (or config with `--config`).
    Agent,
    /// A workflow document, patched for Vibe.
    Workflow,
}

/// Command-line interface for the `gsd-vibe` installer.
///
/// With no subcommand the installer runs using the top-level install flags.
#[derive(Debug, Parser)]
#[command(
    name = "gsd-vibe",
    version,
    about = "Installs GSD commands, agents and workflows into Mistral Vibe",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub install: InstallArgs,
}

/// Available `gsd-vibe` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Installs skills, agents, prompts and workflows into the Vibe home (default).
    Install(InstallArgs),
    /// Converts a single document and prints the result to stdout.
    Convert(ConvertArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct InstallArgs {
    /// GSD checkout containing `commands/`, `agents/` and `get-shit-done/` (defaults to the current directory).
    #[arg(long, env = "GSD_SOURCE", value_name = "DIR")]
    pub source: Option<PathBuf>,
    /// Vibe home directory (defaults to `~/.vibe`).
    #[arg(long, env = "VIBE_HOME", value_name = "DIR")]
    pub vibe_home: Option<PathBuf>,
    /// Model written into generated agent configs.
    #[arg(long, value_name = "MODEL")]
    pub agent_model: Option<String>,
    /// Prints the install report as JSON instead of a summary.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// Which conversion to apply.
    #[arg(value_enum)]
    pub kind: DocumentKind,
    /// Document to convert.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// For agents: print the TOML config instead of the system prompt.
    #[arg(long, default_value_t = false)]
    pub config: bool,
    /// Model written into the agent config.
    #[arg(long, value_name = "MODEL")]
    pub agent_model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_uses_top_level_install_flags() {
        let cli = Cli::try_parse_from(["gsd-vibe", "--vibe-home", "/tmp/vibe", "--json"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.install.vibe_home, Some(PathBuf::from("/tmp/vibe")));
        assert!(cli.install.json);
    }

    #[test]
    fn install_subcommand_parses_source_and_model() {
        let cli = Cli::try_parse_from([
            "gsd-vibe",
            "install",
            "--source",
            "/src/gsd",
            "--agent-model",
            "devstral",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Install(args)) => {
                assert_eq!(args.source, Some(PathBuf::from("/src/gsd")));
                assert_eq!(args.agent_model.as_deref(), Some("devstral"));
                assert!(!args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn convert_requires_kind_and_file() {
        assert!(Cli::try_parse_from(["gsd-vibe", "convert", "agent"]).is_err());
        let cli = Cli::try_parse_from(["gsd-vibe", "convert", "agent", "a.md", "--config"]).unwrap();
        match cli.command {
            Some(Commands::Convert(args)) => {
                assert_eq!(args.kind, DocumentKind::Agent);
                assert_eq!(args.file, PathBuf::from("a.md"));
                assert!(args.config);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn top_level_flags_conflict_with_subcommands() {
        assert!(Cli::try_parse_from(["gsd-vibe", "--json", "convert", "command", "x.md"]).is_err());
    }
}
