use crate::cli::{Cli, Commands, ConvertArgs, DocumentKind, InstallArgs};
use anyhow::{Context, Result};
use clap::Parser;
use gsd_install::{
    resolve_vibe_home, strip_front_matter, AgentConfig, HomeTokens, InstallLayout, Installer,
    RewritePipeline, ToolMap, DEFAULT_AGENT_MODEL,
};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

const COMPLETION_MESSAGE: &str = "Installation complete! Please restart Vibe CLI.";

/// Parses arguments and runs the selected command.
pub fn run() -> Result<()> {
    // Progress goes to stderr at `info` unless RUST_LOG says otherwise.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Install(args)) => handle_install(args),
        Some(Commands::Convert(args)) => handle_convert(args),
        None => handle_install(cli.install),
    }
}

fn handle_install(args: InstallArgs) -> Result<()> {
    let source = match args.source {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };
    let vibe_home = resolve_vibe_home(args.vibe_home)?;
    info!(source = %source.display(), vibe_home = %vibe_home.display(), "Installing GSD for Vibe");

    let mut installer = Installer::new(InstallLayout::new(source, vibe_home))?;
    if let Some(model) = args.agent_model {
        installer = installer.with_agent_model(model);
    }
    let report = installer.install().context("Installation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    for warning in report.warnings() {
        eprintln!("warning: {warning}");
    }
    print!("{}", report.format_summary());
    println!("{COMPLETION_MESSAGE}");
    Ok(())
}

fn handle_convert(args: ConvertArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let output = match args.kind {
        DocumentKind::Command => default_pipeline()?.skill(&content),
        DocumentKind::Workflow => default_pipeline()?.workflow(&content),
        DocumentKind::Agent if args.config => {
            let model = args.agent_model.as_deref().unwrap_or(DEFAULT_AGENT_MODEL);
            AgentConfig::for_agent(&document_name(&args.file)?, model).to_toml()?
        }
        DocumentKind::Agent => strip_front_matter(&content).to_string(),
    };
    print!("{output}");
    Ok(())
}

fn default_pipeline() -> Result<RewritePipeline> {
    RewritePipeline::new(HomeTokens::default(), ToolMap::default())
}

fn document_name(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .with_context(|| format!("No file name in {}", path.display()))
}
