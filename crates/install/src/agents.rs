//! Agent definitions → Vibe prompt bodies and TOML agent configs.

use crate::frontmatter::strip_front_matter;
use crate::report::WriteReport;
use crate::utils::{file_stem, markdown_files, read_document, write_document};
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Model written into every generated agent config.
pub const DEFAULT_AGENT_MODEL: &str = "mistral-large-latest";

/// Role tag for generated agents.
pub const AGENT_TYPE: &str = "subagent";

/// Tools every generated agent may use without asking.
pub const GRANTED_TOOLS: [&str; 6] = [
    "read_file",
    "write_file",
    "bash",
    "grep",
    "list_dir",
    "ask_user_question",
];

const ALWAYS: &str = "always";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPermission {
    pub permission: String,
}

/// Vibe agent configuration (`agents/<name>.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Name of the prompt file under `prompts/`, without extension
    pub system_prompt_id: String,
    pub active_model: String,
    pub agent_type: String,
    /// Must stay last: TOML tables follow plain values.
    pub tools: BTreeMap<String, ToolPermission>,
}

impl AgentConfig {
    /// Config for `name` granting every tool in [`GRANTED_TOOLS`].
    pub fn for_agent(name: &str, model: &str) -> Self {
        let tools = GRANTED_TOOLS
            .iter()
            .map(|tool| {
                (
                    tool.to_string(),
                    ToolPermission {
                        permission: ALWAYS.to_string(),
                    },
                )
            })
            .collect();
        Self {
            system_prompt_id: name.to_string(),
            active_model: model.to_string(),
            agent_type: AGENT_TYPE.to_string(),
            tools,
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self)
            .with_context(|| format!("Failed to serialize agent config: {}", self.system_prompt_id))
    }
}

/// Splits every agent in `agents_dir` into `<prompts_root>/<name>.md` and
/// `<configs_root>/<name>.toml`.
pub fn convert_agents(
    agents_dir: &Path,
    prompts_root: &Path,
    configs_root: &Path,
    model: &str,
) -> Result<WriteReport> {
    let mut report = WriteReport::default();

    for path in markdown_files(agents_dir)? {
        let name = file_stem(&path)?;
        let content = read_document(&path)?;

        write_document(
            &prompts_root.join(format!("{name}.md")),
            strip_front_matter(&content),
        )?;

        let config = AgentConfig::for_agent(&name, model).to_toml()?;
        write_document(&configs_root.join(format!("{name}.toml")), &config)?;

        info!(agent = %name, "Created agent");
        report.record(name);
    }

    Ok(report)
}
