//! Ordered text rewrites applied to GSD Markdown documents.
//!
//! Each [`Rewrite`] is a pure `&str -> String` transformation. Rewrites whose
//! expected shape is absent leave the text unchanged, so a malformed document
//! degrades to a partial conversion instead of an error.

use crate::frontmatter::edit_front_region;
use crate::tools::ToolMap;
use crate::Result;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// `Task(prompt="...", subagent_type="...", model="...")` with the model optional.
///
/// The prompt is matched lazily up to the first `", subagent_type="` pair, so a
/// prompt that is not a single literal (`prompt="a" + ctx`) extends into the
/// next call that has one.
static TASK_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"Task\(\s*prompt\s*=\s*"(?s:(?P<prompt>.*?))",\s*subagent_type\s*=\s*"(?P<agent>[^"]+)"(?:,\s*model\s*=\s*"[^"]*")?\s*\)"#,
    )
    .expect("valid regex")
});

/// A single transformation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    /// Replace the source home token with the target home token.
    HomePath,
    /// `name: ns:id` becomes `name: ns-id` plus `user-invocable: true`.
    SkillName,
    /// `Task(prompt=..., subagent_type=...)` becomes `task(task=..., agent=...)`.
    TaskInvocation,
    /// Remap the `allowed-tools:` list through the tool map.
    AllowedTools,
    /// `<home>/agents/<name>.md` becomes `<home>/prompts/<name>.md`.
    AgentPromptPath,
}

/// Steps applied to command definitions to produce skills.
pub const SKILL_REWRITES: &[Rewrite] = &[
    Rewrite::HomePath,
    Rewrite::SkillName,
    Rewrite::TaskInvocation,
    Rewrite::AllowedTools,
];

/// Steps applied to workflow documents.
pub const WORKFLOW_REWRITES: &[Rewrite] = &[
    Rewrite::HomePath,
    Rewrite::TaskInvocation,
    Rewrite::AgentPromptPath,
];

/// Home directory tokens as they appear inside documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeTokens {
    pub source: String,
    pub target: String,
}

impl Default for HomeTokens {
    fn default() -> Self {
        Self {
            source: "~/.claude".to_string(),
            target: "~/.vibe".to_string(),
        }
    }
}

/// Applies [`Rewrite`] steps with an injected tool map and home tokens.
#[derive(Debug, Clone)]
pub struct RewritePipeline {
    home: HomeTokens,
    tools: ToolMap,
    agent_ref: Regex,
}

impl RewritePipeline {
    pub fn new(home: HomeTokens, tools: ToolMap) -> Result<Self> {
        let agent_ref = Regex::new(&format!(
            r"{}/agents/(?P<name>[A-Za-z0-9_-]+\.md)",
            regex::escape(&home.target)
        ))?;
        Ok(Self {
            home,
            tools,
            agent_ref,
        })
    }

    /// Runs `steps` in order over `text`.
    pub fn apply(&self, steps: &[Rewrite], text: &str) -> String {
        steps
            .iter()
            .fold(text.to_string(), |acc, step| self.apply_one(*step, &acc))
    }

    /// Converts a command definition into a skill document.
    pub fn skill(&self, text: &str) -> String {
        self.apply(SKILL_REWRITES, text)
    }

    /// Patches a workflow document.
    pub fn workflow(&self, text: &str) -> String {
        self.apply(WORKFLOW_REWRITES, text)
    }

    fn apply_one(&self, step: Rewrite, text: &str) -> String {
        match step {
            Rewrite::HomePath => self.rewrite_home(text),
            Rewrite::SkillName => rewrite_skill_name(text),
            Rewrite::TaskInvocation => rewrite_task_invocations(text),
            Rewrite::AllowedTools => remap_allowed_tools(text, &self.tools),
            Rewrite::AgentPromptPath => self.relocate_agent_refs(text),
        }
    }

    fn rewrite_home(&self, text: &str) -> String {
        if self.home.source.is_empty() {
            return text.to_string();
        }
        text.replace(&self.home.source, &self.home.target)
    }

    fn relocate_agent_refs(&self, text: &str) -> String {
        self.agent_ref
            .replace_all(text, |caps: &Captures| {
                format!("{}/prompts/{}", self.home.target, &caps["name"])
            })
            .into_owned()
    }
}

fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

/// Returns the replacement for a `name: ns:id` line.
fn skill_name_line(line: &str) -> Option<String> {
    let value = line.trim_end().strip_prefix("name:")?.trim();
    let (namespace, id) = value.split_once(':')?;
    if !is_identifier(namespace) || !is_identifier(id) {
        return None;
    }
    let eol = line_ending(line);
    let sep = if eol.is_empty() { "\n" } else { eol };
    Some(format!(
        "name: {namespace}-{id}{sep}user-invocable: true{eol}"
    ))
}

/// Rewrites the first `name: ns:id` front-matter line.
pub fn rewrite_skill_name(text: &str) -> String {
    edit_front_region(text, |region| {
        let mut out = String::with_capacity(region.len() + 24);
        let mut replaced = false;
        for line in region.split_inclusive('\n') {
            match (!replaced).then(|| skill_name_line(line)).flatten() {
                Some(replacement) => {
                    out.push_str(&replacement);
                    replaced = true;
                }
                None => out.push_str(line),
            }
        }
        replaced.then_some(out)
    })
}

/// Escapes every double quote not already preceded by an escaping backslash.
///
/// Already escaped quotes are left alone, so escaping twice is a no-op.
pub fn escape_quotes(prompt: &str) -> String {
    let mut out = String::with_capacity(prompt.len());
    let mut escaped = false;
    for c in prompt.chars() {
        if c == '"' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out
}

/// Rewrites `Task(...)` invocations into `task(task=..., agent=...)`.
pub fn rewrite_task_invocations(text: &str) -> String {
    TASK_CALL
        .replace_all(text, |caps: &Captures| {
            format!(
                r#"task(task="{}", agent="{}")"#,
                escape_quotes(&caps["prompt"]),
                &caps["agent"]
            )
        })
        .into_owned()
}

fn is_allowed_tools_key(line: &str) -> bool {
    line.trim_end() == "allowed-tools:"
}

/// Extracts the item of an indented `- item` line.
fn list_item(line: &str) -> Option<&str> {
    if !line.starts_with([' ', '\t']) {
        return None;
    }
    let rest = line.trim().strip_prefix('-')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let item = rest.trim();
    (!item.is_empty()).then_some(item)
}

/// Remaps the first `allowed-tools:` block through `tools`.
pub fn remap_allowed_tools(text: &str, tools: &ToolMap) -> String {
    edit_front_region(text, |region| {
        let lines: Vec<&str> = region.split_inclusive('\n').collect();
        let key = lines.iter().position(|line| is_allowed_tools_key(line))?;
        let items: Vec<&str> = lines[key + 1..]
            .iter()
            .map_while(|line| list_item(line))
            .collect();
        if items.is_empty() {
            return None;
        }

        let eol = line_ending(lines[key]);
        let mut out = String::with_capacity(region.len());
        lines[..key].iter().for_each(|line| out.push_str(line));
        out.push_str("allowed-tools:");
        out.push_str(eol);
        for item in &items {
            out.push_str("  - ");
            out.push_str(tools.map(item));
            out.push_str(eol);
        }
        lines[key + 1 + items.len()..]
            .iter()
            .for_each(|line| out.push_str(line));
        Some(out)
    })
}
