//! GSD → Vibe installer.
//!
//! Converts GSD command definitions into Vibe skills, splits agent
//! definitions into prompt bodies and TOML agent configs, patches workflow
//! documents, and mirrors the core support files into `~/.vibe`.
//!
//! # Examples
//!
//! ```
//! use gsd_install::{HomeTokens, RewritePipeline, ToolMap};
//!
//! let pipeline = RewritePipeline::new(HomeTokens::default(), ToolMap::default()).unwrap();
//! let skill = pipeline.skill(
//!     "---\nname: gsd:plan\nallowed-tools:\n  - Read\n  - Bash\n---\nSee ~/.claude/notes.md\n",
//! );
//!
//! assert!(skill.contains("name: gsd-plan\nuser-invocable: true\n"));
//! assert!(skill.contains("  - read_file\n  - bash\n"));
//! assert!(skill.contains("~/.vibe/notes.md"));
//! ```

#![deny(unsafe_code)]

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub mod agents;
pub mod frontmatter;
pub mod install;
pub mod layout;
pub mod mirror;
pub mod report;
pub mod rewrite;
pub mod skills;
pub mod tools;
pub(crate) mod utils;
pub mod workflows;

pub use agents::{AgentConfig, ToolPermission, DEFAULT_AGENT_MODEL};
pub use frontmatter::{find_front_block, strip_front_matter, FrontBlock};
pub use install::{Installer, RUNTIME};
pub use layout::{resolve_vibe_home, InstallLayout};
pub use mirror::{mark_executable, mirror_tree, MirrorReport};
pub use report::{InstallReport, WriteReport};
pub use rewrite::{HomeTokens, Rewrite, RewritePipeline, SKILL_REWRITES, WORKFLOW_REWRITES};
pub use tools::ToolMap;
