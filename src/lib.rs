//! beads-hooks: policy hooks for Claude Code sessions driven by the beads
//! (`bd`) issue tracker.
//!
//! Each hook reads one tool-call event as JSON and returns an
//! [`eval::Outcome`]: allow, deny, ask, inject context, or warn. Hooks are
//! registered in a [`HookRegistry`](crate::eval::HookRegistry) built from
//! configuration, and consult `git`, `gh` and `bd` through the
//! [`external::Tools`] seam.
//!
//! # Architecture
//!
//! - **[`hooks`]**: the five hooks (bash-guard, enforce-branch-before-edit,
//!   remind-inprogress, task-post-use, validate-provider-agent).
//! - **[`commands`]**: per-program command policy and queries (git, gh, bd).
//! - **[`eval`]**: hook registry, payload access, outcomes, per-segment context.
//! - **[`parse`]**: shell segment splitting and shlex tokenizing.
//! - **[`external`]**: subprocess runner and its scripted test double.
//! - **[`config`]**: embedded defaults + user overlay merge.
//! - **[`install`]**: skill installer.
//! - **[`logging`]**: decision log under `~/.local/share/beads-hooks/`.

/// Command spec trait and per-program implementations.
pub mod commands;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Evaluation engine: registry, payload, outcomes, command context.
pub mod eval;
/// External program seam.
pub mod external;
/// The hooks themselves.
pub mod hooks;
/// Skill installer.
pub mod install;
/// File-based decision logging.
pub mod logging;
/// Shell command splitting and tokenizing.
pub mod parse;

use eval::{Outcome, Payload};
use external::Tools;

/// Build the registry from default config and run one hook over a raw JSON
/// payload. `None` if no hook has that name.
///
/// This is the main entry point for tests and simple usage.
/// For CLI usage with --escalate-deny or user config, build the registry directly.
pub fn evaluate(hook_name: &str, payload_json: &str, tools: &dyn Tools) -> Option<Outcome> {
    let config = config::Config::default_config();
    let registry = eval::HookRegistry::from_config(&config);
    let hook = registry.get(hook_name)?;
    Some(registry.evaluate(hook, &Payload::parse(payload_json), tools))
}
