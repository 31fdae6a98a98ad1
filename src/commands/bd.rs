use serde::Deserialize;
use serde_json::Value;

use crate::commands::{CommandSpec, gh, git};
use crate::config::BashConfig;
use crate::eval::{CommandContext, Outcome};
use crate::external::Tools;

/// Global bd options whose value is the next word.
const GLOBAL_OPTIONS_WITH_VALUE: &[&str] = &["--db", "--actor"];

/// One bd issue record as printed by `bd show --json` / `bd list --json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub issue_type: String,
}

pub struct BdSpec {
    create_subcommands: Vec<String>,
    description_flags: Vec<String>,
    force_flag: String,
    completed_statuses: Vec<String>,
    epic_type: String,
    remote: String,
    branch_prefix: String,
}

impl BdSpec {
    pub fn from_config(config: &BashConfig) -> Self {
        Self {
            create_subcommands: config.create_subcommands.clone(),
            description_flags: config.description_flags.clone(),
            force_flag: config.force_flag.clone(),
            completed_statuses: config.completed_statuses.clone(),
            epic_type: config.epic_type.clone(),
            remote: config.remote.clone(),
            branch_prefix: config.branch_prefix.clone(),
        }
    }

    /// `-d <text>`, `--description <text>` or `--description=<text>`.
    fn has_description(&self, args: &[String]) -> bool {
        args.iter().enumerate().any(|(i, word)| {
            self.description_flags.iter().any(|flag| {
                (word == flag && i + 1 < args.len())
                    || (flag.starts_with("--") && word.starts_with(&format!("{flag}=")))
            })
        })
    }

    fn is_completed(&self, status: &str) -> bool {
        self.completed_statuses.iter().any(|s| s == status)
    }

    /// True for `bd update <id> --status done` and friends.
    fn update_completes(&self, args: &[String]) -> bool {
        args.iter().enumerate().any(|(i, word)| {
            let value = match word.as_str() {
                "--status" | "-s" => args.get(i + 1).map(String::as_str),
                w => w.strip_prefix("--status="),
            };
            value.is_some_and(|v| self.is_completed(v))
        })
    }

    /// A bead's branch exists on the remote but was never merged.
    fn check_merged(&self, id: &str, tools: &dyn Tools) -> Option<String> {
        let branch = format!("{}{id}", self.branch_prefix);
        if !git::has_remote(tools, &self.remote)
            || !git::remote_branch_exists(tools, &self.remote, &branch)
        {
            return None;
        }
        if gh::merged_pr(tools, &branch).is_some() {
            return None;
        }
        Some(format!(
            "Cannot close bead '{id}': branch '{branch}' has no merged PR. \
             Create and merge a PR first, or use 'bd close {id} {}' to override.",
            self.force_flag
        ))
    }

    /// An epic still has children that are not done.
    fn check_epic_children(&self, id: &str, tools: &dyn Tools) -> Option<String> {
        let issue = show(tools, id)?;
        if issue.issue_type != self.epic_type {
            return None;
        }
        let prefix = format!("{id}.");
        let incomplete: Vec<Issue> = list(tools)
            .into_iter()
            .filter(|child| child.id.starts_with(&prefix) && !self.is_completed(&child.status))
            .collect();
        if incomplete.is_empty() {
            return None;
        }
        let listing = incomplete
            .iter()
            .map(|c| format!("{} ({})", c.id, c.status))
            .collect::<Vec<_>>()
            .join(", ");
        Some(format!(
            "Cannot close epic '{id}' - has {} incomplete children: {listing}. \
             Mark all children as done first.",
            incomplete.len()
        ))
    }

    fn evaluate_close(&self, ids: &[&str], tools: &dyn Tools) -> Outcome {
        for id in ids {
            if let Some(reason) = self.check_merged(id, tools) {
                return Outcome::Deny(reason);
            }
            if let Some(reason) = self.check_epic_children(id, tools) {
                return Outcome::Deny(reason);
            }
        }
        Outcome::Allow
    }
}

/// Issue ids: positional words up to the first flag.
fn issue_ids(args: &[String]) -> Vec<&str> {
    args.iter()
        .take_while(|w| !w.starts_with('-'))
        .map(String::as_str)
        .filter(|w| is_issue_id(w))
        .collect()
}

fn is_issue_id(word: &str) -> bool {
    !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

impl CommandSpec for BdSpec {
    fn evaluate(&self, ctx: &CommandContext, tools: &dyn Tools) -> Outcome {
        let Some(sub) = ctx.subcommand(GLOBAL_OPTIONS_WITH_VALUE) else {
            return Outcome::Allow;
        };
        let args = ctx.subcommand_args(GLOBAL_OPTIONS_WITH_VALUE);

        if self.create_subcommands.iter().any(|s| s == sub) {
            if self.has_description(args) {
                return Outcome::Allow;
            }
            return Outcome::Deny(format!(
                "bd {sub} requires description ({}) for supervisor context.",
                self.description_flags.join(" or ")
            ));
        }

        let closing = match sub {
            "close" => true,
            "update" => self.update_completes(args),
            _ => false,
        };
        if !closing || ctx.has_flag(&self.force_flag) {
            return Outcome::Allow;
        }
        self.evaluate_close(&issue_ids(args), tools)
    }
}

// ── Queries ──

/// `bd show <id> --json`. bd prints a one-element array; a bare object is
/// accepted too.
pub fn show(tools: &dyn Tools, id: &str) -> Option<Issue> {
    let value = tools.run_json("bd", &["show", id, "--json"])?;
    let record = match value {
        Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        v @ Value::Object(_) => v,
        _ => return None,
    };
    serde_json::from_value(record).ok()
}

/// `bd list --json`. Records that do not look like issues are skipped.
pub fn list(tools: &dyn Tools) -> Vec<Issue> {
    match tools.run_json("bd", &["list", "--json"]) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Attach `text` as a comment on issue `id`. bd's answer is not checked.
pub fn comment(tools: &dyn Tools, id: &str, text: &str) {
    tools.run("bd", &["comment", id, text]);
}
