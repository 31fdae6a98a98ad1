use anyhow::Context;
use serde_json::Value;

use crate::commands::git;
use crate::config::{Config, EditConfig};
use crate::eval::{HookEvent, Outcome, Payload};
use crate::external::Tools;
use crate::hooks::{Hook, line_count};

pub const NAME: &str = "enforce-branch-before-edit";

/// PreToolUse on Edit/MultiEdit/Write: no edits on protected branches,
/// confirmation for quick fixes elsewhere.
pub struct EditGuard {
    config: EditConfig,
}

impl EditGuard {
    pub fn from_config(config: &Config) -> Self {
        Self {
            config: config.edit.clone(),
        }
    }

    /// Plans, memory, worktrees and the instruction files are always editable.
    fn is_safe_path(&self, file_path: &str) -> bool {
        let c = &self.config;
        if c.safe_segments
            .iter()
            .any(|seg| contains_path_segment(file_path, seg))
        {
            return true;
        }
        if c.safe_filenames.iter().any(|name| name == file_name(file_path)) {
            return true;
        }
        // Memory zone: a `memory` segment in a path that mentions `.claude` anywhere.
        if !c.memory_root.is_empty()
            && contains_path_segment(file_path, &c.memory_segment)
            && file_path.contains(c.memory_root.as_str())
        {
            return true;
        }
        contains_path_segment(file_path, &c.worktree_segment)
    }

    fn is_protected(&self, branch: &str) -> bool {
        self.config.protected_branches.iter().any(|b| b == branch)
    }
}

impl Hook for EditGuard {
    fn name(&self) -> &'static str {
        NAME
    }

    fn event(&self) -> HookEvent {
        HookEvent::PreToolUse
    }

    fn evaluate(&self, payload: &Payload, tools: &dyn Tools) -> anyhow::Result<Outcome> {
        let file_path = match payload.str_at("tool_input.file_path") {
            "" => payload.str_at("tool_input.notebook_path"),
            p => p,
        };
        if self.is_safe_path(file_path) {
            return Ok(Outcome::Allow);
        }

        let cwd = match payload.str_at("cwd") {
            "" => std::env::current_dir()
                .context("reading working directory")?
                .to_string_lossy()
                .into_owned(),
            dir => dir.to_string(),
        };
        if contains_path_segment(&cwd, &self.config.worktree_segment) {
            return Ok(Outcome::Allow);
        }

        let branch = git::current_branch(tools);
        if self.is_protected(&branch) {
            return Ok(Outcome::Deny(format!(
                "Cannot edit files on {branch} branch.\n\n\
                 For quick fixes (<10 lines):\n  \
                 git checkout -b quick-fix-description\n  \
                 Then retry the edit (you'll be prompted for approval)\n\n\
                 For larger changes:\n  \
                 Use the full bead workflow with supervisors."
            )));
        }

        Ok(Outcome::Ask(format!(
            "Quick fix on branch '{branch}'?\n  \
             File: {}\n  \
             Change: {}\n\n\
             Approve for trivial changes (<10 lines).\n\
             Deny to use full bead workflow instead.",
            file_name(file_path),
            change_size(payload)
        )))
    }
}

/// Last path component, accepting either separator.
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or("")
}

/// True if the segments of `needle` (e.g. `.claude/plans`) appear
/// contiguously among the segments of `path`. An empty needle never matches.
pub fn contains_path_segment(path: &str, needle: &str) -> bool {
    let split = |s: &str| -> Vec<String> {
        s.split(['/', '\\'])
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()
    };
    let hay = split(path);
    let needle = split(needle);
    !needle.is_empty() && hay.windows(needle.len()).any(|w| w == needle.as_slice())
}

/// Human-readable size of the proposed change.
fn change_size(payload: &Payload) -> String {
    match payload.tool_name() {
        "Edit" => {
            let old = payload.str_at("tool_input.old_string");
            let new = payload.str_at("tool_input.new_string");
            format_edit(line_count(new), old.chars().count(), new.chars().count())
        }
        "MultiEdit" => {
            let edits = payload
                .get("tool_input.edits")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let field = |e: &Value, key: &str| e.get(key).and_then(Value::as_str).unwrap_or("").to_string();
            let (lines, old_chars, new_chars) = edits.iter().fold((0, 0, 0), |acc, e| {
                let old = field(e, "old_string");
                let new = field(e, "new_string");
                (
                    acc.0 + line_count(&new),
                    acc.1 + old.chars().count(),
                    acc.2 + new.chars().count(),
                )
            });
            format_edit(lines, old_chars, new_chars)
        }
        _ => format!(
            "~{} lines (new file)",
            line_count(payload.str_at("tool_input.content"))
        ),
    }
}

fn format_edit(lines: usize, old_chars: usize, new_chars: usize) -> String {
    format!("~{lines} lines ({old_chars} → {new_chars} chars)")
}
