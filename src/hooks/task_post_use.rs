use crate::commands::bd;
use crate::config::{Config, DispatchConfig};
use crate::eval::{HookEvent, Outcome, Payload};
use crate::external::Tools;
use crate::hooks::{Hook, line_count};

pub const NAME: &str = "task-post-use";

/// PostToolUse on Task: flags verbose subagent reports and records
/// supervisor dispatch prompts on their bead.
pub struct TaskPostUse {
    config: DispatchConfig,
}

impl TaskPostUse {
    pub fn from_config(config: &Config) -> Self {
        Self {
            config: config.dispatch.clone(),
        }
    }

    /// Warning text if `response` is over the line or character limit.
    fn verbosity_warning(&self, response: &str) -> Option<String> {
        if response.is_empty() {
            return None;
        }
        let lines = line_count(response);
        let chars = response.chars().count();
        let (max_lines, max_chars) = (self.config.max_lines, self.config.max_chars);
        if lines <= max_lines && chars <= max_chars {
            return None;
        }
        Some(format!(
            "Subagent response exceeded limits ({lines} lines, {chars} chars). \
             Target: {max_lines} lines, {max_chars} chars. \
             Consider asking agents for more concise reports."
        ))
    }

    /// Append the dispatch prompt to the bead it names, for supervisors.
    fn log_dispatch(&self, payload: &Payload, tools: &dyn Tools) {
        let subagent_type = payload.str_at("tool_input.subagent_type");
        if self.config.log_role.is_empty() || !subagent_type.contains(&self.config.log_role) {
            return;
        }
        let prompt = payload.str_at("tool_input.prompt");
        let Some(bead_id) = bead_id(prompt, &self.config.marker) else {
            return;
        };
        let truncated: String = prompt.chars().take(self.config.prompt_limit).collect();
        let text = format!("DISPATCH_PROMPT [{subagent_type}]:\n\n{truncated}");
        log::debug!("{NAME}: recording dispatch prompt on {bead_id}");
        bd::comment(tools, bead_id, &text);
    }
}

/// The id following `marker` (`BEAD_ID: proj-12` → `proj-12`).
fn bead_id<'a>(prompt: &'a str, marker: &str) -> Option<&'a str> {
    if marker.is_empty() {
        return None;
    }
    let start = prompt.find(marker)? + marker.len();
    let rest = prompt[start..].trim_start_matches([' ', '\t']);
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        .unwrap_or(rest.len());
    let id = &rest[..end];
    (!id.is_empty()).then_some(id)
}

impl Hook for TaskPostUse {
    fn name(&self) -> &'static str {
        NAME
    }

    fn event(&self) -> HookEvent {
        HookEvent::PostToolUse
    }

    fn evaluate(&self, payload: &Payload, tools: &dyn Tools) -> anyhow::Result<Outcome> {
        let warning = self.verbosity_warning(&payload.returned_text());
        self.log_dispatch(payload, tools);
        Ok(warning.map_or(Outcome::Allow, Outcome::Warn))
    }
}
