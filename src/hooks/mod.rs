//! The hooks Claude Code invokes, one per policy.
//!
//! Each hook reads fields from the [`Payload`] and returns exactly one
//! [`Outcome`]. Subagent bypass, escalation and error handling are applied
//! uniformly by [`HookRegistry`](crate::eval::HookRegistry), not here.

/// `bash-guard`: git hook bypass, bd create/close validation.
pub mod bash_guard;
/// `enforce-branch-before-edit`: protected branches and safe zones.
pub mod edit_guard;
/// `validate-provider-agent`: allow-list for delegated agents.
pub mod provider_agent;
/// `remind-inprogress`: status reminder before a bead dispatch.
pub mod remind;
/// `task-post-use`: response length limits and dispatch prompt logging.
pub mod task_post_use;

use crate::eval::{HookEvent, Outcome, Payload};
use crate::external::Tools;

pub trait Hook: Send + Sync {
    /// Name used on the command line (`beads-hooks <name>`).
    fn name(&self) -> &'static str;

    /// Event the hook is registered for in Claude Code settings.
    fn event(&self) -> HookEvent;

    /// Decide on one tool call.
    fn evaluate(&self, payload: &Payload, tools: &dyn Tools) -> anyhow::Result<Outcome>;
}

/// Number of lines in `text` as an editor would count them; `""` has none.
pub(crate) fn line_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.split('\n').count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_count_counts_segments() {
        assert_eq!(line_count(""), 0);
        assert_eq!(line_count("one"), 1);
        assert_eq!(line_count("one\ntwo"), 2);
        assert_eq!(line_count("one\n"), 2);
    }
}
