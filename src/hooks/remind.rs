use crate::config::Config;
use crate::eval::{HookEvent, Outcome, Payload};
use crate::external::Tools;
use crate::hooks::Hook;

pub const NAME: &str = "remind-inprogress";

/// PreToolUse on Task: reminds the orchestrator to mark the bead
/// in_progress before dispatching it.
pub struct Remind {
    marker: String,
    reminder: String,
}

impl Remind {
    pub fn from_config(config: &Config) -> Self {
        Self {
            marker: config.dispatch.marker.clone(),
            reminder: config.dispatch.reminder.clone(),
        }
    }
}

impl Hook for Remind {
    fn name(&self) -> &'static str {
        NAME
    }

    fn event(&self) -> HookEvent {
        HookEvent::PreToolUse
    }

    fn evaluate(&self, payload: &Payload, _tools: &dyn Tools) -> anyhow::Result<Outcome> {
        let prompt = payload.str_at("tool_input.prompt");
        if !self.marker.is_empty() && prompt.contains(&self.marker) {
            Ok(Outcome::Inject(self.reminder.clone()))
        } else {
            Ok(Outcome::Allow)
        }
    }
}
