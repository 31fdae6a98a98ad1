use crate::config::Config;
use crate::eval::{HookEvent, Outcome, Payload};
use crate::external::Tools;
use crate::hooks::Hook;

pub const NAME: &str = "validate-provider-agent";

/// PreToolUse on the provider delegator's invoke_agent tool: only
/// read-only/advisory agents may run outside the beads workflow.
pub struct ProviderAgent {
    allowed: Vec<String>,
}

impl ProviderAgent {
    pub fn from_config(config: &Config) -> Self {
        Self {
            allowed: config.agents.allowed.clone(),
        }
    }
}

impl Hook for ProviderAgent {
    fn name(&self) -> &'static str {
        NAME
    }

    fn event(&self) -> HookEvent {
        HookEvent::PreToolUse
    }

    fn evaluate(&self, payload: &Payload, _tools: &dyn Tools) -> anyhow::Result<Outcome> {
        let agent = payload.str_at("tool_input.agent");
        if self.allowed.iter().any(|a| a == agent) {
            return Ok(Outcome::Allow);
        }
        Ok(Outcome::Deny(format!(
            "Agent '{agent}' cannot be invoked via Codex. \
             Implementation agents (*-supervisor, discovery) must use Task() \
             with BEAD_ID for beads workflow."
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::Scripted;
    use serde_json::json;

    fn eval(agent: serde_json::Value) -> Outcome {
        let payload = Payload::from_value(json!({
            "tool_name": "mcp__provider_delegator__invoke_agent",
            "tool_input": {"agent": agent, "task_prompt": "review"}
        }));
        ProviderAgent::from_config(&Config::default_config())
            .evaluate(&payload, &Scripted::new())
            .unwrap()
    }

    #[test]
    fn allowed_agents_pass() {
        for agent in ["scout", "detective", "architect", "scribe", "code-reviewer"] {
            assert_eq!(eval(json!(agent)), Outcome::Allow, "{agent}");
        }
    }

    #[test]
    fn supervisor_denied() {
        let Outcome::Deny(reason) = eval(json!("rust-supervisor")) else {
            panic!("expected deny");
        };
        assert!(reason.contains("'rust-supervisor'"));
    }

    #[test]
    fn missing_agent_denied() {
        assert!(matches!(eval(json!(null)), Outcome::Deny(_)));
    }

    #[test]
    fn near_miss_denied() {
        assert!(matches!(eval(json!("Scout")), Outcome::Deny(_)));
        assert!(matches!(eval(json!("scout ")), Outcome::Deny(_)));
    }
}
