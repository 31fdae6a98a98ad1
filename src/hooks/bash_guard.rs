use std::collections::HashMap;

use crate::commands::{CommandSpec, bd::BdSpec, git::GitSpec};
use crate::config::Config;
use crate::eval::{CommandContext, HookEvent, Outcome, Payload};
use crate::external::Tools;
use crate::hooks::Hook;
use crate::parse;

pub const NAME: &str = "bash-guard";

/// PreToolUse on Bash: evaluates each simple command of the line against
/// the `CommandSpec` registered for its program.
pub struct BashGuard {
    specs: HashMap<String, Box<dyn CommandSpec>>,
}

impl BashGuard {
    pub fn from_config(config: &Config) -> Self {
        let mut specs: HashMap<String, Box<dyn CommandSpec>> = HashMap::new();
        specs.insert("git".into(), Box::new(GitSpec::from_config(&config.bash)));
        specs.insert("bd".into(), Box::new(BdSpec::from_config(&config.bash)));
        Self { specs }
    }

    /// First non-allow outcome across the segments of `command`.
    pub fn evaluate_command(&self, command: &str, tools: &dyn Tools) -> Outcome {
        for segment in parse::split_segments(command) {
            let ctx = CommandContext::from_command(&segment);
            let Some(spec) = self.specs.get(&ctx.base_command) else {
                continue;
            };
            let outcome = spec.evaluate(&ctx, tools);
            if !outcome.is_allow() {
                log::debug!("{NAME}: segment [{segment}] -> {}", outcome.label());
                return outcome;
            }
        }
        Outcome::Allow
    }
}

impl Hook for BashGuard {
    fn name(&self) -> &'static str {
        NAME
    }

    fn event(&self) -> HookEvent {
        HookEvent::PreToolUse
    }

    fn evaluate(&self, payload: &Payload, tools: &dyn Tools) -> anyhow::Result<Outcome> {
        Ok(self.evaluate_command(payload.str_at("tool_input.command"), tools))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::Scripted;

    fn guard() -> BashGuard {
        BashGuard::from_config(&Config::default_config())
    }

    fn eval(cmd: &str) -> Outcome {
        guard().evaluate_command(cmd, &Scripted::new())
    }

    #[test]
    fn unrelated_programs_allowed() {
        assert_eq!(eval("ls -la && cargo test"), Outcome::Allow);
        assert_eq!(eval(""), Outcome::Allow);
    }

    #[test]
    fn bypass_in_later_segment_denied() {
        assert!(matches!(
            eval("cd repo && git add . && git commit --no-verify -m x"),
            Outcome::Deny(_)
        ));
    }

    #[test]
    fn bd_create_in_pipeline_denied() {
        assert!(matches!(
            eval("echo start; bd create 'Title'"),
            Outcome::Deny(_)
        ));
    }

    #[test]
    fn env_prefixed_git_detected() {
        assert!(matches!(
            eval("GIT_AUTHOR_NAME=bot /usr/bin/git commit -n"),
            Outcome::Deny(_)
        ));
    }

    #[test]
    fn quoted_operator_does_not_split() {
        assert_eq!(
            eval("git commit -m 'skip && --no-verify later'"),
            Outcome::Allow
        );
    }

    #[test]
    fn reads_command_from_payload() {
        let payload = Payload::from_value(serde_json::json!({
            "tool_name": "Bash",
            "tool_input": {"command": "git commit --no-verify"}
        }));
        let outcome = guard().evaluate(&payload, &Scripted::new()).unwrap();
        assert!(matches!(outcome, Outcome::Deny(_)));
    }
}
