pub mod context;
pub mod decision;
pub mod payload;

pub use context::CommandContext;
pub use decision::{HookEvent, Outcome};
pub use payload::Payload;

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::config::Config;
use crate::external::Tools;
use crate::hooks::Hook;

/// Registry of all hooks, keyed by command-line name.
pub struct HookRegistry {
    hooks: Vec<Box<dyn Hook>>,
    escalate_deny: bool,
    fail_closed: bool,
}

impl HookRegistry {
    /// Build the registry from configuration.
    pub fn from_config(config: &Config) -> Self {
        use crate::hooks::{
            bash_guard::BashGuard, edit_guard::EditGuard, provider_agent::ProviderAgent,
            remind::Remind, task_post_use::TaskPostUse,
        };

        let hooks: Vec<Box<dyn Hook>> = vec![
            Box::new(BashGuard::from_config(config)),
            Box::new(EditGuard::from_config(config)),
            Box::new(Remind::from_config(config)),
            Box::new(TaskPostUse::from_config(config)),
            Box::new(ProviderAgent::from_config(config)),
        ];

        Self {
            hooks,
            escalate_deny: config.settings.escalate_deny,
            fail_closed: config.settings.fail_closed,
        }
    }

    /// Override the escalate_deny setting (e.g. from --escalate-deny CLI flag).
    pub fn set_escalate_deny(&mut self, escalate: bool) {
        self.escalate_deny = escalate;
    }

    /// Look up a hook by name.
    pub fn get(&self, name: &str) -> Option<&dyn Hook> {
        self.hooks
            .iter()
            .find(|h| h.name() == name)
            .map(|b| b.as_ref())
    }

    /// Names of all registered hooks, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    /// Run one hook over one payload.
    ///
    /// Subagent calls are always allowed. Errors and panics inside the hook
    /// never block the tool call: they become a warning (or ask, with
    /// `fail_closed`).
    pub fn evaluate(&self, hook: &dyn Hook, payload: &Payload, tools: &dyn Tools) -> Outcome {
        if payload.is_subagent() {
            return Outcome::Allow;
        }

        let result = catch_unwind(AssertUnwindSafe(|| hook.evaluate(payload, tools)));
        let outcome = match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => self.internal_error(hook.name(), &format!("{e:#}")),
            Err(panic) => {
                let msg = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "panic".into());
                self.internal_error(hook.name(), &msg)
            }
        };
        self.maybe_escalate(outcome)
    }

    /// Outcome for a hook that could not reach a decision.
    pub fn internal_error(&self, hook: &str, error: &str) -> Outcome {
        log::error!("{hook}: {error}");
        let message = format!("{hook} hook error: {error}");
        if self.fail_closed {
            Outcome::Ask(message)
        } else {
            Outcome::Warn(message)
        }
    }

    /// Apply escalate_deny: DENY → ASK with annotation.
    fn maybe_escalate(&self, outcome: Outcome) -> Outcome {
        match outcome {
            Outcome::Deny(reason) if self.escalate_deny => {
                Outcome::Ask(format!("{reason} (escalated from deny)"))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::Scripted;
    use serde_json::json;

    struct Failing;

    impl Hook for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn event(&self) -> HookEvent {
            HookEvent::PreToolUse
        }
        fn evaluate(&self, _: &Payload, _: &dyn Tools) -> anyhow::Result<Outcome> {
            anyhow::bail!("bd database locked")
        }
    }

    struct Panicking;

    impl Hook for Panicking {
        fn name(&self) -> &'static str {
            "panicking"
        }
        fn event(&self) -> HookEvent {
            HookEvent::PreToolUse
        }
        fn evaluate(&self, _: &Payload, _: &dyn Tools) -> anyhow::Result<Outcome> {
            panic!("index out of bounds")
        }
    }

    fn registry() -> HookRegistry {
        HookRegistry::from_config(&Config::default_config())
    }

    fn main_branch() -> Scripted {
        Scripted::new().with("git branch --show-current", "main")
    }

    #[test]
    fn all_hooks_registered() {
        assert_eq!(
            registry().names(),
            vec![
                "bash-guard",
                "enforce-branch-before-edit",
                "remind-inprogress",
                "task-post-use",
                "validate-provider-agent",
            ]
        );
        assert!(registry().get("nope").is_none());
    }

    #[test]
    fn subagent_bypasses_every_hook() {
        let payload = Payload::from_value(json!({
            "is_subagent": true,
            "tool_name": "Edit",
            "tool_input": {
                "command": "git commit --no-verify",
                "file_path": "/r/src/lib.rs",
                "prompt": "BEAD_ID: x",
                "agent": "rust-supervisor"
            },
            "tool_result": "z".repeat(2000)
        }));
        let reg = registry();
        for name in reg.names() {
            let hook = reg.get(name).unwrap();
            assert_eq!(reg.evaluate(hook, &payload, &main_branch()), Outcome::Allow, "{name}");
        }
    }

    #[test]
    fn error_fails_open() {
        let outcome = registry().evaluate(&Failing, &Payload::default(), &Scripted::new());
        let Outcome::Warn(msg) = outcome else {
            panic!("expected warn");
        };
        assert!(msg.contains("failing hook error: bd database locked"));
    }

    #[test]
    fn panic_fails_open() {
        let outcome = registry().evaluate(&Panicking, &Payload::default(), &Scripted::new());
        let Outcome::Warn(msg) = outcome else {
            panic!("expected warn");
        };
        assert!(msg.contains("index out of bounds"));
    }

    #[test]
    fn fail_closed_asks() {
        let mut config = Config::default_config();
        config.settings.fail_closed = true;
        let reg = HookRegistry::from_config(&config);
        assert!(matches!(
            reg.evaluate(&Failing, &Payload::default(), &Scripted::new()),
            Outcome::Ask(_)
        ));
    }

    #[test]
    fn escalate_deny_turns_deny_into_ask() {
        let mut reg = registry();
        reg.set_escalate_deny(true);
        let payload = Payload::from_value(json!({"tool_input": {"agent": "rogue"}}));
        let hook = reg.get("validate-provider-agent").unwrap();
        let Outcome::Ask(reason) = reg.evaluate(hook, &payload, &Scripted::new()) else {
            panic!("expected ask");
        };
        assert!(reason.ends_with("(escalated from deny)"));
    }
}
