use serde::Serialize;

/// Claude Code hook event a hook is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookEvent {
    PreToolUse,
    PostToolUse,
}

impl HookEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            HookEvent::PreToolUse => "PreToolUse",
            HookEvent::PostToolUse => "PostToolUse",
        }
    }
}

/// The single result of one hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Exit silently.
    Allow,
    /// Block the tool call.
    Deny(String),
    /// Ask the user to approve the tool call.
    Ask(String),
    /// Plain text shown to the agent before the tool runs.
    Inject(String),
    /// Non-blocking warning attached to the hook output.
    Warn(String),
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Allow => "ALLOW",
            Outcome::Deny(_) => "DENY",
            Outcome::Ask(_) => "ASK",
            Outcome::Inject(_) => "INJECT",
            Outcome::Warn(_) => "WARN",
        }
    }

    /// Message carried by the outcome; empty for `Allow`.
    pub fn reason(&self) -> &str {
        match self {
            Outcome::Allow => "",
            Outcome::Deny(m) | Outcome::Ask(m) | Outcome::Inject(m) | Outcome::Warn(m) => m,
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Outcome::Allow)
    }

    /// What the process writes to stdout for this outcome, if anything.
    pub fn render(&self, event: HookEvent) -> Option<String> {
        let specific = match self {
            Outcome::Allow => return None,
            Outcome::Inject(text) => return Some(text.clone()),
            Outcome::Deny(reason) => HookSpecificOutput::permission(event, "deny", reason),
            Outcome::Ask(reason) => HookSpecificOutput::permission(event, "ask", reason),
            Outcome::Warn(message) => HookSpecificOutput::warning(event, message),
        };
        let output = HookOutput {
            hook_specific_output: specific,
        };
        serde_json::to_string(&output).ok()
    }
}

#[derive(Debug, Serialize)]
struct HookOutput<'a> {
    #[serde(rename = "hookSpecificOutput")]
    hook_specific_output: HookSpecificOutput<'a>,
}

#[derive(Debug, Serialize)]
struct HookSpecificOutput<'a> {
    #[serde(rename = "hookEventName")]
    hook_event_name: &'static str,
    #[serde(rename = "permissionDecision", skip_serializing_if = "Option::is_none")]
    permission_decision: Option<&'static str>,
    #[serde(
        rename = "permissionDecisionReason",
        skip_serializing_if = "Option::is_none"
    )]
    permission_decision_reason: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<&'a str>,
}

impl<'a> HookSpecificOutput<'a> {
    fn permission(event: HookEvent, decision: &'static str, reason: &'a str) -> Self {
        Self {
            hook_event_name: event.as_str(),
            permission_decision: Some(decision),
            permission_decision_reason: Some(reason),
            warning: None,
        }
    }

    fn warning(event: HookEvent, message: &'a str) -> Self {
        Self {
            hook_event_name: event.as_str(),
            permission_decision: None,
            permission_decision_reason: None,
            warning: Some(message),
        }
    }
}
