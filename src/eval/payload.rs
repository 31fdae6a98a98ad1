use serde_json::Value;

/// The JSON document Claude Code writes to a hook's stdin.
///
/// Fields are read by dotted path. Anything missing or of the wrong type
/// reads as empty, so hooks never have to handle a malformed payload.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    value: Value,
}

impl Payload {
    /// Parse stdin contents. Malformed JSON yields an empty payload.
    pub fn parse(raw: &str) -> Self {
        let value = serde_json::from_str(raw).unwrap_or_else(|e| {
            log::debug!("payload is not valid JSON ({e}); treating as empty");
            Value::Null
        });
        Self { value }
    }

    pub fn from_value(value: Value) -> Self {
        Self { value }
    }

    /// Look up a dotted path such as `tool_input.file_path`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.value, |node, key| node.get(key))
    }

    /// String at `path`, or `""`.
    pub fn str_at(&self, path: &str) -> &str {
        self.get(path).and_then(Value::as_str).unwrap_or("")
    }

    pub fn tool_name(&self) -> &str {
        self.str_at("tool_name")
    }

    /// True when the call was issued by a delegated subagent rather than
    /// the top-level orchestrator.
    pub fn is_subagent(&self) -> bool {
        if self.get("is_subagent").and_then(Value::as_bool) == Some(true) {
            return true;
        }
        ["agent_id", "parent_tool_use_id"]
            .iter()
            .any(|key| !self.str_at(key).is_empty())
    }

    /// Replace `tool_input` with the JSON object in `raw` (the
    /// `CLAUDE_TOOL_INPUT` environment variable). Unparseable or non-object
    /// input leaves the payload untouched.
    pub fn override_tool_input(&mut self, raw: Option<&str>) {
        let Some(raw) = raw else {
            return;
        };
        let parsed: Value = match serde_json::from_str(raw) {
            Ok(v @ Value::Object(_)) => v,
            Ok(_) => return,
            Err(e) => {
                log::debug!("ignoring unparseable CLAUDE_TOOL_INPUT: {e}");
                return;
            }
        };
        if !self.value.is_object() {
            self.value = Value::Object(Default::default());
        }
        if let Some(map) = self.value.as_object_mut() {
            map.insert("tool_input".into(), parsed);
        }
    }

    /// The text a finished tool call returned: `tool_result` as a string,
    /// else `tool_response` as a string or as `{ content: [{ text }] }`.
    pub fn returned_text(&self) -> String {
        let result = self.str_at("tool_result");
        if !result.is_empty() {
            return result.to_string();
        }
        match self.get("tool_response") {
            Some(Value::String(s)) => s.clone(),
            Some(response) => response
                .get("content")
                .and_then(Value::as_array)
                .map(|parts| {
                    parts
                        .iter()
                        .filter_map(|p| p.get("text").and_then(Value::as_str))
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .unwrap_or_default(),
            None => String::new(),
        }
    }

    /// Short description of what the call is about, for the decision log.
    pub fn subject(&self) -> &str {
        [
            "tool_input.command",
            "tool_input.file_path",
            "tool_input.agent",
            "tool_input.subagent_type",
        ]
        .iter()
        .map(|path| self.str_at(path))
        .find(|s| !s.is_empty())
        .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dotted_path_lookup() {
        let p = Payload::from_value(json!({"tool_input": {"file_path": "/a/b.rs"}}));
        assert_eq!(p.str_at("tool_input.file_path"), "/a/b.rs");
        assert_eq!(p.str_at("tool_input.missing"), "");
        assert_eq!(p.str_at("nope.deeper"), "");
    }

    #[test]
    fn non_string_reads_empty() {
        let p = Payload::from_value(json!({"tool_input": {"command": 42}}));
        assert_eq!(p.str_at("tool_input.command"), "");
    }

    #[test]
    fn malformed_json_is_empty() {
        let p = Payload::parse("{not json");
        assert_eq!(p.tool_name(), "");
        assert!(!p.is_subagent());
    }

    #[test]
    fn subagent_flags() {
        assert!(Payload::from_value(json!({"is_subagent": true})).is_subagent());
        assert!(Payload::from_value(json!({"agent_id": "a-1"})).is_subagent());
        assert!(Payload::from_value(json!({"parent_tool_use_id": "toolu_1"})).is_subagent());
        assert!(!Payload::from_value(json!({"is_subagent": false, "agent_id": ""})).is_subagent());
    }

    #[test]
    fn tool_input_override() {
        let mut p = Payload::from_value(json!({"tool_input": {"command": "ls"}}));
        p.override_tool_input(Some(r#"{"command": "git status"}"#));
        assert_eq!(p.str_at("tool_input.command"), "git status");
    }

    #[test]
    fn tool_input_override_ignores_garbage() {
        let mut p = Payload::from_value(json!({"tool_input": {"command": "ls"}}));
        p.override_tool_input(Some("not json"));
        p.override_tool_input(Some("[1, 2]"));
        p.override_tool_input(None);
        assert_eq!(p.str_at("tool_input.command"), "ls");
    }

    #[test]
    fn tool_input_override_on_empty_payload() {
        let mut p = Payload::parse("");
        p.override_tool_input(Some(r#"{"command": "bd ready"}"#));
        assert_eq!(p.str_at("tool_input.command"), "bd ready");
    }

    #[test]
    fn returned_text_variants() {
        let p = Payload::from_value(json!({"tool_result": "done"}));
        assert_eq!(p.returned_text(), "done");

        let p = Payload::from_value(json!({"tool_response": "plain"}));
        assert_eq!(p.returned_text(), "plain");

        let p = Payload::from_value(json!({"tool_response": {"content": [
            {"type": "text", "text": "one"},
            {"type": "text", "text": "two"}
        ]}}));
        assert_eq!(p.returned_text(), "one\ntwo");

        assert_eq!(Payload::default().returned_text(), "");
    }

    #[test]
    fn subject_prefers_command() {
        let p = Payload::from_value(json!({"tool_input": {"command": "git log", "agent": "scout"}}));
        assert_eq!(p.subject(), "git log");
        let p = Payload::from_value(json!({"tool_input": {"agent": "scout"}}));
        assert_eq!(p.subject(), "scout");
    }
}
