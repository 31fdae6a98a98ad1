//! Subprocess collaborators (git, gh, bd).
//!
//! Hooks never spawn processes directly; they go through [`Tools`] so that
//! tests can script the answers. Every failure mode (spawn error, non-zero
//! exit, empty output, unparseable JSON) collapses to `None`: an absent
//! signal, never an error.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

pub trait Tools {
    /// Run `program args`, returning trimmed stdout when the command exits
    /// successfully with non-empty output.
    fn run(&self, program: &str, args: &[&str]) -> Option<String>;

    /// Like [`Tools::run`], parsing stdout as JSON.
    fn run_json(&self, program: &str, args: &[&str]) -> Option<Value> {
        let out = self.run(program, args)?;
        match serde_json::from_str(&out) {
            Ok(v) => Some(v),
            Err(e) => {
                log::debug!("{program} {}: unparseable JSON: {e}", args.join(" "));
                None
            }
        }
    }
}

/// Real process execution.
#[derive(Debug, Default)]
pub struct System {
    cwd: Option<PathBuf>,
}

impl System {
    /// Run collaborators in `cwd` instead of the process working directory.
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
        }
    }
}

impl Tools for System {
    fn run(&self, program: &str, args: &[&str]) -> Option<String> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        let output = match cmd.output() {
            Ok(o) => o,
            Err(e) => {
                log::debug!("{program}: spawn failed: {e}");
                return None;
            }
        };
        if !output.status.success() {
            log::debug!(
                "{program} {}: exited with {}",
                args.join(" "),
                output.status
            );
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let trimmed = stdout.trim();
        log::debug!("{program} {} -> {} bytes", args.join(" "), trimmed.len());
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Canned collaborator answers keyed by the full command line
/// (`"git branch --show-current"`). Unscripted commands return `None`.
/// Every invocation is recorded for later inspection.
#[derive(Debug, Default)]
pub struct Scripted {
    responses: HashMap<String, String>,
    calls: RefCell<Vec<String>>,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script `command` to print `stdout`.
    pub fn with(mut self, command: &str, stdout: &str) -> Self {
        self.responses.insert(command.to_string(), stdout.to_string());
        self
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Tools for Scripted {
    fn run(&self, program: &str, args: &[&str]) -> Option<String> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        let answer = self.responses.get(&line).cloned();
        self.calls.borrow_mut().push(line);
        answer
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
