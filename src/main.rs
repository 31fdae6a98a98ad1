//! beads-hooks: Claude Code hooks for the beads orchestration workflow.
//!
//! Usage:
//!   beads-hooks [--escalate-deny] <hook>     read one event from stdin
//!   beads-hooks install [--source DIR] [--home DIR]
//!   beads-hooks --dump-config
//!
//! Hooks always exit 0. Deny/ask/warn go to stdout as JSON, injected
//! context as plain text, allow prints nothing.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;

use beads_hooks::config::{Config, expand_path};
use beads_hooks::eval::{HookRegistry, Payload};
use beads_hooks::external::System;
use beads_hooks::hooks::bash_guard;
use beads_hooks::{install, logging};

fn usage(registry: &HookRegistry) -> String {
    format!(
        "usage: beads-hooks [--escalate-deny] <hook>\n       \
         beads-hooks install [--source DIR] [--home DIR]\n       \
         beads-hooks --dump-config\n\nhooks: {}",
        registry.names().join(", ")
    )
}

fn main() {
    let config = Config::load();
    logging::init(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--dump-config") {
        match config.to_toml() {
            Ok(text) => print!("{text}"),
            Err(e) => eprintln!("beads-hooks: {e:#}"),
        }
        return;
    }

    if args.first().map(String::as_str) == Some("install") {
        run_install(&config, &args[1..]);
        return;
    }

    let mut registry = HookRegistry::from_config(&config);
    if args.iter().any(|a| a == "--escalate-deny") {
        registry.set_escalate_deny(true);
    }

    let Some(name) = args.iter().find(|a| !a.starts_with("--")) else {
        eprintln!("{}", usage(&registry));
        return;
    };
    let Some(hook) = registry.get(name) else {
        eprintln!("beads-hooks: unknown hook '{name}'\n\n{}", usage(&registry));
        return;
    };

    let outcome = match read_stdin() {
        Ok(input) => {
            let mut payload = Payload::parse(&input);
            if hook.name() == bash_guard::NAME {
                let env_input = std::env::var("CLAUDE_TOOL_INPUT").ok();
                payload.override_tool_input(env_input.as_deref());
            }
            let tools = tools_for(&payload);
            let outcome = registry.evaluate(hook, &payload, &tools);
            logging::log_decision(hook.name(), payload.subject(), &outcome);
            outcome
        }
        Err(e) => {
            let outcome = registry.internal_error(hook.name(), &format!("{e:#}"));
            logging::log_decision(hook.name(), "", &outcome);
            outcome
        }
    };

    if let Some(text) = outcome.render(hook.event()) {
        println!("{text}");
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading hook payload from stdin")?;
    Ok(input)
}

/// Run subprocesses in the session's directory when the payload names one.
fn tools_for(payload: &Payload) -> System {
    match payload.str_at("cwd") {
        "" => System::default(),
        dir if Path::new(dir).is_dir() => System::in_dir(dir),
        _ => System::default(),
    }
}

fn run_install(config: &Config, args: &[String]) {
    let mut source: Option<PathBuf> = None;
    let mut claude_dir = expand_path(&config.install.claude_dir);

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--source" => source = iter.next().map(|s| expand_path(s)),
            "--home" => {
                if let Some(home) = iter.next() {
                    claude_dir = expand_path(home).join(".claude");
                }
            }
            other => eprintln!("beads-hooks install: ignoring argument '{other}'"),
        }
    }

    let source = match source.map(Ok).unwrap_or_else(std::env::current_dir) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("beads-hooks install: cannot determine source directory: {e}");
            return;
        }
    };

    println!("Installing beads-orchestration skill...");
    let report = install::install(&config.install, &source, &claude_dir);
    if let Some(skill) = &report.skill {
        println!("Installed skill to: {}", skill.display());
    }
    if let Some(marker) = &report.marker {
        println!("Saved package path to: {}", marker.display());
    }
    for w in &report.warnings {
        eprintln!("warning: {w}");
    }
    if !report.is_clean() {
        eprintln!("You can run bootstrap manually: npx beads-orchestration bootstrap");
    }
    println!(
        "\nPackage location: {}\n\nIn any Claude Code session, run:\n\n    /{}\n",
        source.display(),
        config.install.skill_name
    );
}
