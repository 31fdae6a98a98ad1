use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// User overlay location, relative to `$HOME`.
const OVERLAY_PATH: &str = ".config/beads-hooks/config.toml";

// ── Final (merged) config types ──

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub bash: BashConfig,
    #[serde(default)]
    pub edit: EditConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default)]
    pub install: InstallConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub escalate_deny: bool,
    /// Convert internal hook errors into ask instead of a warning.
    #[serde(default)]
    pub fail_closed: bool,
    #[serde(default)]
    pub log_file: String,
    #[serde(default)]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BashConfig {
    #[serde(default)]
    pub long_bypass_flags: Vec<String>,
    #[serde(default)]
    pub short_bypass_subcommands: Vec<String>,
    #[serde(default)]
    pub hooks_path_keys: Vec<String>,
    #[serde(default)]
    pub create_subcommands: Vec<String>,
    #[serde(default)]
    pub description_flags: Vec<String>,
    #[serde(default)]
    pub force_flag: String,
    #[serde(default)]
    pub completed_statuses: Vec<String>,
    #[serde(default)]
    pub epic_type: String,
    #[serde(default)]
    pub remote: String,
    #[serde(default)]
    pub branch_prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct EditConfig {
    #[serde(default)]
    pub protected_branches: Vec<String>,
    /// Path segment sequences (e.g. `.claude/plans`) that are always editable.
    #[serde(default)]
    pub safe_segments: Vec<String>,
    #[serde(default)]
    pub safe_filenames: Vec<String>,
    #[serde(default)]
    pub memory_root: String,
    #[serde(default)]
    pub memory_segment: String,
    #[serde(default)]
    pub worktree_segment: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DispatchConfig {
    #[serde(default)]
    pub marker: String,
    #[serde(default)]
    pub reminder: String,
    #[serde(default)]
    pub max_lines: usize,
    #[serde(default)]
    pub max_chars: usize,
    #[serde(default)]
    pub log_role: String,
    #[serde(default)]
    pub prompt_limit: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AgentsConfig {
    #[serde(default)]
    pub allowed: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct InstallConfig {
    #[serde(default)]
    pub skill_name: String,
    #[serde(default)]
    pub claude_dir: String,
    #[serde(default)]
    pub marker_file: String,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    bash: BashOverlay,
    #[serde(default)]
    edit: EditOverlay,
    #[serde(default)]
    dispatch: DispatchOverlay,
    #[serde(default)]
    agents: AgentsOverlay,
    #[serde(default)]
    install: InstallOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    escalate_deny: Option<bool>,
    fail_closed: Option<bool>,
    log_file: Option<String>,
    log_level: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct BashOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    long_bypass_flags: Vec<String>,
    #[serde(default)]
    short_bypass_subcommands: Vec<String>,
    #[serde(default)]
    hooks_path_keys: Vec<String>,
    #[serde(default)]
    create_subcommands: Vec<String>,
    #[serde(default)]
    description_flags: Vec<String>,
    #[serde(default)]
    completed_statuses: Vec<String>,
    #[serde(default)]
    remove_long_bypass_flags: Vec<String>,
    #[serde(default)]
    remove_short_bypass_subcommands: Vec<String>,
    #[serde(default)]
    remove_hooks_path_keys: Vec<String>,
    #[serde(default)]
    remove_create_subcommands: Vec<String>,
    #[serde(default)]
    remove_description_flags: Vec<String>,
    #[serde(default)]
    remove_completed_statuses: Vec<String>,
    force_flag: Option<String>,
    epic_type: Option<String>,
    remote: Option<String>,
    branch_prefix: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct EditOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    protected_branches: Vec<String>,
    #[serde(default)]
    safe_segments: Vec<String>,
    #[serde(default)]
    safe_filenames: Vec<String>,
    #[serde(default)]
    remove_protected_branches: Vec<String>,
    #[serde(default)]
    remove_safe_segments: Vec<String>,
    #[serde(default)]
    remove_safe_filenames: Vec<String>,
    memory_root: Option<String>,
    memory_segment: Option<String>,
    worktree_segment: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct DispatchOverlay {
    marker: Option<String>,
    reminder: Option<String>,
    max_lines: Option<usize>,
    max_chars: Option<usize>,
    log_role: Option<String>,
    prompt_limit: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct AgentsOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    allowed: Vec<String>,
    #[serde(default)]
    remove_allowed: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct InstallOverlay {
    skill_name: Option<String>,
    claude_dir: Option<String>,
    marker_file: Option<String>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

fn override_scalar<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Expand `~` and `$VAR` in a configured path. Unknown variables leave the
/// input untouched.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/beads-hooks/config.toml (if exists)
    pub fn load() -> Self {
        let Some(home) = std::env::var_os("HOME") else {
            return Self::default_config();
        };
        Self::load_from(&Path::new(&home).join(OVERLAY_PATH))
    }

    /// Defaults merged with the overlay at `path`. A missing file yields the
    /// defaults; a malformed one is reported and ignored.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Self::default_config();
        let Ok(content) = std::fs::read_to_string(path) else {
            return config;
        };
        match toml::from_str::<ConfigOverlay>(&content) {
            Ok(overlay) => config.apply_overlay(overlay),
            Err(e) => {
                #[allow(clippy::print_stderr)]
                {
                    eprintln!("beads-hooks: config parse error in {}: {e}", path.display());
                }
            }
        }
        config
    }

    /// Render the merged configuration as TOML (for `--dump-config`).
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolved path of the decision log.
    pub fn log_path(&self) -> Option<PathBuf> {
        if self.settings.log_file.is_empty() {
            None
        } else {
            Some(expand_path(&self.settings.log_file))
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        override_scalar(&mut self.settings.escalate_deny, s.escalate_deny);
        override_scalar(&mut self.settings.fail_closed, s.fail_closed);
        override_scalar(&mut self.settings.log_file, s.log_file);
        override_scalar(&mut self.settings.log_level, s.log_level);

        let b = overlay.bash;
        merge_list(
            &mut self.bash.long_bypass_flags,
            b.long_bypass_flags,
            &b.remove_long_bypass_flags,
            b.replace,
        );
        merge_list(
            &mut self.bash.short_bypass_subcommands,
            b.short_bypass_subcommands,
            &b.remove_short_bypass_subcommands,
            b.replace,
        );
        merge_list(
            &mut self.bash.hooks_path_keys,
            b.hooks_path_keys,
            &b.remove_hooks_path_keys,
            b.replace,
        );
        merge_list(
            &mut self.bash.create_subcommands,
            b.create_subcommands,
            &b.remove_create_subcommands,
            b.replace,
        );
        merge_list(
            &mut self.bash.description_flags,
            b.description_flags,
            &b.remove_description_flags,
            b.replace,
        );
        merge_list(
            &mut self.bash.completed_statuses,
            b.completed_statuses,
            &b.remove_completed_statuses,
            b.replace,
        );
        override_scalar(&mut self.bash.force_flag, b.force_flag);
        override_scalar(&mut self.bash.epic_type, b.epic_type);
        override_scalar(&mut self.bash.remote, b.remote);
        override_scalar(&mut self.bash.branch_prefix, b.branch_prefix);

        let e = overlay.edit;
        merge_list(
            &mut self.edit.protected_branches,
            e.protected_branches,
            &e.remove_protected_branches,
            e.replace,
        );
        merge_list(
            &mut self.edit.safe_segments,
            e.safe_segments,
            &e.remove_safe_segments,
            e.replace,
        );
        merge_list(
            &mut self.edit.safe_filenames,
            e.safe_filenames,
            &e.remove_safe_filenames,
            e.replace,
        );
        override_scalar(&mut self.edit.memory_root, e.memory_root);
        override_scalar(&mut self.edit.memory_segment, e.memory_segment);
        override_scalar(&mut self.edit.worktree_segment, e.worktree_segment);

        let d = overlay.dispatch;
        override_scalar(&mut self.dispatch.marker, d.marker);
        override_scalar(&mut self.dispatch.reminder, d.reminder);
        override_scalar(&mut self.dispatch.max_lines, d.max_lines);
        override_scalar(&mut self.dispatch.max_chars, d.max_chars);
        override_scalar(&mut self.dispatch.log_role, d.log_role);
        override_scalar(&mut self.dispatch.prompt_limit, d.prompt_limit);

        let a = overlay.agents;
        merge_list(&mut self.agents.allowed, a.allowed, &a.remove_allowed, a.replace);

        let i = overlay.install;
        override_scalar(&mut self.install.skill_name, i.skill_name);
        override_scalar(&mut self.install.claude_dir, i.claude_dir);
        override_scalar(&mut self.install.marker_file, i.marker_file);
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
