//! Skill installer.
//!
//! Copies the orchestration skill into the agent's skills directory and
//! records where the package lives so bootstrap tooling can find it again.
//! Nothing here is fatal: failures are collected as warnings.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::InstallConfig;

/// What an install run did.
#[derive(Debug, Default)]
pub struct InstallReport {
    /// Destination of the copied skill file, if it was copied.
    pub skill: Option<PathBuf>,
    /// The marker file holding the source path, if it was written.
    pub marker: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl InstallReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Install the skill from `source` into `claude_dir`.
pub fn install(config: &InstallConfig, source: &Path, claude_dir: &Path) -> InstallReport {
    let mut report = InstallReport::default();

    match copy_skill(config, source, claude_dir) {
        Ok(Some(dest)) => report.skill = Some(dest),
        Ok(None) => report.warnings.push(format!(
            "source skill not found: {}",
            skill_source(config, source).display()
        )),
        Err(e) => report.warnings.push(format!("{e:#}")),
    }

    match write_marker(config, source, claude_dir) {
        Ok(path) => report.marker = Some(path),
        Err(e) => report.warnings.push(format!("{e:#}")),
    }

    for w in &report.warnings {
        log::warn!("install: {w}");
    }
    report
}

fn skill_source(config: &InstallConfig, source: &Path) -> PathBuf {
    source
        .join("skills")
        .join(&config.skill_name)
        .join("SKILL.md")
}

/// `Ok(None)` when the source skill file does not exist.
fn copy_skill(
    config: &InstallConfig,
    source: &Path,
    claude_dir: &Path,
) -> anyhow::Result<Option<PathBuf>> {
    let dest_dir = claude_dir.join("skills").join(&config.skill_name);
    fs::create_dir_all(&dest_dir)
        .with_context(|| format!("creating {}", dest_dir.display()))?;

    let src = skill_source(config, source);
    if !src.is_file() {
        return Ok(None);
    }
    let dest = dest_dir.join("SKILL.md");
    fs::copy(&src, &dest)
        .with_context(|| format!("copying {} to {}", src.display(), dest.display()))?;
    Ok(Some(dest))
}

fn write_marker(config: &InstallConfig, source: &Path, claude_dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(claude_dir)
        .with_context(|| format!("creating {}", claude_dir.display()))?;
    let marker = claude_dir.join(&config.marker_file);
    fs::write(&marker, source.to_string_lossy().as_bytes())
        .with_context(|| format!("writing {}", marker.display()))?;
    Ok(marker)
}
