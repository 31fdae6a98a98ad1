use std::fs::OpenOptions;
use std::str::FromStr;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::Config;
use crate::eval::Outcome;

/// Subjects longer than this are cut in the log.
const SUBJECT_LIMIT: usize = 200;

/// Route the `log` facade to the configured decision log file.
/// Best-effort: failures are silently ignored (logging must never block the hook).
pub fn init(config: &Config) {
    let Some(path) = config.log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let level = LevelFilter::from_str(&config.settings.log_level).unwrap_or(LevelFilter::Info);
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let _ = WriteLogger::init(level, log_config, file);
}

/// Record one hook decision.
pub fn log_decision(hook: &str, subject: &str, outcome: &Outcome) {
    log::info!("{}", format_record(hook, subject, outcome));
}

/// Tab-separated `hook  outcome  subject  reason`, reason flattened to one line.
fn format_record(hook: &str, subject: &str, outcome: &Outcome) -> String {
    let subject: String = subject
        .chars()
        .take(SUBJECT_LIMIT)
        .collect::<String>()
        .replace('\n', " ");
    let reason = outcome.reason().replace('\n', "; ");
    format!("{hook}\t{}\t{subject}\t{reason}", outcome.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_is_single_line() {
        let line = format_record(
            "bash-guard",
            "git commit\n--no-verify",
            &Outcome::Deny("blocked.\n\nfix it".into()),
        );
        assert_eq!(line, "bash-guard\tDENY\tgit commit --no-verify\tblocked.; ; fix it");
    }

    #[test]
    fn long_subject_truncated() {
        let line = format_record("remind-inprogress", &"a".repeat(500), &Outcome::Allow);
        let subject = line.split('\t').nth(2).unwrap();
        assert_eq!(subject.len(), SUBJECT_LIMIT);
    }
}
