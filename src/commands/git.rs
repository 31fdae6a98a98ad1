use crate::commands::CommandSpec;
use crate::config::BashConfig;
use crate::eval::{CommandContext, Outcome};
use crate::external::Tools;

/// Global git options whose value is the next word.
const GLOBAL_OPTIONS_WITH_VALUE: &[&str] = &["-C", "-c", "--git-dir", "--work-tree", "--namespace"];

/// Short commit flags that consume the rest of their cluster (or the
/// next word) as a value, e.g. `-m msg`, `-Fmsg.txt`.
const SHORT_VALUE_FLAGS: &[char] = &['m', 'F', 'c', 'C', 't'];

pub struct GitSpec {
    long_bypass_flags: Vec<String>,
    short_bypass_subcommands: Vec<String>,
    hooks_path_keys: Vec<String>,
}

impl GitSpec {
    pub fn from_config(config: &BashConfig) -> Self {
        Self {
            long_bypass_flags: config.long_bypass_flags.clone(),
            short_bypass_subcommands: config.short_bypass_subcommands.clone(),
            hooks_path_keys: config.hooks_path_keys.clone(),
        }
    }

    /// Which hook-skipping option the command uses, if any.
    fn bypass(&self, ctx: &CommandContext) -> Option<String> {
        let args = ctx.args();

        if let Some(flag) = args.iter().find_map(|w| {
            self.long_bypass_flags
                .iter()
                .find(|f| w.starts_with(f.as_str()))
        }) {
            return Some(flag.clone());
        }

        if let Some(key) = self.hooks_path_override(args) {
            return Some(format!("-c {key}"));
        }

        let sub = ctx.subcommand(GLOBAL_OPTIONS_WITH_VALUE)?;
        if self.short_bypass_subcommands.iter().any(|s| s == sub)
            && has_short_n(ctx.subcommand_args(GLOBAL_OPTIONS_WITH_VALUE))
        {
            return Some("-n".into());
        }
        None
    }

    /// A `-c core.hooksPath=...` among the global options.
    fn hooks_path_override(&self, args: &[String]) -> Option<String> {
        let mut iter = args.iter();
        while let Some(word) = iter.next() {
            if !word.starts_with('-') {
                break;
            }
            if word != "-c" {
                if GLOBAL_OPTIONS_WITH_VALUE.contains(&word.as_str()) {
                    iter.next();
                }
                continue;
            }
            let key = iter.next()?.split('=').next().unwrap_or("");
            if self
                .hooks_path_keys
                .iter()
                .any(|k| k.eq_ignore_ascii_case(key))
            {
                return Some(key.to_string());
            }
        }
        None
    }
}

/// True if a short-option cluster (`-n`, `-an`, `-anm msg`) turns on `-n`
/// before any value-taking letter.
fn has_short_n(args: &[String]) -> bool {
    let mut skip_next = false;
    for word in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if word == "--" {
            break;
        }
        let Some(cluster) = word.strip_prefix('-') else {
            continue;
        };
        if cluster.is_empty() || cluster.starts_with('-') {
            continue;
        }
        for (i, ch) in cluster.char_indices() {
            if ch == 'n' {
                return true;
            }
            if SHORT_VALUE_FLAGS.contains(&ch) {
                skip_next = i + ch.len_utf8() == cluster.len();
                break;
            }
        }
    }
    false
}

impl CommandSpec for GitSpec {
    fn evaluate(&self, ctx: &CommandContext, _tools: &dyn Tools) -> Outcome {
        match self.bypass(ctx) {
            Some(flag) => Outcome::Deny(format!(
                "git {flag} is blocked.\n\n\
                 Pre-commit hooks exist for a reason (type-check, lint, tests).\n\
                 Run the commit without {flag} and fix any issues."
            )),
            None => Outcome::Allow,
        }
    }
}

// ── Queries ──

/// Name of the checked-out branch, or `""` when detached or outside a repo.
pub fn current_branch(tools: &dyn Tools) -> String {
    tools
        .run("git", &["branch", "--show-current"])
        .or_else(|| {
            tools
                .run("git", &["rev-parse", "--abbrev-ref", "HEAD"])
                .filter(|b| b != "HEAD")
        })
        .unwrap_or_default()
}

/// True if `remote` is configured.
pub fn has_remote(tools: &dyn Tools, remote: &str) -> bool {
    tools.run("git", &["remote", "get-url", remote]).is_some()
}

/// True if `remote` has a head named `branch`.
pub fn remote_branch_exists(tools: &dyn Tools, remote: &str, branch: &str) -> bool {
    tools
        .run("git", &["ls-remote", "--heads", remote, branch])
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::external::Scripted;

    fn spec() -> GitSpec {
        GitSpec::from_config(&Config::default_config().bash)
    }

    fn eval(cmd: &str) -> Outcome {
        let ctx = CommandContext::from_command(cmd);
        spec().evaluate(&ctx, &Scripted::new())
    }

    fn denied(cmd: &str) -> bool {
        matches!(eval(cmd), Outcome::Deny(_))
    }

    #[test]
    fn deny_no_verify() {
        assert!(denied("git commit --no-verify -m 'wip'"));
        assert!(denied("git push --no-verify"));
    }

    #[test]
    fn deny_no_verify_whitespace_variants() {
        assert!(denied("git   commit\t--no-verify"));
        assert!(denied("  git commit -m x --no-verify  "));
    }

    #[test]
    fn deny_short_n_on_commit() {
        assert!(denied("git commit -n -m wip"));
        assert!(denied("git commit -anm wip"));
        assert!(denied("git -C ../repo commit -n"));
    }

    #[test]
    fn deny_hooks_path_override() {
        assert!(denied("git -c core.hooksPath=/dev/null commit -m x"));
        assert!(denied("git -c core.hookspath=/tmp/none commit -m x"));
        assert!(denied("git -C repo -c core.hooksPath= commit -m x"));
    }

    #[test]
    fn allow_plain_commit() {
        assert_eq!(eval("git commit -m 'add login'"), Outcome::Allow);
    }

    #[test]
    fn allow_n_inside_message() {
        assert_eq!(eval("git commit -m -n"), Outcome::Allow);
        assert_eq!(eval("git commit -am 'mention --no-verify in text'"), Outcome::Allow);
    }

    #[test]
    fn allow_n_on_other_subcommands() {
        assert_eq!(eval("git log -n 5"), Outcome::Allow);
        assert_eq!(eval("git push -n origin main"), Outcome::Allow);
        // merge -n is --no-stat
        assert_eq!(eval("git merge -n feature"), Outcome::Allow);
        assert!(denied("git merge --no-verify feature"));
    }

    #[test]
    fn allow_other_config_override() {
        assert_eq!(eval("git -c user.name=bot commit -m x"), Outcome::Allow);
    }

    #[test]
    fn deny_message_names_flag() {
        let Outcome::Deny(reason) = eval("git commit --no-verify") else {
            panic!("expected deny");
        };
        assert!(reason.contains("--no-verify"));
    }

    #[test]
    fn current_branch_show_current() {
        let tools = Scripted::new().with("git branch --show-current", "feature/x");
        assert_eq!(current_branch(&tools), "feature/x");
    }

    #[test]
    fn current_branch_falls_back_to_rev_parse() {
        let tools = Scripted::new().with("git rev-parse --abbrev-ref HEAD", "main");
        assert_eq!(current_branch(&tools), "main");
    }

    #[test]
    fn current_branch_detached_is_empty() {
        let tools = Scripted::new().with("git rev-parse --abbrev-ref HEAD", "HEAD");
        assert_eq!(current_branch(&tools), "");
    }

    #[test]
    fn remote_queries() {
        let tools = Scripted::new()
            .with("git remote get-url origin", "git@github.com:o/r.git")
            .with("git ls-remote --heads origin bd-a1", "abc123\trefs/heads/bd-a1");
        assert!(has_remote(&tools, "origin"));
        assert!(!has_remote(&tools, "upstream"));
        assert!(remote_branch_exists(&tools, "origin", "bd-a1"));
        assert!(!remote_branch_exists(&tools, "origin", "bd-a2"));
    }
}
