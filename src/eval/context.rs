use crate::parse;

/// One simple command out of a (possibly compound) shell line.
#[derive(Debug)]
pub struct CommandContext<'a> {
    /// The full command text of this segment.
    pub raw: &'a str,
    /// The program name (e.g. "git", "bd").
    pub base_command: String,
    /// All words in the command (tokenized via shlex).
    pub words: Vec<String>,
    /// Leading KEY=VALUE environment variable assignments.
    pub env_vars: Vec<(String, String)>,
}

impl<'a> CommandContext<'a> {
    /// Build a CommandContext from a raw command string.
    pub fn from_command(raw: &'a str) -> Self {
        let words = parse::tokenize(raw);
        let base_command = parse::base_command(&words);
        let env_vars = parse::env_vars(&words);

        Self {
            raw,
            base_command,
            words,
            env_vars,
        }
    }

    /// Words after the env assignments and the program name.
    pub fn args(&self) -> &[String] {
        let skip = self.env_vars.len() + 1;
        self.words.get(skip..).unwrap_or(&[])
    }

    /// Index into `args()` of the subcommand, skipping global options.
    ///
    /// `takes_value` lists global options whose value is the following word
    /// (git's `-C <path>` and `-c <key=value>`).
    pub fn subcommand_index(&self, takes_value: &[&str]) -> Option<usize> {
        let args = self.args();
        let mut i = 0;
        while i < args.len() {
            let word = args[i].as_str();
            if takes_value.contains(&word) {
                i += 2;
            } else if word.starts_with('-') {
                i += 1;
            } else {
                return Some(i);
            }
        }
        None
    }

    /// The subcommand word (`commit` in `git -C repo commit -m x`).
    pub fn subcommand(&self, takes_value: &[&str]) -> Option<&str> {
        self.subcommand_index(takes_value)
            .map(|i| self.args()[i].as_str())
    }

    /// Words following the subcommand.
    pub fn subcommand_args(&self, takes_value: &[&str]) -> &[String] {
        match self.subcommand_index(takes_value) {
            Some(i) => &self.args()[i + 1..],
            None => &[],
        }
    }

    /// Check if any word matches a flag.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.words.iter().any(|w| w == flag)
    }
}
