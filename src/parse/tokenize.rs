/// True if `word` looks like a shell `NAME=value` assignment.
fn is_assignment(word: &str) -> bool {
    let Some((name, _)) = word.split_once('=') else {
        return false;
    };
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

/// Extract the program name, skipping leading VAR=value assignments and any
/// directory prefix (`/usr/bin/git` → `git`).
pub fn base_command(words: &[String]) -> String {
    let word = words
        .iter()
        .find(|w| !is_assignment(w))
        .map(String::as_str)
        .unwrap_or("");
    match word.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => name.to_string(),
        _ => word.to_string(),
    }
}

/// Leading KEY=VALUE pairs of a tokenized command.
pub fn env_vars(words: &[String]) -> Vec<(String, String)> {
    words
        .iter()
        .take_while(|w| is_assignment(w))
        .filter_map(|w| w.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Tokenize a command segment into words using shlex (POSIX word splitting).
pub fn tokenize(command: &str) -> Vec<String> {
    shlex::split(command).unwrap_or_else(|| {
        // Unbalanced quotes: fall back to whitespace splitting
        command.split_whitespace().map(String::from).collect()
    })
}
