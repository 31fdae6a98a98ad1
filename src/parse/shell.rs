/// Stands in for an extracted substitution in the outer command.
const SUBST_PLACEHOLDER: &str = "__SUBST__";

/// Split a command line into the simple commands it runs.
///
/// Breaks at `&&`, `||`, `|&`, `|`, `;`, background `&`, newlines and
/// subshell parentheses. Bodies of `$(...)`, backticks and `<(...)`/`>(...)`
/// are split recursively and appended after the outer segments. `{ ... }`
/// group braces are dropped.
///
/// Single/double quotes and backslash escapes are respected, so
/// `git commit -m "a && b"` stays one segment. Empty segments are dropped.
pub fn split_segments(command: &str) -> Vec<String> {
    let (outer, substitutions) = extract_substitutions(command);
    let mut parts = split_outer(&outer);
    for inner in substitutions {
        parts.extend(split_segments(&inner));
    }
    parts
}

fn split_outer(command: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut chars = command.chars().peekable();
    let (mut sq, mut dq, mut esc) = (false, false, false);

    while let Some(c) = chars.next() {
        if esc {
            buf.push(c);
            esc = false;
            continue;
        }
        match c {
            '\\' if !sq => {
                esc = true;
                buf.push(c);
            }
            '\'' if !dq => {
                sq = !sq;
                buf.push(c);
            }
            '"' if !sq => {
                dq = !dq;
                buf.push(c);
            }
            _ if sq || dq => buf.push(c),
            '&' => match chars.peek() {
                Some('&') => {
                    chars.next();
                    flush(&mut parts, &mut buf);
                }
                // `&>file` redirect, `2>&1` / `<&3` fd duplication
                Some('>') => buf.push(c),
                _ if buf.ends_with(['>', '<']) => buf.push(c),
                _ => flush(&mut parts, &mut buf),
            },
            '|' => {
                // `||` and `|&` are two-char operators; `|` alone is a pipe.
                if matches!(chars.peek(), Some('|') | Some('&')) {
                    chars.next();
                }
                flush(&mut parts, &mut buf);
            }
            ';' | '\n' | '(' | ')' => flush(&mut parts, &mut buf),
            _ => buf.push(c),
        }
    }
    flush(&mut parts, &mut buf);
    parts
}

fn flush(parts: &mut Vec<String>, buf: &mut String) {
    let mut segment = buf.trim();
    // `{ cmd; }` grouping: the braces are words of their own.
    while let Some(rest) = segment.strip_prefix('{')
        && (rest.is_empty() || rest.starts_with(char::is_whitespace))
    {
        segment = rest.trim_start();
    }
    if segment != "}" && !segment.is_empty() {
        parts.push(segment.to_string());
    }
    buf.clear();
}

/// Pull `$(...)`, backtick and process-substitution bodies out of `command`.
///
/// Returns the outer command with each body replaced by a placeholder, and
/// the bodies themselves. Single quotes suppress substitution; double
/// quotes do not (except for process substitution).
fn extract_substitutions(command: &str) -> (String, Vec<String>) {
    let chars: Vec<char> = command.chars().collect();
    let mut outer = String::new();
    let mut inners = Vec::new();
    let mut i = 0;
    let (mut sq, mut dq, mut esc) = (false, false, false);

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if esc {
            outer.push(c);
            esc = false;
            i += 1;
            continue;
        }
        if c == '\\' && !sq {
            esc = true;
        } else if c == '\'' && !dq {
            sq = !sq;
        } else if c == '"' && !sq {
            dq = !dq;
        }
        if sq || c == '\\' || c == '\'' || c == '"' {
            outer.push(c);
            i += 1;
            continue;
        }

        let body = if c == '$' && next == Some('(') {
            let (body, end) = balanced(&chars, i + 2);
            i = end;
            Some(body)
        } else if matches!(c, '<' | '>') && next == Some('(') && !dq {
            let (body, end) = balanced(&chars, i + 2);
            i = end;
            Some(body)
        } else if c == '`' {
            let (body, end) = backticked(&chars, i + 1);
            i = end;
            Some(body)
        } else {
            None
        };

        match body {
            Some(body) => {
                let body = body.trim();
                if !body.is_empty() {
                    inners.push(body.to_string());
                }
                outer.push_str(SUBST_PLACEHOLDER);
            }
            None => {
                outer.push(c);
                i += 1;
            }
        }
    }

    (outer, inners)
}

/// Body of a parenthesized substitution starting at `start` (just past the
/// opening paren), and the index just past the matching `)`.
fn balanced(chars: &[char], start: usize) -> (String, usize) {
    let mut body = String::new();
    let mut depth: u32 = 1;
    let (mut sq, mut dq, mut esc) = (false, false, false);
    let mut i = start;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if esc {
            esc = false;
        } else if c == '\\' && !sq {
            esc = true;
        } else if c == '\'' && !dq {
            sq = !sq;
        } else if c == '"' && !sq {
            dq = !dq;
        } else if !sq && !dq {
            if c == '(' {
                depth += 1;
            } else if c == ')' {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }
        body.push(c);
    }
    (body, i)
}

/// Body of a backtick substitution (no nesting).
fn backticked(chars: &[char], start: usize) -> (String, usize) {
    let mut body = String::new();
    let mut i = start;
    while i < chars.len() && chars[i] != '`' {
        if chars[i] == '\\' && i + 1 < chars.len() {
            body.push(chars[i]);
            body.push(chars[i + 1]);
            i += 2;
            continue;
        }
        body.push(chars[i]);
        i += 1;
    }
    // closing backtick
    (body, (i + 1).min(chars.len()))
}
