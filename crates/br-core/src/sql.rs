//! Statement splitting and identifier helpers.
//!
//! Schema scripts arrive as one text blob with several `;`-terminated
//! statements and interleaved `--` / `/* */` comments. [`split_statements`]
//! turns such a blob into the ordered list of statements the applier
//! executes one by one. No syntax validation happens here; a malformed
//! statement only fails once the database sees it.

/// Statement terminator.
pub const TERMINATOR: char = ';';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Code,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment,
}

/// Remove every `--` line comment and `/* */` block comment from `script`.
///
/// Comment markers inside single-quoted literals and double-quoted
/// identifiers are kept verbatim. A line comment keeps its terminating
/// newline and a block comment is replaced by a single space, so tokens on
/// either side never merge. An unterminated block comment runs to the end
/// of the input.
pub fn strip_comments(script: &str) -> String {
    let mut out = String::with_capacity(script.len());
    let mut state = LexState::Code;
    let mut chars = script.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            LexState::Code => match c {
                '\'' => {
                    out.push(c);
                    state = LexState::SingleQuoted;
                }
                '"' => {
                    out.push(c);
                    state = LexState::DoubleQuoted;
                }
                '-' if chars.peek() == Some(&'-') => {
                    chars.next();
                    state = LexState::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = LexState::BlockComment;
                }
                _ => out.push(c),
            },
            LexState::SingleQuoted | LexState::DoubleQuoted => {
                out.push(c);
                let quote = if state == LexState::SingleQuoted {
                    '\''
                } else {
                    '"'
                };
                if c == quote {
                    // A doubled quote is an escaped quote, not the end of the literal.
                    if chars.peek() == Some(&quote) {
                        chars.next();
                        out.push(quote);
                    } else {
                        state = LexState::Code;
                    }
                }
            }
            LexState::LineComment => {
                if c == '\n' {
                    out.push('\n');
                    state = LexState::Code;
                }
            }
            LexState::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push(' ');
                    state = LexState::Code;
                }
            }
        }
    }
    out
}

/// Split `script` into trimmed, non-empty, comment-free statements.
///
/// Terminators inside quoted literals and identifiers do not split. The
/// original relative order is preserved and the terminator itself is not
/// part of the returned text.
pub fn split_statements(script: &str) -> Vec<String> {
    let stripped = strip_comments(script);
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut state = LexState::Code;
    let mut chars = stripped.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            LexState::Code => match c {
                TERMINATOR => {
                    push_fragment(&mut statements, &current);
                    current.clear();
                    continue;
                }
                '\'' => state = LexState::SingleQuoted,
                '"' => state = LexState::DoubleQuoted,
                _ => {}
            },
            LexState::SingleQuoted | LexState::DoubleQuoted => {
                let quote = if state == LexState::SingleQuoted {
                    '\''
                } else {
                    '"'
                };
                if c == quote {
                    if chars.peek() == Some(&quote) {
                        current.push(c);
                        chars.next();
                    } else {
                        state = LexState::Code;
                    }
                }
            }
            // Comments are already gone.
            LexState::LineComment | LexState::BlockComment => {}
        }
        current.push(c);
    }
    push_fragment(&mut statements, &current);
    statements
}

fn push_fragment(statements: &mut Vec<String>, fragment: &str) {
    let trimmed = fragment.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}

/// Quote a SQL identifier, doubling embedded double quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote each dot-separated component of a possibly schema-qualified name.
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Split `schema.table` on the last dot. Unqualified names live in `main`.
pub fn split_qualified_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("main", name),
    }
}

#[cfg(test)]
#[path = "sql_test.rs"]
mod tests;
