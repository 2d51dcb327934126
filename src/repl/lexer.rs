//! Splits an input line into command tokens.
//!
//! Beyond whitespace splitting: quotes group (and are stripped, shell
//! style), bracketed literals like `[1, 'x']` stay one token with their
//! quotes intact so the cast grammar sees them, `$...$` expressions stay
//! one token for later expansion, and a leading `!` hands the rest of the
//! line over raw.

use crate::error::CommandError;

pub fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if let Some(rest) = trimmed.strip_prefix('!') {
        return Ok(vec!["!".to_string(), rest.trim_start().to_string()]);
    }
    if trimmed.starts_with('#') {
        return Ok(vec!["#".to_string()]);
    }

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut has_token = false;
    let mut depth = 0usize;
    let mut in_dollar = false;
    let mut chars = trimmed.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            _ if in_dollar => {
                current.push(c);
                if c == '$' {
                    in_dollar = false;
                }
            }
            '\'' | '"' => {
                has_token = true;
                // Inside a bracket group the quotes belong to the literal.
                if depth > 0 {
                    current.push(c);
                }
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == c {
                        closed = true;
                        break;
                    }
                    current.push(inner);
                }
                if !closed {
                    return Err(CommandError::Syntax("unclosed quote".to_string()));
                }
                if depth > 0 {
                    current.push(c);
                }
            }
            '$' if depth == 0 => {
                has_token = true;
                current.push(c);
                in_dollar = true;
            }
            '[' | '{' | '(' => {
                has_token = true;
                depth += 1;
                current.push(c);
            }
            ']' | '}' | ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            _ if c.is_whitespace() && depth == 0 => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            _ => {
                has_token = true;
                current.push(c);
            }
        }
    }
    // An unclosed bracket or `$` is taken leniently: the rest of the line
    // was one token.
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(line: &str) -> Vec<String> {
        tokenize(line).unwrap()
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(ok("set 42 -p a/b"), ["set", "42", "-p", "a/b"]);
        assert_eq!(ok("  ls  "), ["ls"]);
        assert!(ok("").is_empty());
        assert!(ok("   ").is_empty());
    }

    #[test]
    fn quotes_group_and_are_stripped() {
        assert_eq!(ok("set 'a b' -p k"), ["set", "a b", "-p", "k"]);
        assert_eq!(ok("edit \"my file.json\""), ["edit", "my file.json"]);
        // Adjacent pieces concatenate.
        assert_eq!(ok("a'b c'd"), ["ab cd"]);
    }

    #[test]
    fn brackets_keep_literals_whole_with_inner_quotes() {
        assert_eq!(ok("set [1, 2, 3]"), ["set", "[1, 2, 3]"]);
        assert_eq!(ok("append {'a': 1} -p m"), ["append", "{'a': 1}", "-p", "m"]);
        assert_eq!(ok("set [1, [2, 'x y']]"), ["set", "[1, [2, 'x y']]"]);
    }

    #[test]
    fn unclosed_quote_errors_unclosed_bracket_is_lenient() {
        assert!(matches!(
            tokenize("set 'oops"),
            Err(CommandError::Syntax(_))
        ));
        assert_eq!(ok("set [1, 2"), ["set", "[1, 2"]);
    }

    #[test]
    fn dollar_expressions_stay_one_token() {
        assert_eq!(ok("set $1 + 2$ -p k"), ["set", "$1 + 2$", "-p", "k"]);
        assert_eq!(ok("$x = 5$"), ["$x = 5$"]);
        assert_eq!(ok("append $*sorted([2, 1])$"), ["append", "$*sorted([2, 1])$"]);
    }

    #[test]
    fn bang_hands_the_rest_over_raw() {
        assert_eq!(ok("!ls -la 'a b'"), ["!", "ls -la 'a b'"]);
        assert_eq!(ok("! echo hi"), ["!", "echo hi"]);
    }

    #[test]
    fn leading_hash_is_a_whole_line_comment() {
        assert_eq!(ok("# anything 'goes"), ["#"]);
    }
}
