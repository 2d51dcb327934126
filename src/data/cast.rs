use serde_json::{Map, Number, Value};

/// Best-effort interpretation of user input as a typed value.
///
/// Booleans win first (case-insensitive), then a literal grammar covering
/// numbers, quoted strings, null/None, and bracketed collections (lists,
/// tuples, dicts, sets; tuples and sets come out as sequences). Anything
/// the grammar rejects is kept as the string that was typed.
pub fn smart_cast(input: &str) -> Value {
    let trimmed = input.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    match LiteralParser::new(trimmed).parse() {
        Ok(value) => value,
        Err(NotALiteral) => Value::String(input.to_string()),
    }
}

/// The inverse presentation: strings come back raw (no quotes), everything
/// else in its compact literal form, so `smart_cast` on the result gets
/// back to an equal value.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

struct NotALiteral;

struct LiteralParser {
    input: Vec<char>,
    position: usize,
}

impl LiteralParser {
    fn new(input: &str) -> Self {
        LiteralParser {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn parse(mut self) -> Result<Value, NotALiteral> {
        self.skip_whitespace();
        let value = self.parse_value()?;
        self.skip_whitespace();
        if self.position == self.input.len() {
            Ok(value)
        } else {
            Err(NotALiteral)
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current_char(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn parse_value(&mut self) -> Result<Value, NotALiteral> {
        self.skip_whitespace();
        match self.current_char() {
            Some('"') | Some('\'') => self.parse_string().map(Value::String),
            Some('[') => self.parse_list(),
            Some('(') => self.parse_tuple(),
            Some('{') => self.parse_dict_or_set(),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                self.parse_number()
            }
            Some(c) if c.is_alphabetic() => self.parse_keyword(),
            _ => Err(NotALiteral),
        }
    }

    fn parse_string(&mut self) -> Result<String, NotALiteral> {
        let quote = self.current_char().ok_or(NotALiteral)?;
        self.advance();
        let mut out = String::new();
        loop {
            match self.current_char() {
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(out);
                }
                Some('\\') => {
                    self.advance();
                    match self.current_char() {
                        Some('n') => out.push('\n'),
                        Some('t') => out.push('\t'),
                        Some('r') => out.push('\r'),
                        Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                        Some(c) => {
                            // Unknown escape keeps the backslash, as typed.
                            out.push('\\');
                            out.push(c);
                        }
                        None => return Err(NotALiteral),
                    }
                    self.advance();
                }
                Some(c) => {
                    out.push(c);
                    self.advance();
                }
                None => return Err(NotALiteral),
            }
        }
    }

    fn parse_keyword(&mut self) -> Result<Value, NotALiteral> {
        let mut word = String::new();
        while let Some(c) = self.current_char() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }
        match word.as_str() {
            "true" | "True" => Ok(Value::Bool(true)),
            "false" | "False" => Ok(Value::Bool(false)),
            "null" | "None" => Ok(Value::Null),
            _ => Err(NotALiteral),
        }
    }

    fn parse_number(&mut self) -> Result<Value, NotALiteral> {
        let mut text = String::new();
        if matches!(self.current_char(), Some('+') | Some('-')) {
            text.push(self.current_char().unwrap());
            self.advance();
        }
        while let Some(c) = self.current_char() {
            let keep = c.is_ascii_alphanumeric()
                || c == '.'
                || c == '_'
                || ((c == '+' || c == '-') && matches!(text.chars().last(), Some('e') | Some('E')));
            if keep {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        number_from_text(&text).ok_or(NotALiteral)
    }

    fn parse_list(&mut self) -> Result<Value, NotALiteral> {
        self.advance(); // [
        let items = self.parse_items(']')?;
        Ok(Value::Array(items))
    }

    fn parse_tuple(&mut self) -> Result<Value, NotALiteral> {
        self.advance(); // (
        self.skip_whitespace();
        if self.current_char() == Some(')') {
            self.advance();
            return Ok(Value::Array(Vec::new()));
        }
        let first = self.parse_value()?;
        self.skip_whitespace();
        match self.current_char() {
            // A parenthesized value, not a one-tuple.
            Some(')') => {
                self.advance();
                Ok(first)
            }
            Some(',') => {
                self.advance();
                let mut items = vec![first];
                items.extend(self.parse_items(')')?);
                Ok(Value::Array(items))
            }
            _ => Err(NotALiteral),
        }
    }

    fn parse_dict_or_set(&mut self) -> Result<Value, NotALiteral> {
        self.advance(); // {
        self.skip_whitespace();
        if self.current_char() == Some('}') {
            self.advance();
            return Ok(Value::Object(Map::new()));
        }
        let first = self.parse_value()?;
        self.skip_whitespace();
        match self.current_char() {
            Some(':') => {
                self.advance();
                let mut map = Map::new();
                let value = self.parse_value()?;
                map.insert(key_string(&first), value);
                self.skip_whitespace();
                loop {
                    match self.current_char() {
                        Some('}') => {
                            self.advance();
                            return Ok(Value::Object(map));
                        }
                        Some(',') => {
                            self.advance();
                            self.skip_whitespace();
                            if self.current_char() == Some('}') {
                                self.advance();
                                return Ok(Value::Object(map));
                            }
                            let key = self.parse_value()?;
                            self.skip_whitespace();
                            if self.current_char() != Some(':') {
                                return Err(NotALiteral);
                            }
                            self.advance();
                            let value = self.parse_value()?;
                            map.insert(key_string(&key), value);
                            self.skip_whitespace();
                        }
                        _ => return Err(NotALiteral),
                    }
                }
            }
            // No colon after the first value: a set literal, kept as a sequence.
            Some(',') | Some('}') => {
                let mut items = vec![first];
                if self.current_char() == Some(',') {
                    self.advance();
                    items.extend(self.parse_items('}')?);
                } else {
                    self.advance();
                }
                Ok(Value::Array(items))
            }
            _ => Err(NotALiteral),
        }
    }

    /// Comma-separated values up to `close`, trailing comma allowed.
    fn parse_items(&mut self, close: char) -> Result<Vec<Value>, NotALiteral> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.current_char() == Some(close) {
                self.advance();
                return Ok(items);
            }
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.current_char() {
                Some(',') => self.advance(),
                Some(c) if c == close => {
                    self.advance();
                    return Ok(items);
                }
                _ => return Err(NotALiteral),
            }
        }
    }
}

/// Mapping keys are strings; non-string literal keys get their string form.
fn key_string(key: &Value) -> String {
    value_to_string(key)
}

fn number_from_text(text: &str) -> Option<Value> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0b", 2)] {
        if let Some(body) = digits.strip_prefix(prefix) {
            let magnitude = i64::from_str_radix(body, radix).ok()?;
            let signed = if negative { -magnitude } else { magnitude };
            return Some(Value::Number(Number::from(signed)));
        }
    }
    if let Ok(int) = cleaned.parse::<i64>() {
        return Some(Value::Number(Number::from(int)));
    }
    let float: f64 = cleaned.parse().ok()?;
    Number::from_f64(float).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn casts_scalars() {
        assert_eq!(smart_cast("42"), json!(42));
        assert_eq!(smart_cast("-3"), json!(-3));
        assert_eq!(smart_cast("2.5"), json!(2.5));
        assert_eq!(smart_cast("1e3"), json!(1000.0));
        assert_eq!(smart_cast("TRUE"), json!(true));
        assert_eq!(smart_cast("False"), json!(false));
        assert_eq!(smart_cast("null"), Value::Null);
        assert_eq!(smart_cast("None"), Value::Null);
    }

    #[test]
    fn unquoted_words_stay_strings() {
        assert_eq!(smart_cast("hello"), json!("hello"));
        assert_eq!(smart_cast("1 2"), json!("1 2"));
        assert_eq!(smart_cast("1.2.3"), json!("1.2.3"));
        // Non-finite floats are not representable values.
        assert_eq!(smart_cast("inf"), json!("inf"));
        assert_eq!(smart_cast("NaN"), json!("NaN"));
    }

    #[test]
    fn quoted_strings_lose_their_quotes() {
        assert_eq!(smart_cast("\"a b\""), json!("a b"));
        assert_eq!(smart_cast("'7'"), json!("7"));
        assert_eq!(smart_cast("'line\\nbreak'"), json!("line\nbreak"));
    }

    #[test]
    fn casts_collections() {
        assert_eq!(smart_cast("[1, 2, 3]"), json!([1, 2, 3]));
        assert_eq!(smart_cast("[1, [2, 'x']]"), json!([1, [2, "x"]]));
        assert_eq!(smart_cast("{'a': 1, 'b': None}"), json!({"a": 1, "b": null}));
        assert_eq!(smart_cast("{\"a\": true}"), json!({"a": true}));
        assert_eq!(smart_cast("{}"), json!({}));
        assert_eq!(smart_cast("[]"), json!([]));
    }

    #[test]
    fn tuples_and_sets_become_sequences() {
        assert_eq!(smart_cast("(1, 2)"), json!([1, 2]));
        assert_eq!(smart_cast("(1,)"), json!([1]));
        assert_eq!(smart_cast("()"), json!([]));
        assert_eq!(smart_cast("{1, 2}"), json!([1, 2]));
        // Parenthesized scalar is just the scalar.
        assert_eq!(smart_cast("(5)"), json!(5));
    }

    #[test]
    fn non_string_dict_keys_are_stringified() {
        assert_eq!(smart_cast("{1: 'a'}"), json!({"1": "a"}));
    }

    #[test]
    fn malformed_literals_fall_back_to_strings() {
        assert_eq!(smart_cast("[1, 2"), json!("[1, 2"));
        assert_eq!(smart_cast("{'a': }"), json!("{'a': }"));
        assert_eq!(smart_cast("'unterminated"), json!("'unterminated"));
    }

    #[test]
    fn alternate_integer_bases() {
        assert_eq!(smart_cast("0x10"), json!(16));
        assert_eq!(smart_cast("0b101"), json!(5));
        assert_eq!(smart_cast("1_000"), json!(1000));
    }

    #[test]
    fn string_form_round_trips() {
        for input in ["42", "2.5", "true", "null", "[1, \"x\", null]", "{\"a\": [1]}", "plain"] {
            let first = smart_cast(input);
            let again = smart_cast(&value_to_string(&first));
            assert_eq!(first, again, "round trip diverged for {input}");
        }
    }
}
