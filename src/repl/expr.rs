//! The `$expr$` mini-language: literals, session variables, arithmetic,
//! comparisons, and an allow-listed set of functions. Deliberately small;
//! nothing here ever reaches the host language's own evaluation.

use serde_json::{Map, Number, Value};

use crate::data::cast::value_to_string;
use crate::error::CommandError;

/// Holds the session variables and evaluates expressions against them.
pub struct Evaluator {
    vars: Map<String, Value>,
}

/// What an expression produced: a value to substitute, or a variable
/// assignment (which substitutes as a comment so the line becomes a no-op).
pub enum Evaluated {
    Value(Value),
    Assigned(String),
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator { vars: Map::new() }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Evaluates one expression. `name = expr` stores the variable and
    /// reports the assignment instead of a value.
    pub fn eval(&mut self, input: &str) -> Result<Evaluated, CommandError> {
        if let Some((name, body)) = split_assignment(input) {
            let value = self.eval_value(body)?;
            self.vars.insert(name.to_string(), value);
            return Ok(Evaluated::Assigned(name.to_string()));
        }
        self.eval_value(input).map(Evaluated::Value)
    }

    pub fn eval_value(&mut self, input: &str) -> Result<Value, CommandError> {
        let mut parser = ExprParser {
            input: input.chars().collect(),
            position: 0,
            evaluator: self,
        };
        parser.skip_whitespace();
        let value = parser.parse_expr()?;
        parser.skip_whitespace();
        if parser.position < parser.input.len() {
            return Err(bad(format!(
                "unexpected input after expression: {}",
                parser.input[parser.position..].iter().collect::<String>()
            )));
        }
        Ok(value)
    }

    /// Replaces every `$expr$` token with the value's string form and
    /// splices `$*expr$` sequence results as one token per element.
    /// Assignments substitute as `#`, turning the line into a comment.
    pub fn expand(&mut self, tokens: Vec<String>) -> Result<Vec<String>, CommandError> {
        let mut expanded = Vec::with_capacity(tokens.len());
        for token in tokens {
            let Some(inner) = magic_body(&token) else {
                expanded.push(token);
                continue;
            };
            if let Some(body) = inner.strip_prefix('*') {
                match self.eval_value(body)? {
                    Value::Array(items) => {
                        expanded.extend(items.iter().map(value_to_string));
                    }
                    other => {
                        return Err(bad(format!(
                            "splat needs a sequence, got {}",
                            value_to_string(&other)
                        )))
                    }
                }
                continue;
            }
            match self.eval(inner)? {
                Evaluated::Value(value) => expanded.push(value_to_string(&value)),
                Evaluated::Assigned(_) => expanded.push("#".to_string()),
            }
        }
        Ok(expanded)
    }

    fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Value, CommandError> {
        match name {
            "int" => {
                let [arg] = one(name, args)?;
                match arg {
                    Value::Number(n) => n
                        .as_i64()
                        .or_else(|| n.as_f64().map(|f| f as i64))
                        .map(Value::from)
                        .ok_or_else(|| bad("number out of integer range")),
                    Value::String(s) => s
                        .trim()
                        .parse::<i64>()
                        .map(Value::from)
                        .map_err(|_| bad(format!("cannot make an integer of {s:?}"))),
                    Value::Bool(b) => Ok(Value::from(b as i64)),
                    other => Err(bad(format!(
                        "cannot make an integer of {}",
                        value_to_string(&other)
                    ))),
                }
            }
            "float" => {
                let [arg] = one(name, args)?;
                let f = match arg {
                    Value::Number(n) => n.as_f64().ok_or_else(|| bad("bad number"))?,
                    Value::String(s) => s
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| bad(format!("cannot make a float of {s:?}")))?,
                    Value::Bool(b) => b as i64 as f64,
                    other => {
                        return Err(bad(format!(
                            "cannot make a float of {}",
                            value_to_string(&other)
                        )))
                    }
                };
                float_value(f)
            }
            "str" => {
                let [arg] = one(name, args)?;
                Ok(Value::String(value_to_string(&arg)))
            }
            "len" => {
                let [arg] = one(name, args)?;
                let len = match &arg {
                    Value::String(s) => s.chars().count(),
                    Value::Array(items) => items.len(),
                    Value::Object(map) => map.len(),
                    other => {
                        return Err(bad(format!("{} has no length", value_to_string(other))))
                    }
                };
                Ok(Value::from(len as i64))
            }
            "abs" => {
                let [arg] = one(name, args)?;
                let n = as_number(&arg)?;
                match arg.as_i64() {
                    Some(i) => Ok(Value::from(i.abs())),
                    None => float_value(n.abs()),
                }
            }
            "round" => {
                let [arg] = one(name, args)?;
                Ok(Value::from(as_number(&arg)?.round() as i64))
            }
            "sqrt" => unary_float(name, args, f64::sqrt),
            "log" => unary_float(name, args, f64::ln),
            "sin" => unary_float(name, args, f64::sin),
            "cos" => unary_float(name, args, f64::cos),
            "tan" => unary_float(name, args, f64::tan),
            "min" => fold_sequence(name, args, |best, next| {
                if compare(&next, &best)? == std::cmp::Ordering::Less {
                    Ok(next)
                } else {
                    Ok(best)
                }
            }),
            "max" => fold_sequence(name, args, |best, next| {
                if compare(&next, &best)? == std::cmp::Ordering::Greater {
                    Ok(next)
                } else {
                    Ok(best)
                }
            }),
            "sum" => {
                let items = sequence_args(name, args)?;
                let mut total = Value::from(0);
                for item in items {
                    total = add(total, item)?;
                }
                Ok(total)
            }
            "sorted" => {
                let mut items = sequence_args(name, args)?;
                let mut failed = None;
                items.sort_by(|a, b| match compare(a, b) {
                    Ok(ordering) => ordering,
                    Err(e) => {
                        failed.get_or_insert(e);
                        std::cmp::Ordering::Equal
                    }
                });
                match failed {
                    Some(e) => Err(e),
                    None => Ok(Value::Array(items)),
                }
            }
            "now" => {
                none(name, args)?;
                Ok(Value::String(
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                ))
            }
            "timestamp" => {
                none(name, args)?;
                Ok(Value::from(chrono::Utc::now().timestamp()))
            }
            "basename" => path_part(name, args, |p| p.file_name().map(|n| n.to_os_string())),
            "dirname" => path_part(name, args, |p| p.parent().map(|n| n.as_os_str().to_os_string())),
            "vars" => {
                none(name, args)?;
                Ok(Value::Object(self.vars.clone()))
            }
            _ => Err(bad(format!("unknown function {name}"))),
        }
    }
}

fn magic_body(token: &str) -> Option<&str> {
    let inner = token.strip_prefix('$')?.strip_suffix('$')?;
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

/// `name = expr` with a single `=`; `==` belongs to the expression grammar.
fn split_assignment(input: &str) -> Option<(&str, &str)> {
    let (left, right) = input.split_once('=')?;
    if right.starts_with('=') {
        return None;
    }
    let name = left.trim();
    if name.is_empty() || !is_identifier(name) {
        return None;
    }
    Some((name, right))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn bad(message: impl Into<String>) -> CommandError {
    CommandError::Syntax(message.into())
}

fn one(name: &str, args: Vec<Value>) -> Result<[Value; 1], CommandError> {
    <[Value; 1]>::try_from(args).map_err(|_| bad(format!("{name} takes one argument")))
}

fn none(name: &str, args: Vec<Value>) -> Result<(), CommandError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(bad(format!("{name} takes no arguments")))
    }
}

fn as_number(value: &Value) -> Result<f64, CommandError> {
    value
        .as_f64()
        .ok_or_else(|| bad(format!("{} is not a number", value_to_string(value))))
}

fn float_value(f: f64) -> Result<Value, CommandError> {
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| bad("result is not a finite number"))
}

fn unary_float(
    name: &str,
    args: Vec<Value>,
    op: fn(f64) -> f64,
) -> Result<Value, CommandError> {
    let [arg] = one(name, args)?;
    float_value(op(as_number(&arg)?))
}

/// Variadic or single-sequence arguments, as the Python originals accept.
fn sequence_args(name: &str, args: Vec<Value>) -> Result<Vec<Value>, CommandError> {
    match args.len() {
        0 => Err(bad(format!("{name} needs arguments"))),
        1 => match args.into_iter().next() {
            Some(Value::Array(items)) => Ok(items),
            Some(single) => Ok(vec![single]),
            None => unreachable!(),
        },
        _ => Ok(args),
    }
}

fn fold_sequence(
    name: &str,
    args: Vec<Value>,
    pick: impl Fn(Value, Value) -> Result<Value, CommandError>,
) -> Result<Value, CommandError> {
    let mut items = sequence_args(name, args)?.into_iter();
    let first = items
        .next()
        .ok_or_else(|| bad(format!("{name} of an empty sequence")))?;
    items.try_fold(first, pick)
}

fn path_part(
    name: &str,
    args: Vec<Value>,
    part: impl Fn(&std::path::Path) -> Option<std::ffi::OsString>,
) -> Result<Value, CommandError> {
    let [arg] = one(name, args)?;
    let Value::String(text) = arg else {
        return Err(bad(format!("{name} takes a string")));
    };
    let piece = part(std::path::Path::new(&text)).unwrap_or_default();
    Ok(Value::String(piece.to_string_lossy().into_owned()))
}

fn compare(a: &Value, b: &Value) -> Result<std::cmp::Ordering, CommandError> {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => {
            let (x, y) = (as_number(a)?, as_number(b)?);
            x.partial_cmp(&y).ok_or_else(|| bad("cannot compare"))
        }
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
        _ => Err(bad(format!(
            "cannot compare {} with {}",
            value_to_string(a),
            value_to_string(b)
        ))),
    }
}

fn add(left: Value, right: Value) -> Result<Value, CommandError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
                if let Some(sum) = x.checked_add(y) {
                    return Ok(Value::from(sum));
                }
            }
            float_value(a.as_f64().unwrap_or(0.0) + b.as_f64().unwrap_or(0.0))
        }
        (Value::String(mut a), Value::String(b)) => {
            a.push_str(&b);
            Ok(Value::String(a))
        }
        (Value::Array(mut a), Value::Array(b)) => {
            a.extend(b);
            Ok(Value::Array(a))
        }
        (a, b) => Err(bad(format!(
            "cannot add {} and {}",
            value_to_string(&a),
            value_to_string(&b)
        ))),
    }
}

fn arithmetic(left: Value, op: char, right: Value) -> Result<Value, CommandError> {
    if op == '+' {
        return add(left, right);
    }
    let ints = (left.as_i64(), right.as_i64());
    let (x, y) = (as_number(&left)?, as_number(&right)?);
    match op {
        // Division always goes through float so 1/2 is 0.5.
        '/' => {
            if y == 0.0 {
                return Err(bad("division by zero"));
            }
            float_value(x / y)
        }
        '-' | '*' | '%' => {
            if let (Some(a), Some(b)) = ints {
                let exact = match op {
                    '-' => a.checked_sub(b),
                    '*' => a.checked_mul(b),
                    '%' => a.checked_rem(b),
                    _ => unreachable!(),
                };
                if let Some(result) = exact {
                    return Ok(Value::from(result));
                }
            }
            let result = match op {
                '-' => x - y,
                '*' => x * y,
                '%' => x % y,
                _ => unreachable!(),
            };
            float_value(result)
        }
        _ => Err(bad(format!("unknown operator {op}"))),
    }
}

struct ExprParser<'a> {
    input: Vec<char>,
    position: usize,
    evaluator: &'a mut Evaluator,
}

impl ExprParser<'_> {
    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current_char(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn eat(&mut self, expected: char) -> Result<(), CommandError> {
        if self.current_char() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            Err(bad(format!("expected {expected:?}")))
        }
    }

    fn parse_expr(&mut self) -> Result<Value, CommandError> {
        let left = self.parse_additive()?;
        self.skip_whitespace();
        let op = match (self.current_char(), self.peek_char()) {
            (Some('='), Some('=')) => "==",
            (Some('!'), Some('=')) => "!=",
            (Some('<'), Some('=')) => "<=",
            (Some('>'), Some('=')) => ">=",
            (Some('<'), _) => "<",
            (Some('>'), _) => ">",
            _ => return Ok(left),
        };
        self.position += op.len();
        let right = self.parse_additive()?;
        let answer = match op {
            "==" => left == right,
            "!=" => left != right,
            other => {
                let ordering = compare(&left, &right)?;
                match other {
                    "<" => ordering.is_lt(),
                    "<=" => ordering.is_le(),
                    ">" => ordering.is_gt(),
                    ">=" => ordering.is_ge(),
                    _ => unreachable!(),
                }
            }
        };
        Ok(Value::Bool(answer))
    }

    fn parse_additive(&mut self) -> Result<Value, CommandError> {
        let mut value = self.parse_multiplicative()?;
        loop {
            self.skip_whitespace();
            match self.current_char() {
                Some(op @ ('+' | '-')) => {
                    self.advance();
                    let right = self.parse_multiplicative()?;
                    value = arithmetic(value, op, right)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Value, CommandError> {
        let mut value = self.parse_unary()?;
        loop {
            self.skip_whitespace();
            match self.current_char() {
                Some(op @ ('*' | '/' | '%')) => {
                    self.advance();
                    let right = self.parse_unary()?;
                    value = arithmetic(value, op, right)?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Value, CommandError> {
        self.skip_whitespace();
        if self.current_char() == Some('-') {
            self.advance();
            let value = self.parse_unary()?;
            return arithmetic(Value::from(0), '-', value);
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Value, CommandError> {
        self.skip_whitespace();
        match self.current_char() {
            Some('(') => {
                self.advance();
                let value = self.parse_expr()?;
                self.skip_whitespace();
                self.eat(')')?;
                Ok(value)
            }
            Some('[') => {
                self.advance();
                let mut items = Vec::new();
                loop {
                    self.skip_whitespace();
                    if self.current_char() == Some(']') {
                        self.advance();
                        return Ok(Value::Array(items));
                    }
                    items.push(self.parse_expr()?);
                    self.skip_whitespace();
                    match self.current_char() {
                        Some(',') => self.advance(),
                        Some(']') => {}
                        _ => return Err(bad("expected ',' or ']' in list")),
                    }
                }
            }
            Some(q @ ('\'' | '"')) => {
                self.advance();
                let mut text = String::new();
                loop {
                    match self.current_char() {
                        Some(c) if c == q => {
                            self.advance();
                            return Ok(Value::String(text));
                        }
                        Some(c) => {
                            text.push(c);
                            self.advance();
                        }
                        None => return Err(bad("unclosed string")),
                    }
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_identifier(),
            Some(c) => Err(bad(format!("unexpected {c:?} in expression"))),
            None => Err(bad("empty expression")),
        }
    }

    fn parse_number(&mut self) -> Result<Value, CommandError> {
        let mut text = String::new();
        while let Some(c) = self.current_char() {
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if let Ok(int) = text.parse::<i64>() {
            return Ok(Value::from(int));
        }
        let float: f64 = text
            .parse()
            .map_err(|_| bad(format!("bad number {text:?}")))?;
        float_value(float)
    }

    fn parse_identifier(&mut self) -> Result<Value, CommandError> {
        let mut name = String::new();
        while let Some(c) = self.current_char() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        match name.as_str() {
            "true" | "True" => return Ok(Value::Bool(true)),
            "false" | "False" => return Ok(Value::Bool(false)),
            "null" | "None" => return Ok(Value::Null),
            _ => {}
        }
        self.skip_whitespace();
        if self.current_char() == Some('(') {
            self.advance();
            let mut args = Vec::new();
            loop {
                self.skip_whitespace();
                if self.current_char() == Some(')') {
                    self.advance();
                    break;
                }
                args.push(self.parse_expr()?);
                self.skip_whitespace();
                match self.current_char() {
                    Some(',') => self.advance(),
                    Some(')') => {}
                    _ => return Err(bad(format!("expected ',' or ')' in {name} call"))),
                }
            }
            return self.evaluator.call(&name, args);
        }
        self.evaluator
            .get(&name)
            .cloned()
            .ok_or_else(|| bad(format!("undefined variable {name}")))
    }
}
