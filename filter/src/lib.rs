#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
//! A small boolean expression language for filtering DICOM objects.
//!
//! A script tests the values of named elements with string matching
//! methods and combines the outcomes with boolean operators:
//!
//! ```text
//! PatientID.equals("JOHN^DOE") * !Modality.equals("CT")
//! // + is OR, * is AND (binds tighter), ! is NOT
//! ```
//!
//! Element values are supplied by a [`ValueSource`],
//! typically a parsed DICOM object.
//! Identifiers are tag expressions: attribute keywords
//! or bracketed numeric forms such as `[0010,0020]`.
//! Whitespace is skipped and `//` starts a comment running
//! to the end of the line.
//!
//! Operand values are resolved while the script is tokenized,
//! so both operands of a binary operator are always evaluated.
//! Operands have no side effects, which makes the lack of
//! short-circuiting unobservable.

use snafu::{Backtrace, Snafu};
use tracing::{debug, error};

/// A provider of element values for script operands.
pub trait ValueSource {
    /// Fetch the value of the element named by the given tag expression,
    /// or an empty string when the element is absent.
    fn value_of(&self, identifier: &str) -> String;
}

impl<T: ?Sized> ValueSource for &T
where
    T: ValueSource,
{
    fn value_of(&self, identifier: &str) -> String {
        (**self).value_of(identifier)
    }
}

/// An error which may occur while parsing a filter script.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ScriptError {
    /// The parser found a token other than the expected one.
    #[snafu(display("Error in script: {} expected, but {} found", expected, found))]
    UnexpectedToken {
        expected: &'static str,
        found: &'static str,
        backtrace: Backtrace,
    },
    /// The parser could not make sense of the expression.
    #[snafu(display("Failure in parsing the script"))]
    ParseFailure { backtrace: Backtrace },
}

pub type Result<T, E = ScriptError> = std::result::Result<T, E>;

/// Evaluate a filter script against the given value source.
///
/// Returns an error when the script is not well formed.
pub fn matches<S>(script: &str, source: &S) -> Result<bool>
where
    S: ValueSource,
{
    debug!("Match script:\n{}", script);
    let mut tokenizer = Tokenizer::new(script, source);
    let mut operators = vec![Operator::sentinel()];
    let mut tokens = Vec::new();

    expression(&mut tokenizer, &mut operators, &mut tokens)?;
    tokenizer.expect(TokenKind::End)?;
    let result = unstack(&mut tokens);
    debug!("Match result = {}", result);
    Ok(result)
}

/// Evaluate a filter script against the given value source,
/// reporting script errors and treating them as a non-match.
pub fn matches_or_false<S>(script: &str, source: &S) -> bool
where
    S: ValueSource,
{
    match matches(script, source) {
        Ok(value) => value,
        Err(e) => {
            error!("{}", e);
            false
        }
    }
}

/// The kinds of token, used for error reporting and expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Operator,
    Operand,
    LeftParen,
    RightParen,
    End,
    Unknown,
}

impl TokenKind {
    fn name(self) -> &'static str {
        match self {
            TokenKind::Operator => "OPERATOR",
            TokenKind::Operand => "OPERAND",
            TokenKind::LeftParen => "LP",
            TokenKind::RightParen => "RP",
            TokenKind::End => "END",
            TokenKind::Unknown => "UNKNOWN",
        }
    }
}

/// A script token. Operand values are computed during tokenization.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Operator(Operator),
    Operand(bool),
    LeftParen,
    RightParen,
    End,
    Unknown,
}

impl Token {
    fn kind(self) -> TokenKind {
        match self {
            Token::Operator(_) => TokenKind::Operator,
            Token::Operand(_) => TokenKind::Operand,
            Token::LeftParen => TokenKind::LeftParen,
            Token::RightParen => TokenKind::RightParen,
            Token::End => TokenKind::End,
            Token::Unknown => TokenKind::Unknown,
        }
    }
}

/// An operator token with its precedence.
/// `?` is the stack sentinel with the lowest precedence;
/// `+` (OR) binds loosest, then `*` (AND), then unary `!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Operator {
    symbol: char,
    precedence: u8,
}

impl Operator {
    fn from_symbol(symbol: char) -> Option<Operator> {
        let precedence = match symbol {
            '+' => 1,
            '*' => 2,
            '!' => 3,
            _ => return None,
        };
        Some(Operator { symbol, precedence })
    }

    fn sentinel() -> Operator {
        Operator {
            symbol: '?',
            precedence: 0,
        }
    }

    fn is_sentinel(self) -> bool {
        self.symbol == '?'
    }

    fn is_unary(self) -> bool {
        self.symbol == '!'
    }

    fn is_binary(self) -> bool {
        self.symbol == '+' || self.symbol == '*'
    }
}

struct Tokenizer<'a, S> {
    chars: Vec<char>,
    index: usize,
    next: Token,
    source: &'a S,
}

impl<'a, S> Tokenizer<'a, S>
where
    S: ValueSource,
{
    fn new(script: &str, source: &'a S) -> Self {
        let mut t = Tokenizer {
            chars: script.chars().collect(),
            index: 0,
            next: Token::End,
            source,
        };
        t.next = t.scan_token();
        t
    }

    fn next(&self) -> Token {
        self.next
    }

    fn consume(&mut self) -> Token {
        let current = self.next;
        self.next = self.scan_token();
        current
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.next.kind() == kind {
            self.consume();
            Ok(())
        } else {
            UnexpectedTokenSnafu {
                expected: kind.name(),
                found: self.next.kind().name(),
            }
            .fail()
        }
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Token::End,
        };
        if c == '[' || c.is_alphabetic() {
            return self.scan_operand();
        }
        match c {
            '(' => {
                self.index += 1;
                Token::LeftParen
            }
            ')' => {
                self.index += 1;
                Token::RightParen
            }
            _ => {
                if let Some(op) = Operator::from_symbol(c) {
                    self.index += 1;
                    Token::Operator(op)
                } else {
                    self.index += 1;
                    Token::Unknown
                }
            }
        }
    }

    /// An operand is either the literal `true` or `false`,
    /// or a method call test `identifier.method("literal")`.
    fn scan_operand(&mut self) -> Token {
        let identifier = self.scan_identifier();
        match identifier.as_str() {
            "true" => return Token::Operand(true),
            "false" => return Token::Operand(false),
            _ => {}
        }
        if self.peek_char() != Some('.') {
            debug!("Operand `{}` is not a method call", identifier);
            return Token::Operand(false);
        }
        self.index += 1;
        let method = self.take_until('(');
        let argument = self.take_until(')');
        let argument = argument.trim();

        let value = if argument.len() > 1 && argument.starts_with('"') && argument.ends_with('"') {
            let literal = &argument[1..argument.len() - 1];
            let element = self.source.value_of(identifier.trim());
            let outcome = apply_method(&element, method.trim(), literal, &identifier);
            debug!(
                "{}={} -> {{ {}.{}(\"{}\")={} }}",
                identifier,
                element,
                identifier,
                method.trim(),
                literal,
                outcome
            );
            outcome
        } else {
            debug!(
                "Missing quoted literal in {}.{}({})",
                identifier,
                method.trim(),
                argument
            );
            false
        };
        Token::Operand(value)
    }

    /// Read identifier characters up to a method separator,
    /// an operator, a parenthesis, whitespace or the end of the script.
    fn scan_identifier(&mut self) -> String {
        let mut identifier = String::new();
        while let Some(c) = self.peek_char() {
            if c == '.'
                || c == '('
                || c == ')'
                || c.is_whitespace()
                || Operator::from_symbol(c).is_some()
            {
                break;
            }
            identifier.push(c);
            self.index += 1;
        }
        identifier
    }

    /// Read characters until the given delimiter (which is consumed),
    /// skipping delimiters inside double quotes.
    fn take_until(&mut self, delim: char) -> String {
        let mut field = String::new();
        let mut in_quote = false;
        while let Some(c) = self.peek_char() {
            self.index += 1;
            if c == '"' {
                in_quote = !in_quote;
            }
            if !in_quote && c == delim {
                break;
            }
            field.push(c);
        }
        field
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn skip_whitespace(&mut self) {
        let mut in_comment = false;
        while let Some(c) = self.peek_char() {
            if in_comment {
                if c == '\n' {
                    in_comment = false;
                }
                self.index += 1;
            } else if c == '/' {
                if self.chars.get(self.index + 1) == Some(&'/') {
                    in_comment = true;
                    self.index += 2;
                } else {
                    return;
                }
            } else if c.is_whitespace() {
                self.index += 1;
            } else {
                return;
            }
        }
    }
}

impl<S> std::fmt::Debug for Tokenizer<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("index", &self.index)
            .field("next", &self.next)
            .finish()
    }
}

/// Apply a matching method to an element value and a literal.
/// Comparisons are verbatim, with no normalization of either side.
fn apply_method(element: &str, method: &str, literal: &str, identifier: &str) -> bool {
    let element_lc = element.to_lowercase();
    let literal_lc = literal.to_lowercase();
    match method {
        "equals" => element == literal,
        "equalsIgnoreCase" => element_lc == literal_lc,
        "matches" => match regex::Regex::new(&format!("^(?:{})$", literal)) {
            Ok(re) => re.is_match(element),
            Err(e) => {
                error!("Bad pattern in {}.matches(\"{}\"): {}", identifier, literal, e);
                false
            }
        },
        "contains" => element.contains(literal),
        "containsIgnoreCase" => element_lc.contains(&literal_lc),
        "startsWith" => element.starts_with(literal),
        "startsWithIgnoreCase" => element_lc.starts_with(&literal_lc),
        "endsWith" => element.ends_with(literal),
        "endsWithIgnoreCase" => element_lc.ends_with(&literal_lc),
        _ => {
            error!(
                "Unknown function: {}.{}(\"{}\")",
                identifier, method, literal
            );
            false
        }
    }
}

fn expression<S>(
    t: &mut Tokenizer<'_, S>,
    ops: &mut Vec<Operator>,
    toks: &mut Vec<Token>,
) -> Result<()>
where
    S: ValueSource,
{
    parse_term(t, ops, toks)?;
    while let Token::Operator(op) = t.next() {
        if !op.is_binary() {
            break;
        }
        push_operator(op, ops, toks);
        t.consume();
        parse_term(t, ops, toks)?;
    }
    while !ops.last().map(|op| op.is_sentinel()).unwrap_or(true) {
        pop_operator(ops, toks);
    }
    Ok(())
}

fn parse_term<S>(
    t: &mut Tokenizer<'_, S>,
    ops: &mut Vec<Operator>,
    toks: &mut Vec<Token>,
) -> Result<()>
where
    S: ValueSource,
{
    match t.next() {
        Token::Operand(_) => {
            toks.push(t.consume());
            Ok(())
        }
        Token::LeftParen => {
            t.consume();
            ops.push(Operator::sentinel());
            expression(t, ops, toks)?;
            t.expect(TokenKind::RightParen)?;
            ops.pop();
            Ok(())
        }
        Token::Operator(op) if op.is_unary() => {
            push_operator(op, ops, toks);
            t.consume();
            parse_term(t, ops, toks)
        }
        _ => ParseFailureSnafu.fail(),
    }
}

fn pop_operator(ops: &mut Vec<Operator>, toks: &mut Vec<Token>) {
    if let Some(op) = ops.pop() {
        toks.push(Token::Operator(op));
    }
}

fn push_operator(op: Operator, ops: &mut Vec<Operator>, toks: &mut Vec<Token>) {
    // left associative: pop while the stacked precedence is not lower
    while ops
        .last()
        .map(|top| top.precedence >= op.precedence)
        .unwrap_or(false)
    {
        pop_operator(ops, toks);
    }
    ops.push(op);
}

/// Evaluate the token stack in post order.
/// Both operands of a binary operator are popped and evaluated
/// before the combination.
fn unstack(toks: &mut Vec<Token>) -> bool {
    match toks.pop() {
        None => false,
        Some(Token::Operand(value)) => value,
        Some(Token::Operator(op)) => {
            if op.is_unary() {
                !unstack(toks)
            } else {
                let v1 = unstack(toks);
                let v2 = unstack(toks);
                match op.symbol {
                    '+' => v1 || v2,
                    '*' => v1 && v2,
                    _ => false,
                }
            }
        }
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapSource(HashMap<&'static str, &'static str>);

    impl MapSource {
        fn new(pairs: &[(&'static str, &'static str)]) -> Self {
            MapSource(pairs.iter().copied().collect())
        }
    }

    impl ValueSource for MapSource {
        fn value_of(&self, identifier: &str) -> String {
            self.0.get(identifier).copied().unwrap_or("").to_owned()
        }
    }

    #[test]
    fn literal_operands() {
        let s = MapSource::new(&[]);
        assert!(matches("true", &s).unwrap());
        assert!(!matches("false", &s).unwrap());
        assert!(matches("!false", &s).unwrap());
        assert!(matches("true + false", &s).unwrap());
        assert!(!matches("true * false", &s).unwrap());
    }

    #[test]
    fn method_calls() {
        let s = MapSource::new(&[("PatientID", "JOHN^DOE"), ("Modality", "CT")]);
        assert!(matches(r#"PatientID.equals("JOHN^DOE")"#, &s).unwrap());
        assert!(!matches(r#"PatientID.equals("jane")"#, &s).unwrap());
        assert!(matches(r#"PatientID.equalsIgnoreCase("john^doe")"#, &s).unwrap());
        assert!(matches(r#"PatientID.contains("N^D")"#, &s).unwrap());
        assert!(matches(r#"PatientID.startsWith("JOHN")"#, &s).unwrap());
        assert!(matches(r#"PatientID.endsWithIgnoreCase("doe")"#, &s).unwrap());
        assert!(matches(r#"Modality.matches("C.")"#, &s).unwrap());
        // matches() is a full match, as in the original semantics
        assert!(!matches(r#"PatientID.matches("JOHN")"#, &s).unwrap());
        assert!(matches(r#"PatientID.matches("JOHN.*")"#, &s).unwrap());
    }

    #[test]
    fn absent_elements_compare_unequal() {
        let s = MapSource::new(&[("PatientID", "JOHN^DOE")]);
        // Modality is absent: equals fails, negation holds
        let script = r#"PatientID.equals("JOHN^DOE") * !Modality.equals("CT")"#;
        assert!(matches(script, &s).unwrap());
    }

    #[test]
    fn precedence_and_grouping() {
        let s = MapSource::new(&[]);
        // * binds tighter than +
        assert!(matches("true + false * false", &s).unwrap());
        assert!(!matches("(true + false) * false", &s).unwrap());
        // unary binds tightest
        assert!(matches("!false * true", &s).unwrap());
    }

    #[test]
    fn de_morgan_equivalence() {
        let s = MapSource::new(&[("A", "1")]);
        for (a, b) in [("true", "true"), ("true", "false"), ("false", "false")] {
            let lhs = matches(&format!("!({} + {})", a, b), &s).unwrap();
            let rhs = matches(&format!("(!{}) * (!{})", a, b), &s).unwrap();
            assert_eq!(lhs, rhs, "a={} b={}", a, b);
        }
    }

    #[test]
    fn alternation_of_patterns() {
        let s = MapSource::new(&[("PatientName", "JANE^X")]);
        let script = r#"PatientName.matches("JOHN.*") + PatientName.matches("JANE.*")"#;
        assert!(matches(script, &s).unwrap());
    }

    #[test]
    fn comments_and_whitespace() {
        let s = MapSource::new(&[("Modality", "CT")]);
        let script = "// modality gate\nModality.equals(\"CT\")  // trailing\n";
        assert!(matches(script, &s).unwrap());
    }

    #[test]
    fn unknown_method_is_false() {
        let s = MapSource::new(&[("Modality", "CT")]);
        assert!(!matches(r#"Modality.frobnicates("CT")"#, &s).unwrap());
    }

    #[test]
    fn malformed_scripts_error() {
        let s = MapSource::new(&[]);
        assert!(matches("(true", &s).is_err());
        assert!(matches("true +", &s).is_err());
        assert!(matches("* true", &s).is_err());
        assert!(!matches_or_false("(true", &s));
    }

    #[test]
    fn quoted_delimiters_do_not_end_the_literal() {
        let s = MapSource::new(&[("StudyDescription", "HEAD (PLAIN)")]);
        assert!(matches(r#"StudyDescription.contains("(PLAIN)")"#, &s).unwrap());
    }
}
