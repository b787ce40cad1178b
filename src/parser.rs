//! Pattern parsing: lexing and recursive descent into the AST.
//!
//! Supported syntax:
//! - literals, `.` (any character except line feed)
//! - `|` alternation, implicit concatenation
//! - `*`, `+`, `?`, `{n}`, `{n,}`, `{n,m}` quantifiers
//! - `(...)` non-capturing groups
//! - `[...]` / `[^...]` character classes with ranges
//! - shorthand classes `\d \D \w \W \s \S`
//! - control escapes `\n \f \r \t \v \a`, escaped metacharacters
//! - codepoint escapes `\uXXXX`, `\UXXXXXXXX`, `\u{1-6 hex}`
//!
//! Rejected with a typed error: anchors, backreferences, lazy quantifiers,
//! and `(?...)` group modifiers. Errors carry the 0-based character offset
//! where parsing failed.

use crate::alphabet::{
    negate_intervals, simplify_intervals, CodepointInterval, CP_MAX,
};
use crate::ast::Ast;

/// Largest accepted quantifier bound. Bounded repetition is expanded into
/// automaton states, so an uncapped bound would let a short pattern demand
/// an enormous NFA.
pub const QUANTIFIER_LIMIT: u32 = 1000;

const SURROGATE_START: u32 = 0xD800;
const SURROGATE_END: u32 = 0xDFFF;

/// Error type for pattern parsing.
#[derive(Debug, Clone)]
pub struct PatternError {
    pub message: String,
    pub offset: usize,
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for PatternError {}

/// Parser state: a character cursor over the pattern.
///
/// Offsets reported in errors are character indices, not byte indices.
struct PatternParse {
    chars: Vec<char>,
    index: usize,
    last_index: usize,
}

impl PatternParse {
    fn new(pattern: &str) -> Self {
        Self {
            chars: pattern.chars().collect(),
            index: 0,
            last_index: 0,
        }
    }

    fn next_char(&mut self) -> Result<char, PatternError> {
        if self.index >= self.chars.len() {
            return Err(PatternError {
                message: "unexpected end of pattern".into(),
                offset: self.index,
            });
        }
        self.last_index = self.index;
        let c = self.chars[self.index];
        self.index += 1;
        Ok(c)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn require(&mut self, wanted: char) -> Result<(), PatternError> {
        let got = self.next_char().map_err(|_| PatternError {
            message: format!("expected '{}'", wanted),
            offset: self.index,
        })?;
        if got != wanted {
            return Err(PatternError {
                message: format!("expected '{}', got '{}'", wanted, got),
                offset: self.last_index,
            });
        }
        Ok(())
    }

    fn bypass_optional(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.last_index = self.index;
            self.index += 1;
            return true;
        }
        false
    }

    fn is_empty(&self) -> bool {
        self.index >= self.chars.len()
    }

    fn error(&self, message: impl Into<String>) -> PatternError {
        PatternError {
            message: message.into(),
            offset: self.last_index,
        }
    }
}

/// Parse a pattern string into an AST.
pub fn parse_pattern(pattern: &str) -> Result<Ast, PatternError> {
    let mut parse = PatternParse::new(pattern);
    let ast = read_alternation(&mut parse)?;

    if !parse.is_empty() {
        // read_alternation only stops short of the end at an unconsumed ')'
        let c = parse.next_char()?;
        let message = if c == ')' {
            "unbalanced ')'".to_string()
        } else {
            format!("unexpected character '{}'", c)
        };
        return Err(parse.error(message));
    }

    Ok(ast)
}

/// Read branches separated by `|`.
fn read_alternation(parse: &mut PatternParse) -> Result<Ast, PatternError> {
    let mut branches = vec![read_sequence(parse)?];
    while parse.bypass_optional('|') {
        branches.push(read_sequence(parse)?);
    }

    if branches.len() == 1 {
        Ok(branches.pop().unwrap())
    } else {
        Ok(Ast::Alternative(branches))
    }
}

/// Read one branch: a sequence of quantified atoms.
fn read_sequence(parse: &mut PatternParse) -> Result<Ast, PatternError> {
    let mut parts = Vec::new();

    loop {
        match parse.peek() {
            None | Some('|') | Some(')') => break,
            _ => parts.push(read_piece(parse)?),
        }
    }

    match parts.len() {
        0 => Ok(Ast::Epsilon),
        1 => Ok(parts.pop().unwrap()),
        _ => Ok(Ast::Concatenation(parts)),
    }
}

/// Read a piece: an atom plus its optional quantifier.
fn read_piece(parse: &mut PatternParse) -> Result<Ast, PatternError> {
    let atom = read_atom(parse)?;
    read_quantifier(parse, atom)
}

/// Read an atom.
fn read_atom(parse: &mut PatternParse) -> Result<Ast, PatternError> {
    let c = parse.next_char()?;

    match c {
        '.' => {
            // Any character except line feed.
            Ok(Ast::Class(negate_intervals(vec![CodepointInterval::single(
                '\n' as u32,
            )])))
        }
        '(' => {
            if parse.bypass_optional('?') {
                return Err(parse.error("group modifiers '(?' are not supported"));
            }
            let inner = read_alternation(parse)?;
            parse.require(')')?;
            Ok(inner)
        }
        '[' => read_class(parse),
        '\\' => read_escape_atom(parse),
        '^' | '$' => Err(parse.error(format!("anchor '{}' is not supported", c))),
        '*' | '+' | '?' | '{' => {
            Err(parse.error(format!("dangling quantifier '{}'", c)))
        }
        ']' => Err(parse.error("unmatched ']'")),
        _ => Ok(Ast::Class(vec![CodepointInterval::single(c as u32)])),
    }
}

/// Control-character and metacharacter escapes valid anywhere.
fn single_char_escape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'f' => Some('\x0C'),
        'v' => Some('\x0B'),
        'a' => Some('\x07'),
        '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$'
        | '-' | '/' => Some(c),
        _ => None,
    }
}

/// Shorthand classes expanding to fixed interval sets.
fn shorthand_class(c: char) -> Option<Vec<CodepointInterval>> {
    let digits = || vec![CodepointInterval::new('0' as u32, '9' as u32)];
    let word = || {
        vec![
            CodepointInterval::new('0' as u32, '9' as u32),
            CodepointInterval::new('A' as u32, 'Z' as u32),
            CodepointInterval::single('_' as u32),
            CodepointInterval::new('a' as u32, 'z' as u32),
        ]
    };
    let space = || {
        vec![
            CodepointInterval::new(0x09, 0x0D),
            CodepointInterval::single(' ' as u32),
        ]
    };

    match c {
        'd' => Some(digits()),
        'D' => Some(negate_intervals(digits())),
        'w' => Some(word()),
        'W' => Some(negate_intervals(word())),
        's' => Some(space()),
        'S' => Some(negate_intervals(space())),
        _ => None,
    }
}

/// Read the escape following `\` in atom position.
fn read_escape_atom(parse: &mut PatternParse) -> Result<Ast, PatternError> {
    let next = parse
        .next_char()
        .map_err(|_| parse.error("'\\' at end of pattern"))?;

    if let Some(escaped) = single_char_escape(next) {
        return Ok(Ast::Class(vec![CodepointInterval::single(escaped as u32)]));
    }
    if let Some(intervals) = shorthand_class(next) {
        return Ok(Ast::Class(intervals));
    }
    if next == 'u' || next == 'U' {
        let cp = read_codepoint_escape(parse, next)?;
        return Ok(Ast::Class(vec![CodepointInterval::single(cp)]));
    }

    match next {
        'b' | 'B' | 'A' | 'Z' | 'G' => {
            Err(parse.error(format!("anchor '\\{}' is not supported", next)))
        }
        '1'..='9' => Err(parse.error("backreferences are not supported")),
        _ => Err(parse.error(format!("invalid escape '\\{}'", next))),
    }
}

/// Read the body of `\uXXXX`, `\UXXXXXXXX`, or `\u{1-6 hex}`.
fn read_codepoint_escape(parse: &mut PatternParse, kind: char) -> Result<u32, PatternError> {
    let value = if kind == 'u' && parse.bypass_optional('{') {
        let mut digits = String::new();
        loop {
            let c = parse
                .next_char()
                .map_err(|_| parse.error("unclosed '\\u{' escape"))?;
            if c == '}' {
                break;
            }
            if !c.is_ascii_hexdigit() {
                return Err(parse.error(format!("invalid hex digit '{}' in escape", c)));
            }
            digits.push(c);
        }
        if digits.is_empty() || digits.len() > 6 {
            return Err(parse.error("'\\u{...}' needs 1 to 6 hex digits"));
        }
        let value = u32::from_str_radix(&digits, 16).expect("checked hex digits");
        if value == 0 {
            return Err(parse.error("'\\u{...}' value must be at least 1"));
        }
        value
    } else {
        let width = if kind == 'u' { 4 } else { 8 };
        let mut digits = String::new();
        for _ in 0..width {
            let c = parse.next_char().map_err(|_| {
                parse.error(format!("'\\{}' needs {} hex digits", kind, width))
            })?;
            if !c.is_ascii_hexdigit() {
                return Err(parse.error(format!("invalid hex digit '{}' in escape", c)));
            }
            digits.push(c);
        }
        u32::from_str_radix(&digits, 16).expect("checked hex digits")
    };

    if value > CP_MAX {
        return Err(parse.error(format!("codepoint U+{:X} outside Unicode range", value)));
    }
    if (SURROGATE_START..=SURROGATE_END).contains(&value) {
        return Err(parse.error(format!("surrogate codepoint U+{:X} in escape", value)));
    }
    Ok(value)
}

/// Read a character class body after `[`.
///
/// Hyphen rules: `-` is a literal when it opens the class, closes it, or
/// sits next to a shorthand-class element. A shorthand class can never be a
/// range endpoint.
fn read_class(parse: &mut PatternParse) -> Result<Ast, PatternError> {
    let negated = parse.bypass_optional('^');

    let mut intervals: Vec<CodepointInterval> = Vec::new();
    // A single codepoint that may still become the low end of a range.
    let mut pending: Option<u32> = None;
    let mut saw_element = false;

    loop {
        let c = parse
            .next_char()
            .map_err(|_| parse.error("unclosed character class"))?;

        match c {
            ']' => {
                if let Some(p) = pending {
                    intervals.push(CodepointInterval::single(p));
                }
                if !saw_element {
                    return Err(parse.error("empty character class"));
                }
                break;
            }
            '-' => {
                saw_element = true;
                if pending.is_none() || parse.peek() == Some(']') {
                    // Literal hyphen: class start, right before ']', or after
                    // a shorthand/range element.
                    if let Some(p) = pending.take() {
                        intervals.push(CodepointInterval::single(p));
                    }
                    intervals.push(CodepointInterval::single('-' as u32));
                    continue;
                }
                let lo = pending.take().expect("checked above");
                let hi = read_range_endpoint(parse)?;
                if lo > hi {
                    return Err(parse.error(format!(
                        "invalid range: '{}' exceeds '{}'",
                        char::from_u32(lo).unwrap_or('?'),
                        char::from_u32(hi).unwrap_or('?'),
                    )));
                }
                intervals.push(CodepointInterval::new(lo, hi));
            }
            '\\' => {
                saw_element = true;
                if let Some(p) = pending.take() {
                    intervals.push(CodepointInterval::single(p));
                }
                let next = parse
                    .next_char()
                    .map_err(|_| parse.error("unclosed character class"))?;
                if let Some(sh) = shorthand_class(next) {
                    intervals.extend(sh);
                } else if let Some(escaped) = single_char_escape(next) {
                    pending = Some(escaped as u32);
                } else if next == 'u' || next == 'U' {
                    pending = Some(read_codepoint_escape(parse, next)?);
                } else {
                    return Err(parse.error(format!(
                        "invalid escape '\\{}' in character class",
                        next
                    )));
                }
            }
            _ => {
                saw_element = true;
                if let Some(p) = pending.take() {
                    intervals.push(CodepointInterval::single(p));
                }
                pending = Some(c as u32);
            }
        }
    }

    let intervals = if negated {
        negate_intervals(intervals)
    } else {
        simplify_intervals(intervals)
    };
    Ok(Ast::Class(intervals))
}

/// Read the high end of a class range, after the `-`.
fn read_range_endpoint(parse: &mut PatternParse) -> Result<u32, PatternError> {
    let c = parse
        .next_char()
        .map_err(|_| parse.error("unclosed character class"))?;

    if c == '\\' {
        let next = parse
            .next_char()
            .map_err(|_| parse.error("unclosed character class"))?;
        if shorthand_class(next).is_some() {
            return Err(parse.error("shorthand class cannot be a range endpoint"));
        }
        if let Some(escaped) = single_char_escape(next) {
            return Ok(escaped as u32);
        }
        if next == 'u' || next == 'U' {
            return read_codepoint_escape(parse, next);
        }
        return Err(parse.error(format!("invalid escape '\\{}' in character class", next)));
    }
    if c == ']' {
        return Err(parse.error("range is missing its high end"));
    }
    Ok(c as u32)
}

/// Read the quantifier following an atom, if any.
fn read_quantifier(parse: &mut PatternParse, atom: Ast) -> Result<Ast, PatternError> {
    let (min, max) = match parse.peek() {
        Some('*') => {
            parse.next_char()?;
            (0, None)
        }
        Some('+') => {
            parse.next_char()?;
            (1, None)
        }
        Some('?') => {
            parse.next_char()?;
            (0, Some(1))
        }
        Some('{') => {
            parse.next_char()?;
            read_bounds(parse)?
        }
        _ => return Ok(atom),
    };

    if parse.bypass_optional('?') {
        return Err(parse.error("lazy quantifiers are not supported"));
    }

    Ok(Ast::Quantifier {
        inner: Box::new(atom),
        min,
        max,
    })
}

/// Read `{n}`, `{n,}`, or `{n,m}` after the `{`.
fn read_bounds(parse: &mut PatternParse) -> Result<(u32, Option<u32>), PatternError> {
    let min = read_bound_number(parse)?;

    let c = parse
        .next_char()
        .map_err(|_| parse.error("unclosed quantifier"))?;
    match c {
        '}' => Ok((min, Some(min))),
        ',' => {
            if parse.bypass_optional('}') {
                return Ok((min, None));
            }
            let max = read_bound_number(parse)?;
            parse.require('}')?;
            if max < min {
                return Err(parse.error("quantifier minimum exceeds maximum"));
            }
            Ok((min, Some(max)))
        }
        _ => Err(parse.error(format!("unexpected character '{}' in quantifier", c))),
    }
}

fn read_bound_number(parse: &mut PatternParse) -> Result<u32, PatternError> {
    let mut digits = String::new();
    loop {
        match parse.peek() {
            Some(c) if c.is_ascii_digit() => {
                parse.next_char()?;
                digits.push(c);
            }
            Some(_) => break,
            None => return Err(parse.error("unclosed quantifier")),
        }
    }

    if digits.is_empty() {
        return Err(parse.error("expected digit in quantifier"));
    }
    let value: u32 = digits
        .parse()
        .map_err(|_| parse.error("quantifier bound too large"))?;
    if value > QUANTIFIER_LIMIT {
        return Err(parse.error("quantifier bound too large"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::CP_MIN;

    fn class_of(ast: &Ast) -> &[CodepointInterval] {
        match ast {
            Ast::Class(intervals) => intervals,
            other => panic!("expected Class, got {:?}", other),
        }
    }

    fn singleton(c: char) -> CodepointInterval {
        CodepointInterval::single(c as u32)
    }

    #[test]
    fn test_parse_literal_sequence() {
        let ast = parse_pattern("abc").unwrap();
        match ast {
            Ast::Concatenation(parts) => {
                assert_eq!(parts.len(), 3);
                assert_eq!(class_of(&parts[0]), &[singleton('a')]);
                assert_eq!(class_of(&parts[2]), &[singleton('c')]);
            }
            other => panic!("expected Concatenation, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_pattern() {
        let ast = parse_pattern("").unwrap();
        assert!(matches!(ast, Ast::Epsilon));
    }

    #[test]
    fn test_parse_alternation() {
        let ast = parse_pattern("a|b|c").unwrap();
        match ast {
            Ast::Alternative(branches) => assert_eq!(branches.len(), 3),
            other => panic!("expected Alternative, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_alternation_branch() {
        // "a|" has an epsilon second branch.
        let ast = parse_pattern("a|").unwrap();
        match ast {
            Ast::Alternative(branches) => {
                assert_eq!(branches.len(), 2);
                assert!(matches!(branches[1], Ast::Epsilon));
            }
            other => panic!("expected Alternative, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_dot_excludes_newline() {
        let ast = parse_pattern(".").unwrap();
        let intervals = class_of(&ast).to_vec();
        assert!(intervals.iter().any(|iv| iv.contains('a' as u32)));
        assert!(!intervals.iter().any(|iv| iv.contains('\n' as u32)));
        assert!(intervals.iter().any(|iv| iv.contains(CP_MIN)));
        assert!(intervals.iter().any(|iv| iv.contains(CP_MAX)));
    }

    #[test]
    fn test_parse_group() {
        let ast = parse_pattern("(a|b)c").unwrap();
        match ast {
            Ast::Concatenation(parts) => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(parts[0], Ast::Alternative(_)));
            }
            other => panic!("expected Concatenation, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_quantifiers() {
        for (pattern, want_min, want_max) in [
            ("a*", 0, None),
            ("a+", 1, None),
            ("a?", 0, Some(1)),
            ("a{3}", 3, Some(3)),
            ("a{2,}", 2, None),
            ("a{2,5}", 2, Some(5)),
            ("a{0,0}", 0, Some(0)),
        ] {
            let ast = parse_pattern(pattern).unwrap();
            match ast {
                Ast::Quantifier { min, max, .. } => {
                    assert_eq!(min, want_min, "pattern {}", pattern);
                    assert_eq!(max, want_max, "pattern {}", pattern);
                }
                other => panic!("pattern {}: expected Quantifier, got {:?}", pattern, other),
            }
        }
    }

    #[test]
    fn test_parse_quantifier_errors() {
        let error_cases = [
            ("a{5,2}", "min > max"),
            ("a{9999999999}", "overflow"),
            ("a{1001}", "over the bound limit"),
            ("a{}", "empty braces"),
            ("a{,3}", "missing low bound"),
            ("a{2,", "unclosed"),
            ("a{2x}", "junk after digits"),
            ("*a", "dangling star"),
            ("a**", "double quantifier"),
            ("(+)", "dangling plus in group"),
        ];
        for (pattern, why) in error_cases {
            assert!(
                parse_pattern(pattern).is_err(),
                "pattern '{}' should fail: {}",
                pattern,
                why
            );
        }
    }

    #[test]
    fn test_parse_lazy_quantifiers_rejected() {
        for pattern in ["a*?", "a+?", "a??", "a{2,5}?"] {
            let err = parse_pattern(pattern).unwrap_err();
            assert!(
                err.message.contains("lazy"),
                "pattern '{}': got '{}'",
                pattern,
                err
            );
        }
    }

    #[test]
    fn test_parse_anchors_rejected() {
        for pattern in ["^a", "a$", r"a\b", r"\Ba", r"\Aa", r"a\Z", r"\Ga"] {
            let err = parse_pattern(pattern).unwrap_err();
            assert!(
                err.message.contains("anchor"),
                "pattern '{}': got '{}'",
                pattern,
                err
            );
        }
    }

    #[test]
    fn test_parse_backreferences_rejected() {
        let err = parse_pattern(r"(a)\1").unwrap_err();
        assert!(err.message.contains("backreference"), "got '{}'", err);
    }

    #[test]
    fn test_parse_group_modifiers_rejected() {
        for pattern in ["(?:a)", "(?=a)", "(?!a)", "(?i)a", "(?<name>a)"] {
            let err = parse_pattern(pattern).unwrap_err();
            assert!(
                err.message.contains("group modifier"),
                "pattern '{}': got '{}'",
                pattern,
                err
            );
        }
    }

    #[test]
    fn test_parse_unbalanced_groups() {
        assert!(parse_pattern("(a").is_err());
        assert!(parse_pattern("a)").is_err());
        assert!(parse_pattern("((a)").is_err());
    }

    #[test]
    fn test_parse_error_offsets() {
        // Offsets are 0-based character positions.
        let err = parse_pattern("ab$").unwrap_err();
        assert_eq!(err.offset, 2);

        let err = parse_pattern("a{5,2}").unwrap_err();
        assert_eq!(err.offset, 5);

        let err = parse_pattern("π$").unwrap_err();
        assert_eq!(err.offset, 1, "offset counts characters, not bytes");
    }

    #[test]
    fn test_parse_char_class_ranges() {
        let ast = parse_pattern("[a-cx]").unwrap();
        assert_eq!(
            class_of(&ast),
            &[
                CodepointInterval::new('a' as u32, 'c' as u32),
                singleton('x')
            ]
        );
    }

    #[test]
    fn test_parse_char_class_merges_overlaps() {
        let ast = parse_pattern("[a-cb-e]").unwrap();
        assert_eq!(
            class_of(&ast),
            &[CodepointInterval::new('a' as u32, 'e' as u32)]
        );
    }

    #[test]
    fn test_parse_negated_class() {
        let ast = parse_pattern("[^a-c]").unwrap();
        let intervals = class_of(&ast).to_vec();
        assert!(!intervals.iter().any(|iv| iv.contains('b' as u32)));
        assert!(intervals.iter().any(|iv| iv.contains('d' as u32)));
        assert!(intervals.iter().any(|iv| iv.contains(CP_MIN)));
        assert!(intervals.iter().any(|iv| iv.contains(CP_MAX)));
    }

    #[test]
    fn test_parse_class_hyphen_literal_positions() {
        // Leading, trailing, and pre-']' hyphens are literals.
        for pattern in ["[-a]", "[a-]", "[a\\d-]"] {
            let ast = parse_pattern(pattern).unwrap();
            assert!(
                class_of(&ast).iter().any(|iv| iv.contains('-' as u32)),
                "pattern '{}' should contain literal '-'",
                pattern
            );
        }
    }

    #[test]
    fn test_parse_class_hyphen_after_shorthand() {
        // A shorthand class can't open a range, so the '-' is a literal.
        let ast = parse_pattern(r"[\d-z]").unwrap();
        let intervals = class_of(&ast).to_vec();
        assert!(intervals.iter().any(|iv| iv.contains('5' as u32)));
        assert!(intervals.iter().any(|iv| iv.contains('-' as u32)));
        assert!(intervals.iter().any(|iv| iv.contains('z' as u32)));
        assert!(!intervals.iter().any(|iv| iv.contains('q' as u32)));
    }

    #[test]
    fn test_parse_class_shorthand_endpoint_rejected() {
        let err = parse_pattern(r"[a-\d]").unwrap_err();
        assert!(err.message.contains("range endpoint"), "got '{}'", err);
    }

    #[test]
    fn test_parse_class_escaped_hyphen_is_literal() {
        let ast = parse_pattern(r"[a\-z]").unwrap();
        let intervals = class_of(&ast).to_vec();
        assert!(intervals.iter().any(|iv| iv.contains('-' as u32)));
        assert!(!intervals.iter().any(|iv| iv.contains('q' as u32)));
    }

    #[test]
    fn test_parse_class_errors() {
        let error_cases = [
            ("[z-a]", "out-of-order range"),
            ("[abc", "unclosed class"),
            ("[", "unclosed class"),
            ("[]", "empty class"),
            ("[^]", "empty negated class"),
            (r"[\q]", "invalid escape in class"),
        ];
        for (pattern, why) in error_cases {
            assert!(
                parse_pattern(pattern).is_err(),
                "pattern '{}' should fail: {}",
                pattern,
                why
            );
        }
    }

    #[test]
    fn test_parse_class_range_of_escapes() {
        let ast = parse_pattern(r"[\t-\r]").unwrap();
        assert_eq!(class_of(&ast), &[CodepointInterval::new(0x09, 0x0D)]);
    }

    #[test]
    fn test_parse_shorthand_classes() {
        let ast = parse_pattern(r"\d").unwrap();
        assert_eq!(
            class_of(&ast),
            &[CodepointInterval::new('0' as u32, '9' as u32)]
        );

        let ast = parse_pattern(r"\w").unwrap();
        let intervals = class_of(&ast).to_vec();
        assert!(intervals.iter().any(|iv| iv.contains('_' as u32)));
        assert!(!intervals.iter().any(|iv| iv.contains(' ' as u32)));

        let ast = parse_pattern(r"\S").unwrap();
        let intervals = class_of(&ast).to_vec();
        assert!(!intervals.iter().any(|iv| iv.contains(' ' as u32)));
        assert!(intervals.iter().any(|iv| iv.contains('x' as u32)));
    }

    #[test]
    fn test_parse_control_escapes() {
        for (pattern, want) in [
            (r"\n", '\n'),
            (r"\r", '\r'),
            (r"\t", '\t'),
            (r"\f", '\x0C'),
            (r"\v", '\x0B'),
            (r"\a", '\x07'),
            (r"\.", '.'),
            (r"\\", '\\'),
            (r"\{", '{'),
        ] {
            let ast = parse_pattern(pattern).unwrap();
            assert_eq!(class_of(&ast), &[singleton(want)], "pattern {}", pattern);
        }
    }

    #[test]
    fn test_parse_codepoint_escapes() {
        let ast = parse_pattern("\\u0041").unwrap();
        assert_eq!(class_of(&ast), &[singleton('A')]);

        let ast = parse_pattern(r"\U0001F600").unwrap();
        assert_eq!(class_of(&ast), &[CodepointInterval::single(0x1F600)]);

        let ast = parse_pattern(r"\u{1F600}").unwrap();
        assert_eq!(class_of(&ast), &[CodepointInterval::single(0x1F600)]);

        let ast = parse_pattern(r"\u{41}").unwrap();
        assert_eq!(class_of(&ast), &[singleton('A')]);
    }

    #[test]
    fn test_parse_codepoint_escape_errors() {
        let error_cases = [
            (r"\u12", "too few fixed-width digits"),
            (r"\u12zz", "bad hex"),
            (r"\U00110000", "outside Unicode range"),
            (r"\uD800", "surrogate"),
            (r"\u{0}", "zero not allowed in braced form"),
            (r"\u{1234567}", "too many digits"),
            (r"\u{}", "empty braces"),
            (r"\u{12", "unclosed braces"),
        ];
        for (pattern, why) in error_cases {
            assert!(
                parse_pattern(pattern).is_err(),
                "pattern '{}' should fail: {}",
                pattern,
                why
            );
        }
    }

    #[test]
    fn test_parse_trailing_backslash() {
        let err = parse_pattern("a\\").unwrap_err();
        assert!(err.message.contains("end of pattern"), "got '{}'", err);
    }

    #[test]
    fn test_parse_nested_groups_with_quantifiers() {
        let ast = parse_pattern("(a(b|c)*)+").unwrap();
        match ast {
            Ast::Quantifier { min: 1, max: None, inner } => match *inner {
                Ast::Concatenation(parts) => assert_eq!(parts.len(), 2),
                other => panic!("expected Concatenation, got {:?}", other),
            },
            other => panic!("expected Quantifier, got {:?}", other),
        }
    }
}
