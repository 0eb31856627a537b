//! Parser from pattern code units to the syntax tree.

use crate::ast::{AssertionType, CharClass, Expr, Quantifier};
use crate::charclasses::{self, CharRange};
use crate::types::{CodeUnit, StorageIndex};
use crate::util::to_char_sat;
use core::fmt;
use std::rc::Rc;

/// The fixed diagnostic strings.
mod errmsg {
    pub const END_OF_EXPR_EXPECTED: &str = "End-of-expression expected.";
    pub const RIGHT_PAREN_EXPECTED: &str = "')' expected.";
    pub const RIGHT_SQUARE_EXPECTED: &str = "']' expected.";
    pub const RIGHT_CURLY_EXPECTED: &str = "'}' expected.";
    pub const RIGHT_CURLY_OR_COMMA_EXPECTED: &str = "'}' or ',' expected.";
    pub const DECIMAL_DIGIT_EXPECTED: &str = "Decimal digit expected.";
    pub const UNRECOGNIZED_CHARACTER: &str = "Unrecognized character.";
    pub const INVALID_CONTROL_ESCAPE: &str = "Invalid control escape.";
    pub const INVALID_HEX_ESCAPE: &str = "Invalid hexadecimal escape sequence.";
    pub const INVALID_UNICODE_ESCAPE: &str = "Invalid unicode escape sequence.";
    pub const INVALID_CHAR_CLASS_RANGE: &str = "Invalid character class range.";
    pub const INVALID_QUANTIFICATION_RANGE: &str = "Invalid quantification range.";
    pub const NON_GREEDY_NOT_SUPPORTED: &str = "Non-greedy quantification is not supported.";
    pub const BACKREFERENCE_NOT_SUPPORTED: &str = "Backreference is not supported.";
}

/// An error encountered while parsing a pattern. `position` is a 0-based
/// code-unit offset identifying the offending character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub text: &'static str,
    pub position: usize,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.text)
    }
}

impl std::error::Error for Error {}

/// A successfully parsed pattern.
#[derive(Debug)]
pub struct Parsed {
    pub expr: Expr,

    /// Number of capturing groups; storage indexes run 1..=storage_count.
    pub storage_count: usize,
}

fn error<T>(text: &'static str, position: usize) -> Result<T, Error> {
    Err(Error { text, position })
}

fn make_cat(mut exprs: Vec<Expr>) -> Expr {
    match exprs.len() {
        0 => Expr::Empty,
        1 => exprs.pop().unwrap(),
        _ => Expr::Concat(exprs),
    }
}

fn make_alt(mut exprs: Vec<Expr>) -> Expr {
    match exprs.len() {
        0 => Expr::Empty,
        1 => exprs.pop().unwrap(),
        _ => Expr::Disjunction(exprs),
    }
}

fn class_unit(c: CodeUnit) -> Expr {
    Expr::Class(Rc::new(CharClass::unit(c)))
}

/// The range table and sense for a \d \D \s \S \w \W escape.
fn class_escape_table(c: char) -> (&'static [CharRange], bool) {
    match c {
        'd' => (&charclasses::DIGITS, false),
        'D' => (&charclasses::DIGITS, true),
        's' => (&charclasses::WHITESPACE, false),
        'S' => (&charclasses::WHITESPACE, true),
        'w' => (&charclasses::WORD_CHARS, false),
        'W' => (&charclasses::WORD_CHARS, true),
        _ => panic!("not a class escape"),
    }
}

/// The class for \d \D \s \S \w \W outside a bracket. Uppercase forms
/// set the inverse flag rather than materializing complement ranges.
fn predefined_class(c: char) -> CharClass {
    let (table, inverse) = class_escape_table(c);
    CharClass {
        ranges: table.to_vec(),
        inverse,
    }
}

/// Flatten \d \s \w (or a complement) into the enclosing bracket's range
/// list. A complement materializes, per source range, as [1, lo-1] and
/// [hi+1, 0xFFFF] so it composes with sibling ranges.
fn push_class_escape(ranges: &mut Vec<CharRange>, c: char) {
    let (table, inverse) = class_escape_table(c);
    if inverse {
        for range in table {
            if range.first > 1 {
                ranges.push(CharRange::new(1, range.first - 1));
            }
            if range.last < CodeUnit::MAX {
                ranges.push(CharRange::new(range.last + 1, CodeUnit::MAX));
            }
        }
    } else {
        ranges.extend_from_slice(table);
    }
}

/// One parsed bracket atom: either a plain unit or a \d-style escape that
/// flattens into the enclosing bracket.
enum ClassAtom {
    Unit(CodeUnit),
    PredefinedClass(char),
}

/// Represents the state used to parse a pattern.
struct Parser {
    /// The pattern, NUL-terminated. The sentinel doubles as end-of-input,
    /// so an embedded NUL terminates the parse early; the leftover text
    /// then surfaces as an end-of-expression error.
    text: Vec<CodeUnit>,

    /// Pattern length, excluding the sentinel.
    length: usize,

    /// Current offset. Never exceeds `length`.
    pos: usize,

    /// Running count of capturing groups.
    storage_index: StorageIndex,
}

impl Parser {
    fn new(pattern: &[CodeUnit]) -> Parser {
        let mut text = Vec::with_capacity(pattern.len() + 1);
        text.extend_from_slice(pattern);
        text.push(0);
        Parser {
            text,
            length: pattern.len(),
            pos: 0,
            storage_index: 0,
        }
    }

    /// The code unit at the cursor; the sentinel NUL at end-of-input.
    fn peek(&self) -> CodeUnit {
        self.text[self.pos]
    }

    /// The code unit \p n places past the cursor, clamped to the sentinel.
    fn peek_at(&self, n: usize) -> CodeUnit {
        self.text[(self.pos + n).min(self.length)]
    }

    /// Consume and return the unit at the cursor. A no-op at end-of-input.
    fn bump(&mut self) -> CodeUnit {
        let c = self.text[self.pos];
        if self.pos < self.length {
            self.pos += 1;
        }
        c
    }

    /// Consume \p c if it is next, returning whether it was.
    fn try_consume(&mut self, c: char) -> bool {
        if self.peek() == c as u16 {
            self.bump();
            true
        } else {
            false
        }
    }

    fn parse(mut self) -> Result<Parsed, Error> {
        let expr = self.parse_disjunction()?;
        if self.pos < self.length {
            return error(errmsg::END_OF_EXPR_EXPECTED, self.pos);
        }
        Ok(Parsed {
            expr,
            storage_count: self.storage_index,
        })
    }

    fn parse_disjunction(&mut self) -> Result<Expr, Error> {
        let mut alternatives = vec![self.parse_alternative()?];
        while self.try_consume('|') {
            alternatives.push(self.parse_alternative()?);
        }
        Ok(make_alt(alternatives))
    }

    fn parse_alternative(&mut self) -> Result<Expr, Error> {
        let mut terms: Vec<Expr> = Vec::new();
        loop {
            match to_char_sat(self.peek()) {
                '\0' | '|' | ')' => return Ok(make_cat(terms)),
                _ => terms.push(self.parse_term()?),
            }
        }
    }

    fn parse_term(&mut self) -> Result<Expr, Error> {
        // Assertions take no quantifier; they return directly.
        match to_char_sat(self.peek()) {
            '^' => {
                self.bump();
                return Ok(Expr::Assertion(AssertionType::BeginOfLine));
            }
            '$' => {
                self.bump();
                return Ok(Expr::Assertion(AssertionType::EndOfLine));
            }
            '\\' => match to_char_sat(self.peek_at(1)) {
                'b' => {
                    self.bump();
                    self.bump();
                    return Ok(Expr::Assertion(AssertionType::WordBoundary));
                }
                'B' => {
                    self.bump();
                    self.bump();
                    return Ok(Expr::Assertion(AssertionType::NonWordBoundary));
                }
                _ => {}
            },
            '(' => {
                if self.peek_at(1) == '?' as u16 {
                    let c = to_char_sat(self.peek_at(2));
                    if c == '=' || c == '!' {
                        self.bump();
                        self.bump();
                        return self.parse_lookahead();
                    }
                }
            }
            _ => {}
        }

        let atom = self.parse_atom()?;
        self.parse_quantifier(atom)
    }

    /// Parse an optional quantifier following \p atom.
    fn parse_quantifier(&mut self, atom: Expr) -> Result<Expr, Error> {
        let quant_pos = self.pos;
        let (min, max) = match to_char_sat(self.peek()) {
            '*' => {
                self.bump();
                (0, Quantifier::INFINITE)
            }
            '+' => {
                self.bump();
                (1, Quantifier::INFINITE)
            }
            '?' => {
                self.bump();
                (0, 1)
            }
            '{' => {
                self.bump();
                let min = self.scan_decimal_digits()?;
                let max = match to_char_sat(self.peek()) {
                    '}' => {
                        self.bump();
                        min
                    }
                    ',' => {
                        self.bump();
                        if self.try_consume('}') {
                            Quantifier::INFINITE
                        } else {
                            let max = self.scan_decimal_digits()?;
                            if !self.try_consume('}') {
                                return error(errmsg::RIGHT_CURLY_EXPECTED, self.pos);
                            }
                            max
                        }
                    }
                    _ => return error(errmsg::RIGHT_CURLY_OR_COMMA_EXPECTED, self.pos),
                };
                (min, max)
            }
            _ => return Ok(atom),
        };

        let non_greedy_pos = self.pos;
        let greedy = !self.try_consume('?');
        if min > max {
            return error(errmsg::INVALID_QUANTIFICATION_RANGE, quant_pos);
        }
        if !greedy {
            return error(errmsg::NON_GREEDY_NOT_SUPPORTED, non_greedy_pos);
        }
        Ok(Expr::Quantified {
            contents: Box::new(atom),
            quant: Quantifier { min, max, greedy },
        })
    }

    /// Parse a lookahead body; the cursor sits on the `=` or `!`.
    fn parse_lookahead(&mut self) -> Result<Expr, Error> {
        let inverse = self.bump() == '!' as u16;
        let contents = self.parse_disjunction()?;
        if !self.try_consume(')') {
            return error(errmsg::RIGHT_PAREN_EXPECTED, self.pos);
        }
        Ok(Expr::LookAhead {
            contents: Box::new(contents),
            inverse,
        })
    }

    fn parse_atom(&mut self) -> Result<Expr, Error> {
        match to_char_sat(self.peek()) {
            '.' => {
                self.bump();
                Ok(Expr::Class(Rc::new(CharClass::unspecified_character())))
            }
            '\\' => self.parse_atom_escape(),
            '[' => self.parse_character_class(),
            '(' => self.parse_group(),
            '^' | '$' | '*' | '+' | '?' | ')' | ']' | '{' | '}' | '|' => {
                error(errmsg::UNRECOGNIZED_CHARACTER, self.pos)
            }
            _ => Ok(class_unit(self.bump())),
        }
    }

    fn parse_atom_escape(&mut self) -> Result<Expr, Error> {
        self.bump(); // backslash
        match to_char_sat(self.peek()) {
            '0' => {
                self.bump();
                Ok(class_unit(0))
            }
            '1'..='9' => error(errmsg::BACKREFERENCE_NOT_SUPPORTED, self.pos),
            'f' => {
                self.bump();
                Ok(class_unit(0x0C))
            }
            'n' => {
                self.bump();
                Ok(class_unit(0x0A))
            }
            'r' => {
                self.bump();
                Ok(class_unit(0x0D))
            }
            't' => {
                self.bump();
                Ok(class_unit(0x09))
            }
            'v' => {
                self.bump();
                Ok(class_unit(0x0B))
            }
            'd' | 'D' | 's' | 'S' | 'w' | 'W' => {
                let c = to_char_sat(self.bump());
                Ok(Expr::Class(Rc::new(predefined_class(c))))
            }
            'x' => {
                self.bump();
                let c = self.scan_hex_escape()?;
                Ok(class_unit(c))
            }
            'u' => {
                self.bump();
                let c = self.scan_unicode_escape()?;
                Ok(class_unit(c))
            }
            'c' => {
                self.bump();
                let c = self.scan_control_letter()?;
                Ok(class_unit(c))
            }
            // Identity escape: the escaped unit itself.
            _ => Ok(class_unit(self.bump())),
        }
    }

    /// `( Disjunction )` or `(?: Disjunction )`. Lookaheads never reach
    /// here; the term parser dispatches them first.
    fn parse_group(&mut self) -> Result<Expr, Error> {
        self.bump(); // (
        let capture = if self.peek() == '?' as u16 && self.peek_at(1) == ':' as u16 {
            self.bump();
            self.bump();
            None
        } else {
            self.storage_index += 1;
            Some(self.storage_index)
        };

        let contents = self.parse_disjunction()?;
        if !self.try_consume(')') {
            return error(errmsg::RIGHT_PAREN_EXPECTED, self.pos);
        }
        Ok(Expr::Group {
            contents: Box::new(contents),
            capture,
        })
    }

    fn parse_character_class(&mut self) -> Result<Expr, Error> {
        self.bump(); // [
        let inverse = self.try_consume('^');
        let mut ranges: Vec<CharRange> = Vec::new();

        loop {
            match to_char_sat(self.peek()) {
                '\0' => return error(errmsg::RIGHT_SQUARE_EXPECTED, self.pos),
                ']' => {
                    self.bump();
                    if ranges.is_empty() {
                        // [] matches the empty string; [^] is the `.` class.
                        return Ok(if inverse {
                            Expr::Class(Rc::new(CharClass::unspecified_character()))
                        } else {
                            Expr::Empty
                        });
                    }
                    return Ok(Expr::Class(Rc::new(CharClass { ranges, inverse })));
                }
                _ => {}
            }

            let begin = match self.parse_class_atom()? {
                ClassAtom::Unit(c) => c,
                ClassAtom::PredefinedClass(c) => {
                    push_class_escape(&mut ranges, c);
                    continue;
                }
            };

            if to_char_sat(self.peek()) != '-' {
                ranges.push(CharRange::new(begin, begin));
                continue;
            }

            // A dash right before the closing bracket is literal.
            match to_char_sat(self.peek_at(1)) {
                '\0' | ']' => {
                    self.bump(); // -
                    ranges.push(CharRange::new(begin, begin));
                    ranges.push(CharRange::new('-' as u16, '-' as u16));
                    continue;
                }
                _ => {}
            }
            self.bump(); // -

            let end = match self.parse_class_atom()? {
                ClassAtom::Unit(c) => c,
                ClassAtom::PredefinedClass(c) => {
                    // A class escape cannot end a range; the dash demotes
                    // to a literal, as in [a-\d].
                    ranges.push(CharRange::new(begin, begin));
                    ranges.push(CharRange::new('-' as u16, '-' as u16));
                    push_class_escape(&mut ranges, c);
                    continue;
                }
            };

            if begin > end {
                return error(errmsg::INVALID_CHAR_CLASS_RANGE, self.pos);
            }
            ranges.push(CharRange::new(begin, end));
        }
    }

    /// Parse one bracket atom. The caller has ruled out `]` and NUL.
    fn parse_class_atom(&mut self) -> Result<ClassAtom, Error> {
        if to_char_sat(self.peek()) != '\\' {
            return Ok(ClassAtom::Unit(self.bump()));
        }
        self.bump(); // backslash
        match to_char_sat(self.peek()) {
            // Inside a bracket, \<digits> is a decimal code-unit value.
            '0'..='9' => Ok(ClassAtom::Unit(self.scan_decimal_digits()? as CodeUnit)),
            // \b is backspace here, unlike its assertion meaning outside.
            'b' => {
                self.bump();
                Ok(ClassAtom::Unit(0x08))
            }
            'f' => {
                self.bump();
                Ok(ClassAtom::Unit(0x0C))
            }
            'n' => {
                self.bump();
                Ok(ClassAtom::Unit(0x0A))
            }
            'r' => {
                self.bump();
                Ok(ClassAtom::Unit(0x0D))
            }
            't' => {
                self.bump();
                Ok(ClassAtom::Unit(0x09))
            }
            'v' => {
                self.bump();
                Ok(ClassAtom::Unit(0x0B))
            }
            'x' => {
                self.bump();
                Ok(ClassAtom::Unit(self.scan_hex_escape()?))
            }
            'u' => {
                self.bump();
                Ok(ClassAtom::Unit(self.scan_unicode_escape()?))
            }
            'c' => {
                self.bump();
                Ok(ClassAtom::Unit(self.scan_control_letter()?))
            }
            'd' | 'D' | 's' | 'S' | 'w' | 'W' => {
                Ok(ClassAtom::PredefinedClass(to_char_sat(self.bump())))
            }
            // Identity escape.
            _ => Ok(ClassAtom::Unit(self.bump())),
        }
    }

    /// `\cX` for an ASCII letter X: the code unit `X & 0x1F`.
    fn scan_control_letter(&mut self) -> Result<CodeUnit, Error> {
        let c = self.peek();
        let is_letter = ('a' as u16 <= c && c <= 'z' as u16) || ('A' as u16 <= c && c <= 'Z' as u16);
        if is_letter {
            self.bump();
            Ok(c & 0x1F)
        } else {
            error(errmsg::INVALID_CONTROL_ESCAPE, self.pos)
        }
    }

    /// Scan a run of decimal digits, saturating at usize::MAX. Saturation
    /// coincides with the unbounded-quantifier sentinel.
    fn scan_decimal_digits(&mut self) -> Result<usize, Error> {
        if to_char_sat(self.peek()).to_digit(10).is_none() {
            return error(errmsg::DECIMAL_DIGIT_EXPECTED, self.pos);
        }
        let mut value: usize = 0;
        while let Some(digit) = to_char_sat(self.peek()).to_digit(10) {
            self.bump();
            value = value.saturating_mul(10).saturating_add(digit as usize);
        }
        Ok(value)
    }

    fn scan_hex_escape(&mut self) -> Result<CodeUnit, Error> {
        self.scan_hex_digits(2, errmsg::INVALID_HEX_ESCAPE)
    }

    fn scan_unicode_escape(&mut self) -> Result<CodeUnit, Error> {
        self.scan_hex_digits(4, errmsg::INVALID_UNICODE_ESCAPE)
    }

    fn scan_hex_digits(&mut self, count: usize, message: &'static str) -> Result<CodeUnit, Error> {
        let mut value: CodeUnit = 0;
        for _ in 0..count {
            match to_char_sat(self.peek()).to_digit(16) {
                Some(digit) => {
                    self.bump();
                    value = (value << 4) | digit as CodeUnit;
                }
                None => return error(message, self.pos),
            }
        }
        Ok(value)
    }
}

/// Try parsing a pattern.
/// Return the syntax tree and the capture-group count, or the first error.
pub fn parse(pattern: &[CodeUnit]) -> Result<Parsed, Error> {
    Parser::new(pattern).parse()
}
