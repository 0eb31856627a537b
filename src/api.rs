//! The public surface: flags, compiled patterns, matches, replacement.

use crate::ast::Expr;
use crate::exec::{self, Output, Package};
use crate::nfa;
use crate::parse;
use crate::types::CodeUnit;
use crate::util::to_char_sat;
use core::fmt;
use std::cell::Cell;
use std::rc::Rc;

pub use crate::exec::Range;
pub use crate::parse::Error;

/// Flags controlling how a pattern is compiled and driven.
#[derive(Debug, Copy, Clone, Default)]
pub struct Flags {
    /// If set, `exec` resumes from `last_index` and iteration yields
    /// every match. Equivalent to the 'g' flag in JavaScript.
    pub global: bool,

    /// If set, ^ and $ also match at line terminators, not just the
    /// input boundaries. Equivalent to the 'm' flag in JavaScript.
    pub multiline: bool,

    /// If set, matching is ASCII-case-insensitive.
    /// Equivalent to the 'i' flag in JavaScript.
    pub ignore_case: bool,
}

impl Flags {
    /// Construct a Flags from flag characters, using JavaScript names:
    /// 'g' is global, 'm' is multiline, 'i' ignores case.
    /// Other flags are not implemented and are ignored.
    #[inline]
    pub fn new<T: Iterator<Item = char>>(chars: T) -> Self {
        let mut result = Self::default();
        for c in chars {
            match c {
                'g' => {
                    result.global = true;
                }
                'm' => {
                    result.multiline = true;
                }
                'i' => {
                    result.ignore_case = true;
                }
                _ => {
                    // Silently skip unsupported flags.
                }
            }
        }
        result
    }
}

impl From<&str> for Flags {
    /// Construct a Flags from a string, using JavaScript field names.
    ///
    /// See also: [`Flags::new`].
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s.chars())
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.global {
            f.write_str("g")?;
        }
        if self.ignore_case {
            f.write_str("i")?;
        }
        if self.multiline {
            f.write_str("m")?;
        }
        Ok(())
    }
}

/// A Match represents a portion of an input which matched a pattern,
/// together with its capture groups.
///
/// A Match borrows nothing from the caller: it shares the engine-owned
/// copy of the input, which is lowercased when the pattern ignores case.
#[derive(Debug, Clone)]
pub struct Match {
    input: Rc<exec::Input>,
    captures: Vec<Range>,
}

impl Match {
    /// The engine-owned input the match indexes into.
    pub fn input(&self) -> &[CodeUnit] {
        self.input.units()
    }

    /// Offset of the overall match.
    pub fn matched_index(&self) -> usize {
        self.captures[0].position
    }

    /// Length of the overall match.
    pub fn matched_length(&self) -> usize {
        self.captures[0].length
    }

    /// The overall matched units.
    pub fn matched_text(&self) -> &[CodeUnit] {
        self.group_text(0)
    }

    /// Number of capture slots, including slot 0 for the overall match.
    pub fn captured_count(&self) -> usize {
        self.captures.len()
    }

    /// The raw capture ranges. An unmatched optional group reads
    /// `position == Range::NOT_FOUND` and `length == 0`.
    pub fn captures(&self) -> &[Range] {
        &self.captures
    }

    /// The range of capture slot \p index, or None if the slot is out of
    /// bounds or the group did not participate in the match.
    pub fn group(&self, index: usize) -> Option<Range> {
        let range = *self.captures.get(index)?;
        if range.is_found() {
            Some(range)
        } else {
            None
        }
    }

    /// The units of capture slot \p index; empty when unmatched.
    pub fn group_text(&self, index: usize) -> &[CodeUnit] {
        match self.group(index) {
            Some(range) => &self.input.units()[range.position..range.position + range.length],
            None => &[],
        }
    }

    /// Iterate over all capture slots, starting with the overall match.
    pub fn groups(&self) -> Groups {
        Groups {
            mat: self,
            index: 0,
        }
    }
}

/// An iterator over the capture slots of a [`Match`].
#[derive(Clone)]
pub struct Groups<'m> {
    mat: &'m Match,
    index: usize,
}

impl<'m> Iterator for Groups<'m> {
    type Item = Option<Range>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index < self.mat.captured_count() {
            let item = self.mat.group(self.index);
            self.index += 1;
            Some(item)
        } else {
            None
        }
    }
}

/// A compiled pattern plus its flag state and global-iteration cursor.
///
/// Construction never fails. A facade built from an invalid pattern is
/// inert — `test` is false, `exec` and `exec_all` yield nothing, and
/// `replace` returns the input unchanged — with the diagnostic exposed
/// through [`Regex::error_message`] and [`Regex::error_position`].
///
/// The `last_index` cursor lives in a `Cell`, so a `Regex` is not `Sync`:
/// one facade serves one thread at a time. Clone the facade to use a
/// pattern from several threads.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: Vec<CodeUnit>,
    flags: Flags,
    ast: Option<Expr>,
    package: Option<Package>,
    error: Option<Error>,
    last_index: Cell<usize>,
}

impl Regex {
    /// Compile \p pattern with \p flags.
    pub fn new(pattern: &[CodeUnit], flags: Flags) -> Regex {
        let (ast, package, error) = match parse::parse(pattern) {
            Ok(parsed) => {
                let compiled = nfa::compile(&parsed.expr);
                let package = Package {
                    nfa: compiled.nfa,
                    lookaheads: compiled.lookaheads,
                    storage_count: parsed.storage_count,
                    multiline: flags.multiline,
                    ignore_case: flags.ignore_case,
                };
                (Some(parsed.expr), Some(package), None)
            }
            Err(error) => (None, None, Some(error)),
        };
        Regex {
            pattern: pattern.to_vec(),
            flags,
            ast,
            package,
            error,
            last_index: Cell::new(0),
        }
    }

    /// Compile a pattern given as a string, encoding it to UTF-16.
    pub fn with_flags<F>(pattern: &str, flags: F) -> Regex
    where
        F: Into<Flags>,
    {
        let units: Vec<CodeUnit> = pattern.encode_utf16().collect();
        Regex::new(&units, flags.into())
    }

    /// The pattern, as the code units given at construction.
    pub fn pattern(&self) -> &[CodeUnit] {
        &self.pattern
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Whether the pattern failed to parse.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// The parse diagnostic, if any.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(|e| e.text)
    }

    /// Offset of the offending code unit, if the pattern failed to parse.
    pub fn error_position(&self) -> Option<usize> {
        self.error.as_ref().map(|e| e.position)
    }

    /// Number of capturing groups.
    pub fn storage_count(&self) -> usize {
        self.package.as_ref().map_or(0, |p| p.storage_count)
    }

    /// The global-iteration cursor. Meaningful only under the 'g' flag.
    pub fn last_index(&self) -> usize {
        self.last_index.get()
    }

    pub fn set_last_index(&self, index: usize) {
        self.last_index.set(index);
    }

    /// Return whether the pattern matches somewhere in \p text.
    /// Like `exec`, this moves `last_index` on a global facade.
    pub fn test(&self, text: &[CodeUnit]) -> bool {
        self.exec(text).is_some()
    }

    /// Find the next match in \p text: from `last_index` when global,
    /// from the beginning otherwise.
    pub fn exec(&self, text: &[CodeUnit]) -> Option<Match> {
        let input = Rc::new(exec::Input::new(text, self.flags.ignore_case));
        self.exec_input(&input)
    }

    /// Collect every match (under 'g') or at most the first one.
    /// All returned matches share one engine-owned input buffer.
    pub fn exec_all(&self, text: &[CodeUnit]) -> Vec<Match> {
        let input = Rc::new(exec::Input::new(text, self.flags.ignore_case));
        let mut matches = Vec::new();
        if self.flags.global {
            self.last_index.set(0);
            while self.last_index.get() < input.len() {
                match self.exec_input(&input) {
                    Some(m) => matches.push(m),
                    None => break,
                }
            }
        } else if let Some(m) = self.exec_input(&input) {
            matches.push(m);
        }
        matches
    }

    /// Replace matches in \p text by expanding \p template per match.
    /// All matches are replaced under 'g', otherwise the first.
    /// The output is a newly allocated code-unit buffer.
    pub fn replace(&self, text: &[CodeUnit], template: &[CodeUnit]) -> Vec<CodeUnit> {
        self.replace_with(text, |m| expand_template(template, m))
    }

    /// Replace matches in \p text with the units the callback produces.
    pub fn replace_with<F>(&self, text: &[CodeUnit], mut replacement: F) -> Vec<CodeUnit>
    where
        F: FnMut(&Match) -> Vec<CodeUnit>,
    {
        let input = Rc::new(exec::Input::new(text, self.flags.ignore_case));
        let mut records: Vec<(Range, Vec<CodeUnit>)> = Vec::new();
        if self.flags.global {
            self.last_index.set(0);
            while self.last_index.get() < input.len() {
                let m = match self.exec_input(&input) {
                    Some(m) => m,
                    None => break,
                };
                let units = replacement(&m);
                records.push((m.captures[0], units));
            }
        } else if let Some(m) = self.exec_input(&input) {
            let units = replacement(&m);
            records.push((m.captures[0], units));
        }

        // Splice the replacements into the caller's original text.
        let mut out = Vec::with_capacity(text.len());
        let mut cursor = 0;
        for (range, units) in &records {
            out.extend_from_slice(&text[cursor..range.position]);
            out.extend_from_slice(units);
            cursor = range.end();
        }
        out.extend_from_slice(&text[cursor..]);
        out
    }

    fn exec_input(&self, input: &Rc<exec::Input>) -> Option<Match> {
        let package = self.package.as_ref()?;

        let mut start = 0;
        if self.flags.global {
            let cursor = self.last_index.get();
            if cursor >= input.len() {
                self.last_index.set(0);
                return None;
            }
            start = cursor;
        }

        let mut output = Output::new(package.storage_count);
        while start < input.len() {
            if exec::execute(package, input, start, &mut output) {
                if self.flags.global {
                    let matched = output.captures[0];
                    // A zero-length match still advances the cursor, so
                    // global iteration terminates.
                    let next = if matched.length == 0 {
                        matched.end() + 1
                    } else {
                        matched.end()
                    };
                    self.last_index.set(next);
                }
                return Some(Match {
                    input: Rc::clone(input),
                    captures: output.captures,
                });
            }
            start += 1;
        }

        if self.flags.global {
            self.last_index.set(0);
        }
        None
    }
}

impl fmt::Display for Regex {
    /// The diagnostic dump: the syntax tree, a blank line, then the
    /// numbered automaton with its lookahead sub-automata.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(ast) = &self.ast {
            write!(f, "{}", ast)?;
            writeln!(f)?;
        }
        if let Some(package) = &self.package {
            nfa::write_package(f, &package.nfa, &package.lookaheads)?;
        }
        Ok(())
    }
}

/// Expand a `$` replacement template for one match. Everything copies
/// literally except `$$` (a dollar), `$&` (the match), `` $` `` (the text
/// before it), `$'` (the text after it) and `$<digits>` (a capture). The
/// digits are taken as the longest prefix naming a valid capture slot; if
/// the first digit is already out of range the whole run is dropped.
fn expand_template(template: &[CodeUnit], m: &Match) -> Vec<CodeUnit> {
    let input = m.input();
    let mut out = Vec::with_capacity(template.len());
    let mut i = 0;
    while i < template.len() {
        let c = template[i];
        if c != '$' as u16 {
            out.push(c);
            i += 1;
            continue;
        }
        if i + 1 == template.len() {
            // A trailing dollar is literal.
            out.push(c);
            break;
        }
        let next = template[i + 1];
        match to_char_sat(next) {
            '$' => {
                out.push('$' as u16);
                i += 2;
            }
            '&' => {
                out.extend_from_slice(m.matched_text());
                i += 2;
            }
            '`' => {
                out.extend_from_slice(&input[..m.matched_index()]);
                i += 2;
            }
            '\'' => {
                out.extend_from_slice(&input[m.matched_index() + m.matched_length()..]);
                i += 2;
            }
            '0'..='9' => {
                let digits = &template[i + 1..];
                let mut scanned = 0;
                let mut value: usize = 0;
                let mut best: Option<(usize, usize)> = None;
                for &d in digits {
                    let digit = match to_char_sat(d).to_digit(10) {
                        Some(digit) => digit as usize,
                        None => break,
                    };
                    scanned += 1;
                    value = value.saturating_mul(10).saturating_add(digit);
                    if value < m.captured_count() {
                        best = Some((value, scanned));
                    }
                }
                match best {
                    Some((slot, consumed)) => {
                        out.extend_from_slice(m.group_text(slot));
                        i += 1 + consumed;
                    }
                    None => i += 1 + scanned,
                }
            }
            _ => {
                out.push('$' as u16);
                out.push(next);
                i += 2;
            }
        }
    }
    out
}
