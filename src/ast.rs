//! Syntax tree for parsed patterns.

use crate::charclasses::{self, CharRange};
use crate::types::{CodeUnit, StorageIndex};
use core::fmt;
use std::rc::Rc;

/// A zero-width assertion other than lookahead.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssertionType {
    BeginOfLine,
    EndOfLine,
    WordBoundary,
    NonWordBoundary,
}

impl AssertionType {
    pub(crate) fn name(self) -> &'static str {
        match self {
            AssertionType::BeginOfLine => "Begin of Line",
            AssertionType::EndOfLine => "End of Line",
            AssertionType::WordBoundary => "Word Boundary",
            AssertionType::NonWordBoundary => "Non-Word Boundary",
        }
    }
}

/// A set of inclusive code-unit ranges, possibly inverted. Ranges keep the
/// order the parser produced them in and may overlap.
///
/// Classes are reference-counted: the compiled automaton's character-set
/// edges point back at the class the syntax tree owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    pub ranges: Vec<CharRange>,
    pub inverse: bool,
}

impl CharClass {
    /// A class holding the single unit \p c.
    pub fn unit(c: CodeUnit) -> CharClass {
        CharClass {
            ranges: vec![CharRange::new(c, c)],
            inverse: false,
        }
    }

    /// The class behind `.` and `[^]`: any unit but a line terminator.
    pub fn unspecified_character() -> CharClass {
        CharClass {
            ranges: charclasses::LINE_TERMINATORS.to_vec(),
            inverse: true,
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Character Class [")?;
        if self.inverse {
            f.write_str("^")?;
        }
        for range in &self.ranges {
            write!(f, "\\u{:04x}", range.first)?;
            if range.first != range.last {
                write!(f, "-\\u{:04x}", range.last)?;
            }
        }
        f.write_str("]")
    }
}

/// A quantifier like `*` or `{2,5}`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Quantifier {
    /// Minimum number of repetitions, inclusive.
    pub min: usize,

    /// Maximum number of repetitions, inclusive, or `INFINITE`.
    pub max: usize,

    /// Whether the quantifier is greedy. The parser rejects non-greedy
    /// quantifiers, so this is true in every accepted pattern.
    pub greedy: bool,
}

impl Quantifier {
    /// Sentinel for an unbounded maximum.
    pub const INFINITE: usize = usize::MAX;
}

/// The node types of the syntax tree.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Matches the empty string.
    Empty,

    /// Matches one code unit from a set of ranges. The `.` atom and `[^]`
    /// are the inverted line-terminator class.
    Class(Rc<CharClass>),

    /// A zero-width assertion like `^` or `\b`.
    Assertion(AssertionType),

    /// A lookahead assertion `(?=..)` or `(?!..)`.
    LookAhead { contents: Box<Expr>, inverse: bool },

    /// An ordered sequence of expressions.
    Concat(Vec<Expr>),

    /// Ordered alternatives like `a|b`.
    Disjunction(Vec<Expr>),

    /// A quantified expression.
    Quantified { contents: Box<Expr>, quant: Quantifier },

    /// A group; `capture` holds the 1-based storage index when capturing.
    Group {
        contents: Box<Expr>,
        capture: Option<StorageIndex>,
    },

    /// A backreference. The parser recognizes the syntax but rejects it,
    /// so no accepted pattern contains this node.
    Backreference(StorageIndex),
}

impl fmt::Display for Expr {
    /// The indented diagnostic form: one operator per block.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_expr(self, 0, f)
    }
}

fn pad(f: &mut fmt::Formatter, indent: usize) -> fmt::Result {
    write!(f, "{:1$}", "", indent)
}

fn write_block(
    header: fmt::Arguments,
    contents: &Expr,
    indent: usize,
    f: &mut fmt::Formatter,
) -> fmt::Result {
    writeln!(f, "{} {{", header)?;
    write_expr(contents, indent + 2, f)?;
    pad(f, indent)?;
    writeln!(f, "}}")
}

fn write_expr(expr: &Expr, indent: usize, f: &mut fmt::Formatter) -> fmt::Result {
    pad(f, indent)?;
    match expr {
        Expr::Empty => writeln!(f, "Empty"),
        Expr::Class(class) => writeln!(f, "{}", class),
        Expr::Assertion(kind) => writeln!(f, "Assertion: {}", kind.name()),
        Expr::LookAhead { contents, inverse } => {
            let name = if *inverse {
                "Inverse Look Ahead"
            } else {
                "Look Ahead"
            };
            write_block(format_args!("Assertion: {}", name), contents, indent, f)
        }
        Expr::Concat(exprs) => {
            writeln!(f, "Concatenation {{")?;
            for child in exprs {
                write_expr(child, indent + 2, f)?;
            }
            pad(f, indent)?;
            writeln!(f, "}}")
        }
        Expr::Disjunction(exprs) => {
            writeln!(f, "Disjunction {{")?;
            for child in exprs {
                write_expr(child, indent + 2, f)?;
            }
            pad(f, indent)?;
            writeln!(f, "}}")
        }
        Expr::Quantified { contents, quant } => {
            let greedy = if quant.greedy { "Greedy" } else { "Non-Greedy" };
            if quant.max == Quantifier::INFINITE {
                write_block(
                    format_args!("Quantification: [{}, Inf) ({})", quant.min, greedy),
                    contents,
                    indent,
                    f,
                )
            } else {
                write_block(
                    format_args!("Quantification: [{}, {}] ({})", quant.min, quant.max, greedy),
                    contents,
                    indent,
                    f,
                )
            }
        }
        Expr::Group { contents, capture } => match capture {
            Some(index) => write_block(
                format_args!("Group: Captured #{}", index),
                contents,
                indent,
                f,
            ),
            None => write_block(format_args!("Group: Non-Captured"), contents, indent, f),
        },
        Expr::Backreference(index) => writeln!(f, "Backreference #{}", index),
    }
}
