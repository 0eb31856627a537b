//! The backtracking execution engine.

use crate::ast::{AssertionType, CharClass};
use crate::charclasses::is_line_terminator;
use crate::folds;
use crate::nfa::{EdgeKind, Nfa, NodeId};
use crate::types::{CodeUnit, LookAheadId};
use smallvec::{smallvec, SmallVec};
use std::collections::HashMap;

/// An immutable compiled pattern: the main automaton, its lookahead
/// sub-automata, and the flag state the executor consults.
#[derive(Debug, Clone)]
pub(crate) struct Package {
    pub nfa: Nfa,
    pub lookaheads: HashMap<LookAheadId, Nfa>,
    pub storage_count: usize,
    pub multiline: bool,
    pub ignore_case: bool,
}

/// An input owned by the engine for the duration of a call: a copy of
/// the caller's units, NUL-terminated, lowercased when the pattern
/// ignores case. The sentinel lets boundary tests read one unit past the
/// end, and a NUL never satisfies a character class.
#[derive(Debug)]
pub(crate) struct Input {
    text: Vec<CodeUnit>,
    length: usize,
}

impl Input {
    pub fn new(units: &[CodeUnit], ignore_case: bool) -> Input {
        let mut text = Vec::with_capacity(units.len() + 1);
        text.extend_from_slice(units);
        if ignore_case {
            folds::to_lower(&mut text);
        }
        text.push(0);
        Input {
            text,
            length: units.len(),
        }
    }

    /// The input units, without the sentinel.
    pub fn units(&self) -> &[CodeUnit] {
        &self.text[..self.length]
    }

    pub fn len(&self) -> usize {
        self.length
    }

    /// The unit at \p pos, which may equal the length (the sentinel).
    #[inline(always)]
    fn at(&self, pos: usize) -> CodeUnit {
        self.text[pos]
    }
}

/// The extent of a match or capture, as code-unit offsets.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Range {
    pub position: usize,
    pub length: usize,
}

impl Range {
    /// Sentinel position of a group that did not participate in a match.
    pub const NOT_FOUND: usize = usize::MAX;

    /// Whether this slot was filled by the match.
    pub fn is_found(&self) -> bool {
        self.position != Range::NOT_FOUND
    }

    pub(crate) fn end(&self) -> usize {
        self.position + self.length
    }
}

impl Default for Range {
    fn default() -> Range {
        Range {
            position: Range::NOT_FOUND,
            length: 0,
        }
    }
}

/// Capture slots for one match attempt; slot 0 is the overall match.
#[derive(Debug)]
pub(crate) struct Output {
    pub captures: Vec<Range>,
}

impl Output {
    pub fn new(storage_count: usize) -> Output {
        Output {
            captures: vec![Range::default(); 1 + storage_count],
        }
    }
}

/// One step of the depth-first walk: a node, the next edge to attempt,
/// and the cursor relative to the attempt's start offset.
#[derive(Debug, Copy, Clone)]
struct Frame {
    node: NodeId,
    next_edge: usize,
    cursor: usize,
}

type FrameStack = SmallVec<[Frame; 16]>;

/// A completed path from start to end, with the length it consumed.
#[derive(Debug)]
struct Candidate {
    frames: FrameStack,
    length: usize,
}

/// Run \p package against \p input from absolute offset \p start. On a
/// match, fill \p output and return true.
pub(crate) fn execute(
    package: &Package,
    input: &Input,
    start: usize,
    output: &mut Output,
) -> bool {
    let mut candidates = Vec::new();
    find_all_candidates(package, &package.nfa, input, start, &mut candidates);

    let best = match longest_candidate(&candidates) {
        Some(candidate) => candidate,
        None => return false,
    };
    fill_output(&package.nfa, best, start, output);
    true
}

/// Depth-first enumeration of every successful path through \p nfa from
/// absolute offset \p start, in edge-insertion order.
fn find_all_candidates(
    package: &Package,
    nfa: &Nfa,
    input: &Input,
    start: usize,
    candidates: &mut Vec<Candidate>,
) {
    debug_assert!(start <= input.len());
    let text_len = input.len() - start;

    let mut stack: FrameStack = smallvec![Frame {
        node: nfa.start,
        next_edge: 0,
        cursor: 0,
    }];

    while !stack.is_empty() {
        let top = stack.len() - 1;
        let Frame {
            node,
            next_edge,
            mut cursor,
        } = stack[top];
        if next_edge >= nfa.node(node).edges.len() {
            stack.pop();
            continue;
        }
        stack[top].next_edge += 1;

        let edge = &nfa.node(node).edges[next_edge];
        let pass = match &edge.kind {
            EdgeKind::Epsilon | EdgeKind::BeginCapture(_) | EdgeKind::EndCapture(_) => true,

            EdgeKind::CharacterSet(class) => {
                if cursor < text_len && class_test(class, input.at(start + cursor), package.ignore_case)
                {
                    cursor += 1;
                    true
                } else {
                    false
                }
            }

            EdgeKind::Assertion(kind) => {
                test_assertion(*kind, input, start + cursor, package.multiline)
            }

            EdgeKind::LookAhead { id, inverse } => {
                let mut sub = Vec::new();
                find_all_candidates(package, &package.lookaheads[id], input, start + cursor, &mut sub);
                sub.is_empty() == *inverse
            }

            // Unreachable for accepted patterns; reject the path.
            EdgeKind::Backreference(_) | EdgeKind::BeginNonGreedy | EdgeKind::EndNonGreedy => false,
        };
        if !pass {
            continue;
        }

        let target = edge.target;
        stack.push(Frame {
            node: target,
            next_edge: 0,
            cursor,
        });
        if target == nfa.end {
            candidates.push(Candidate {
                frames: stack.clone(),
                length: cursor,
            });
        }
    }
}

/// The class test. NUL never matches; under ignore-case the (lowercased)
/// input unit is also tried uppercased against the raw pattern ranges —
/// the pattern's own ranges are never folded.
fn class_test(class: &CharClass, c: CodeUnit, ignore_case: bool) -> bool {
    if c == 0 {
        return false;
    }
    let folded = folds::upper(c);
    let hit = class
        .ranges
        .iter()
        .any(|r| r.contains(c) || (ignore_case && folded != c && r.contains(folded)));
    hit != class.inverse
}

/// Zero-width assertions test the absolute position over the whole input.
fn test_assertion(kind: AssertionType, input: &Input, pos: usize, multiline: bool) -> bool {
    match kind {
        AssertionType::BeginOfLine => {
            pos == 0 || (multiline && is_line_terminator(input.at(pos - 1)))
        }
        AssertionType::EndOfLine => {
            pos == input.len() || (multiline && is_line_terminator(input.at(pos)))
        }
        AssertionType::WordBoundary | AssertionType::NonWordBoundary => {
            let left = pos > 0 && is_word_unit(input.at(pos - 1));
            let right = is_word_unit(input.at(pos));
            (left != right) == (kind == AssertionType::WordBoundary)
        }
    }
}

/// The engine's generous notion of a word character: every unit from
/// U+001F up counts, so spaces and punctuation are word characters.
#[inline(always)]
fn is_word_unit(c: CodeUnit) -> bool {
    c >= 0x1F
}

/// The first candidate of maximal consumed length.
fn longest_candidate(candidates: &[Candidate]) -> Option<&Candidate> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        match best {
            Some(b) if candidate.length <= b.length => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Recover capture ranges from the winning path. For each adjacent pair
/// of frames, every edge linking the pair contributes its marker.
fn fill_output(nfa: &Nfa, candidate: &Candidate, start: usize, output: &mut Output) {
    output.captures[0] = Range {
        position: start,
        length: candidate.length,
    };

    for pair in candidate.frames.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        for edge in &nfa.node(from.node).edges {
            if edge.target != to.node {
                continue;
            }
            match edge.kind {
                EdgeKind::BeginCapture(index) => {
                    output.captures[index].position = start + from.cursor;
                }
                EdgeKind::EndCapture(index) => {
                    let begin = output.captures[index].position;
                    debug_assert!(begin != Range::NOT_FOUND, "end capture without begin");
                    output.captures[index].length = start + from.cursor - begin;
                }
                _ => {}
            }
        }
    }
}
