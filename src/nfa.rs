//! Thompson construction from the syntax tree.

use crate::ast::{AssertionType, CharClass, Expr, Quantifier};
use crate::types::{LookAheadId, StorageIndex};
use core::fmt;
use std::collections::HashMap;
use std::rc::Rc;

/// Index of a node within its automaton's arena.
pub type NodeId = usize;

/// A transition. Edges are attempted in insertion order; that order is
/// the path priority and encodes greediness.
#[derive(Debug, Clone)]
pub struct Edge {
    pub kind: EdgeKind,
    pub target: NodeId,
}

#[derive(Debug, Clone)]
pub enum EdgeKind {
    Epsilon,

    /// Consume one code unit satisfying the class.
    CharacterSet(Rc<CharClass>),

    /// A zero-width assertion.
    Assertion(AssertionType),

    /// A lookahead; `id` names the sub-automaton to run in place.
    LookAhead { id: LookAheadId, inverse: bool },

    BeginCapture(StorageIndex),
    EndCapture(StorageIndex),

    // The remaining kinds are constructible but unreachable: no accepted
    // pattern emits them. The executor rejects any path that meets one.
    Backreference(StorageIndex),
    BeginNonGreedy,
    EndNonGreedy,
}

/// A graph vertex with an ordered list of outbound edges.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub edges: Vec<Edge>,
}

/// An automaton with distinguished start and end nodes.
#[derive(Debug, Clone)]
pub struct Nfa {
    pub nodes: Vec<Node>,
    pub start: NodeId,
    pub end: NodeId,
}

impl Nfa {
    #[inline(always)]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}

/// The result of compiling a syntax tree: the main automaton plus the
/// recursively collected lookahead sub-automata.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub nfa: Nfa,
    pub lookaheads: HashMap<LookAheadId, Nfa>,
}

/// Compile \p expr into an automaton.
pub fn compile(expr: &Expr) -> Compiled {
    let mut lookaheads = HashMap::new();
    let mut next_id: LookAheadId = 0;
    let nfa = compile_nfa(expr, &mut lookaheads, &mut next_id);
    Compiled { nfa, lookaheads }
}

fn compile_nfa(
    expr: &Expr,
    lookaheads: &mut HashMap<LookAheadId, Nfa>,
    next_id: &mut LookAheadId,
) -> Nfa {
    let mut builder = Builder {
        nodes: Vec::new(),
        lookaheads,
        next_id,
    };
    let fragment = builder.compile(expr);
    Nfa {
        nodes: builder.nodes,
        start: fragment.start,
        end: fragment.end,
    }
}

/// A sub-automaton under construction. Every fragment has exactly one
/// start and one end node.
#[derive(Debug, Copy, Clone)]
struct Fragment {
    start: NodeId,
    end: NodeId,
}

struct Builder<'a> {
    nodes: Vec<Node>,
    lookaheads: &'a mut HashMap<LookAheadId, Nfa>,
    next_id: &'a mut LookAheadId,
}

impl Builder<'_> {
    fn node(&mut self) -> NodeId {
        self.nodes.push(Node::default());
        self.nodes.len() - 1
    }

    fn edge(&mut self, from: NodeId, kind: EdgeKind, to: NodeId) {
        self.nodes[from].edges.push(Edge { kind, target: to });
    }

    /// A fresh two-node fragment joined by a single edge.
    fn leaf(&mut self, kind: EdgeKind) -> Fragment {
        let start = self.node();
        let end = self.node();
        self.edge(start, kind, end);
        Fragment { start, end }
    }

    /// Join \p next after \p acc with an epsilon edge.
    fn splice(&mut self, acc: Option<Fragment>, next: Fragment) -> Fragment {
        match acc {
            None => next,
            Some(prev) => {
                self.edge(prev.end, EdgeKind::Epsilon, next.start);
                Fragment {
                    start: prev.start,
                    end: next.end,
                }
            }
        }
    }

    fn compile(&mut self, expr: &Expr) -> Fragment {
        match expr {
            Expr::Empty => self.leaf(EdgeKind::Epsilon),

            Expr::Class(class) => self.leaf(EdgeKind::CharacterSet(Rc::clone(class))),

            Expr::Assertion(kind) => self.leaf(EdgeKind::Assertion(*kind)),

            Expr::LookAhead { contents, inverse } => {
                let id = *self.next_id;
                *self.next_id += 1;
                let fragment = self.leaf(EdgeKind::LookAhead {
                    id,
                    inverse: *inverse,
                });
                let sub = compile_nfa(contents, self.lookaheads, self.next_id);
                self.lookaheads.insert(id, sub);
                fragment
            }

            Expr::Concat(exprs) => {
                let mut acc = None;
                for child in exprs {
                    let fragment = self.compile(child);
                    acc = Some(self.splice(acc, fragment));
                }
                acc.expect("concatenation has children")
            }

            Expr::Disjunction(exprs) => {
                let start = self.node();
                let end = self.node();
                for child in exprs {
                    let fragment = self.compile(child);
                    self.edge(start, EdgeKind::Epsilon, fragment.start);
                    self.edge(fragment.end, EdgeKind::Epsilon, end);
                }
                Fragment { start, end }
            }

            Expr::Quantified { contents, quant } => self.compile_quantified(contents, *quant),

            Expr::Group { contents, capture } => {
                let fragment = self.compile(contents);
                match capture {
                    None => fragment,
                    Some(index) => {
                        let start = self.node();
                        self.edge(start, EdgeKind::BeginCapture(*index), fragment.start);
                        let end = self.node();
                        self.edge(fragment.end, EdgeKind::EndCapture(*index), end);
                        Fragment { start, end }
                    }
                }
            }

            Expr::Backreference(index) => self.leaf(EdgeKind::Backreference(*index)),
        }
    }

    /// Quantifiers inline their body: `min` required copies, then either
    /// an unbounded loop or `max - min` optional tails.
    fn compile_quantified(&mut self, contents: &Expr, quant: Quantifier) -> Fragment {
        if quant.min == 0 && quant.max == 0 {
            return self.leaf(EdgeKind::Epsilon);
        }

        let mut acc: Option<Fragment> = None;
        for _ in 0..quant.min {
            let fragment = self.compile(contents);
            acc = Some(self.splice(acc, fragment));
        }

        let fragment = if quant.max == Quantifier::INFINITE {
            // One more copy with a loop back-edge. The back-edge is
            // inserted before the epsilon skip, so a depth-first walk
            // re-enters the body before it exits.
            let body = self.compile(contents);
            self.edge(body.end, EdgeKind::Epsilon, body.start);
            let start = self.node();
            let end = self.node();
            self.edge(start, EdgeKind::Epsilon, body.start);
            self.edge(body.end, EdgeKind::Epsilon, end);
            self.edge(start, EdgeKind::Epsilon, end);
            self.splice(acc, Fragment { start, end })
        } else {
            // Optional tail copies; each tail start gains a skip edge to
            // the final end once the required edges are in place.
            let mut tails = Vec::new();
            for _ in quant.min..quant.max {
                let fragment = self.compile(contents);
                tails.push(fragment.start);
                acc = Some(self.splice(acc, fragment));
            }
            let whole = acc.expect("quantifier with max 0 handled above");
            for tail in tails {
                self.edge(tail, EdgeKind::Epsilon, whole.end);
            }
            whole
        };

        if !quant.greedy {
            // Reserved wrapping; the parser rejects non-greedy quantifiers.
            let start = self.node();
            self.edge(start, EdgeKind::BeginNonGreedy, fragment.start);
            let end = self.node();
            self.edge(fragment.end, EdgeKind::EndNonGreedy, end);
            return Fragment { start, end };
        }
        fragment
    }
}

/// Write the numbered dump of \p nfa and its sub-automata. Nodes are
/// numbered in depth-first discovery order from the start node, following
/// edges in insertion order, so the dump is stable.
pub(crate) fn write_package(
    f: &mut fmt::Formatter,
    nfa: &Nfa,
    lookaheads: &HashMap<LookAheadId, Nfa>,
) -> fmt::Result {
    writeln!(f, "Main NFA {{")?;
    write_nfa(f, nfa)?;
    writeln!(f, "}}")?;

    let mut ids: Vec<LookAheadId> = lookaheads.keys().copied().collect();
    ids.sort_unstable();
    for id in ids {
        writeln!(f)?;
        writeln!(f, "Sub NFA #{} {{", id)?;
        write_nfa(f, &lookaheads[&id])?;
        writeln!(f, "}}")?;
    }
    Ok(())
}

fn discovery_order(nfa: &Nfa) -> Vec<NodeId> {
    fn visit(nfa: &Nfa, id: NodeId, seen: &mut [bool], order: &mut Vec<NodeId>) {
        seen[id] = true;
        order.push(id);
        for edge in &nfa.node(id).edges {
            if !seen[edge.target] {
                visit(nfa, edge.target, seen, order);
            }
        }
    }

    let mut seen = vec![false; nfa.nodes.len()];
    let mut order = Vec::with_capacity(nfa.nodes.len());
    visit(nfa, nfa.start, &mut seen, &mut order);
    order
}

fn write_nfa(f: &mut fmt::Formatter, nfa: &Nfa) -> fmt::Result {
    let order = discovery_order(nfa);
    let mut number = vec![usize::MAX; nfa.nodes.len()];
    for (index, &id) in order.iter().enumerate() {
        number[id] = index;
    }

    writeln!(f, "  Start: Node #{}", number[nfa.start])?;
    writeln!(f, "  End: Node #{}", number[nfa.end])?;
    for (index, &id) in order.iter().enumerate() {
        writeln!(f, "  Node #{} {{", index)?;
        for edge in &nfa.node(id).edges {
            writeln!(f, "    Edge {{")?;
            write!(f, "      ")?;
            match &edge.kind {
                EdgeKind::Epsilon => writeln!(f, "Epsilon")?,
                EdgeKind::CharacterSet(class) => writeln!(f, "{}", class)?,
                EdgeKind::Assertion(kind) => writeln!(f, "Assertion: {}", kind.name())?,
                EdgeKind::LookAhead { id, inverse } => {
                    let prefix = if *inverse { "Inverse " } else { "" };
                    writeln!(f, "{}Look Ahead: Sub NFA #{}", prefix, id)?
                }
                EdgeKind::BeginCapture(index) => writeln!(f, "Begin Capture #{}", index)?,
                EdgeKind::EndCapture(index) => writeln!(f, "End Capture #{}", index)?,
                EdgeKind::Backreference(index) => writeln!(f, "Backreference #{}", index)?,
                EdgeKind::BeginNonGreedy => writeln!(f, "Begin Non-Greedy")?,
                EdgeKind::EndNonGreedy => writeln!(f, "End Non-Greedy")?,
            }
            writeln!(f, "      Transfer to Node #{}", number[edge.target])?;
            writeln!(f, "    }}")?;
        }
        writeln!(f, "  }}")?;
    }
    Ok(())
}
