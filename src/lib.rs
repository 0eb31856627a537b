/*!

# regex16 - an EcmaScript-flavored regex engine over UTF-16 code units

This crate provides a regular expression engine which works directly on
16-bit code-unit strings (`&[u16]`). It targets embedding in hosts that
keep text in UTF-16 or UCS-2 internally, such as JavaScript engines and
editors; surrogate pairs are treated as two independent units throughout.

# Example: test whether a pattern matches

```rust
use regex16::Regex;
let re = Regex::with_flags(r"\d+", "");
let text: Vec<u16> = "Price: 123".encode_utf16().collect();
let m = re.exec(&text).unwrap();
assert_eq!(m.matched_index(), 7);
assert_eq!(m.matched_length(), 3);
```

# Example: iterating over matches

The 'g' flag drives a `last_index` cursor, as in JavaScript:

```rust
use regex16::Regex;
let re = Regex::with_flags(r"\d+", "g");
let text: Vec<u16> = "a1b22c333".encode_utf16().collect();
let lengths: Vec<usize> = re.exec_all(&text).iter().map(|m| m.matched_length()).collect();
assert_eq!(lengths, vec![1, 2, 3]);
```

# Example: template replacement

```rust
use regex16::Regex;
let re = Regex::with_flags(r"(\w+)\s(\w+)", "");
let text: Vec<u16> = "hello world".encode_utf16().collect();
let template: Vec<u16> = "$2 $1".encode_utf16().collect();
let out = re.replace(&text, &template);
assert_eq!(String::from_utf16_lossy(&out), "world hello");
```

# Supported syntax

The accepted fragment of EcmaScript regex syntax: disjunction,
concatenation, greedy quantifiers (`*` `+` `?` `{n}` `{n,}` `{n,m}`),
capturing and non-capturing groups, lookahead assertions `(?=..)` and
`(?!..)`, anchors, word boundaries, bracket classes, and the usual
escapes. Backreferences and non-greedy quantifiers are recognized but
rejected with a diagnostic; named groups and Unicode property escapes are
not part of the grammar.

# Matching semantics

Among all ways a pattern can match at a given start position this engine
selects the *longest*, where EcmaScript selects the first in syntax
order. `a|ab` against `"ab"` therefore matches `"ab"`, not `"a"`. Case
folding under 'i' is ASCII-only and is applied to the input, not to the
pattern's bracket ranges.

# Architecture

A recursive-descent parser builds a syntax tree; a Thompson construction
turns it into an NFA with labeled epsilon transitions for captures, plus
one sub-automaton per lookahead; a depth-first backtracking executor
enumerates candidate paths and keeps the longest. Compilation happens
once, at facade construction; an invalid pattern produces an inert facade
that reports the diagnostic instead of failing construction.

# Caveats

Backtracking is unbounded: pathological patterns like `(a*)*` against a
long non-matching input take exponential time. A `Regex` is not `Sync` —
the global-iteration cursor is plain mutable state — so share clones, not
references, across threads.

*/

#![warn(clippy::all)]
#![allow(clippy::manual_range_contains, clippy::match_like_matches_macro)]

pub use crate::api::*;
pub use crate::types::CodeUnit;

mod api;
mod ast;
mod charclasses;
mod exec;
mod folds;
mod nfa;
mod parse;
mod types;
mod util;
