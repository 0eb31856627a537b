pub mod common;

use common::*;
use indoc::indoc;

#[test]
fn test_single_class_dump() {
    let re = compile("a", "");
    let expected = indoc! {"
        Character Class [\\u0061]

        Main NFA {
          Start: Node #0
          End: Node #1
          Node #0 {
            Edge {
              Character Class [\\u0061]
              Transfer to Node #1
            }
          }
          Node #1 {
          }
        }
    "};
    assert_eq!(re.to_string(), expected);
}

#[test]
fn test_disjunction_dump() {
    let re = compile("a|b", "");
    let expected = indoc! {"
        Disjunction {
          Character Class [\\u0061]
          Character Class [\\u0062]
        }

        Main NFA {
          Start: Node #0
          End: Node #3
          Node #0 {
            Edge {
              Epsilon
              Transfer to Node #1
            }
            Edge {
              Epsilon
              Transfer to Node #4
            }
          }
          Node #1 {
            Edge {
              Character Class [\\u0061]
              Transfer to Node #2
            }
          }
          Node #2 {
            Edge {
              Epsilon
              Transfer to Node #3
            }
          }
          Node #3 {
          }
          Node #4 {
            Edge {
              Character Class [\\u0062]
              Transfer to Node #5
            }
          }
          Node #5 {
            Edge {
              Epsilon
              Transfer to Node #3
            }
          }
        }
    "};
    assert_eq!(re.to_string(), expected);
}

#[test]
fn test_capture_group_dump() {
    let re = compile("(a)", "");
    let expected = indoc! {"
        Group: Captured #1 {
          Character Class [\\u0061]
        }

        Main NFA {
          Start: Node #0
          End: Node #3
          Node #0 {
            Edge {
              Begin Capture #1
              Transfer to Node #1
            }
          }
          Node #1 {
            Edge {
              Character Class [\\u0061]
              Transfer to Node #2
            }
          }
          Node #2 {
            Edge {
              End Capture #1
              Transfer to Node #3
            }
          }
          Node #3 {
          }
        }
    "};
    assert_eq!(re.to_string(), expected);
}

#[test]
fn test_lookahead_dump() {
    let re = compile("a(?=b)", "");
    let expected = indoc! {"
        Concatenation {
          Character Class [\\u0061]
          Assertion: Look Ahead {
            Character Class [\\u0062]
          }
        }

        Main NFA {
          Start: Node #0
          End: Node #3
          Node #0 {
            Edge {
              Character Class [\\u0061]
              Transfer to Node #1
            }
          }
          Node #1 {
            Edge {
              Epsilon
              Transfer to Node #2
            }
          }
          Node #2 {
            Edge {
              Look Ahead: Sub NFA #0
              Transfer to Node #3
            }
          }
          Node #3 {
          }
        }

        Sub NFA #0 {
          Start: Node #0
          End: Node #1
          Node #0 {
            Edge {
              Character Class [\\u0062]
              Transfer to Node #1
            }
          }
          Node #1 {
          }
        }
    "};
    assert_eq!(re.to_string(), expected);
}

#[test]
fn test_unbounded_quantifier_dump() {
    let re = compile("x{2,}", "");
    let expected = indoc! {"
        Quantification: [2, Inf) (Greedy) {
          Character Class [\\u0078]
        }

        Main NFA {
          Start: Node #0
          End: Node #7
          Node #0 {
            Edge {
              Character Class [\\u0078]
              Transfer to Node #1
            }
          }
          Node #1 {
            Edge {
              Epsilon
              Transfer to Node #2
            }
          }
          Node #2 {
            Edge {
              Character Class [\\u0078]
              Transfer to Node #3
            }
          }
          Node #3 {
            Edge {
              Epsilon
              Transfer to Node #4
            }
          }
          Node #4 {
            Edge {
              Epsilon
              Transfer to Node #5
            }
            Edge {
              Epsilon
              Transfer to Node #7
            }
          }
          Node #5 {
            Edge {
              Character Class [\\u0078]
              Transfer to Node #6
            }
          }
          Node #6 {
            Edge {
              Epsilon
              Transfer to Node #5
            }
            Edge {
              Epsilon
              Transfer to Node #7
            }
          }
          Node #7 {
          }
        }
    "};
    assert_eq!(re.to_string(), expected);
}

#[test]
fn test_ast_shapes() {
    // Spot checks of the tree rendering, via the leading dump lines.
    let dump = compile("a.?", "").to_string();
    assert!(dump.starts_with(indoc! {"
        Concatenation {
          Character Class [\\u0061]
          Quantification: [0, 1] (Greedy) {
            Character Class [^\\u000d\\u000a\\u2028\\u2029]
          }
        }
    "}));

    let dump = compile("(?:a)", "").to_string();
    assert!(dump.starts_with(indoc! {"
        Group: Non-Captured {
          Character Class [\\u0061]
        }
    "}));

    let dump = compile(r"\b", "").to_string();
    assert!(dump.starts_with("Assertion: Word Boundary\n"));

    let dump = compile(r"(?!x)", "").to_string();
    assert!(dump.starts_with(indoc! {"
        Assertion: Inverse Look Ahead {
          Character Class [\\u0078]
        }
    "}));

    let dump = compile(r"[A-Fz]", "").to_string();
    assert!(dump.starts_with("Character Class [\\u0041-\\u0046\\u007a]\n"));
}

#[test]
fn test_invalid_pattern_dump_is_empty() {
    let re = regex16::Regex::with_flags("a{5,3}", "");
    assert_eq!(re.to_string(), "");
}
