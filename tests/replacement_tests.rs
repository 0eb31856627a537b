pub mod common;

use common::*;
use regex16::Regex;

/// Replace through str conversions, for readable assertions.
#[track_caller]
fn replace1(re: &Regex, input: &str, template: &str) -> String {
    s(&re.replace(&u(input), &u(template)))
}

#[test]
fn test_replace_basic() {
    let re = compile("world", "");
    assert_eq!(replace1(&re, "hello world", "universe"), "hello universe");
}

#[test]
fn test_replace_no_match() {
    let re = compile("xyz", "");
    assert_eq!(replace1(&re, "hello world", "universe"), "hello world");
}

#[test]
fn test_replace_non_global_replaces_first() {
    let re = compile("a", "");
    assert_eq!(replace1(&re, "aaa", "b"), "baa");
}

#[test]
fn test_replace_global() {
    let re = compile(r"\d+", "g");
    assert_eq!(replace1(&re, "a1b22c333", "#"), "a#b#c#");
    let re = compile("a", "g");
    assert_eq!(replace1(&re, "banana", "x"), "bxnxnx");
}

#[test]
fn test_replace_with_capture_groups() {
    let re = compile(r"(\w+)\s(\w+)", "");
    assert_eq!(replace1(&re, "hello world", "$2 $1"), "world hello");
}

#[test]
fn test_replace_whole_match_and_context() {
    let re = compile("b", "");
    assert_eq!(replace1(&re, "abc", "[$&]($`)($')"), "a[b](a)(c)c");
}

#[test]
fn test_replace_group_zero() {
    let re = compile(r"\d+", "");
    assert_eq!(replace1(&re, "Price: 123", "[$0]"), "Price: [123]");
}

#[test]
fn test_replace_literal_dollar() {
    let re = compile(r"\d+", "");
    assert_eq!(replace1(&re, "Price: 123", "$$0"), "Price: $0");
    // A trailing dollar is literal, as is a dollar before a non-marker.
    assert_eq!(replace1(&re, "a1", "x$"), "ax$");
    assert_eq!(replace1(&re, "a1", "$z"), "a$z");
}

#[test]
fn test_replace_digit_prefix() {
    let re = compile("(a)(b)", "");
    assert_eq!(replace1(&re, "ab", "$2$1"), "ba");
    // $12 takes the longest valid prefix: group 1, then a literal 2.
    assert_eq!(replace1(&re, "ab", "$12"), "a2");
    // An out-of-range first digit drops the whole digit run.
    assert_eq!(replace1(&re, "ab", "x$9y"), "xy");
    assert_eq!(replace1(&re, "ab", "x$99y"), "xy");
}

#[test]
fn test_replace_unmatched_group_inserts_nothing() {
    let re = compile("(x)?ab", "");
    assert_eq!(replace1(&re, "ab", "[$1]"), "[]");
}

#[test]
fn test_replace_ignore_case_uses_folded_text() {
    // Matched text comes from the engine-owned, lowercased buffer;
    // unmatched stretches come from the caller's original text.
    let re = compile("b", "i");
    assert_eq!(replace1(&re, "aBc", "[$&]"), "a[b]c");
    let re = compile("B", "i");
    assert_eq!(replace1(&re, "AbC", "<$&>"), "A<b>C");
}

#[test]
fn test_replace_callback() {
    let re = compile(r"\w+", "g");
    let out = re.replace_with(&u("ab cd"), |m| {
        let mut units = u("<");
        units.extend_from_slice(m.matched_text());
        units.extend_from_slice(&u(">"));
        units
    });
    assert_eq!(s(&out), "<ab> <cd>");
}

#[test]
fn test_replace_callback_sees_captures() {
    let re = compile(r"(\d)(\d)", "g");
    let out = re.replace_with(&u("12 34"), |m| {
        let mut units = m.group_text(2).to_vec();
        units.extend_from_slice(m.group_text(1));
        units
    });
    assert_eq!(s(&out), "21 43");
}

#[test]
fn test_replace_date_format() {
    let re = compile(r"(\d{4})-(\d{2})-(\d{2})", "");
    assert_eq!(replace1(&re, "2023-12-25", "$2/$3/$1"), "12/25/2023");
}

#[test]
fn test_replace_literal_idempotent() {
    // No '$' in the template: plain splicing of a literal.
    let re = compile("na", "g");
    assert_eq!(replace1(&re, "banana", "xy"), "baxyxy");
}
