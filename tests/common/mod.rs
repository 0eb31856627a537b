#![allow(dead_code)]

use regex16::{Match, Regex};

/// Encode a str to UTF-16 code units.
pub fn u(s: &str) -> Vec<u16> {
    s.encode_utf16().collect()
}

/// Decode code units back to a String for assertions.
pub fn s(units: &[u16]) -> String {
    String::from_utf16_lossy(units)
}

/// Compile \p pattern with \p flags, asserting it parses.
#[track_caller]
pub fn compile(pattern: &str, flags: &str) -> Regex {
    let re = Regex::with_flags(pattern, flags);
    assert!(
        !re.has_error(),
        "Failed to parse! flags: {} pattern: {}, error: {}",
        flags,
        pattern,
        re.error_message().unwrap_or("")
    );
    re
}

/// Test that \p pattern fails to parse.
#[track_caller]
pub fn test_parse_fails(pattern: &str) {
    let re = Regex::with_flags(pattern, "");
    assert!(re.has_error(), "Pattern should not have parsed: {}", pattern);
}

/// Format a match as the matched text plus comma-separated capture groups.
pub fn format_match(m: &Match) -> String {
    let mut result = s(m.matched_text());
    for group in 1..m.captured_count() {
        result.push(',');
        result.push_str(&s(m.group_text(group)));
    }
    result
}

pub trait RegexTestHelpers {
    /// Assert the first match in \p input formats to \p expected.
    fn match1f(&self, input: &str, expected: &str);

    /// Assert the first match's position and length.
    fn match1_span(&self, input: &str, position: usize, length: usize);

    /// Assert there is no match in \p input.
    fn test_fails(&self, input: &str);

    /// Assert there is a match in \p input.
    fn test_succeeds(&self, input: &str);

    /// All matched texts. A global facade consumes its cursor.
    fn match_all(&self, input: &str) -> Vec<String>;

    /// All match spans as (position, length) pairs.
    fn match_all_spans(&self, input: &str) -> Vec<(usize, usize)>;
}

impl RegexTestHelpers for Regex {
    #[track_caller]
    fn match1f(&self, input: &str, expected: &str) {
        match self.exec(&u(input)) {
            Some(m) => assert_eq!(format_match(&m), expected, "for input {:?}", input),
            None => panic!("Failed to match {:?}", input),
        }
    }

    #[track_caller]
    fn match1_span(&self, input: &str, position: usize, length: usize) {
        match self.exec(&u(input)) {
            Some(m) => assert_eq!(
                (m.matched_index(), m.matched_length()),
                (position, length),
                "for input {:?}",
                input
            ),
            None => panic!("Failed to match {:?}", input),
        }
    }

    #[track_caller]
    fn test_fails(&self, input: &str) {
        assert!(
            self.exec(&u(input)).is_none(),
            "Should not have matched {:?}",
            input
        )
    }

    #[track_caller]
    fn test_succeeds(&self, input: &str) {
        assert!(
            self.exec(&u(input)).is_some(),
            "Should have matched {:?}",
            input
        )
    }

    fn match_all(&self, input: &str) -> Vec<String> {
        self.exec_all(&u(input))
            .iter()
            .map(|m| s(m.matched_text()))
            .collect()
    }

    fn match_all_spans(&self, input: &str) -> Vec<(usize, usize)> {
        self.exec_all(&u(input))
            .iter()
            .map(|m| (m.matched_index(), m.matched_length()))
            .collect()
    }
}
