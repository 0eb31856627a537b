use crate::types::CodeUnit;

// ASCII-only case mapping. Inputs are lowercased once on entry to the
// executor; the per-unit helpers serve the character-class test.

/// Lowercase \p c if it is an ASCII uppercase letter.
#[inline(always)]
pub fn lower(c: CodeUnit) -> CodeUnit {
    if 'A' as u16 <= c && c <= 'Z' as u16 {
        c + 0x20
    } else {
        c
    }
}

/// Uppercase \p c if it is an ASCII lowercase letter.
#[inline(always)]
pub fn upper(c: CodeUnit) -> CodeUnit {
    if 'a' as u16 <= c && c <= 'z' as u16 {
        c - 0x20
    } else {
        c
    }
}

/// Lowercase every ASCII A-Z unit of \p buf in place.
pub fn to_lower(buf: &mut [CodeUnit]) {
    for c in buf.iter_mut() {
        *c = lower(*c);
    }
}

/// Uppercase every ASCII a-z unit of \p buf in place.
pub fn to_upper(buf: &mut [CodeUnit]) {
    for c in buf.iter_mut() {
        *c = upper(*c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units() {
        assert_eq!(lower('A' as u16), 'a' as u16);
        assert_eq!(lower('z' as u16), 'z' as u16);
        assert_eq!(upper('a' as u16), 'A' as u16);
        // Non-ASCII letters are untouched: the folding is ASCII-only.
        assert_eq!(lower(0x00C0), 0x00C0);
        assert_eq!(upper(0x00E0), 0x00E0);
        assert_eq!(lower(0x2028), 0x2028);
    }

    #[test]
    fn buffers() {
        let mut buf: Vec<u16> = "Mixed CASE 123 \u{00C0}".encode_utf16().collect();
        to_lower(&mut buf);
        assert_eq!(String::from_utf16_lossy(&buf), "mixed case 123 \u{00C0}");
        to_upper(&mut buf);
        assert_eq!(String::from_utf16_lossy(&buf), "MIXED CASE 123 \u{00C0}");
    }
}
