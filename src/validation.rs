//! Syntax checks for the text that ends up inside a [`Cookie`].
//!
//! All predicates are total: they never panic and never allocate.
//!
//! [`Cookie`]: crate::Cookie

/// Returns `true` if `name` is a valid cookie name, i.e. an RFC 2616 `token`.
///
/// ```rust
/// use galletta::validation::is_cookie_name;
///
/// assert!(is_cookie_name("session_id"));
/// assert!(!is_cookie_name(""));
/// assert!(!is_cookie_name("a=b"));
/// assert!(!is_cookie_name("caffè"));
/// ```
pub fn is_cookie_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(is_token_byte)
}

/// Returns `true` if `value` is a valid cookie value.
///
/// The value can optionally be wrapped in a single pair of double quotes.
///
/// ```rust
/// use galletta::validation::is_cookie_value;
///
/// assert!(is_cookie_value("abc123"));
/// assert!(is_cookie_value(""));
/// assert!(is_cookie_value("\"quoted\""));
/// assert!(!is_cookie_value("\"half"));
/// assert!(!is_cookie_value("a b"));
/// ```
pub fn is_cookie_value(value: &str) -> bool {
    let bytes = value.as_bytes();
    let inner = match bytes {
        [b'"', inner @ .., b'"'] => inner,
        _ => bytes,
    };
    inner.iter().copied().all(is_cookie_octet)
}

/// Returns `true` if `domain` is a host name following RFC 1034 (as relaxed by RFC 1123).
///
/// A single leading `.` must be stripped by the caller.
pub fn is_domain_value(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > 253 {
        return false;
    }
    domain.split('.').all(|label| {
        let bytes = label.as_bytes();
        !bytes.is_empty()
            && bytes.len() <= 63
            && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
            && bytes.first() != Some(&b'-')
            && bytes.last() != Some(&b'-')
    })
}

/// Returns `true` if `value` can be used as a `Path` attribute value or as the
/// value of an unrecognised attribute (`av-octet` in RFC 6265).
pub fn is_path_or_extension_value(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii() && !b.is_ascii_control() && b != b';')
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii()
        && !b.is_ascii_control()
        && !matches!(
            b,
            b'(' | b')'
                | b'<'
                | b'>'
                | b'@'
                | b','
                | b';'
                | b':'
                | b'\\'
                | b'"'
                | b'/'
                | b'['
                | b']'
                | b'?'
                | b'='
                | b'{'
                | b'}'
                | b' '
                | b'\t'
        )
}

/// `cookie-octet` from RFC 6265, section 4.1.1.
fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        for valid in ["a", "SID", "__Host-id", "x.y", "a-b_c!#$%&'*+^`|~"] {
            assert!(is_cookie_name(valid), "{valid} should be a valid name");
        }
        for invalid in [
            "", " a", "a b", "a\tb", "a;b", "a,b", "a=b", "\"a\"", "a/b", "a\\b", "a@b", "a?b",
            "a:b", "a(b)", "a[b]", "a{b}", "a<b>", "a\u{7f}", "a\u{1}", "é",
        ] {
            assert!(!is_cookie_name(invalid), "{invalid:?} should be rejected");
        }
    }

    #[test]
    fn values() {
        for valid in ["", "v", "a=b", "/path?", "\"\"", "\"abc\"", "!#$%&'()*+-./:<=>?@[]^_`{|}~"] {
            assert!(is_cookie_value(valid), "{valid:?} should be a valid value");
        }
        for invalid in [
            "a b", "a,b", "a;b", "a\\b", "\"", "\"abc", "abc\"", "a\"b", "\"a\"b\"", "a\tb",
            "\u{0}", "ü",
        ] {
            assert!(!is_cookie_value(invalid), "{invalid:?} should be rejected");
        }
    }

    #[test]
    fn domains() {
        for valid in ["example.com", "a.b.c", "localhost", "127.0.0.1", "x-y.example", "3com.net"] {
            assert!(is_domain_value(valid), "{valid} should be a valid domain");
        }
        let too_long_label = "a".repeat(64);
        for invalid in [
            "",
            ".example.com",
            "example.com.",
            "exa mple.com",
            "-a.com",
            "a-.com",
            "a..b",
            "under_score.com",
            too_long_label.as_str(),
        ] {
            assert!(!is_domain_value(invalid), "{invalid:?} should be rejected");
        }
    }

    #[test]
    fn paths_and_extensions() {
        assert!(is_path_or_extension_value("/"));
        assert!(is_path_or_extension_value("/a b/c"));
        assert!(is_path_or_extension_value("Strict"));
        assert!(!is_path_or_extension_value(""));
        assert!(!is_path_or_extension_value("/a;b"));
        assert!(!is_path_or_extension_value("/a\u{7f}"));
        assert!(!is_path_or_extension_value("/ä"));
    }
}
