use percent_encoding::{AsciiSet, PercentEncode, CONTROLS};

/// https://url.spec.whatwg.org/#fragment-percent-encode-set
const FRAGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// https://url.spec.whatwg.org/#path-percent-encode-set
const PATH: &AsciiSet = &FRAGMENT.add(b'#').add(b'?').add(b'{').add(b'}');

/// https://url.spec.whatwg.org/#userinfo-percent-encode-set
const USERINFO: &AsciiSet = &PATH
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|')
    .add(b'%');

/// https://www.rfc-editor.org/rfc/rfc6265#section-4.1.1 + '(', ')'
const COOKIE: &AsciiSet = &USERINFO.add(b'(').add(b')').add(b',');

/// Percent-encode a cookie name or value with the proper encoding set.
pub(crate) fn encode(string: &str) -> PercentEncode<'_> {
    percent_encoding::utf8_percent_encode(string, COOKIE)
}

#[cfg(test)]
mod tests {
    use super::encode;

    #[test]
    fn output_is_a_valid_cookie_value() {
        let encoded = encode("a b;c,d\"e\\f=g%").to_string();
        assert_eq!(encoded, "a%20b%3Bc%2Cd%22e%5Cf%3Dg%25");
        assert!(crate::validation::is_cookie_value(&encoded));
    }

    #[test]
    fn non_ascii_is_encoded() {
        assert_eq!(encode("caffè").to_string(), "caff%C3%A8");
    }
}
