use std::borrow::Cow;
use std::collections::HashMap;

use crate::codec::{CookieCodec, DecodingError};

#[derive(Default, Debug, Clone)]
/// The cookies carried by a `Cookie` header, as a server reads them.
///
/// A user agent never needs this: it's the consuming end of the header built by
/// [`build_cookie_header`], useful to check what a server will see.
///
/// [`build_cookie_header`]: crate::build_cookie_header
pub struct RequestCookies<'cookie> {
    /// Invariant: the `Vec` for a given `name` is never empty.
    cookies: HashMap<Cow<'cookie, str>, Vec<Cow<'cookie, str>>>,
}

impl<'cookie> RequestCookies<'cookie> {
    /// Creates a new, empty [`RequestCookies`] map.
    pub fn new() -> RequestCookies<'cookie> {
        Default::default()
    }

    /// Adds a value for `name`, after any value already recorded for it.
    ///
    /// Returns `true` if `self` already contained one or more values for `name`.
    pub fn append<N, V>(&mut self, name: N, value: V) -> bool
    where
        N: Into<Cow<'cookie, str>>,
        V: Into<Cow<'cookie, str>>,
    {
        let name = name.into();
        let output = self.cookies.contains_key(&name);
        self.cookies.entry(name).or_default().push(value.into());
        output
    }

    /// The first value sent for `name`.
    ///
    /// ```rust
    /// use galletta::{CookieCodec, RequestCookies};
    ///
    /// let cookies = RequestCookies::parse_header("a=1; b=2; a=3", &CookieCodec::default()).unwrap();
    /// assert_eq!(cookies.get("a"), Some("1"));
    /// assert_eq!(cookies.get("c"), None);
    /// ```
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .get(name)
            .and_then(|values| values.first())
            .map(|value| value.as_ref())
    }

    /// Every value sent for `name`, in header order.
    ///
    /// ```rust
    /// use galletta::{CookieCodec, RequestCookies};
    ///
    /// let cookies = RequestCookies::parse_header("a=1; b=2; a=3", &CookieCodec::default()).unwrap();
    /// assert_eq!(cookies.get_all("a"), ["1", "3"]);
    /// assert!(cookies.get_all("c").is_empty());
    /// ```
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.cookies
            .get(name)
            .map(|values| values.iter().map(|value| value.as_ref()).collect())
            .unwrap_or_default()
    }

    /// The number of distinct cookie names.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Parse a `Cookie` header value into a [`RequestCookies`] map.
    ///
    /// Fragments are separated by `;`. Each fragment is split on its first `=`:
    /// a fragment without `=` is a cookie with an empty value.
    pub fn parse_header(
        header: &'cookie str,
        codec: &CookieCodec,
    ) -> Result<RequestCookies<'cookie>, ParseError> {
        let mut cookies = RequestCookies::new();
        cookies.extend_from_header(header, codec)?;
        Ok(cookies)
    }

    /// Parse a `Cookie` header value and append its cookies to `self`.
    pub fn extend_from_header(
        &mut self,
        header: &'cookie str,
        codec: &CookieCodec,
    ) -> Result<(), ParseError> {
        for fragment in header.split(';') {
            if fragment.chars().all(char::is_whitespace) {
                continue;
            }

            let (name, value) = match fragment.split_once('=') {
                Some((name, value)) => (name.trim(), value.trim()),
                None => (fragment.trim(), ""),
            };

            if name.is_empty() {
                return Err(ParseError::EmptyName(EmptyNameError {
                    value: value.to_string(),
                }));
            }

            let name = codec.decode(name.as_bytes())?;
            let value = codec.decode(value.as_bytes())?;
            self.append(name, value);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`RequestCookies::parse_header()`].
pub enum ParseError {
    #[error("Failed to parse cookies out of a header value")]
    EmptyName(#[source] EmptyNameError),
    #[error("Failed to parse cookies out of a header value")]
    Decoding(#[from] DecodingError),
}

#[derive(Debug, thiserror::Error)]
#[error("The name of a cookie cannot be empty, but found an empty name with `{value}` as value")]
/// An error that occurs when parsing a fragment of a `Cookie` header value
/// that contains an empty name (e.g. `=value`).
pub struct EmptyNameError {
    value: String,
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use googletest::prelude::*;

    use crate::{CookieCodec, RequestCookies};

    #[track_caller]
    fn check_case(string: &str, codec: &CookieCodec, expected: &[(&str, &[&str])]) {
        let actual = RequestCookies::parse_header(string, codec)
            .unwrap_or_else(|e| panic!("Expected a success for {string}: {e}"));
        assert_eq!(actual.len(), expected.len(), "Failed for string: {string}");
        for (name, values) in expected {
            assert_eq!(actual.get_all(name), *values, "Failed for string: {string}");
        }
    }

    #[track_caller]
    fn check_error(string: &str, codec: &CookieCodec, expected: &str) {
        let err = RequestCookies::parse_header(string, codec).unwrap_err();
        let source = err.source().unwrap().to_string();
        assert_eq!(source, expected, "Failed for string: {string}");
    }

    #[test]
    fn parse_plain() {
        let codec = CookieCodec::plain();
        let cases: [(&str, &[(&str, &[&str])]); 12] = [
            ("", &[]),
            (";;", &[]),
            ("name=value", &[("name", &["value"])]),
            ("a=%20", &[("a", &["%20"])]),
            ("  name=value  ", &[("name", &["value"])]),
            ("name=value;  ;other=key", &[("name", &["value"]), ("other", &["key"])]),
            (";a=1 ;  ; b= ", &[("a", &["1"]), ("b", &[""])]),
            (" ;   a=1 ;  ; ;;c===  ", &[("a", &["1"]), ("c", &["=="])]),
            ("yo", &[("yo", &[""])]),
            ("a=1; flag; a=2", &[("a", &["1", "2"]), ("flag", &[""])]),
            ("a=\"quoted\"", &[("a", &["\"quoted\""])]),
            ("a=1;a=1", &[("a", &["1", "1"])]),
        ];
        for (string, expected) in cases {
            check_case(string, &codec, expected);
        }

        let empty_name =
            "The name of a cookie cannot be empty, but found an empty name with `v` as value";
        check_error(";a=1 ;  ; =v ; c=", &codec, empty_name);
        check_error(" ;   a=1 ;  ; =v ; ;;c===  ", &codec, empty_name);
    }

    #[test]
    fn parse_percent_encoded() {
        let codec = CookieCodec::percent();
        check_case("a=%20", &codec, &[("a", &[" "])]);
        check_case("a%20or%20b=1", &codec, &[("a or b", &["1"])]);
        check_error(
            "a=%F1%F2%F3%C0%C1%C2",
            &codec,
            "Failed to percent-decode cookie text",
        );
    }

    #[test]
    fn first_value_wins_for_get() {
        let cookies =
            RequestCookies::parse_header("sid=1; sid=2", &CookieCodec::default()).unwrap();
        assert_that!(cookies.get("sid"), some(eq("1")));
        assert_that!(cookies.get("other"), none());
    }
}
