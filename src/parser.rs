//! Parsing of `Set-Cookie` header values into [`Cookie`]s, following the storage
//! model of RFC 6265, sections 5.2 and 5.3.
use crate::codec::{CookieCodec, DecodingError};
use crate::date::parse_cookie_date;
use crate::expiration::{now, offset, MAX_TIME, MIN_TIME};
use crate::matching::{default_path, domain_match};
use crate::validation::{
    is_cookie_name, is_cookie_value, is_domain_value, is_path_or_extension_value,
};
use crate::Cookie;
use url::Url;

/// Parse a single `Set-Cookie` header value received in response to a request for `url`.
///
/// The current time is used as the creation time of the cookie and as the base for
/// `Max-Age`. Use [`parse_set_cookie_at`] to provide a different clock.
///
/// ```rust
/// use galletta::{parse_set_cookie, CookieCodec};
/// use url::Url;
///
/// let url = Url::parse("http://www.example.com/apps/main").unwrap();
/// let codec = CookieCodec::default();
///
/// let cookie = parse_set_cookie("sid=abc; Domain=.example.com; Secure", &url, &codec).unwrap();
/// assert_eq!(cookie.name_value(), ("sid", "abc"));
/// assert_eq!(cookie.domain(), "example.com");
/// assert_eq!(cookie.path(), "/apps");
/// assert!(!cookie.host_only());
/// assert!(cookie.secure_only());
/// assert!(!cookie.persistent());
///
/// // A server can't set cookies for a domain it doesn't belong to.
/// assert!(parse_set_cookie("sid=abc; Domain=rust-lang.org", &url, &codec).is_err());
/// ```
pub fn parse_set_cookie(
    header: impl AsRef<[u8]>,
    url: &Url,
    codec: &CookieCodec,
) -> Result<Cookie, SetCookieError> {
    parse_set_cookie_at(header, url, codec, now())
}

/// Parse a single `Set-Cookie` header value, using `now` (seconds since the Unix epoch)
/// as the current time.
pub fn parse_set_cookie_at(
    header: impl AsRef<[u8]>,
    url: &Url,
    codec: &CookieCodec,
    now: i64,
) -> Result<Cookie, SetCookieError> {
    let header = header.as_ref();
    let (pair, attributes) = match header.iter().position(|b| *b == b';') {
        Some(index) => (&header[..index], &header[index + 1..]),
        None => (header, &[][..]),
    };

    let (name, value) = split_pair(pair).ok_or_else(|| SetCookieError::MissingPair {
        fragment: String::from_utf8_lossy(pair).into_owned(),
    })?;
    let name = match std::str::from_utf8(name) {
        Ok(name) if is_cookie_name(name) => name.as_bytes(),
        _ => {
            return Err(SetCookieError::InvalidName(
                String::from_utf8_lossy(name).into_owned(),
            ))
        }
    };
    if !std::str::from_utf8(value).is_ok_and(is_cookie_value) {
        return Err(SetCookieError::InvalidValue {
            name: String::from_utf8_lossy(name).into_owned(),
            value: String::from_utf8_lossy(value).into_owned(),
        });
    }

    let attributes = Attributes::parse(attributes, now);

    let host = url
        .host_str()
        .ok_or_else(|| SetCookieError::MissingHost(url.to_string()))?
        .to_ascii_lowercase();

    let (domain, host_only) = match attributes.domain {
        Some(raw) => {
            let domain = codec.decode_attribute(raw)?.to_ascii_lowercase();
            if !is_domain_value(&domain) {
                return Err(SetCookieError::InvalidDomain(domain));
            }
            if !domain_match(&host, &domain) {
                return Err(SetCookieError::DomainMismatch { domain, host });
            }
            (domain, false)
        }
        None => (host, true),
    };

    let path = match attributes.path {
        Some(raw) => codec.decode_attribute(raw)?.into_owned(),
        None => default_path(url).to_owned(),
    };
    // A path that can't be stored is treated like a missing `Path` attribute.
    let path = if path.starts_with('/') && is_path_or_extension_value(&path) {
        path
    } else {
        default_path(url).to_owned()
    };

    let (expiration_time, persistent) = match (attributes.max_age, attributes.expires) {
        (Some(expiration), _) => (expiration, true),
        (None, Some(expires)) => (expires.clamp(MIN_TIME, MAX_TIME), true),
        (None, None) => (MAX_TIME, false),
    };

    let mut cookie = Cookie::from_parts(
        codec.decode(name)?.into_owned(),
        codec.decode(value)?.into_owned(),
        domain,
        path,
        now,
    );
    cookie.expiration_time = expiration_time;
    cookie.persistent = persistent;
    cookie.host_only = host_only;
    cookie.secure_only = attributes.secure;
    cookie.http_only = attributes.http_only;
    Ok(cookie)
}

/// The attributes of a `Set-Cookie` header that survived the left-to-right fold.
#[derive(Default)]
struct Attributes<'a> {
    expires: Option<i64>,
    /// Already turned into an absolute expiration time.
    max_age: Option<i64>,
    domain: Option<&'a [u8]>,
    path: Option<&'a [u8]>,
    secure: bool,
    http_only: bool,
}

impl<'a> Attributes<'a> {
    fn parse(list: &'a [u8], now: i64) -> Attributes<'a> {
        let mut attributes = Attributes::default();
        for attribute in list.split(|b| *b == b';') {
            let (name, value) = split_pair(attribute).unwrap_or((trim(attribute), &[][..]));
            if name.eq_ignore_ascii_case(b"expires") {
                if let Some(time) = parse_cookie_date(value) {
                    attributes.expires = Some(time);
                }
            } else if name.eq_ignore_ascii_case(b"max-age") {
                if let Some(delta) = parse_max_age(value) {
                    attributes.max_age = Some(if delta <= 0 { 0 } else { offset(now, delta) });
                }
            } else if name.eq_ignore_ascii_case(b"domain") {
                let domain = value.strip_prefix(b".").unwrap_or(value);
                if !domain.is_empty() {
                    attributes.domain = Some(domain);
                }
            } else if name.eq_ignore_ascii_case(b"path") {
                attributes.path = value.starts_with(b"/").then_some(value);
            } else if name.eq_ignore_ascii_case(b"secure") {
                attributes.secure = true;
            } else if name.eq_ignore_ascii_case(b"httponly") {
                attributes.http_only = true;
            }
        }
        attributes
    }
}

/// `Max-Age` must be an optionally negative sequence of digits.
fn parse_max_age(value: &[u8]) -> Option<i64> {
    let (negative, digits) = match value.strip_prefix(b"-") {
        Some(digits) => (true, digits),
        None => (false, value),
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let magnitude = digits.iter().fold(0i64, |acc, digit| {
        acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Split on the first `=`, trimming whitespace around both halves.
fn split_pair(fragment: &[u8]) -> Option<(&[u8], &[u8])> {
    let index = fragment.iter().position(|b| *b == b'=')?;
    Some((trim(&fragment[..index]), trim(&fragment[index + 1..])))
}

fn trim(bytes: &[u8]) -> &[u8] {
    let is_space = |b: &u8| *b == b' ' || *b == b'\t';
    let start = bytes.iter().position(|b| !is_space(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_space(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Why a `Set-Cookie` header value did not produce a cookie.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SetCookieError {
    #[error("Expected a name-value pair, but no `=` was found in `{fragment}`")]
    MissingPair { fragment: String },
    #[error("`{0}` is not a valid cookie name")]
    InvalidName(String),
    #[error("`{value}` is not a valid value for the `{name}` cookie")]
    InvalidValue { name: String, value: String },
    #[error("`{0}` is not a valid cookie domain")]
    InvalidDomain(String),
    #[error("The `{domain}` domain does not match the request host `{host}`")]
    DomainMismatch { domain: String, host: String },
    #[error("Cookies can't be set in response to `{0}`, it has no host")]
    MissingHost(String),
    #[error(transparent)]
    Decoding(#[from] DecodingError),
}

#[cfg(test)]
mod tests {
    use super::{parse_max_age, parse_set_cookie_at, SetCookieError};
    use crate::{CookieCodec, MAX_TIME};
    use googletest::prelude::*;
    use url::Url;

    const NOW: i64 = 1_600_000_000;

    fn parse(header: &str, url: &str) -> std::result::Result<crate::Cookie, SetCookieError> {
        let url = Url::parse(url).unwrap();
        parse_set_cookie_at(header, &url, &CookieCodec::default(), NOW)
    }

    #[test]
    fn minimal_cookie() {
        let cookie = parse("a=b", "http://example.com/docs/index.html").unwrap();
        assert_that!(cookie.name_value(), eq(("a", "b")));
        assert_that!(cookie.domain(), eq("example.com"));
        assert_that!(cookie.path(), eq("/docs"));
        assert!(cookie.host_only());
        assert!(!cookie.persistent());
        assert!(!cookie.secure_only());
        assert!(!cookie.http_only());
        assert_eq!(cookie.expiration_time(), MAX_TIME);
        assert_eq!(cookie.creation_time(), NOW);
        assert_eq!(cookie.access_time(), NOW);
    }

    #[test]
    fn whitespace_and_empty_values() {
        let cookie = parse("  a  =  b  ;  Path = /x ", "http://example.com/").unwrap();
        assert_that!(cookie.name_value(), eq(("a", "b")));
        assert_that!(cookie.path(), eq("/x"));

        let cookie = parse("a=", "http://example.com/").unwrap();
        assert_that!(cookie.value(), eq(""));

        let cookie = parse("a=\"quoted\"", "http://example.com/").unwrap();
        assert_that!(cookie.value(), eq("\"quoted\""));
    }

    #[test]
    fn malformed_pairs_are_rejected() {
        assert!(matches!(
            parse("novalue", "http://example.com/"),
            Err(SetCookieError::MissingPair { .. })
        ));
        assert!(matches!(
            parse("; a=b", "http://example.com/"),
            Err(SetCookieError::MissingPair { .. })
        ));
        assert!(matches!(
            parse("=b", "http://example.com/"),
            Err(SetCookieError::InvalidName(_))
        ));
        assert!(matches!(
            parse("a b=c", "http://example.com/"),
            Err(SetCookieError::InvalidName(_))
        ));
        assert!(matches!(
            parse("a=b c", "http://example.com/"),
            Err(SetCookieError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse("a=\"b", "http://example.com/"),
            Err(SetCookieError::InvalidValue { .. })
        ));
    }

    #[test]
    fn flags_are_case_insensitive() {
        let cookie = parse("a=b; secure; HTTPONLY=whatever", "https://example.com/").unwrap();
        assert!(cookie.secure_only());
        assert!(cookie.http_only());
    }

    #[test]
    fn unknown_attributes_are_ignored() {
        let cookie = parse("a=b; SameSite=Lax; Priority=High; =; junk", "http://example.com/")
            .unwrap();
        assert_that!(cookie.name_value(), eq(("a", "b")));
    }

    #[test]
    fn expires_sets_a_persistent_cookie() {
        let cookie = parse(
            "a=b; Expires=Wed, 09 Jun 2021 10:18:14 GMT",
            "http://example.com/",
        )
        .unwrap();
        assert!(cookie.persistent());
        assert_eq!(cookie.expiration_time(), 1623233894);
    }

    #[test]
    fn invalid_expires_is_ignored() {
        let cookie = parse("a=b; Expires=tomorrow", "http://example.com/").unwrap();
        assert!(!cookie.persistent());
        assert_eq!(cookie.expiration_time(), MAX_TIME);

        let cookie = parse(
            "a=b; Expires=Wed, 09 Jun 2021 10:18:14 GMT; Expires=soon",
            "http://example.com/",
        )
        .unwrap();
        assert_eq!(cookie.expiration_time(), 1623233894);
    }

    #[test]
    fn last_expires_wins() {
        let cookie = parse(
            "a=b; Expires=Wed, 09 Jun 2021 10:18:14 GMT; Expires=Sun, 06 Nov 1994 08:49:37 GMT",
            "http://example.com/",
        )
        .unwrap();
        assert_eq!(cookie.expiration_time(), 784111777);
    }

    #[test]
    fn max_age_overrides_expires_in_any_order() {
        for header in [
            "a=b; Max-Age=60; Expires=Wed, 09 Jun 2021 10:18:14 GMT",
            "a=b; Expires=Wed, 09 Jun 2021 10:18:14 GMT; Max-Age=60",
        ] {
            let cookie = parse(header, "http://example.com/").unwrap();
            assert!(cookie.persistent());
            assert_eq!(cookie.expiration_time(), NOW + 60, "header: {header}");
        }
    }

    #[test]
    fn non_positive_max_age_expires_immediately() {
        for header in ["a=b; Max-Age=0", "a=b; Max-Age=-10"] {
            let cookie = parse(header, "http://example.com/").unwrap();
            assert!(cookie.persistent());
            assert_eq!(cookie.expiration_time(), 0, "header: {header}");
            assert!(cookie.is_expired(NOW));
        }
    }

    #[test]
    fn invalid_max_age_is_ignored() {
        for header in ["a=b; Max-Age=", "a=b; Max-Age=+5", "a=b; Max-Age=5s", "a=b; Max-Age=-"] {
            let cookie = parse(header, "http://example.com/").unwrap();
            assert!(!cookie.persistent(), "header: {header}");
        }
    }

    #[test]
    fn huge_max_age_saturates() {
        let cookie = parse("a=b; Max-Age=99999999999999999999999", "http://example.com/").unwrap();
        assert_eq!(cookie.expiration_time(), MAX_TIME);
        assert_eq!(parse_max_age(b"-99999999999999999999999"), Some(-i64::MAX));
    }

    #[test]
    fn domain_attribute() {
        let cookie = parse("a=b; Domain=.Example.com", "http://www.example.com/").unwrap();
        assert_that!(cookie.domain(), eq("example.com"));
        assert!(!cookie.host_only());

        let cookie = parse("a=b; Domain=www.example.com", "http://www.example.com/").unwrap();
        assert_that!(cookie.domain(), eq("www.example.com"));
        assert!(!cookie.host_only());
    }

    #[test]
    fn empty_domain_is_ignored() {
        let cookie = parse("a=b; Domain=", "http://www.example.com/").unwrap();
        assert!(cookie.host_only());
        assert_that!(cookie.domain(), eq("www.example.com"));

        let cookie = parse("a=b; Domain=example.com; Domain=.", "http://www.example.com/").unwrap();
        assert!(!cookie.host_only());
        assert_that!(cookie.domain(), eq("example.com"));
    }

    #[test]
    fn foreign_domains_are_rejected() {
        let err = parse("a=b; Domain=example.org", "http://evil.com/").unwrap_err();
        assert_that!(
            err.to_string(),
            eq("The `example.org` domain does not match the request host `evil.com`")
        );
        assert!(matches!(
            parse("a=b; Domain=sub.example.com", "http://example.com/"),
            Err(SetCookieError::DomainMismatch { .. })
        ));
        assert!(matches!(
            parse("a=b; Domain=ample.com", "http://example.com/"),
            Err(SetCookieError::DomainMismatch { .. })
        ));
        assert!(matches!(
            parse("a=b; Domain=0.0.1", "http://10.0.0.1/"),
            Err(SetCookieError::DomainMismatch { .. })
        ));
        assert!(matches!(
            parse("a=b; Domain=exa mple.com", "http://example.com/"),
            Err(SetCookieError::InvalidDomain(_))
        ));
    }

    #[test]
    fn last_domain_wins() {
        assert!(matches!(
            parse(
                "a=b; Domain=example.com; Domain=example.org",
                "http://www.example.com/"
            ),
            Err(SetCookieError::DomainMismatch { .. })
        ));
    }

    #[test]
    fn path_attribute() {
        let url = "http://example.com/apps/main";
        assert_that!(parse("a=b; Path=/x/y", url).unwrap().path(), eq("/x/y"));
        assert_that!(parse("a=b; Path=relative", url).unwrap().path(), eq("/apps"));
        assert_that!(parse("a=b; Path=", url).unwrap().path(), eq("/apps"));
        assert_that!(parse("a=b; Path=/x; Path=/y", url).unwrap().path(), eq("/y"));
        // An invalid Path resets to the default path rather than keeping an earlier one.
        assert_that!(parse("a=b; Path=/x; Path=y", url).unwrap().path(), eq("/apps"));
    }

    #[test]
    fn unstorable_paths_fall_back_to_the_default_path() {
        let url = Url::parse("http://example.com/docs/page").unwrap();
        let codec = CookieCodec::default();
        for header in [
            &b"x=1; Path=/a\x01b"[..],
            &b"x=1; Path=/a\x7fb"[..],
            "x=1; Path=/caff\u{e8}".as_bytes(),
        ] {
            let cookie = parse_set_cookie_at(header, &url, &codec, NOW).unwrap();
            assert_eq!(cookie.path(), "/docs", "header: {:?}", String::from_utf8_lossy(header));
            assert!(crate::Cookie::new("x", "1", "example.com", cookie.path()).is_ok());
        }
    }

    #[test]
    fn urls_without_host_are_rejected() {
        let url = Url::parse("data:text/plain,hello").unwrap();
        let result = parse_set_cookie_at("a=b", &url, &CookieCodec::default(), NOW);
        assert!(matches!(result, Err(SetCookieError::MissingHost(_))));
    }

    #[test]
    fn decoding_is_applied_after_parsing() {
        let url = Url::parse("http://example.com/").unwrap();
        let codec = CookieCodec::percent();
        let cookie = parse_set_cookie_at("na%2Fme=a%3Bb; Path=/a%20b", &url, &codec, NOW).unwrap();
        assert_that!(cookie.name_value(), eq(("na/me", "a;b")));
        // Paths keep the encoding used by request URLs.
        assert_that!(cookie.path(), eq("/a%20b"));

        let result = parse_set_cookie_at("a=%FF", &url, &codec, NOW);
        assert!(matches!(result, Err(SetCookieError::Decoding(_))));
    }

    #[test]
    fn raw_bytes_are_accepted() {
        let url = Url::parse("http://example.com/").unwrap();
        let header: &[u8] = b"a=b; Path=/\xff";
        let cookie = parse_set_cookie_at(header, &url, &CookieCodec::default(), NOW);
        assert!(matches!(cookie, Err(SetCookieError::Decoding(_))));

        let header: &[u8] = b"a\xff=b";
        let cookie = parse_set_cookie_at(header, &url, &CookieCodec::default(), NOW);
        assert!(matches!(cookie, Err(SetCookieError::InvalidName(_))));
    }
}
