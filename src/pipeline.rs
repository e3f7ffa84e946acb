//! Moving cookies between HTTP headers and a jar.
//!
//! Incoming `Set-Cookie` headers are parsed with [`extract`] and stored with
//! [`extract_and_save`]; the `Cookie` header for an outgoing request is built with
//! [`build_cookie_header`].
use crate::expiration::now;
use crate::jar::lock;
use crate::{default_jar, parse_set_cookie_at, Cookie, CookieCodec, CookieStore};
use url::Url;

/// Parses every `Set-Cookie` header in `headers`, in order.
///
/// Header names are compared case-insensitively; other headers are skipped. A header that
/// can't be parsed into a cookie is dropped, without affecting the others.
///
/// ```rust
/// use galletta::{extract, CookieCodec};
/// use url::Url;
///
/// let url = Url::parse("https://rust-lang.org/").unwrap();
/// let headers = [
///     ("content-type", "text/html"),
///     ("Set-Cookie", "a=1"),
///     ("set-cookie", "=no-name"),
///     ("SET-COOKIE", "b=2; Secure"),
/// ];
/// let cookies = extract(headers, &url, &CookieCodec::default());
/// assert_eq!(cookies.len(), 2);
/// assert_eq!(cookies[1].name(), "b");
/// ```
pub fn extract<I, N, V>(headers: I, url: &Url, codec: &CookieCodec) -> Vec<Cookie>
where
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    extract_at(headers, url, codec, now())
}

/// [`extract`], using `now` (seconds since the Unix epoch) as the current time.
pub fn extract_at<I, N, V>(headers: I, url: &Url, codec: &CookieCodec, now: i64) -> Vec<Cookie>
where
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    headers
        .into_iter()
        .filter_map(|(name, value)| {
            name.as_ref()
                .eq_ignore_ascii_case(b"set-cookie")
                .then_some(value)
        })
        .filter_map(|value| match parse_set_cookie_at(value, url, codec, now) {
            Ok(cookie) => Some(cookie),
            Err(e) => {
                tracing::debug!(error = %e, url = %url, "Dropped a `Set-Cookie` header");
                None
            }
        })
        .collect()
}

/// Parses every `Set-Cookie` header in `headers` and saves the resulting cookies into `jar`,
/// as received over HTTP.
///
/// Returns the number of cookies the jar accepted.
pub fn extract_and_save<I, N, V, S>(headers: I, url: &Url, codec: &CookieCodec, jar: &mut S) -> usize
where
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<[u8]>,
    V: AsRef<[u8]>,
    S: CookieStore + ?Sized,
{
    extract_and_save_at(headers, url, codec, jar, now())
}

/// [`extract_and_save`], using `now` (seconds since the Unix epoch) as the current time.
pub fn extract_and_save_at<I, N, V, S>(
    headers: I,
    url: &Url,
    codec: &CookieCodec,
    jar: &mut S,
    now: i64,
) -> usize
where
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<[u8]>,
    V: AsRef<[u8]>,
    S: CookieStore + ?Sized,
{
    let cookies = extract_at(headers, url, codec, now);
    jar.save_many_at(cookies, true, now)
}

/// Builds the value of the `Cookie` header for a request to `url`.
///
/// `Secure` cookies are included only if the scheme of `url` is `https`. Cookies for which
/// `filter` returns `false` are left out. Names and values are encoded with `codec`.
///
/// Returns `None`, rather than an empty string, if no cookie is left.
///
/// ```rust
/// use galletta::{build_cookie_header, extract_and_save, CookieCodec, OrderedCookieJar};
/// use url::Url;
///
/// let codec = CookieCodec::default();
/// let url = Url::parse("http://test.example.com/apps/main").unwrap();
/// let mut jar = OrderedCookieJar::new();
/// let headers = [
///     ("Set-Cookie", "a=b; Max-Age=2000; Path=/"),
///     ("Set-Cookie", "user=bob; Max-Age=86400; Path=/apps"),
/// ];
/// extract_and_save(headers, &url, &codec, &mut jar);
///
/// let header = build_cookie_header(&mut jar, &url, |_| true, &codec);
/// assert_eq!(header.as_deref(), Some("user=bob; a=b"));
///
/// let elsewhere = Url::parse("http://example.org/").unwrap();
/// assert_eq!(build_cookie_header(&mut jar, &elsewhere, |_| true, &codec), None);
/// ```
pub fn build_cookie_header<S, F>(
    jar: &mut S,
    url: &Url,
    filter: F,
    codec: &CookieCodec,
) -> Option<String>
where
    S: CookieStore + ?Sized,
    F: FnMut(&Cookie) -> bool,
{
    build_cookie_header_at(jar, url, filter, codec, now())
}

/// [`build_cookie_header`], using `now` (seconds since the Unix epoch) as the current time.
pub fn build_cookie_header_at<S, F>(
    jar: &mut S,
    url: &Url,
    mut filter: F,
    codec: &CookieCodec,
    now: i64,
) -> Option<String>
where
    S: CookieStore + ?Sized,
    F: FnMut(&Cookie) -> bool,
{
    let secure_channel = url.scheme() == "https";
    let pairs: Vec<String> = jar
        .matching_at(url, secure_channel, now)
        .iter()
        .filter(|cookie| filter(cookie))
        .map(|cookie| format!("{}={}", codec.encode(cookie.name()), codec.encode(cookie.value())))
        .collect();
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}

/// [`extract_and_save`] into the [default jar](crate::default_jar), with the default codec.
pub fn extract_and_save_default<I, N, V>(headers: I, url: &Url) -> usize
where
    I: IntoIterator<Item = (N, V)>,
    N: AsRef<[u8]>,
    V: AsRef<[u8]>,
{
    let jar = default_jar();
    let mut jar = lock(&jar);
    extract_and_save(headers, url, &CookieCodec::default(), jar.as_mut())
}

/// [`build_cookie_header`] from the [default jar](crate::default_jar), with the default codec
/// and no filter.
pub fn build_default_cookie_header(url: &Url) -> Option<String> {
    let jar = default_jar();
    let mut jar = lock(&jar);
    build_cookie_header(jar.as_mut(), url, |_| true, &CookieCodec::default())
}
