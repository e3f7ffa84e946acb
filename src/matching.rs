//! Domain and path matching rules from RFC 6265, sections 5.1.3 and 5.1.4.
use url::Url;

/// Returns `true` if `host` domain-matches `domain`.
///
/// Either the two are identical (ignoring ASCII case) or `host` is a host name
/// (not an IP address) ending with `.` followed by `domain`.
///
/// ```rust
/// use galletta::matching::domain_match;
///
/// assert!(domain_match("example.com", "example.com"));
/// assert!(domain_match("www.Example.com", "example.com"));
/// assert!(!domain_match("badexample.com", "example.com"));
/// assert!(!domain_match("example.com", "www.example.com"));
/// assert!(!domain_match("10.0.0.1", "0.0.1"));
/// ```
pub fn domain_match(host: &str, domain: &str) -> bool {
    if host.eq_ignore_ascii_case(domain) {
        return true;
    }
    if domain.is_empty() || is_ip_address(host) || host.len() <= domain.len() {
        return false;
    }
    let split = host.len() - domain.len();
    host.as_bytes()[split - 1] == b'.'
        && host.is_char_boundary(split)
        && host[split..].eq_ignore_ascii_case(domain)
}

/// Returns `true` if `request_path` path-matches `cookie_path`.
///
/// ```rust
/// use galletta::matching::path_match;
///
/// assert!(path_match("/apps/main", "/apps"));
/// assert!(path_match("/apps/main", "/apps/"));
/// assert!(path_match("/apps", "/apps"));
/// assert!(!path_match("/applications", "/apps"));
/// assert!(!path_match("/", "/apps"));
/// ```
pub fn path_match(request_path: &str, cookie_path: &str) -> bool {
    match request_path.strip_prefix(cookie_path) {
        Some(rest) => rest.is_empty() || cookie_path.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}

/// The path a cookie gets when its `Set-Cookie` header carries no valid `Path` attribute:
/// the directory of the request path.
///
/// ```rust
/// use galletta::matching::default_path;
/// use url::Url;
///
/// let url = Url::parse("http://example.com/apps/main").unwrap();
/// assert_eq!(default_path(&url), "/apps");
/// let url = Url::parse("http://example.com/index.html").unwrap();
/// assert_eq!(default_path(&url), "/");
/// ```
pub fn default_path(url: &Url) -> &str {
    let path = url.path();
    if !path.starts_with('/') {
        return "/";
    }
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(index) => &path[..index],
    }
}

pub(crate) fn is_ip_address(host: &str) -> bool {
    host.starts_with('[') || host.parse::<std::net::IpAddr>().is_ok()
}
