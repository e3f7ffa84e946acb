use crate::expiration::{now, Expiration, MAX_TIME};
use crate::validation::{is_cookie_name, is_cookie_value, is_domain_value, is_path_or_extension_value};
use crate::CookieId;
#[cfg(feature = "serde")]
use crate::matching::is_ip_address;
use std::fmt;

/// A cookie held by a user agent, as described in RFC 6265, section 5.3.
///
/// `Cookie`s are usually produced by parsing the `Set-Cookie` headers of a response
/// (see [`parse_set_cookie`]), but they can also be built programmatically.
///
/// ## Constructing a `Cookie`
///
/// [`Cookie::new()`] validates the name, value, domain and path before returning a cookie:
///
/// ```rust
/// use galletta::Cookie;
///
/// let cookie = Cookie::new("name", "value", "www.rust-lang.org", "/").unwrap();
/// assert_eq!(cookie.to_string(), "name=value");
///
/// assert!(Cookie::new("bad name", "value", "www.rust-lang.org", "/").is_err());
/// ```
///
/// ## Building a `Cookie`
///
/// Flags and times are set with `Cookie`'s `set_*` methods.
///
/// ```rust
/// use galletta::Cookie;
///
/// let cookie = Cookie::new("name", "value", "rust-lang.org", "/")
///     .unwrap()
///     .set_host_only(false)
///     .set_secure_only(true)
///     .set_http_only(true)
///     .set_expiration(1_700_000_000_i64);
/// assert!(cookie.persistent());
/// ```
///
/// [`parse_set_cookie`]: crate::parse_set_cookie
///
/// ## Serialization
///
/// With the `serde` feature, cookies can be serialized and deserialized. Deserialization
/// checks the name, value, domain and path the same way [`Cookie::new()`] does.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "CookieRecord"))]
pub struct Cookie {
    pub(crate) name: String,
    pub(crate) value: String,
    pub(crate) domain: String,
    pub(crate) path: String,
    pub(crate) expiration_time: i64,
    pub(crate) creation_time: i64,
    pub(crate) access_time: i64,
    pub(crate) persistent: bool,
    pub(crate) host_only: bool,
    pub(crate) secure_only: bool,
    pub(crate) http_only: bool,
}

impl Cookie {
    /// Creates a new host-only session [`Cookie`], after checking that all inputs
    /// are syntactically valid.
    ///
    /// A single leading `.` is stripped from `domain` and the domain is lowercased.
    /// `path` must start with `/`.
    pub fn new<N, V, D, P>(name: N, value: V, domain: D, path: P) -> Result<Cookie, CookieError>
    where
        N: Into<String>,
        V: Into<String>,
        D: AsRef<str>,
        P: Into<String>,
    {
        let name = name.into();
        if !is_cookie_name(&name) {
            return Err(CookieError::InvalidName(name));
        }
        let value = value.into();
        if !is_cookie_value(&value) {
            return Err(CookieError::InvalidValue { name, value });
        }
        let raw_domain = domain.as_ref();
        let domain = raw_domain
            .strip_prefix('.')
            .unwrap_or(raw_domain)
            .to_ascii_lowercase();
        if !is_domain_value(&domain) {
            return Err(CookieError::InvalidDomain(raw_domain.to_owned()));
        }
        let path = path.into();
        if !path.starts_with('/') || !is_path_or_extension_value(&path) {
            return Err(CookieError::InvalidPath(path));
        }

        Ok(Cookie::from_parts(name, value, domain, path, now()))
    }

    /// Assembles a host-only session cookie without validating its parts.
    pub(crate) fn from_parts(
        name: String,
        value: String,
        domain: String,
        path: String,
        now: i64,
    ) -> Cookie {
        Cookie {
            name,
            value,
            domain,
            path,
            expiration_time: MAX_TIME,
            creation_time: now,
            access_time: now,
            persistent: false,
            host_only: true,
            secure_only: false,
            http_only: false,
        }
    }

    /// Returns the name of `self`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of `self`.
    ///
    /// Does not strip surrounding quotes. See [`Cookie::value_trimmed()`] for a
    /// version that does.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the value of `self` with a surrounding pair of double-quotes trimmed.
    ///
    /// Quotes are only trimmed when they form a pair and never otherwise.
    ///
    /// ```
    /// use galletta::Cookie;
    ///
    /// let c = Cookie::new("name", "\"value\"", "example.com", "/").unwrap();
    /// assert_eq!(c.value(), "\"value\"");
    /// assert_eq!(c.value_trimmed(), "value");
    /// ```
    #[inline]
    pub fn value_trimmed(&self) -> &str {
        let bytes = self.value.as_bytes();
        match (bytes.first(), bytes.last()) {
            (Some(b'"'), Some(b'"')) if bytes.len() >= 2 => &self.value[1..self.value.len() - 1],
            _ => &self.value,
        }
    }

    /// Returns the name and value of `self` as a tuple of `(name, value)`.
    #[inline]
    pub fn name_value(&self) -> (&str, &str) {
        (self.name(), self.value())
    }

    /// The host (if host-only) or domain suffix the cookie applies to.
    #[inline]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The path prefix the cookie applies to.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// When the cookie expires, in seconds since the Unix epoch.
    ///
    /// Session cookies report [`MAX_TIME`].
    ///
    /// [`MAX_TIME`]: crate::MAX_TIME
    #[inline]
    pub fn expiration_time(&self) -> i64 {
        self.expiration_time
    }

    /// When the cookie was first stored, in seconds since the Unix epoch.
    #[inline]
    pub fn creation_time(&self) -> i64 {
        self.creation_time
    }

    /// When the cookie was last sent (or stored), in seconds since the Unix epoch.
    #[inline]
    pub fn access_time(&self) -> i64 {
        self.access_time
    }

    #[inline]
    pub fn persistent(&self) -> bool {
        self.persistent
    }

    #[inline]
    pub fn host_only(&self) -> bool {
        self.host_only
    }

    #[inline]
    pub fn secure_only(&self) -> bool {
        self.secure_only
    }

    #[inline]
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// Returns the [`Expiration`] of `self`.
    ///
    /// ```
    /// use galletta::{Cookie, Expiration};
    ///
    /// let c = Cookie::new("name", "value", "example.com", "/").unwrap();
    /// assert_eq!(c.expiration(), Expiration::Session);
    ///
    /// let c = c.set_expiration(42_i64);
    /// assert_eq!(c.expiration(), Expiration::DateTime(42));
    /// ```
    pub fn expiration(&self) -> Expiration {
        if self.persistent {
            Expiration::DateTime(self.expiration_time)
        } else {
            Expiration::Session
        }
    }

    /// Returns `true` if the cookie must not be sent or kept at time `now`.
    #[inline]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expiration_time <= now
    }

    /// Returns the identity of `self` inside a jar.
    pub fn id(&self) -> CookieId<'_> {
        CookieId::new(self.name.as_str(), self.domain.as_str(), self.path.as_str())
    }

    /// Sets the expiration of `self`.
    ///
    /// A `DateTime` makes the cookie persistent, `Session` turns it into a session cookie.
    pub fn set_expiration<T: Into<Expiration>>(mut self, expiration: T) -> Self {
        let expiration = expiration.into();
        self.persistent = expiration.is_datetime();
        self.expiration_time = expiration.expiration_time();
        self
    }

    pub fn set_creation_time(mut self, time: i64) -> Self {
        self.creation_time = time;
        self
    }

    pub fn set_access_time(mut self, time: i64) -> Self {
        self.access_time = time;
        self
    }

    /// `true` binds the cookie to exactly its domain, `false` also to its subdomains.
    pub fn set_host_only(mut self, value: bool) -> Self {
        self.host_only = value;
        self
    }

    pub fn set_secure_only(mut self, value: bool) -> Self {
        self.secure_only = value;
        self
    }

    pub fn set_http_only(mut self, value: bool) -> Self {
        self.http_only = value;
        self
    }
}

impl fmt::Display for Cookie {
    /// Formats the cookie as it appears in a `Cookie` request header.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A [`Cookie`] as found in serialized form, before its text is checked.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct CookieRecord {
    name: String,
    value: String,
    domain: String,
    path: String,
    expiration_time: i64,
    creation_time: i64,
    access_time: i64,
    persistent: bool,
    host_only: bool,
    secure_only: bool,
    http_only: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<CookieRecord> for Cookie {
    type Error = CookieError;

    fn try_from(record: CookieRecord) -> Result<Self, Self::Error> {
        let CookieRecord {
            name,
            value,
            domain,
            path,
            expiration_time,
            creation_time,
            access_time,
            persistent,
            host_only,
            secure_only,
            http_only,
        } = record;
        if !is_cookie_name(&name) {
            return Err(CookieError::InvalidName(name));
        }
        if !is_cookie_value(&value) {
            return Err(CookieError::InvalidValue { name, value });
        }
        // Host-only cookies set by IP hosts carry the address as their domain.
        if !is_domain_value(&domain) && !is_ip_address(&domain) {
            return Err(CookieError::InvalidDomain(domain));
        }
        if !path.starts_with('/') || !is_path_or_extension_value(&path) {
            return Err(CookieError::InvalidPath(path));
        }
        Ok(Cookie {
            name,
            value,
            domain,
            path,
            expiration_time,
            creation_time,
            access_time,
            persistent,
            host_only,
            secure_only,
            http_only,
        })
    }
}

/// The error returned by [`Cookie::new()`] when one of its inputs is not valid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CookieError {
    #[error("`{0}` is not a valid cookie name")]
    InvalidName(String),
    #[error("`{value}` is not a valid value for the `{name}` cookie")]
    InvalidValue { name: String, value: String },
    #[error("`{0}` is not a valid cookie domain")]
    InvalidDomain(String),
    #[error("`{0}` is not a valid cookie path")]
    InvalidPath(String),
}
