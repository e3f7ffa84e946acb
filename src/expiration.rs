use time::OffsetDateTime;

/// The earliest representable time, in seconds since the Unix epoch: `1601-01-01T00:00:00Z`.
///
/// It matches the earliest year accepted by [`parse_cookie_date`].
///
/// [`parse_cookie_date`]: crate::parse_cookie_date
pub const MIN_TIME: i64 = -11_644_473_600;

/// The latest representable time, in seconds since the Unix epoch: `9999-12-31T23:59:59Z`.
///
/// RFC 6265 requires dates not to exceed year 9999.
/// Session cookies use it as their expiration time.
pub const MAX_TIME: i64 = 253_402_300_799;

/// The current time, in seconds since the Unix epoch.
pub fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Adds `delta` seconds to `time`, saturating into `[MIN_TIME, MAX_TIME]`.
pub(crate) fn offset(time: i64, delta: i64) -> i64 {
    time.saturating_add(delta).clamp(MIN_TIME, MAX_TIME)
}

/// A cookie's expiration: either a point in time or session.
///
/// An `Expiration` is constructible with `Expiration::from()` via any of:
///
///   * `None` -> `Expiration::Session`
///   * `Some(i64)` -> `Expiration::DateTime`
///   * `i64` -> `Expiration::DateTime`
///
/// ```rust
/// use galletta::Expiration;
///
/// let expires = Expiration::from(None);
/// assert_eq!(expires, Expiration::Session);
///
/// let expires = Expiration::from(1_700_000_000_i64);
/// assert_eq!(expires, Expiration::DateTime(1_700_000_000));
///
/// let expires = Expiration::from(Some(1_700_000_000_i64));
/// assert_eq!(expires, Expiration::DateTime(1_700_000_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expiration {
    /// Expiration for a "persistent" cookie at a specific time, in seconds since the Unix epoch.
    DateTime(i64),
    /// Expiration for a "session" cookie. The user agent defines the notion of a
    /// "session" and clears session cookies when it deems the "session" to be over,
    /// via [`CookieStore::clear_session_cookies`].
    ///
    /// [`CookieStore::clear_session_cookies`]: crate::CookieStore::clear_session_cookies
    Session,
}

impl Expiration {
    /// Returns `true` if `self` is an `Expiration::DateTime`.
    pub fn is_datetime(&self) -> bool {
        match self {
            Expiration::DateTime(_) => true,
            Expiration::Session => false,
        }
    }

    /// Returns `true` if `self` is an `Expiration::Session`.
    pub fn is_session(&self) -> bool {
        match self {
            Expiration::DateTime(_) => false,
            Expiration::Session => true,
        }
    }

    /// Returns the inner timestamp if `self` is a `DateTime`.
    ///
    /// ```rust
    /// use galletta::Expiration;
    ///
    /// assert_eq!(Expiration::Session.datetime(), None);
    /// assert_eq!(Expiration::DateTime(42).datetime(), Some(42));
    /// ```
    pub fn datetime(&self) -> Option<i64> {
        match self {
            Expiration::Session => None,
            Expiration::DateTime(v) => Some(*v),
        }
    }

    /// The expiration time stored in a jar: session cookies never expire on their own.
    pub fn expiration_time(&self) -> i64 {
        self.datetime().unwrap_or(MAX_TIME)
    }
}

impl<T: Into<Option<i64>>> From<T> for Expiration {
    fn from(option: T) -> Self {
        match option.into() {
            Some(value) => Expiration::DateTime(value),
            None => Expiration::Session,
        }
    }
}
