use std::borrow::Cow;

/// The identity of a [`Cookie`] inside a jar.
///
/// It takes into account the name, domain, and path of the cookie: a jar holds at most
/// one cookie for each `CookieId`.
///
/// # Example
///
/// ```
/// use galletta::CookieId;
///
/// let id = CookieId::new("name", "rust-lang.org", "/");
/// assert_eq!(id.name(), "name");
/// assert_eq!(id.domain(), "rust-lang.org");
/// assert_eq!(id.path(), "/");
/// ```
///
/// [`Cookie`]: crate::Cookie
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct CookieId<'c> {
    pub(crate) name: Cow<'c, str>,
    pub(crate) domain: Cow<'c, str>,
    pub(crate) path: Cow<'c, str>,
}

impl<'c> CookieId<'c> {
    /// Creates a new [`CookieId`].
    pub fn new<N, D, P>(name: N, domain: D, path: P) -> CookieId<'c>
    where
        N: Into<Cow<'c, str>>,
        D: Into<Cow<'c, str>>,
        P: Into<Cow<'c, str>>,
    {
        CookieId {
            name: name.into(),
            domain: domain.into(),
            path: path.into(),
        }
    }

    /// Returns the name of the cookie.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Returns the domain of the cookie.
    #[inline]
    pub fn domain(&self) -> &str {
        self.domain.as_ref()
    }

    /// Returns the path of the cookie.
    #[inline]
    pub fn path(&self) -> &str {
        self.path.as_ref()
    }

    /// Converts `self` into a [`CookieId`] with a static lifetime.
    pub fn into_owned(self) -> CookieId<'static> {
        CookieId {
            name: Cow::Owned(self.name.into_owned()),
            domain: Cow::Owned(self.domain.into_owned()),
            path: Cow::Owned(self.path.into_owned()),
        }
    }
}
