//! Configuration for a [`CookieCodec`] and for the cookie jar backend.
//!
//! Check out the [`Config`] struct for more information.
//!
//! [`CookieCodec`]: crate::CookieCodec
use crate::jar::{IndexedCookieJar, OrderedCookieJar};
use crate::CookieStore;

/// `Config` specifies how a user agent should decode incoming cookies, encode
/// outgoing ones, and which jar implementation should hold them.
///
/// # [`CookieCodec`]
///
/// To action the encoding rules specified in this struct, convert it into a [`CookieCodec`]:
///
/// ```rust
/// use galletta::CookieCodec;
/// use galletta::config::{Backend, Config};
///
/// let mut config = Config::default();
/// config.percent_encode = true;
/// config.backend = Backend::Indexed;
///
/// let codec: CookieCodec = (&config).into();
/// let jar = config.new_jar();
/// assert!(jar.is_empty());
/// ```
///
/// [`CookieCodec`]: crate::CookieCodec
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// If `true`, all cookie names and values are automatically:
    ///
    /// - percent-decoded, when parsing `Set-Cookie` headers. `Domain` and `Path` are
    ///   left as sent, since they are compared against the percent-encoded request URL.
    /// - percent-encoded, when building the `Cookie` header.
    ///
    /// If `false`, the raw bytes are decoded as UTF-8 and text is sent as is.
    ///
    /// By default, this field is `false`.
    pub percent_encode: bool,
    /// The jar implementation returned by [`Config::new_jar`].
    ///
    /// By default, this field is [`Backend::Ordered`].
    pub backend: Backend,
}

/// The cookie jar implementations shipped with this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub enum Backend {
    /// A list kept in the order in which cookies are sent. See [`OrderedCookieJar`].
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "ordered"))]
    Ordered,
    /// A map indexed by cookie identity. See [`IndexedCookieJar`].
    #[cfg_attr(feature = "serde", serde(alias = "indexed"))]
    Indexed,
}

impl Config {
    /// Creates an empty jar of the configured [`Backend`].
    pub fn new_jar(&self) -> Box<dyn CookieStore + Send> {
        match self.backend {
            Backend::Ordered => Box::new(OrderedCookieJar::new()),
            Backend::Indexed => Box::new(IndexedCookieJar::new()),
        }
    }
}
