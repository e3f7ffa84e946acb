use crate::config::Config;
use crate::encoding::encode;
use anyhow::Context;
use percent_encoding::percent_decode;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type DecodeFn = dyn Fn(&[u8]) -> Result<String, DecodingError> + Send + Sync;
type EncodeFn = dyn Fn(&str) -> String + Send + Sync;

/// Transforms cookie text at the boundary with the wire: names and values are decoded
/// after a `Set-Cookie` header has been parsed (domains and paths through
/// [`CookieCodec::decode_attribute`]), and encoded when the `Cookie` header is built.
///
/// # Creating a `CookieCodec`
///
/// The default codec treats the wire bytes as UTF-8 text, with no further transformation.
/// A codec can also be created from a [`Config`] using the [`From`] trait, or from a pair
/// of functions.
///
/// ```rust
/// use galletta::CookieCodec;
/// use galletta::config::Config;
///
/// let plain = CookieCodec::default();
/// assert_eq!(plain.decode(b"a%20b").unwrap(), "a%20b");
///
/// let mut config = Config::default();
/// config.percent_encode = true;
/// let codec: CookieCodec = config.into();
/// assert_eq!(codec.decode(b"a%20b").unwrap(), "a b");
/// assert_eq!(codec.encode("a b"), "a%20b");
///
/// let shouty = CookieCodec::custom(
///     |raw| Ok(String::from_utf8_lossy(raw).to_uppercase()),
///     |text| text.to_lowercase(),
/// );
/// assert_eq!(shouty.decode(b"abc").unwrap(), "ABC");
/// ```
///
/// [`Config`]: crate::config::Config
#[derive(Clone, Default)]
pub struct CookieCodec {
    kind: Kind,
}

#[derive(Clone, Default)]
enum Kind {
    #[default]
    Plain,
    Percent,
    Custom {
        decode: Arc<DecodeFn>,
        encode: Arc<EncodeFn>,
    },
}

impl From<Config> for CookieCodec {
    fn from(value: Config) -> Self {
        CookieCodec::from(&value)
    }
}

impl From<&Config> for CookieCodec {
    fn from(value: &Config) -> Self {
        if value.percent_encode {
            CookieCodec::percent()
        } else {
            CookieCodec::plain()
        }
    }
}

impl CookieCodec {
    /// Bytes are decoded as UTF-8 and text is sent as is.
    pub fn plain() -> CookieCodec {
        CookieCodec { kind: Kind::Plain }
    }

    /// Bytes are percent-decoded into UTF-8 and names and values are percent-encoded.
    pub fn percent() -> CookieCodec {
        CookieCodec {
            kind: Kind::Percent,
        }
    }

    /// A codec built from caller-supplied functions.
    pub fn custom<D, E>(decode: D, encode: E) -> CookieCodec
    where
        D: Fn(&[u8]) -> Result<String, DecodingError> + Send + Sync + 'static,
        E: Fn(&str) -> String + Send + Sync + 'static,
    {
        CookieCodec {
            kind: Kind::Custom {
                decode: Arc::new(decode),
                encode: Arc::new(encode),
            },
        }
    }

    /// Turn raw header bytes into text.
    pub fn decode<'a>(&self, raw: &'a [u8]) -> Result<Cow<'a, str>, DecodingError> {
        match &self.kind {
            Kind::Plain => decode_utf8(raw),
            Kind::Percent => percent_decode(raw)
                .decode_utf8()
                .context("Failed to percent-decode cookie text")
                .map_err(|e| DecodingError::new(raw, e)),
            Kind::Custom { decode, .. } => decode(raw).map(Cow::Owned),
        }
    }

    /// Turn the raw bytes of a `Domain` or `Path` attribute into text.
    ///
    /// Paths are matched against request URLs, which keep them percent-encoded: the
    /// percent codec leaves attributes encoded so that both sides compare as sent.
    /// Custom codecs apply their decoding function.
    ///
    /// ```rust
    /// use galletta::CookieCodec;
    ///
    /// let codec = CookieCodec::percent();
    /// assert_eq!(codec.decode(b"/a%20b").unwrap(), "/a b");
    /// assert_eq!(codec.decode_attribute(b"/a%20b").unwrap(), "/a%20b");
    /// ```
    pub fn decode_attribute<'a>(&self, raw: &'a [u8]) -> Result<Cow<'a, str>, DecodingError> {
        match &self.kind {
            Kind::Plain | Kind::Percent => decode_utf8(raw),
            Kind::Custom { decode, .. } => decode(raw).map(Cow::Owned),
        }
    }

    /// Turn a cookie name or value into the text sent in a `Cookie` header.
    pub fn encode<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match &self.kind {
            Kind::Plain => Cow::Borrowed(text),
            Kind::Percent => Cow::from(encode(text)),
            Kind::Custom { encode, .. } => Cow::Owned(encode(text)),
        }
    }
}

fn decode_utf8(raw: &[u8]) -> Result<Cow<'_, str>, DecodingError> {
    std::str::from_utf8(raw)
        .map(Cow::Borrowed)
        .context("Cookie text is not valid UTF-8")
        .map_err(|e| DecodingError::new(raw, e))
}

impl fmt::Debug for CookieCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            Kind::Plain => "Plain",
            Kind::Percent => "Percent",
            Kind::Custom { .. } => "Custom",
        };
        f.debug_struct("CookieCodec").field("kind", &kind).finish()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{source}")]
/// An error that occurred while decoding the raw bytes of a cookie name, value,
/// domain or path into text.
pub struct DecodingError {
    pub(crate) raw_value: String,
    #[source]
    pub(crate) source: anyhow::Error,
}

impl DecodingError {
    /// Creates a new [`DecodingError`] for `raw`, caused by `source`.
    pub fn new(raw: &[u8], source: impl Into<anyhow::Error>) -> DecodingError {
        DecodingError {
            raw_value: String::from_utf8_lossy(raw).into_owned(),
            source: source.into(),
        }
    }

    /// The bytes that could not be decoded, lossily converted to text.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }
}
