//! A crate to manage HTTP cookies on the client side, following RFC 6265.
//!
//! # Overview
//!
//! You can use `galletta` to give an HTTP client (a user agent) a cookie jar.
//!
//! It has support for:
//!
//! - Parsing `Set-Cookie` headers received from a server, via [`parse_set_cookie`]
//!   and [`extract`]
//! - Storing cookies between requests, via the [`CookieStore`] trait
//! - Building the `Cookie` header for an outgoing request, via [`build_cookie_header`]
//!
//! In particular:
//!
//! - Dates in the `Expires` attribute are parsed with the lenient algorithm browsers use
//! - `Max-Age` takes precedence over `Expires`, as it should
//! - A server can't set cookies for a domain it doesn't belong to
//! - `HttpOnly` cookies can't be overwritten by non-HTTP APIs
//! - Cookie text is decoded as UTF-8 by default, with opt-in percent-encoding via [`CookieCodec`]
//!
//! # Non-goals
//!
//! `galletta` doesn't persist cookies to disk and it doesn't perform any HTTP request.
//! It doesn't implement `SameSite` enforcement nor the public suffix list.
//!
//! # Quickstart
//!
//! ```rust
//! use galletta::{build_cookie_header, extract_and_save, CookieCodec};
//! use galletta::config::Config;
//! use url::Url;
//!
//! // Pick a jar implementation and a codec.
//! let config = Config::default();
//! let mut jar = config.new_jar();
//! let codec = CookieCodec::from(&config);
//!
//! // Store the cookies set by a response...
//! let url = Url::parse("https://www.rust-lang.org/learn/get-started").unwrap();
//! let headers = [
//!     ("content-type", "text/html"),
//!     ("set-cookie", "theme=dark; Max-Age=31536000; Path=/"),
//!     ("set-cookie", "step=2; Path=/learn; Secure; HttpOnly"),
//!     // Dropped: rust-lang.org can't set cookies for example.com.
//!     ("set-cookie", "evil=1; Domain=example.com"),
//! ];
//! assert_eq!(extract_and_save(headers, &url, &codec, jar.as_mut()), 2);
//!
//! // ...and send them back with the next request.
//! let next = Url::parse("https://www.rust-lang.org/learn").unwrap();
//! let header = build_cookie_header(jar.as_mut(), &next, |_| true, &codec);
//! assert_eq!(header.as_deref(), Some("step=2; theme=dark"));
//!
//! // Secure cookies aren't sent over plain HTTP.
//! let insecure = Url::parse("http://www.rust-lang.org/learn").unwrap();
//! let header = build_cookie_header(jar.as_mut(), &insecure, |_| true, &codec);
//! assert_eq!(header.as_deref(), Some("theme=dark"));
//! ```
//!
//! # Time
//!
//! Times are expressed in seconds since the Unix epoch. Every operation that depends on
//! the current time has an `_at` variant taking it as an argument.
//!
//! ## Credits
//!
//! `galletta` started as a fork of [`biscotti`](https://crates.io/crates/biscotti),
//! and it keeps its approach to encoding and configuration.

pub mod config;
mod codec;
mod cookie;
mod cookie_id;
mod date;
mod encoding;
mod expiration;
mod global;
pub mod jar;
pub mod matching;
mod parser;
mod pipeline;
mod request_cookies;
pub mod validation;

pub use codec::CookieCodec;
pub use cookie::Cookie;
pub use cookie_id::CookieId;
pub use date::parse_cookie_date;
pub use expiration::{now, Expiration, MAX_TIME, MIN_TIME};
pub use global::{default_jar, set_default_jar};
pub use jar::{CookieStore, IndexedCookieJar, OrderedCookieJar, SharedJar};
pub use parser::{parse_set_cookie, parse_set_cookie_at};
pub use pipeline::{
    build_cookie_header, build_cookie_header_at, build_default_cookie_header, extract,
    extract_and_save, extract_and_save_at, extract_and_save_default, extract_at,
};
pub use request_cookies::RequestCookies;
pub use time;
pub use url;

/// Errors that can occur when using `galletta`.
pub mod errors {
    pub use crate::codec::DecodingError;
    pub use crate::cookie::CookieError;
    pub use crate::parser::SetCookieError;
    pub use crate::request_cookies::{EmptyNameError, ParseError};
}
