//! The cookie jar: where a user agent keeps cookies between requests.
//!
//! [`CookieStore`] is the capability every backend implements. Two backends ship
//! with the crate:
//!
//! - [`OrderedCookieJar`], a list kept in the order cookies are sent in. It is the default.
//! - [`IndexedCookieJar`], a map indexed by cookie identity, for larger jars.
//!
//! Pick one explicitly or via [`Config::new_jar`].
//!
//! [`Config::new_jar`]: crate::config::Config::new_jar
mod indexed;
mod ordered;

pub use indexed::IndexedCookieJar;
pub use ordered::OrderedCookieJar;

use crate::expiration::now;
use crate::matching::{domain_match, path_match};
use crate::{Cookie, CookieId};
use std::cmp::Ordering;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use url::Url;

/// A jar shared between threads.
///
/// Every operation on a jar is a read-modify-write: callers sharing one jar
/// must serialize access, which the [`Mutex`] takes care of.
pub type SharedJar = Arc<Mutex<Box<dyn CookieStore + Send>>>;

/// Wraps `store` into a [`SharedJar`].
pub fn shared_jar<S>(store: S) -> SharedJar
where
    S: CookieStore + Send + 'static,
{
    Arc::new(Mutex::new(Box::new(store)))
}

/// Locks a [`SharedJar`].
///
/// A panic while holding the lock can't leave a jar in a state that breaks its
/// invariants, so a poisoned lock is recovered.
pub fn lock(jar: &SharedJar) -> MutexGuard<'_, Box<dyn CookieStore + Send>> {
    jar.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Storage for the cookies of a user agent.
///
/// # Invariants
///
/// Every implementation must guarantee that:
///
/// - it holds at most one cookie per [`CookieId`] (name, domain, path);
/// - [`CookieStore::matching_at`] returns cookies sorted by path length, longest first,
///   and then by creation time, oldest first;
/// - expired cookies are never returned.
///
/// Methods without the `_at` suffix use the current time.
pub trait CookieStore {
    /// Inserts `cookie`, replacing any cookie with the same [`CookieId`], then removes
    /// every cookie that is expired at `now`.
    ///
    /// `via_http` is `false` when the cookie comes from a non-HTTP API (e.g. a script).
    /// Such a save is refused if the cookie is `HttpOnly` or if it would replace an
    /// `HttpOnly` cookie.
    ///
    /// A cookie that is already expired at `now` deletes the cookie it replaces and is
    /// not stored.
    ///
    /// Returns `false` if the save was refused.
    fn save_at(&mut self, cookie: Cookie, via_http: bool, now: i64) -> bool;

    /// Returns every cookie that should be sent with a request to `url`, in sending order,
    /// and records `now` as their access time.
    ///
    /// `Secure` cookies are only returned if `secure_channel` is `true`.
    fn matching_at(&mut self, url: &Url, secure_channel: bool, now: i64) -> Vec<Cookie>;

    /// A snapshot of all the stored cookies, expired ones included.
    fn cookies(&self) -> Vec<Cookie>;

    /// Removes the cookie with the given identity, if there is one.
    fn remove(&mut self, id: &CookieId<'_>) -> Option<Cookie>;

    /// Removes every cookie that is expired at `now`, returning how many were removed.
    fn clear_expired(&mut self, now: i64) -> usize;

    /// Removes all session cookies, returning how many were removed.
    ///
    /// User agents call it when they deem the current session to be over.
    fn clear_session_cookies(&mut self) -> usize;

    /// Removes all cookies.
    fn clear(&mut self);

    /// The number of stored cookies.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// [`CookieStore::save_at`] with the current time.
    fn save(&mut self, cookie: Cookie, via_http: bool) -> bool {
        self.save_at(cookie, via_http, now())
    }

    /// Saves each cookie in order, as separate saves.
    ///
    /// Some cookies can be refused while others are stored: the number of
    /// accepted cookies is returned.
    fn save_many_at(&mut self, cookies: Vec<Cookie>, via_http: bool, now: i64) -> usize {
        cookies
            .into_iter()
            .map(|cookie| self.save_at(cookie, via_http, now))
            .filter(|accepted| *accepted)
            .count()
    }

    /// [`CookieStore::save_many_at`] with the current time.
    fn save_many(&mut self, cookies: Vec<Cookie>, via_http: bool) -> usize {
        self.save_many_at(cookies, via_http, now())
    }

    /// [`CookieStore::matching_at`] with the current time.
    fn matching(&mut self, url: &Url, secure_channel: bool) -> Vec<Cookie> {
        self.matching_at(url, secure_channel, now())
    }
}

/// Whether `incoming` may be stored, given the cookie it would replace.
pub(crate) fn admits(existing: Option<&Cookie>, incoming: &Cookie, via_http: bool) -> bool {
    via_http || !(incoming.http_only || existing.is_some_and(|c| c.http_only))
}

/// The order in which cookies are sent: longer paths first, then older cookies first.
pub(crate) fn sending_order(a: &Cookie, b: &Cookie) -> Ordering {
    b.path
        .len()
        .cmp(&a.path.len())
        .then_with(|| a.creation_time.cmp(&b.creation_time))
}

/// The parts of a request URL that decide which cookies are sent.
pub(crate) struct Request<'a> {
    host: String,
    path: &'a str,
    secure_channel: bool,
    now: i64,
}

impl<'a> Request<'a> {
    /// Returns `None` for URLs without a host: no cookie can match them.
    pub(crate) fn new(url: &'a Url, secure_channel: bool, now: i64) -> Option<Request<'a>> {
        Some(Request {
            host: url.host_str()?.to_ascii_lowercase(),
            path: url.path(),
            secure_channel,
            now,
        })
    }

    pub(crate) fn matches(&self, cookie: &Cookie) -> bool {
        let domain_ok = if cookie.host_only {
            self.host.eq_ignore_ascii_case(&cookie.domain)
        } else {
            domain_match(&self.host, &cookie.domain)
        };
        domain_ok
            && path_match(self.path, &cookie.path)
            && (!cookie.secure_only || self.secure_channel)
            && !cookie.is_expired(self.now)
    }
}
