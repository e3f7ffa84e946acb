use super::{admits, sending_order, CookieStore, Request};
use crate::{Cookie, CookieId};
use std::cmp::Ordering;
use url::Url;

/// A cookie jar backed by a list kept in sending order.
///
/// Matching is a single scan, no sorting required. Saving pays for it with a
/// linear lookup of the cookie being replaced.
///
/// # Example
///
/// ```rust
/// use galletta::{CookieStore, OrderedCookieJar, parse_set_cookie};
/// use galletta::CookieCodec;
/// use url::Url;
///
/// let url = Url::parse("https://rust-lang.org/learn").unwrap();
/// let codec = CookieCodec::default();
/// let mut jar = OrderedCookieJar::new();
///
/// jar.save(parse_set_cookie("theme=dark; Path=/", &url, &codec).unwrap(), true);
/// jar.save(parse_set_cookie("tab=intro; Path=/learn", &url, &codec).unwrap(), true);
///
/// let names: Vec<_> = jar.matching(&url, true).iter().map(|c| c.name().to_owned()).collect();
/// assert_eq!(names, ["tab", "theme"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OrderedCookieJar {
    cookies: Vec<Cookie>,
}

impl OrderedCookieJar {
    /// Creates an empty jar.
    pub fn new() -> OrderedCookieJar {
        OrderedCookieJar::default()
    }

    fn position(&self, id: &CookieId<'_>) -> Option<usize> {
        self.cookies.iter().position(|c| c.id() == *id)
    }

    fn insert(&mut self, cookie: Cookie) {
        let index = self
            .cookies
            .partition_point(|c| sending_order(c, &cookie) != Ordering::Greater);
        self.cookies.insert(index, cookie);
    }
}

impl CookieStore for OrderedCookieJar {
    fn save_at(&mut self, mut cookie: Cookie, via_http: bool, now: i64) -> bool {
        let existing = self.position(&cookie.id());
        if !admits(existing.map(|i| &self.cookies[i]), &cookie, via_http) {
            tracing::trace!(
                name = cookie.name(),
                domain = cookie.domain(),
                "Refused to store an HttpOnly cookie from a non-HTTP API"
            );
            return false;
        }
        if let Some(index) = existing {
            let old = self.cookies.remove(index);
            cookie.creation_time = old.creation_time;
            tracing::trace!(name = cookie.name(), domain = cookie.domain(), "Replaced cookie");
        }
        if !cookie.is_expired(now) {
            self.insert(cookie);
        }
        self.clear_expired(now);
        true
    }

    fn matching_at(&mut self, url: &Url, secure_channel: bool, now: i64) -> Vec<Cookie> {
        let Some(request) = Request::new(url, secure_channel, now) else {
            return Vec::new();
        };
        let matched: Vec<Cookie> = self
            .cookies
            .iter_mut()
            .filter(|c| request.matches(c))
            .map(|c| {
                c.access_time = now;
                c.clone()
            })
            .collect();
        tracing::trace!(url = %url, matched = matched.len(), "Matched cookies");
        matched
    }

    fn cookies(&self) -> Vec<Cookie> {
        self.cookies.clone()
    }

    fn remove(&mut self, id: &CookieId<'_>) -> Option<Cookie> {
        let index = self.position(id)?;
        Some(self.cookies.remove(index))
    }

    fn clear_expired(&mut self, now: i64) -> usize {
        let before = self.cookies.len();
        self.cookies.retain(|c| !c.is_expired(now));
        let removed = before - self.cookies.len();
        if removed > 0 {
            tracing::trace!(removed, "Swept expired cookies");
        }
        removed
    }

    fn clear_session_cookies(&mut self) -> usize {
        let before = self.cookies.len();
        self.cookies.retain(|c| c.persistent);
        before - self.cookies.len()
    }

    fn clear(&mut self) {
        self.cookies.clear();
    }

    fn len(&self) -> usize {
        self.cookies.len()
    }
}
