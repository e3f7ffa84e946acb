use super::{admits, sending_order, CookieStore, Request};
use crate::{Cookie, CookieId};
use std::collections::HashMap;
use url::Url;

/// A cookie jar backed by a map from [`CookieId`] to [`Cookie`].
///
/// Saving and removing are constant-time; matching sorts the matched cookies
/// before returning them.
#[derive(Debug, Clone, Default)]
pub struct IndexedCookieJar {
    cookies: HashMap<CookieId<'static>, Cookie>,
}

impl IndexedCookieJar {
    /// Creates an empty jar.
    pub fn new() -> IndexedCookieJar {
        IndexedCookieJar::default()
    }
}

impl CookieStore for IndexedCookieJar {
    fn save_at(&mut self, mut cookie: Cookie, via_http: bool, now: i64) -> bool {
        let id = cookie.id().into_owned();
        if !admits(self.cookies.get(&id), &cookie, via_http) {
            tracing::trace!(
                name = cookie.name(),
                domain = cookie.domain(),
                "Refused to store an HttpOnly cookie from a non-HTTP API"
            );
            return false;
        }
        if let Some(old) = self.cookies.remove(&id) {
            cookie.creation_time = old.creation_time;
            tracing::trace!(name = cookie.name(), domain = cookie.domain(), "Replaced cookie");
        }
        if !cookie.is_expired(now) {
            self.cookies.insert(id, cookie);
        }
        self.clear_expired(now);
        true
    }

    fn matching_at(&mut self, url: &Url, secure_channel: bool, now: i64) -> Vec<Cookie> {
        let Some(request) = Request::new(url, secure_channel, now) else {
            return Vec::new();
        };
        let mut matched: Vec<Cookie> = self
            .cookies
            .values_mut()
            .filter(|c| request.matches(c))
            .map(|c| {
                c.access_time = now;
                c.clone()
            })
            .collect();
        matched.sort_by(sending_order);
        tracing::trace!(url = %url, matched = matched.len(), "Matched cookies");
        matched
    }

    fn cookies(&self) -> Vec<Cookie> {
        let mut cookies: Vec<Cookie> = self.cookies.values().cloned().collect();
        cookies.sort_by(sending_order);
        cookies
    }

    fn remove(&mut self, id: &CookieId<'_>) -> Option<Cookie> {
        // `HashMap::remove` needs a `CookieId<'static>` to borrow as.
        self.cookies.remove(&id.clone().into_owned())
    }

    fn clear_expired(&mut self, now: i64) -> usize {
        let before = self.cookies.len();
        self.cookies.retain(|_, c| !c.is_expired(now));
        let removed = before - self.cookies.len();
        if removed > 0 {
            tracing::trace!(removed, "Swept expired cookies");
        }
        removed
    }

    fn clear_session_cookies(&mut self) -> usize {
        let before = self.cookies.len();
        self.cookies.retain(|_, c| c.persistent);
        before - self.cookies.len()
    }

    fn clear(&mut self) {
        self.cookies.clear();
    }

    fn len(&self) -> usize {
        self.cookies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::IndexedCookieJar;
    use crate::jar::tests::{cookie, run_all, url, NOW};
    use crate::CookieStore;

    #[test]
    fn shared_behaviour() {
        run_all(|| Box::new(IndexedCookieJar::new()));
    }

    #[test]
    fn many_cookies_are_sorted_on_match() {
        let mut jar = IndexedCookieJar::new();
        let origin = "http://example.com/p0/p1/p2/p3/p4/p5/p6/p7";
        for depth in 0..8_i64 {
            let path: String = (0..depth).map(|i| format!("/p{i}")).collect();
            let path = if path.is_empty() { "/".to_owned() } else { path };
            let header = format!("c{depth}=1; Path={path}");
            jar.save_at(cookie(&header, origin, NOW + depth), true, NOW + depth);
        }

        let matched = jar.matching_at(&url(origin), false, NOW + 10);
        let names: Vec<_> = matched.iter().map(|c| c.name().to_owned()).collect();
        assert_eq!(names, ["c7", "c6", "c5", "c4", "c3", "c2", "c1", "c0"]);
    }
}
