//! The process-wide default jar.
use crate::config::Config;
use crate::jar::SharedJar;
use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use std::sync::Mutex;

static DEFAULT_JAR: Lazy<ArcSwap<Mutex<Box<dyn crate::CookieStore + Send>>>> =
    Lazy::new(|| ArcSwap::from_pointee(Mutex::new(Config::default().new_jar())));

/// Returns the jar used by the `*_default` helpers.
///
/// It starts out as an empty jar built from the default [`Config`].
///
/// ```rust
/// use galletta::{default_jar, jar::lock};
///
/// let jar = default_jar();
/// let _count = lock(&jar).len();
/// ```
pub fn default_jar() -> SharedJar {
    DEFAULT_JAR.load_full()
}

/// Replaces the default jar, returning the previous one.
///
/// Callers holding the previous jar keep using it: the swap only affects
/// later calls to [`default_jar`].
pub fn set_default_jar(jar: SharedJar) -> SharedJar {
    DEFAULT_JAR.swap(jar)
}
