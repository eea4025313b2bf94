//! Injectable star count providers.
//!
//! The controller never reads a process-wide value; callers pass a
//! [`StarSource`] in. Caching across fetches is an explicit wrapper
//! ([`CachedStars`]) with a defined maximum age.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Deserialize;

/// Provider of a repository star count.
///
/// `None` means the count is unknown. Providers swallow their own failures.
pub trait StarSource: Send + Sync {
    /// Current star count, if known.
    fn stars(&self) -> Option<u64>;
}

impl<S: StarSource + ?Sized> StarSource for Arc<S> {
    fn stars(&self) -> Option<u64> {
        (**self).stars()
    }
}

impl<S: StarSource + ?Sized> StarSource for &S {
    fn stars(&self) -> Option<u64> {
        (**self).stars()
    }
}

/// A count known up front, or known to be unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedStars(pub Option<u64>);

impl StarSource for FixedStars {
    fn stars(&self) -> Option<u64> {
        self.0
    }
}

/// Reads the count from a JSON document of the form `{"stars": 1234}`.
///
/// The file is read on every fetch. A missing or malformed file is "unknown".
#[derive(Debug, Clone)]
pub struct StarsFile {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct StarsDocument {
    stars: Option<u64>,
}

impl StarsFile {
    /// Source backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StarSource for StarsFile {
    fn stars(&self) -> Option<u64> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("Star count unavailable ({}): {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<StarsDocument>(&content) {
            Ok(doc) => doc.stars,
            Err(e) => {
                tracing::warn!("Ignoring malformed star file {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

/// Time source for [`CachedStars`].
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The system monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    fetched_at: Instant,
    stars: u64,
}

/// Caches another source's count for at most `max_age`.
///
/// - a count fetched less than `max_age` ago is served without refetching
/// - an expired count triggers a refetch
/// - a refetch that comes back unknown keeps serving the last known count,
///   and the next call tries again
///
/// Zero is never cached as a known count.
#[derive(Debug)]
pub struct CachedStars<S, C = SystemClock> {
    inner: S,
    max_age: Duration,
    clock: C,
    entry: Mutex<Option<CacheEntry>>,
}

impl<S: StarSource> CachedStars<S> {
    /// Cache `inner` for `max_age` using the system clock.
    pub fn new(inner: S, max_age: Duration) -> Self {
        Self::with_clock(inner, max_age, SystemClock)
    }
}

impl<S: StarSource, C: Clock> CachedStars<S, C> {
    /// Cache `inner` using a custom clock.
    pub fn with_clock(inner: S, max_age: Duration, clock: C) -> Self {
        Self {
            inner,
            max_age,
            clock,
            entry: Mutex::new(None),
        }
    }

    /// Maximum age of a served count.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }
}

impl<S: StarSource, C: Clock> StarSource for CachedStars<S, C> {
    fn stars(&self) -> Option<u64> {
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now();

        if let Some(cached) = *entry {
            if now.duration_since(cached.fetched_at) < self.max_age {
                return Some(cached.stars);
            }
        }

        match self.inner.stars().filter(|&n| n > 0) {
            Some(stars) => {
                *entry = Some(CacheEntry {
                    fetched_at: now,
                    stars,
                });
                Some(stars)
            }
            None => {
                if entry.is_some() {
                    tracing::debug!("Star refresh failed, serving last known count");
                }
                (*entry).map(|cached| cached.stars)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }

        fn advance(&self, by: Duration) {
            *self.now.lock().unwrap() += by;
        }
    }

    impl Clock for &ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }

    /// Serves a scripted sequence of counts and counts fetches.
    struct Scripted {
        values: Mutex<Vec<Option<u64>>>,
        fetches: AtomicUsize,
    }

    impl Scripted {
        fn new(mut values: Vec<Option<u64>>) -> Self {
            values.reverse();
            Self {
                values: Mutex::new(values),
                fetches: AtomicUsize::new(0),
            }
        }
    }

    impl StarSource for Scripted {
        fn stars(&self) -> Option<u64> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.values.lock().unwrap().pop().flatten()
        }
    }

    #[test]
    fn fixed_source_returns_its_value() {
        assert_eq!(FixedStars(Some(42)).stars(), Some(42));
        assert_eq!(FixedStars::default().stars(), None);
    }

    #[test]
    fn reads_star_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("stars.json");
        std::fs::write(&path, r#"{"stars": 1234, "fetchedAt": "2026-01-01"}"#).unwrap();

        assert_eq!(StarsFile::new(&path).stars(), Some(1234));
    }

    #[test]
    fn missing_or_malformed_file_is_unknown() {
        let temp = tempdir().unwrap();
        let broken = temp.path().join("broken.json");
        std::fs::write(&broken, "not json").unwrap();

        assert_eq!(StarsFile::new(temp.path().join("nope.json")).stars(), None);
        assert_eq!(StarsFile::new(&broken).stars(), None);
    }

    #[test]
    fn serves_cached_value_within_max_age() {
        let clock = ManualClock::new();
        let inner = Scripted::new(vec![Some(10), Some(20)]);
        let cached = CachedStars::with_clock(&inner, Duration::from_secs(60), &clock);

        assert_eq!(cached.stars(), Some(10));
        clock.advance(Duration::from_secs(59));
        assert_eq!(cached.stars(), Some(10));
        assert_eq!(inner.fetches.load(Ordering::SeqCst), 1);

        clock.advance(Duration::from_secs(1));
        assert_eq!(cached.stars(), Some(20));
        assert_eq!(inner.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn keeps_last_known_value_when_refresh_fails() {
        let clock = ManualClock::new();
        let inner = Scripted::new(vec![Some(10), None, Some(0), Some(30)]);
        let cached = CachedStars::with_clock(&inner, Duration::from_secs(5), &clock);

        assert_eq!(cached.stars(), Some(10));
        clock.advance(Duration::from_secs(5));
        assert_eq!(cached.stars(), Some(10));
        assert_eq!(cached.stars(), Some(10));
        assert_eq!(cached.stars(), Some(30));
        assert_eq!(inner.fetches.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn unknown_without_history_stays_unknown() {
        let inner = Scripted::new(vec![None, Some(0)]);
        let cached = CachedStars::new(&inner, Duration::from_secs(60));

        assert_eq!(cached.stars(), None);
        assert_eq!(cached.stars(), None);
        assert_eq!(cached.max_age(), Duration::from_secs(60));
    }
}
