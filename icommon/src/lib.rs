//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use icommon::{Clock, ManualClock, UserId};
//! use std::time::Duration;
//!
//! let user = UserId::from("u1");
//!
//! let clock = ManualClock::new();
//! let start = clock.now();
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.now() - start, Duration::from_secs(5));
//! assert_eq!(user.as_str(), "u1");
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use icommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Cross-crate identifier newtypes.
    //!
    //! ```rust
    //! use icommon::UserId;
    //!
    //! let user = UserId::new("user-42");
    //! assert_eq!(user.to_string(), "user-42");
    //! assert!(!user.is_blank());
    //! ```

    use std::fmt::{Display, Formatter};

    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct UserId(String);

    impl UserId {
        pub const DEFAULT: &'static str = "default";

        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }

        pub fn is_blank(&self) -> bool {
            self.0.trim().is_empty()
        }
    }

    impl Default for UserId {
        fn default() -> Self {
            Self(Self::DEFAULT.to_string())
        }
    }

    impl Display for UserId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for UserId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for UserId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod clock {
    //! Monotonic time sources.
    //!
    //! Components that reason about windows and recency take a `Clock` so tests
    //! can move time forward without sleeping.
    //!
    //! ```rust
    //! use icommon::{Clock, SystemClock};
    //!
    //! let clock = SystemClock;
    //! let earlier = clock.now();
    //! assert!(clock.now() >= earlier);
    //! ```

    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    pub trait Clock: Send + Sync {
        fn now(&self) -> Instant;
    }

    #[derive(Debug, Default, Clone, Copy)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> Instant {
            Instant::now()
        }
    }

    /// Clock that only moves when told to.
    #[derive(Debug)]
    pub struct ManualClock {
        origin: Instant,
        offset: Mutex<Duration>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self {
                origin: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
            }
        }

        pub fn advance(&self, by: Duration) {
            let mut offset = self
                .offset
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *offset += by;
        }
    }

    impl Default for ManualClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            let offset = self
                .offset
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            self.origin + *offset
        }
    }
}

pub mod registry {
    //! Generic registry map wrapper used by runtime registries.
    //!
    //! ```rust
    //! use icommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert("alpha".to_string(), 1_u32);
    //!
    //! assert_eq!(registry.get("alpha"), Some(&1));
    //! assert!(registry.contains_key("alpha"));
    //! ```

    use std::borrow::Borrow;
    use std::collections::HashMap;
    use std::hash::Hash;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        items: HashMap<K, V>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Eq + Hash,
    {
        fn default() -> Self {
            Self {
                items: HashMap::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Eq + Hash,
    {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            self.items.insert(key, value)
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.get(key)
        }

        pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.remove(key)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.contains_key(key)
        }

        pub fn keys(&self) -> impl Iterator<Item = &K> {
            self.items.keys()
        }

        pub fn len(&self) -> usize {
            self.items.len()
        }

        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }
    }
}

pub use clock::{Clock, ManualClock, SystemClock};
pub use context::UserId;
pub use future::BoxFuture;
pub use registry::Registry;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Clock, ManualClock, Registry, UserId};

    #[test]
    fn user_id_round_trips_strings() {
        let user = UserId::new("u1");
        let from = UserId::from("u1".to_string());

        assert_eq!(user, from);
        assert_eq!(user.as_str(), "u1");
        assert_eq!(user.to_string(), "u1");
        assert_eq!(UserId::default().as_str(), "default");
        assert!(UserId::from("  ").is_blank());
    }

    #[test]
    fn manual_clock_only_moves_when_advanced() {
        let clock = ManualClock::new();
        let first = clock.now();
        assert_eq!(clock.now(), first);

        clock.advance(Duration::from_secs(61));
        assert_eq!(clock.now() - first, Duration::from_secs(61));
    }

    #[test]
    fn generic_registry_basic_lifecycle() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        registry.insert("alpha".to_string(), 1_u32);
        assert_eq!(registry.get("alpha"), Some(&1));
        assert!(registry.contains_key("alpha"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.keys().count(), 1);

        let removed = registry.remove("alpha");
        assert_eq!(removed, Some(1));
        assert!(registry.is_empty());
    }
}
