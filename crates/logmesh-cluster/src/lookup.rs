//! Degraded-or-ready results for lazy node views.
//!
//! Read-style node operations never fail outward. A transport error is
//! logged where it happens and the caller gets `Lookup::Degraded`, then
//! picks its own default:
//!
//! ```
//! use logmesh_cluster::Lookup;
//! let throughput: Lookup<u64> = Lookup::Degraded;
//! assert_eq!(throughput.unwrap_or(0), 0);
//! ```

/// A value fetched from a node, or a marker that the fetch failed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Lookup<T> {
    Ready(T),
    Degraded,
}

impl<T> Lookup<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Lookup::Ready(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Lookup::Degraded)
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Lookup::Ready(v) => Some(v),
            Lookup::Degraded => None,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.ready().unwrap_or(default)
    }

    pub fn unwrap_or_else(self, f: impl FnOnce() -> T) -> T {
        self.ready().unwrap_or_else(f)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Ready(v) => Lookup::Ready(f(v)),
            Lookup::Degraded => Lookup::Degraded,
        }
    }
}

impl<T: Default> Lookup<T> {
    pub fn unwrap_or_default(self) -> T {
        self.ready().unwrap_or_default()
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Lookup::Ready(v),
            None => Lookup::Degraded,
        }
    }
}
