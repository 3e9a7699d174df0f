//! Dot-separated paths for addressing values inside a tree.
//!
//! Every tree operation accepts anything that is `AsRef<str>`, so plain string
//! slices work everywhere. [`PathBuf`] is the owned, normalized form for paths
//! that are assembled at runtime.
//!
//! # Usage
//!
//! ```rust
//! use dotconf::{ConfigTree, PathBuf, path};
//!
//! // Build incrementally
//! let host = PathBuf::new().push("servers").push("0").push("host");
//! assert_eq!(host.as_str(), "servers.0.host");
//!
//! // Or with the macro, which accepts any `ToString` component
//! assert_eq!(path!("servers", 0, "host"), host);
//!
//! let tree = ConfigTree::new().with(&host, "db1");
//! assert_eq!(tree.get_as::<&str>("servers.0.host"), Some("db1"));
//! ```

use std::{convert::Infallible, fmt, str::FromStr};

/// Splits a path string into its non-empty segments.
///
/// Leading, trailing and doubled dots produce empty segments, which are
/// discarded; the empty string has no segments at all.
///
/// ```rust
/// # use dotconf::path::segments;
/// assert_eq!(segments("a..b.").collect::<Vec<_>>(), vec!["a", "b"]);
/// assert_eq!(segments("").count(), 0);
/// ```
pub fn segments(input: &str) -> impl DoubleEndedIterator<Item = &str> {
    input.split('.').filter(|segment| !segment.is_empty())
}

/// Normalizes a path string by dropping empty segments.
///
/// - Empty string "" → empty string (refers to the root)
/// - Leading dots ".user" → "user"
/// - Trailing dots "user." → "user"
/// - Consecutive dots "user..profile" → "user.profile"
/// - Pure dots "..." → empty string
///
/// # Examples
///
/// ```rust
/// # use dotconf::path::normalize_path;
/// assert_eq!(normalize_path(""), "");
/// assert_eq!(normalize_path(".user"), "user");
/// assert_eq!(normalize_path("user..profile"), "user.profile");
/// assert_eq!(normalize_path("..."), "");
/// ```
pub fn normalize_path(input: &str) -> String {
    segments(input).collect::<Vec<_>>().join(".")
}

/// An owned, normalized path.
///
/// The inner string never holds empty segments, so `len()` and
/// `components()` always agree with how tree operations resolve the path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathBuf {
    inner: String,
}

impl PathBuf {
    /// Creates a new empty path, which addresses the root.
    pub fn new() -> Self {
        Self {
            inner: String::new(),
        }
    }

    /// Creates a path by normalizing the input string.
    pub fn normalize(path: &str) -> Self {
        Self {
            inner: normalize_path(path),
        }
    }

    /// Appends a path (one or more segments) to the end of this path.
    ///
    /// ```rust
    /// # use dotconf::PathBuf;
    /// let path = PathBuf::new().push("user").push("profile.name.");
    /// assert_eq!(path.as_str(), "user.profile.name");
    /// ```
    pub fn push(mut self, path: impl AsRef<str>) -> Self {
        let normalized = normalize_path(path.as_ref());
        if normalized.is_empty() {
            return self;
        }

        if !self.inner.is_empty() {
            self.inner.push('.');
        }
        self.inner.push_str(&normalized);
        self
    }

    /// Joins this path with another already-normalized path.
    pub fn join(mut self, other: &PathBuf) -> Self {
        if self.inner.is_empty() {
            self.inner = other.inner.clone();
        } else if !other.inner.is_empty() {
            self.inner.push('.');
            self.inner.push_str(&other.inner);
        }
        self
    }

    /// Returns an iterator over the path segments.
    pub fn components(&self) -> impl DoubleEndedIterator<Item = &str> {
        segments(&self.inner)
    }

    /// Returns the number of segments in the path.
    pub fn len(&self) -> usize {
        self.components().count()
    }

    /// Returns `true` if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the parent path, or `None` for single-segment and empty paths.
    pub fn parent(&self) -> Option<PathBuf> {
        self.inner.rfind('.').map(|last_dot| PathBuf {
            inner: self.inner[..last_dot].to_string(),
        })
    }

    /// Returns the last segment of the path, or `None` if empty.
    pub fn last(&self) -> Option<&str> {
        self.components().next_back()
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl AsRef<str> for PathBuf {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl FromStr for PathBuf {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::normalize(s))
    }
}

impl From<&str> for PathBuf {
    fn from(path: &str) -> Self {
        Self::normalize(path)
    }
}

impl From<String> for PathBuf {
    fn from(path: String) -> Self {
        Self::normalize(&path)
    }
}

impl fmt::Display for PathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.is_empty() {
            write!(f, "(empty path)")
        } else {
            write!(f, "{}", self.inner)
        }
    }
}

/// Constructs a [`PathBuf`] from components.
///
/// Each component may be anything implementing `ToString`; components that
/// contain dots contribute several segments.
///
/// - `path!()` - Empty path
/// - `path!("user.profile")` - From a dotted string
/// - `path!("servers", 0, "host")` - From mixed components
///
/// ```rust
/// # use dotconf::path;
/// assert_eq!(path!().as_str(), "");
/// assert_eq!(path!("a.b", "c").as_str(), "a.b.c");
/// assert_eq!(path!("list", 2).as_str(), "list.2");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::path::PathBuf::new()
    };

    ($($component:expr),+ $(,)?) => {{
        let path = $crate::path::PathBuf::new();
        $(
            let path = path.push($component.to_string());
        )+
        path
    }};
}
