//! The immutable configuration tree.
//!
//! [`ConfigTree`] owns a root container and a [`CleanPolicy`]. Every operation
//! that changes the tree returns a new one and leaves the receiver untouched;
//! untouched sub-trees are shared between the two through reference counting,
//! so derived trees are cheap to create and safe to hand to other threads.
//!
//! # Paths
//!
//! Paths are dot-separated and empty segments are ignored (see
//! [`crate::path`]). The empty path addresses the root: `get("")` returns the
//! whole tree while `with("", ..)` and `without("")` are no-ops.
//!
//! Lookups never fail. A missing key, an out-of-range index or a traversal
//! through a scalar all resolve to "absent", and mutators given such a path
//! either create what is missing (`with`) or leave the tree as it is
//! (`without`, `subtract`).
//!
//! # Examples
//!
//! ```
//! use dotconf::{CleanPolicy, ConfigTree, Value};
//!
//! let tree = ConfigTree::new().with("a.b", "v1");
//! let appended = tree.append("a.b", "v2");
//!
//! assert_eq!(appended.get("a.b"), Some(&Value::list(["v1", "v2"])));
//! assert_eq!(tree.get("a.b"), Some(&Value::from("v1"))); // original unchanged
//!
//! // A stored null is distinguishable from an absent key when nulls are kept
//! let tree = ConfigTree::with_policy(Value::empty_map(), CleanPolicy::NONE).with("k", Value::Null);
//! assert!(tree.has("k"));
//! assert!(!tree.has("missing"));
//! ```
//!
//! Subscripts are read-only; writing through one does not compile:
//!
//! ```compile_fail
//! let mut tree = dotconf::ConfigTree::new();
//! tree["a"] = dotconf::Value::from(1);
//! ```

use std::{borrow::Cow, fmt, ops::Index};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{
    Result,
    errors::ConfigError,
    merge::{self, MergeStrategy},
    path,
    policy::CleanPolicy,
    value::{self, Entries, Value},
};

/// Current serialization format version for ConfigTree.
pub const FORMAT_VERSION: u8 = 0;

static NULL: Value = Value::Null;

/// An immutable tree of configuration values addressed by dot-separated paths.
///
/// Two trees are equal when their data and their cleaning policies are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Snapshot", into = "Snapshot")]
pub struct ConfigTree {
    root: Value,
    policy: CleanPolicy,
}

impl ConfigTree {
    /// Creates an empty tree with the default policy (strip nulls).
    pub fn new() -> Self {
        Self::with_policy(Value::Null, CleanPolicy::default())
    }

    /// Creates a tree from a raw value with the default policy (strip nulls).
    pub fn from_value(value: impl Into<Value>) -> Self {
        Self::with_policy(value, CleanPolicy::default())
    }

    /// Creates a tree from a raw value and a cleaning policy.
    ///
    /// Null produces an empty tree and a scalar is wrapped in a single-element
    /// list, so the root is always a container. The data is cleaned right away.
    pub fn with_policy(value: impl Into<Value>, policy: CleanPolicy) -> Self {
        let tree = Self::build(value.into(), policy);
        debug!(
            entries = tree.len(),
            strip_nulls = policy.strips_nulls(),
            strip_empty = policy.strips_empty(),
            "Created config tree"
        );
        tree
    }

    fn build(root: Value, policy: CleanPolicy) -> Self {
        let root = if root.is_container() {
            policy.clean(&root)
        } else {
            value::wrap(&root)
        };
        Self { root, policy }
    }

    /// Wraps a root that already satisfies this tree's policy.
    ///
    /// Mutators only clean what they insert and the path they rebuild;
    /// everything else is shared with this tree and is clean already.
    fn derive(&self, root: Value) -> Self {
        Self {
            root,
            policy: self.policy,
        }
    }

    /// Returns the cleaning policy shared by this tree and everything derived from it.
    pub fn policy(&self) -> CleanPolicy {
        self.policy
    }

    /// Gets the value at `path`, or the root for an empty path.
    pub fn get(&self, path: impl AsRef<str>) -> Option<&Value> {
        self.root.lookup(path::segments(path.as_ref()))
    }

    /// Gets the value at `path`, falling back to `default` when absent.
    ///
    /// A stored null is returned as is; only absence triggers the default.
    pub fn get_or<'a>(&'a self, path: impl AsRef<str>, default: &'a Value) -> &'a Value {
        self.get(path).unwrap_or(default)
    }

    /// Gets the value at `path` converted to `T`.
    ///
    /// Returns `None` if the path is absent or the value has another type.
    ///
    /// ```
    /// # use dotconf::ConfigTree;
    /// let tree = ConfigTree::new().with("port", 8080).with("host", "localhost");
    /// assert_eq!(tree.get_as::<i64>("port"), Some(8080));
    /// assert_eq!(tree.get_as::<&str>("host"), Some("localhost"));
    /// assert_eq!(tree.get_as::<i64>("host"), None);
    /// ```
    pub fn get_as<'a, T>(&'a self, path: impl AsRef<str>) -> Option<T>
    where
        T: TryFrom<&'a Value, Error = ConfigError>,
    {
        T::try_from(self.get(path)?).ok()
    }

    /// Returns true if `path` resolves, including to a stored null.
    pub fn has(&self, path: impl AsRef<str>) -> bool {
        self.get(path).is_some()
    }

    /// Returns a tree where `path` holds `value`.
    ///
    /// Missing intermediate containers are created and scalars found along
    /// the way are replaced by maps. Setting null while nulls are stripped is
    /// the same as [`ConfigTree::without`].
    pub fn with(&self, path: impl AsRef<str>, value: impl Into<Value>) -> Self {
        let path = path.as_ref();
        let segments: Vec<&str> = path::segments(path).collect();
        if segments.is_empty() {
            return self.clone();
        }

        let value = value.into();
        if value.is_null() && self.policy.strips_nulls() {
            return self.without(path);
        }

        trace!(path, kind = value.type_name(), "Setting config value");
        self.derive(set_in(&self.root, &segments, value, self.policy))
    }

    /// Returns a tree without the entry at `path`.
    ///
    /// If the path does not resolve the result equals this tree. Ancestors left
    /// empty are only removed when the policy strips empty containers.
    pub fn without(&self, path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        let segments: Vec<&str> = path::segments(path).collect();
        if segments.is_empty() {
            return self.clone();
        }

        match remove_in(&self.root, &segments, self.policy) {
            Some(root) => {
                trace!(path, "Removed config value");
                self.derive(root)
            }
            None => self.clone(),
        }
    }

    /// Returns a tree where `value` is appended to the list at `path`.
    ///
    /// A missing or null entry starts as an empty list and a scalar entry is
    /// promoted to a one-element list. `value` itself may be a scalar or a
    /// container whose items are all appended.
    pub fn append(&self, path: impl AsRef<str>, value: impl Into<Value>) -> Self {
        let path = path.as_ref();
        let original = self.get(path).map_or_else(Value::empty_map, value::wrap);
        let combined = value::concat(&original, &value::wrap(&value.into()));
        self.with(path, combined)
    }

    /// Returns a tree where the items of `value` are removed from the container at `path`.
    ///
    /// For each item, the first equal entry is removed. Lists are re-indexed
    /// and maps keep the keys of their remaining entries. If `path` does not
    /// hold a container the tree is returned unchanged.
    pub fn subtract(&self, path: impl AsRef<str>, value: impl Into<Value>) -> Self {
        let path = path.as_ref();
        let Some(original) = self.get(path).filter(|found| found.is_container()) else {
            return self.clone();
        };
        let result = value::difference(original, &value::wrap(&value.into()));
        self.with(path, result)
    }

    /// Returns a tree with `other` merged in according to `strategy`.
    ///
    /// `other` may be a raw [`Value`] or another tree (see the `From<&ConfigTree>`
    /// conversion). Null and empty inputs leave the tree unchanged, and so do
    /// scalar inputs, which have no keys to merge.
    pub fn merge(&self, other: impl Into<Value>, strategy: MergeStrategy) -> Self {
        let other = other.into();
        if !other.is_container() {
            if !other.is_null() {
                warn!(kind = other.type_name(), "Ignoring non-container merge source");
            }
            return self.clone();
        }
        if other.is_empty_container() {
            return self.clone();
        }

        debug!(?strategy, incoming = other.entry_count(), "Merging config tree");
        // Merging two clean containers yields a clean container
        let other = self.policy.clean(&other);
        self.derive(merge::merge(&self.root, &other, strategy))
    }

    /// Returns a tree with the data of `other` merged in. The result keeps this tree's policy.
    pub fn merge_tree(&self, other: &ConfigTree, strategy: MergeStrategy) -> Self {
        self.merge(&other.root, strategy)
    }

    /// Returns a new tree rooted at the value found at `path`.
    ///
    /// A missing path yields an empty tree; a scalar (or null) is wrapped in a
    /// single-element list. The new tree keeps this tree's policy.
    pub fn split(&self, path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        let root = match self.get(path) {
            Some(found) if found.is_container() => found.clone(),
            Some(found) => Value::list([found.clone()]),
            None => Value::empty_map(),
        };
        debug!(path, entries = root.entry_count(), "Split config tree");
        self.derive(root)
    }

    /// Counts leaves: maps are descended into, while lists, empty containers,
    /// scalars and nulls each count as one.
    ///
    /// ```
    /// # use dotconf::{ConfigTree, Value};
    /// let tree = ConfigTree::from_value(Value::map([
    ///     ("a", Value::map([("b", "c")])),
    ///     ("d", Value::list([1, 2, 3])),
    ///     ("e", Value::from("f")),
    /// ]));
    /// assert_eq!(tree.count(), 3);
    /// ```
    pub fn count(&self) -> usize {
        self.root.values().map(count_leaves).sum()
    }

    /// Returns the root container. Cloning it is cheap and the copy can be
    /// changed freely without affecting this tree.
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Returns a snapshot of the data as a raw value.
    pub fn to_value(&self) -> Value {
        self.root.clone()
    }

    /// Returns a snapshot of the data as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        self.root.to_json()
    }

    /// Iterates over the top-level `(key, value)` entries.
    pub fn iter(&self) -> Entries<'_> {
        self.root.entries().unwrap_or_default()
    }

    /// Iterates over the top-level keys.
    pub fn keys(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.iter().map(|(key, _)| key)
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.root.entry_count()
    }

    /// Returns true if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializes the tree, including its cleaning policy, to JSON bytes.
    ///
    /// Fails with [`ConfigError::NonFiniteFloat`] if the tree holds an
    /// infinite or NaN float, which JSON cannot represent.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.ensure_serializable()?;
        Ok(serde_json::to_vec(self)?)
    }

    /// Restores a tree written by [`ConfigTree::to_bytes`].
    ///
    /// Malformed input, unknown policy bits, an unsupported format version
    /// or a non-container root fail with [`ConfigError`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let snapshot: Snapshot =
            serde_json::from_slice(bytes).map_err(|e| ConfigError::DeserializationFailed {
                reason: e.to_string(),
            })?;
        Ok(Self::try_from(snapshot)?)
    }

    /// Serializes the tree, including its cleaning policy, to a JSON string.
    ///
    /// ```
    /// # use dotconf::{CleanPolicy, ConfigTree, Value};
    /// let tree = ConfigTree::with_policy(Value::map([("a", 1)]), CleanPolicy::ALL);
    /// let json = tree.to_json_string()?;
    /// assert_eq!(json, r#"{"policy":3,"data":{"a":1}}"#);
    /// assert_eq!(ConfigTree::from_json_str(&json)?, tree);
    /// # Ok::<(), dotconf::Error>(())
    /// ```
    pub fn to_json_string(&self) -> Result<String> {
        self.ensure_serializable()?;
        Ok(serde_json::to_string(self)?)
    }

    fn ensure_serializable(&self) -> std::result::Result<(), ConfigError> {
        match non_finite_path(&self.root) {
            Some(path) => Err(ConfigError::NonFiniteFloat { path }),
            None => Ok(()),
        }
    }

    /// Restores a tree written by [`ConfigTree::to_json_string`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_bytes(json.as_bytes())
    }
}

/// Returns `node` with `value` stored under `segments`, creating maps as needed.
///
/// The stored value is cleaned, and so is every container rebuilt on the way
/// down: a child the policy discards is dropped from its parent.
fn set_in(node: &Value, segments: &[&str], value: Value, policy: CleanPolicy) -> Value {
    let Some((head, rest)) = segments.split_first() else {
        return policy.clean(&value);
    };
    let child = set_in(node.child(head).unwrap_or(&NULL), rest, value, policy);
    let mut entries = node.to_entries().unwrap_or_default();
    if policy.discards(&child) {
        entries.shift_remove(*head);
    } else {
        entries.insert(head.to_string(), child);
    }
    value::from_entries(entries)
}

/// Returns `node` without the entry under `segments`, or `None` if there is nothing to remove.
///
/// Ancestors left empty are dropped when the policy strips empty containers.
fn remove_in(node: &Value, segments: &[&str], policy: CleanPolicy) -> Option<Value> {
    let (head, rest) = segments.split_first()?;
    let child = node.child(head)?;
    let mut entries = node.to_entries()?;
    if rest.is_empty() {
        entries.shift_remove(*head);
    } else {
        let child = remove_in(child, rest, policy)?;
        if policy.discards(&child) {
            entries.shift_remove(*head);
        } else {
            entries.insert(head.to_string(), child);
        }
    }
    Some(value::from_entries(entries))
}

/// Dotted path of the first infinite or NaN float, if any.
fn non_finite_path(value: &Value) -> Option<String> {
    match value {
        Value::Float(f) if !f.is_finite() => Some(String::new()),
        _ => value.entries()?.find_map(|(key, child)| {
            non_finite_path(child).map(|rest| {
                if rest.is_empty() {
                    key.into_owned()
                } else {
                    format!("{key}.{rest}")
                }
            })
        }),
    }
}

fn count_leaves(value: &Value) -> usize {
    match value {
        Value::Map(entries) if !entries.is_empty() => entries.values().map(count_leaves).sum(),
        _ => 1,
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConfigTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

impl Index<&str> for ConfigTree {
    type Output = Value;

    /// Reads the value at a path; absent paths read as null.
    fn index(&self, path: &str) -> &Value {
        self.get(path).unwrap_or(&NULL)
    }
}

impl<'a> IntoIterator for &'a ConfigTree {
    type Item = (Cow<'a, str>, &'a Value);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Value> for ConfigTree {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<&ConfigTree> for Value {
    fn from(tree: &ConfigTree) -> Self {
        tree.to_value()
    }
}

impl From<ConfigTree> for Value {
    fn from(tree: ConfigTree) -> Self {
        tree.root
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for ConfigTree {
    /// Builds a tree by setting each `(path, value)` pair in turn.
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(ConfigTree::new(), |tree, (path, value)| tree.with(path, value))
    }
}

/// Serde `skip_serializing_if` helper: the current version stays implicit.
fn is_current_version(version: &u8) -> bool {
    *version == FORMAT_VERSION
}

/// Serialized form of a tree: format version, policy bits and data.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Snapshot {
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_current_version"
    )]
    version: u8,
    policy: CleanPolicy,
    data: Value,
}

impl From<ConfigTree> for Snapshot {
    fn from(tree: ConfigTree) -> Self {
        Self {
            version: FORMAT_VERSION,
            policy: tree.policy,
            data: tree.root,
        }
    }
}

impl TryFrom<Snapshot> for ConfigTree {
    type Error = ConfigError;

    fn try_from(snapshot: Snapshot) -> std::result::Result<Self, Self::Error> {
        if snapshot.version != FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: snapshot.version,
                supported: FORMAT_VERSION,
            });
        }
        if !snapshot.data.is_container() {
            return Err(ConfigError::DeserializationFailed {
                reason: format!(
                    "root must be a map or list, found {}",
                    snapshot.data.type_name()
                ),
            });
        }
        Ok(Self::build(snapshot.data, snapshot.policy))
    }
}
