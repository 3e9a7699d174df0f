//! Strategies for merging one tree into another.
//!
//! Merging walks both trees key by key. Keys that only exist in the incoming
//! tree are always added; keys present on both sides are resolved by the
//! [`MergeStrategy`]:
//!
//! - **Replace**: maps are merged recursively, anything else is overwritten by
//!   the incoming value.
//! - **Keep**: existing values win. This runs the Replace walk with the roles
//!   swapped (the incoming tree becomes the base), so brand-new keys are still
//!   added at every depth while existing ones are never overwritten.
//! - **Append**: like Replace, except that when both sides are lists (or one is
//!   a list and the other a scalar) the incoming items are appended.
//!
//! ```
//! use dotconf::{ConfigTree, MergeStrategy, Value};
//!
//! let base = ConfigTree::from_value(Value::map([("tags", Value::list(["a"]))]));
//! let extra = Value::map([("tags", Value::list(["b"]))]);
//!
//! let appended = base.merge(extra.clone(), MergeStrategy::Append);
//! assert_eq!(appended.get("tags"), Some(&Value::list(["a", "b"])));
//!
//! let replaced = base.merge(extra, MergeStrategy::Replace);
//! assert_eq!(replaced.get("tags"), Some(&Value::list(["b"])));
//! ```

use serde::{Deserialize, Serialize};

use crate::value::{self, Value};

/// How conflicting keys are resolved when merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Incoming values overwrite existing ones
    #[default]
    Replace,
    /// Existing values win; only new keys are added
    Keep,
    /// Lists are concatenated, other values overwritten
    Append,
}

/// Merges container `other` into container `base`.
pub(crate) fn merge(base: &Value, other: &Value, strategy: MergeStrategy) -> Value {
    match strategy {
        MergeStrategy::Keep => merge_entries(other, base, MergeStrategy::Replace),
        MergeStrategy::Replace | MergeStrategy::Append => merge_entries(base, other, strategy),
    }
}

fn merge_entries(base: &Value, replacement: &Value, strategy: MergeStrategy) -> Value {
    let mut entries = base.to_entries().unwrap_or_default();
    for (key, incoming) in replacement.entries().unwrap_or_default() {
        let merged = match entries.get(&*key) {
            Some(existing) => merge_pair(existing, incoming, strategy),
            None => incoming.clone(),
        };
        entries.insert(key.into_owned(), merged);
    }
    value::from_entries(entries)
}

fn merge_pair(existing: &Value, incoming: &Value, strategy: MergeStrategy) -> Value {
    if existing.is_map() && incoming.is_map() {
        return merge_entries(existing, incoming, strategy);
    }
    if strategy == MergeStrategy::Append && appendable(existing, incoming) {
        return value::concat(&value::wrap(existing), &value::wrap(incoming));
    }
    incoming.clone()
}

fn appendable(existing: &Value, incoming: &Value) -> bool {
    match (existing.is_list(), incoming.is_list()) {
        (true, true) => true,
        (true, false) => incoming.is_scalar(),
        (false, true) => existing.is_scalar(),
        (false, false) => false,
    }
}
