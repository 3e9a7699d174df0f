//! Value types stored in configuration trees.
//!
//! [`Value`] is a closed sum type: leaf values (null, booleans, numbers,
//! text) and containers (lists and maps). Containers are reference counted,
//! so cloning a value is cheap and trees derived from one another share every
//! sub-tree that was not touched.
//!
//! # List or map
//!
//! A container is a list if and only if it is non-empty and its keys are
//! exactly `"0"` to `"len-1"` in order; everything else, including every empty
//! container, is a map. The classification is structural: [`Value::is_list`]
//! and [`Value::is_map`] look at the keys rather than at the variant, and
//! equality treats `Value::Map({"0": a, "1": b})` and `Value::List([a, b])` as
//! the same value. Trees keep their containers in canonical form, where the
//! variant always agrees with the classification.

use std::{borrow::Cow, fmt, iter::Enumerate, slice, sync::Arc};

use indexmap::IndexMap;

use crate::errors::ConfigError;

/// Ordered string-keyed entries of a map container.
///
/// Iteration follows insertion order; equality ignores it.
pub type Map = IndexMap<String, Value>;

/// Values that can be stored in a configuration tree.
///
/// Serializes to and from the natural JSON shape: `null`, booleans, numbers,
/// strings, arrays and objects.
///
/// # Direct Comparisons
///
/// ```
/// # use dotconf::Value;
/// let text = Value::from("hello");
/// let number = Value::from(42);
///
/// assert!(text == "hello");
/// assert!(42 == number);
/// assert!(!(text == 42));
///
/// // Structural classification: index-keyed maps are lists
/// let list = Value::list(["a", "b"]);
/// let map = Value::map([("0", "a"), ("1", "b")]);
/// assert_eq!(list, map);
/// assert!(map.is_list());
/// ```
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    // Leaf values
    /// Absent marker, subject to the cleaning policy
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value. Only finite floats can be serialized.
    #[serde(serialize_with = "serialize_finite")]
    Float(f64),
    /// Text string value
    Text(String),

    // Containers
    /// Ordered sequence indexed from zero
    List(Arc<Vec<Value>>),
    /// String-keyed entries
    Map(Arc<Map>),
}

impl Value {
    /// Creates an empty container (classified as a map).
    pub fn empty_map() -> Self {
        Value::Map(Arc::new(Map::new()))
    }

    /// Creates a list container from the given items.
    ///
    /// An empty iterator yields an empty map, since empty containers are
    /// never classified as lists.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        from_items(items.into_iter().map(Into::into).collect())
    }

    /// Creates a container from key-value entries.
    ///
    /// Entries keyed `"0"`, `"1"`, ... in order produce a list.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        from_entries(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Returns true if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for booleans, numbers and text (not null, not containers)
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Text(_)
        )
    }

    /// Returns true for lists and maps
    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Returns true if this container is classified as a list.
    pub fn is_list(&self) -> bool {
        match self {
            Value::List(items) => !items.is_empty(),
            Value::Map(entries) => is_sequential(entries),
            _ => false,
        }
    }

    /// Returns true if this container is classified as a map (including empty containers).
    pub fn is_map(&self) -> bool {
        self.is_container() && !self.is_list()
    }

    /// Returns true for a container with no entries
    pub fn is_empty_container(&self) -> bool {
        match self {
            Value::List(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            _ => false,
        }
    }

    /// Number of direct entries of a container; zero for leaf values.
    pub fn entry_count(&self) -> usize {
        match self {
            Value::List(items) => items.len(),
            Value::Map(entries) => entries.len(),
            _ => 0,
        }
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Attempts to convert to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to convert to an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to convert to a float; integers are widened
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Attempts to convert to a string slice
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the items of a list-variant container
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries of a map-variant container
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a direct child by key. List children are addressed by their
    /// canonical decimal index.
    pub fn child(&self, key: &str) -> Option<&Value> {
        match self {
            Value::List(items) => index_key(key).and_then(|index| items.get(index)),
            Value::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Iterates over the direct entries of a container, or `None` for leaf values.
    pub fn entries(&self) -> Option<Entries<'_>> {
        let inner = match self {
            Value::List(items) => EntriesInner::List(items.iter().enumerate()),
            Value::Map(entries) => EntriesInner::Map(entries.iter()),
            _ => return None,
        };
        Some(Entries { inner })
    }

    /// Iterates over the direct child values of a container (empty for leaf values).
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries().unwrap_or_default().map(|(_, value)| value)
    }

    /// Walks the given segments from this value.
    pub(crate) fn lookup<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Option<&Value> {
        segments
            .into_iter()
            .try_fold(self, |current, segment| current.child(segment))
    }

    /// Copies the direct entries of a container into an owned map keyed the
    /// way [`Value::child`] addresses them. Children are shared, not copied.
    pub(crate) fn to_entries(&self) -> Option<Map> {
        match self {
            Value::List(items) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| (index.to_string(), item.clone()))
                    .collect(),
            ),
            Value::Map(entries) => Some(Map::clone(entries)),
            _ => None,
        }
    }

    /// Rewrites this container so that its variant matches its classification.
    /// Children are left untouched.
    pub(crate) fn canonical(self) -> Value {
        match self {
            Value::List(items) if items.is_empty() => Value::empty_map(),
            Value::Map(entries) if is_sequential(&entries) => Value::List(Arc::new(
                Arc::unwrap_or_clone(entries).into_values().collect(),
            )),
            other => other,
        }
    }

    /// Returns true if both values are the same container allocation.
    pub(crate) fn shares_storage(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Converts into a `serde_json::Value`.
    ///
    /// Non-finite floats have no JSON representation and become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(n) => Json::from(*n),
            Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::Text(s) => Json::String(s.clone()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    /// Converts to a compact JSON string for display and export.
    ///
    /// ```
    /// # use dotconf::Value;
    /// let value = Value::map([("name", Value::from("Alice")), ("tags", Value::list(["a"]))]);
    /// assert_eq!(value.to_json_string(), r#"{"name":"Alice","tags":["a"]}"#);
    /// ```
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }
}

/// JSON has no infinity or NaN, so those floats fail to serialize.
fn serialize_finite<S: serde::Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        Err(serde::ser::Error::custom(format!(
            "non-finite float {value} cannot be serialized"
        )))
    }
}

/// Iterator over the direct entries of a container.
///
/// List entries are keyed by their decimal index.
#[derive(Debug, Clone, Default)]
pub struct Entries<'a> {
    inner: EntriesInner<'a>,
}

#[derive(Debug, Clone, Default)]
enum EntriesInner<'a> {
    List(Enumerate<slice::Iter<'a, Value>>),
    Map(indexmap::map::Iter<'a, String, Value>),
    #[default]
    Empty,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (Cow<'a, str>, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            EntriesInner::List(iter) => iter
                .next()
                .map(|(index, value)| (Cow::Owned(index.to_string()), value)),
            EntriesInner::Map(iter) => iter
                .next()
                .map(|(key, value)| (Cow::Borrowed(key.as_str()), value)),
            EntriesInner::Empty => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            EntriesInner::List(iter) => iter.size_hint(),
            EntriesInner::Map(iter) => iter.size_hint(),
            EntriesInner::Empty => (0, Some(0)),
        }
    }
}

impl ExactSizeIterator for Entries<'_> {}

/// Parses a canonical list index: `"0"` or a digit string without a leading zero.
pub(crate) fn index_key(key: &str) -> Option<usize> {
    let canonical = key == "0"
        || (!key.is_empty() && !key.starts_with('0') && key.bytes().all(|b| b.is_ascii_digit()));
    if canonical { key.parse().ok() } else { None }
}

/// True if the keys are exactly `"0".."len-1"` in order and there is at least one.
fn is_sequential(entries: &Map) -> bool {
    !entries.is_empty()
        && entries
            .keys()
            .enumerate()
            .all(|(position, key)| index_key(key) == Some(position))
}

/// Builds a canonical container from ordered entries.
pub(crate) fn from_entries(entries: Map) -> Value {
    Value::Map(Arc::new(entries)).canonical()
}

/// Builds a canonical container from list items.
pub(crate) fn from_items(items: Vec<Value>) -> Value {
    Value::List(Arc::new(items)).canonical()
}

/// Lifts any value into a container: null becomes empty, containers stay as
/// they are and scalars become a single-element list.
pub(crate) fn wrap(value: &Value) -> Value {
    match value {
        Value::Null => Value::empty_map(),
        Value::List(_) | Value::Map(_) => value.clone(),
        scalar => Value::List(Arc::new(vec![scalar.clone()])),
    }
}

/// Concatenates two containers.
///
/// Index-keyed entries are renumbered to follow one another; other keys are
/// inserted by name, later entries overwriting earlier ones.
pub(crate) fn concat(head: &Value, tail: &Value) -> Value {
    if let (Value::List(first), Value::List(second)) = (head, tail) {
        let mut items = Vec::with_capacity(first.len() + second.len());
        items.extend(first.iter().cloned());
        items.extend(second.iter().cloned());
        return from_items(items);
    }

    let mut entries = Map::with_capacity(head.entry_count() + tail.entry_count());
    let mut next_index = 0usize;
    let all = head
        .entries()
        .unwrap_or_default()
        .chain(tail.entries().unwrap_or_default());
    for (key, value) in all {
        if index_key(&key).is_some() {
            entries.insert(next_index.to_string(), value.clone());
            next_index += 1;
        } else {
            entries.insert(key.into_owned(), value.clone());
        }
    }
    from_entries(entries)
}

/// Removes, for each value in `remove`, the first entry of `original` equal to it.
///
/// Lists are re-indexed afterwards; maps keep the keys of the surviving entries.
pub(crate) fn difference(original: &Value, remove: &Value) -> Value {
    match original {
        Value::List(items) => {
            let mut kept = items.to_vec();
            for needle in remove.values() {
                if let Some(position) = kept.iter().position(|item| item == needle) {
                    kept.remove(position);
                }
            }
            from_items(kept)
        }
        Value::Map(entries) => {
            let mut kept = Map::clone(entries);
            for needle in remove.values() {
                if let Some(position) = kept.values().position(|item| item == needle) {
                    kept.shift_remove_index(position);
                }
            }
            from_entries(kept)
        }
        leaf => leaf.clone(),
    }
}

/// A list equals a map holding the same items under their index keys, in any key order.
fn list_matches_map(items: &[Value], entries: &Map) -> bool {
    items.len() == entries.len()
        && items
            .iter()
            .enumerate()
            .all(|(index, item)| entries.get(index.to_string().as_str()) == Some(item))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::List(items), Value::Map(entries)) | (Value::Map(entries), Value::List(items)) => {
                list_matches_map(items, entries)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

// Convenient From implementations for common types
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        // Values beyond i64 keep their magnitude as a float
        i64::try_from(value).map_or(Value::Float(value as f64), Value::Int)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::from(value as u64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::list(items)
    }
}

impl From<Map> for Value {
    fn from(entries: Map) -> Self {
        from_entries(entries)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float))
                .unwrap_or(Value::Null),
            Json::String(s) => Value::Text(s),
            Json::Array(items) => from_items(items.into_iter().map(Value::from).collect()),
            Json::Object(entries) => from_entries(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        value.to_json()
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Value::list(iter)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Value::map(iter)
    }
}

// TryFrom implementations for typed reads
impl TryFrom<&Value> for String {
    type Error = ConfigError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            _ => Err(type_mismatch("String", value)),
        }
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = ConfigError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        match value {
            Value::Text(s) => Ok(s),
            _ => Err(type_mismatch("&str", value)),
        }
    }
}

impl TryFrom<&Value> for i64 {
    type Error = ConfigError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_int().ok_or_else(|| type_mismatch("i64", value))
    }
}

impl TryFrom<&Value> for f64 {
    type Error = ConfigError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_float().ok_or_else(|| type_mismatch("f64", value))
    }
}

impl TryFrom<&Value> for bool {
    type Error = ConfigError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value.as_bool().ok_or_else(|| type_mismatch("bool", value))
    }
}

fn type_mismatch(expected: &str, actual: &Value) -> ConfigError {
    ConfigError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.type_name().to_string(),
    }
}

// PartialEq implementations for comparing Value with other types
impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        matches!(self, Value::Text(s) if s == other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, Value::Int(n) if n == other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        *self == *other as i64
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Value::Float(f) if f == other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        matches!(self, Value::Bool(b) if b == other)
    }
}

// Reverse implementations for symmetry
impl PartialEq<Value> for str {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for &str {
    fn eq(&self, other: &Value) -> bool {
        other == *self
    }
}

impl PartialEq<Value> for String {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for i64 {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for i32 {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

impl PartialEq<Value> for bool {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}
