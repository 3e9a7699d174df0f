//! Cleaning policies applied after every structural change.
//!
//! A [`CleanPolicy`] decides whether null values and empty containers are
//! stripped from a tree. It is fixed when a tree is built and every tree
//! derived from it (through `with`, `merge`, `split`, ...) inherits it.
//!
//! Cleaning works bottom-up, so a container that only becomes empty because
//! its children were stripped is itself stripped when empty containers are
//! being removed. The root container is never removed.

use serde::{Deserialize, Serialize};

use crate::{
    errors::ConfigError,
    value::{self, Map, Value},
};

/// Flags controlling automatic removal of nulls and empty containers.
///
/// Serialized as its bit representation ([`CleanPolicy::bits`]).
///
/// ```
/// # use dotconf::CleanPolicy;
/// let policy = CleanPolicy::NONE.with_strip_empty(true);
/// assert!(policy.strips_empty());
/// assert!(!policy.strips_nulls());
/// assert_eq!(CleanPolicy::from_bits(policy.bits()), Ok(policy));
/// assert_eq!(CleanPolicy::default(), CleanPolicy::STRIP_NULLS);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CleanPolicy {
    strip_nulls: bool,
    strip_empty: bool,
}

impl CleanPolicy {
    const NULLS_BIT: u8 = 0b01;
    const EMPTY_BIT: u8 = 0b10;

    /// Keep everything.
    pub const NONE: Self = Self {
        strip_nulls: false,
        strip_empty: false,
    };

    /// Remove null values (the default).
    pub const STRIP_NULLS: Self = Self {
        strip_nulls: true,
        strip_empty: false,
    };

    /// Remove empty lists and maps.
    pub const STRIP_EMPTY: Self = Self {
        strip_nulls: false,
        strip_empty: true,
    };

    /// Remove both nulls and empty containers.
    pub const ALL: Self = Self {
        strip_nulls: true,
        strip_empty: true,
    };

    /// Returns a copy with null stripping switched on or off.
    pub const fn with_strip_nulls(mut self, enabled: bool) -> Self {
        self.strip_nulls = enabled;
        self
    }

    /// Returns a copy with empty-container stripping switched on or off.
    pub const fn with_strip_empty(mut self, enabled: bool) -> Self {
        self.strip_empty = enabled;
        self
    }

    pub fn strips_nulls(&self) -> bool {
        self.strip_nulls
    }

    pub fn strips_empty(&self) -> bool {
        self.strip_empty
    }

    /// Bit representation: `0b01` strips nulls, `0b10` strips empty containers.
    pub fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.strip_nulls {
            bits |= Self::NULLS_BIT;
        }
        if self.strip_empty {
            bits |= Self::EMPTY_BIT;
        }
        bits
    }

    /// Rebuilds a policy from [`CleanPolicy::bits`], rejecting unknown bits.
    pub fn from_bits(bits: u8) -> Result<Self, ConfigError> {
        if bits & !(Self::NULLS_BIT | Self::EMPTY_BIT) != 0 {
            return Err(ConfigError::InvalidPolicy { bits });
        }
        Ok(Self {
            strip_nulls: bits & Self::NULLS_BIT != 0,
            strip_empty: bits & Self::EMPTY_BIT != 0,
        })
    }

    /// True if an entry holding `value` must be removed under this policy.
    pub(crate) fn discards(&self, value: &Value) -> bool {
        (self.strip_nulls && value.is_null()) || (self.strip_empty && value.is_empty_container())
    }

    /// Returns `value` cleaned and in canonical form.
    ///
    /// Sub-trees that need no change are shared with the input rather than
    /// copied, and a container is only rebuilt once one of its entries
    /// changes. Surviving entries keep their keys, so dropping an item from
    /// the middle of a list leaves a map with a gap.
    pub(crate) fn clean(&self, value: &Value) -> Value {
        let Some(entries) = value.entries() else {
            return value.clone();
        };

        let mut rebuilt: Option<Map> = None;
        for (position, (key, entry)) in entries.enumerate() {
            let cleaned = self.clean(entry);
            let keep = !self.discards(&cleaned);
            if let Some(kept) = rebuilt.as_mut() {
                if keep {
                    kept.insert(key.into_owned(), cleaned);
                }
                continue;
            }
            if keep && (!entry.is_container() || cleaned.shares_storage(entry)) {
                continue;
            }

            // First change: copy the untouched prefix, then continue from here
            let mut kept: Map = value
                .entries()
                .unwrap_or_default()
                .take(position)
                .map(|(key, entry)| (key.into_owned(), entry.clone()))
                .collect();
            if keep {
                kept.insert(key.into_owned(), cleaned);
            }
            rebuilt = Some(kept);
        }

        match rebuilt {
            Some(kept) => value::from_entries(kept),
            None => value.clone().canonical(),
        }
    }
}

impl Default for CleanPolicy {
    fn default() -> Self {
        Self::STRIP_NULLS
    }
}

impl From<CleanPolicy> for u8 {
    fn from(policy: CleanPolicy) -> Self {
        policy.bits()
    }
}

impl TryFrom<u8> for CleanPolicy {
    type Error = ConfigError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}
