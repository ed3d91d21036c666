// ABOUTME: Phantom-typed identifiers for compile-time type safety.
// ABOUTME: Prevents accidental swapping of distribution IDs, origin IDs, and version tags.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
/// Using empty enums prevents instantiation and requires no trait bounds.
pub enum DistributionMarker {}
pub enum OriginMarker {}
pub enum VersionTagMarker {}

/// A type-safe identifier that prevents accidental mixing of different ID types.
///
/// A `VersionTag` is opaque provider data just like a `DistributionId`, but
/// passing one where the other is expected is always a bug.
#[must_use = "IDs reference provider resources and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

// T is only a marker, so these impls must not require T: Trait.

impl<T> std::fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

pub type DistributionId = Id<DistributionMarker>;
pub type OriginId = Id<OriginMarker>;
pub type VersionTag = Id<VersionTagMarker>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(VersionTag::new("E2QWRUHEXAMPLE"), VersionTag::new("E2QWRUHEXAMPLE"));
        assert_ne!(VersionTag::new("T1"), VersionTag::new("T2"));
    }

    #[test]
    fn ids_deserialize_from_plain_strings() {
        let map: HashMap<String, DistributionId> =
            serde_json::from_str(r#"{"prod": "E1ABCDEF"}"#).unwrap();
        assert_eq!(map["prod"].as_str(), "E1ABCDEF");
    }
}
