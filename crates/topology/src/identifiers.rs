//! Stable, time-invariant identifiers for network entities.
//!
//! Identifiers are the only safe join key between snapshots. They use
//! `Arc<str>` so the many copies held by stations, codes and segments share
//! one allocation.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Debug)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(s.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        // Ordered so deltas and registries iterate deterministically.
        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.cmp(&other.0)
            }
        }

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::new(s))
            }
        }
    };
}

impl_identifier!(StationId);
impl_identifier!(LineId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_equality() {
        let id1 = StationId::new("bkp");
        let id2 = StationId::new("bkp");
        let id3 = id1.clone();

        assert_eq!(id1, id2);
        assert_eq!(id1, id3);
        assert!(Arc::ptr_eq(&id1.0, &id3.0)); // Clone shares Arc
    }

    #[test]
    fn test_identifier_hash() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(StationId::new("cth"), 42);

        assert_eq!(map.get(&StationId::new("cth")), Some(&42));
    }

    #[test]
    fn test_identifier_ordering() {
        let mut ids = vec![LineId::new("nsl"), LineId::new("bplrt"), LineId::new("dtl")];
        ids.sort();
        let names: Vec<_> = ids.iter().map(LineId::as_str).collect();
        assert_eq!(names, ["bplrt", "dtl", "nsl"]);
    }

    #[test]
    fn test_identifier_display() {
        let id = LineId::new("ewl");
        assert_eq!(format!("{}", id), "ewl");
    }

    #[test]
    fn test_identifier_serializes_as_plain_string() {
        let id = StationId::new("hvw");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"hvw\"");
        let back: StationId = serde_json::from_str("\"hvw\"").unwrap();
        assert_eq!(back, id);
    }
}
