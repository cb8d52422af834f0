use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Numeric identifier of an object that owns meta entries.
///
/// Content objects and classification objects live in separate id spaces;
/// an `ObjectId` only means something together with the kind family it was
/// resolved against. Zero is never a valid object and stands for "missing".
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(u64);

impl ObjectId {
    /// The missing object id.
    pub const fn none() -> Self {
        Self(0)
    }

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns `true` if this id does not name an object.
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Parse a route segment, falling back to [`ObjectId::none`] for anything
    /// that is not a plain decimal number.
    pub fn from_segment(segment: &str) -> Self {
        segment.parse().unwrap_or_default()
    }
}

impl FromStr for ObjectId {
    type Err = TypeError;

    /// Strict parse: digits only, no sign, no surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypeError::InvalidObjectId(s.to_string()));
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| TypeError::InvalidObjectId(s.to_string()))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_digits() {
        assert_eq!("57244".parse::<ObjectId>().unwrap(), ObjectId::new(57244));
    }

    #[test]
    fn parse_rejects_non_digits() {
        assert!("".parse::<ObjectId>().is_err());
        assert!("-3".parse::<ObjectId>().is_err());
        assert!("+3".parse::<ObjectId>().is_err());
        assert!("12a".parse::<ObjectId>().is_err());
        assert!(" 12".parse::<ObjectId>().is_err());
    }

    #[test]
    fn parse_rejects_overflow() {
        assert!("99999999999999999999999".parse::<ObjectId>().is_err());
    }

    #[test]
    fn segment_falls_back_to_none() {
        assert!(ObjectId::from_segment("meta").is_none());
        assert!(ObjectId::from_segment("").is_none());
        assert_eq!(ObjectId::from_segment("7"), ObjectId::new(7));
    }

    #[test]
    fn serde_is_a_plain_number() {
        let json = serde_json::to_string(&ObjectId::new(42)).unwrap();
        assert_eq!(json, "42");
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(), 42);
    }
}
