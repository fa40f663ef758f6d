use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Prefix carried by ids minted locally for places that have no backend id yet.
pub const SYNTHETIC_PREFIX: &str = "custom_";

/// Identity of a place.
///
/// `Existing` ids come from the seed set or any outside source and are kept
/// verbatim. `Pending` ids are minted by the store for user-created places and
/// render as `custom_<n>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlaceId {
    Existing(String),
    Pending(u64),
}

/// Canonical comparison form of a [`PlaceId`]: the id text without a leading
/// `custom_`. Two ids refer to the same place iff their keys are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey(String);

impl MatchKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PlaceId {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let pending = raw
            .strip_prefix(SYNTHETIC_PREFIX)
            .and_then(|digits| digits.parse::<u64>().ok().filter(|n| n.to_string() == digits));
        match pending {
            Some(n) => PlaceId::Pending(n),
            None => PlaceId::Existing(raw.to_string()),
        }
    }

    pub fn match_key(&self) -> MatchKey {
        match self {
            PlaceId::Existing(raw) => {
                MatchKey(raw.strip_prefix(SYNTHETIC_PREFIX).unwrap_or(raw).to_string())
            }
            PlaceId::Pending(n) => MatchKey(n.to_string()),
        }
    }

    pub fn matches(&self, other: &PlaceId) -> bool {
        self.match_key() == other.match_key()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, PlaceId::Pending(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, PlaceId::Existing(raw) if raw.trim().is_empty())
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceId::Existing(raw) => f.write_str(raw),
            PlaceId::Pending(n) => write!(f, "{SYNTHETIC_PREFIX}{n}"),
        }
    }
}

impl From<&str> for PlaceId {
    fn from(raw: &str) -> Self {
        PlaceId::parse(raw)
    }
}

impl From<String> for PlaceId {
    fn from(raw: String) -> Self {
        PlaceId::parse(&raw)
    }
}

impl From<u64> for PlaceId {
    fn from(n: u64) -> Self {
        PlaceId::Existing(n.to_string())
    }
}

impl From<&PlaceId> for PlaceId {
    fn from(id: &PlaceId) -> Self {
        id.clone()
    }
}

impl Serialize for PlaceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct PlaceIdVisitor;

impl Visitor<'_> for PlaceIdVisitor {
    type Value = PlaceId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a place id as a string or an integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<PlaceId, E> {
        Ok(PlaceId::parse(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<PlaceId, E> {
        Ok(PlaceId::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<PlaceId, E> {
        Ok(PlaceId::Existing(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for PlaceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PlaceIdVisitor)
    }
}

/// Monotonic source of `Pending` ids.
#[derive(Clone, Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next pending id whose match key is not `taken`. Skipped values are
    /// never reissued.
    pub fn next_free(&mut self, taken: impl Fn(&MatchKey) -> bool) -> PlaceId {
        loop {
            self.last += 1;
            let id = PlaceId::Pending(self.last);
            if !taken(&id.match_key()) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recognizes_synthetic_ids() {
        assert_eq!(PlaceId::parse("custom_42"), PlaceId::Pending(42));
        assert_eq!(PlaceId::parse("42"), PlaceId::Existing("42".into()));
        assert_eq!(
            PlaceId::parse("custom_cafe"),
            PlaceId::Existing("custom_cafe".into())
        );
        // non-canonical digits stay verbatim so display round-trips
        assert_eq!(
            PlaceId::parse("custom_007"),
            PlaceId::Existing("custom_007".into())
        );
    }

    #[test]
    fn prefixed_and_bare_forms_share_a_key() {
        let synthetic = PlaceId::parse("custom_42");
        assert!(synthetic.matches(&PlaceId::parse("42")));
        assert!(PlaceId::parse("42").matches(&synthetic));
        assert!(!synthetic.matches(&PlaceId::parse("4")));
    }

    #[test]
    fn serializes_as_display_text() {
        assert_eq!(
            serde_json::to_string(&PlaceId::Pending(3)).expect("json"),
            "\"custom_3\""
        );
        assert_eq!(
            serde_json::to_string(&PlaceId::from(6)).expect("json"),
            "\"6\""
        );
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let from_num: PlaceId = serde_json::from_str("6").expect("number");
        let from_str: PlaceId = serde_json::from_str("\"custom_9\"").expect("string");
        assert_eq!(from_num, PlaceId::Existing("6".into()));
        assert_eq!(from_str, PlaceId::Pending(9));
    }

    #[test]
    fn generator_skips_taken_keys() {
        let mut ids = IdGenerator::new();
        let taken = |key: &MatchKey| matches!(key.as_str(), "1" | "2");
        assert_eq!(ids.next_free(taken), PlaceId::Pending(3));
        assert_eq!(ids.next_free(taken), PlaceId::Pending(4));
    }
}
