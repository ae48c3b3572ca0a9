use std::fmt;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// One entry in the reference taxonomy: a canonical name and its catalog id.
///
/// Extra fields in the source record (abbreviation, generation, ...) are
/// ignored on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub id: i64,
    pub name: String,
}

/// A metadata-catalog search hit being evaluated as a match for a title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: i64,
    pub name: String,
    /// Catalog payload (summary, genres, platforms, release date, ...)
    /// carried through untouched.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// One unit of catalog-resolution work: a title, its alternate titles, and
/// the candidate hits already fetched for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateQuery {
    pub title: String,
    #[serde(default)]
    pub alternate_titles: Vec<String>,
    #[serde(default)]
    pub candidates: Vec<CandidateRecord>,
}

/// A matched identifier, or the `"no-match"` sentinel collaborators expect
/// on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Matched(i64),
    NoMatch,
}

impl Resolution {
    pub fn id(self) -> Option<i64> {
        match self {
            Resolution::Matched(id) => Some(id),
            Resolution::NoMatch => None,
        }
    }

    pub fn is_match(self) -> bool {
        matches!(self, Resolution::Matched(_))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Matched(id) => write!(f, "{id}"),
            Resolution::NoMatch => f.write_str("no-match"),
        }
    }
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Resolution::Matched(id) => serializer.serialize_i64(*id),
            Resolution::NoMatch => serializer.serialize_str("no-match"),
        }
    }
}

impl<'de> Deserialize<'de> for Resolution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Id(i64),
            Sentinel(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Id(id) => Ok(Resolution::Matched(id)),
            Raw::Sentinel(s) if s == "no-match" => Ok(Resolution::NoMatch),
            Raw::Sentinel(other) => Err(D::Error::custom(format!(
                "expected an id or \"no-match\", got \"{other}\""
            ))),
        }
    }
}

/// Output of one resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched_id: Resolution,
    pub score: f64,
    /// The opposing string that produced the winning score: the best
    /// reference's canonical name, or the winning query variant.
    pub evaluated_against: String,
}

impl MatchResult {
    pub fn no_match() -> Self {
        Self {
            matched_id: Resolution::NoMatch,
            score: 0.0,
            evaluated_against: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolution_serializes_id_or_sentinel() {
        assert_eq!(serde_json::to_value(Resolution::Matched(42)).unwrap(), json!(42));
        assert_eq!(
            serde_json::to_value(Resolution::NoMatch).unwrap(),
            json!("no-match")
        );
    }

    #[test]
    fn resolution_round_trips() {
        let matched: Resolution = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(matched, Resolution::Matched(7));
        let rejected: Resolution = serde_json::from_value(json!("no-match")).unwrap();
        assert_eq!(rejected, Resolution::NoMatch);
        assert!(serde_json::from_value::<Resolution>(json!("maybe")).is_err());
    }

    #[test]
    fn candidate_record_keeps_extra_fields() {
        let record: CandidateRecord = serde_json::from_value(json!({
            "id": 375,
            "name": "Snake Eater",
            "summary": "stealth",
            "platforms": [8]
        }))
        .unwrap();
        assert_eq!(record.id, 375);
        assert_eq!(record.attributes["summary"], json!("stealth"));
        assert_eq!(record.attributes["platforms"], json!([8]));
    }

    #[test]
    fn reference_entry_ignores_unknown_fields() {
        let entry: ReferenceEntry = serde_json::from_value(json!({
            "id": 5,
            "name": "Wii",
            "abbreviation": "wii",
            "generation": 7
        }))
        .unwrap();
        assert_eq!(entry, ReferenceEntry { id: 5, name: "Wii".into() });
    }
}
