use crate::ids::PlaceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Submitter marker for reports made in this browser session.
pub const LOCAL_USER: &str = "you";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Answer to a single accessibility question. Unrecognized text is kept as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccessValue {
    Yes,
    No,
    #[default]
    Unknown,
    Other(String),
}

impl AccessValue {
    pub fn as_str(&self) -> &str {
        match self {
            AccessValue::Yes => "yes",
            AccessValue::No => "no",
            AccessValue::Unknown => "unknown",
            AccessValue::Other(raw) => raw,
        }
    }
}

impl From<&str> for AccessValue {
    fn from(raw: &str) -> Self {
        match raw {
            "yes" => AccessValue::Yes,
            "no" => AccessValue::No,
            "unknown" => AccessValue::Unknown,
            other => AccessValue::Other(other.to_string()),
        }
    }
}

impl From<String> for AccessValue {
    fn from(raw: String) -> Self {
        AccessValue::from(raw.as_str())
    }
}

impl From<AccessValue> for String {
    fn from(value: AccessValue) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AccessValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary judgment for a place. Supplied by reports, never derived from the
/// individual access fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OverallRating {
    Accessible,
    PartiallyAccessible,
    NotAccessible,
    #[default]
    Unknown,
    Other(String),
}

impl OverallRating {
    pub const KNOWN: [OverallRating; 4] = [
        OverallRating::Accessible,
        OverallRating::PartiallyAccessible,
        OverallRating::NotAccessible,
        OverallRating::Unknown,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            OverallRating::Accessible => "accessible",
            OverallRating::PartiallyAccessible => "partially_accessible",
            OverallRating::NotAccessible => "not_accessible",
            OverallRating::Unknown => "unknown",
            OverallRating::Other(raw) => raw,
        }
    }

    /// Human label: the first underscore becomes a space.
    pub fn label(&self) -> String {
        self.as_str().replacen('_', " ", 1)
    }
}

impl From<&str> for OverallRating {
    fn from(raw: &str) -> Self {
        match raw {
            "accessible" => OverallRating::Accessible,
            "partially_accessible" => OverallRating::PartiallyAccessible,
            "not_accessible" => OverallRating::NotAccessible,
            "unknown" => OverallRating::Unknown,
            other => OverallRating::Other(other.to_string()),
        }
    }
}

impl From<String> for OverallRating {
    fn from(raw: String) -> Self {
        OverallRating::from(raw.as_str())
    }
}

impl From<OverallRating> for String {
    fn from(rating: OverallRating) -> Self {
        rating.as_str().to_string()
    }
}

impl fmt::Display for OverallRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five tracked accessibility questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessFeature {
    Ramp,
    Lift,
    Toilet,
    Parking,
    Entrance,
}

impl AccessFeature {
    pub const ALL: [AccessFeature; 5] = [
        AccessFeature::Ramp,
        AccessFeature::Lift,
        AccessFeature::Toilet,
        AccessFeature::Parking,
        AccessFeature::Entrance,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            AccessFeature::Ramp => "has_ramp",
            AccessFeature::Lift => "has_lift",
            AccessFeature::Toilet => "has_accessible_toilet",
            AccessFeature::Parking => "has_accessible_parking",
            AccessFeature::Entrance => "has_accessible_entrance",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AccessFeature::Ramp => "Ramp",
            AccessFeature::Lift => "Lift / Elevator",
            AccessFeature::Toilet => "Accessible toilet",
            AccessFeature::Parking => "Accessible parking",
            AccessFeature::Entrance => "Accessible entrance",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub overall_rating: OverallRating,
    pub has_ramp: AccessValue,
    pub has_lift: AccessValue,
    pub has_accessible_toilet: AccessValue,
    pub has_accessible_parking: AccessValue,
    pub has_accessible_entrance: AccessValue,
    #[serde(rename = "reportCount")]
    pub report_count: u32,
    pub verified: bool,
    pub confidence_score: i32,
    #[serde(rename = "userReports", default)]
    pub user_reports: Vec<UserReport>,
}

impl Place {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    pub fn access(&self, feature: AccessFeature) -> &AccessValue {
        match feature {
            AccessFeature::Ramp => &self.has_ramp,
            AccessFeature::Lift => &self.has_lift,
            AccessFeature::Toilet => &self.has_accessible_toilet,
            AccessFeature::Parking => &self.has_accessible_parking,
            AccessFeature::Entrance => &self.has_accessible_entrance,
        }
    }

    pub fn access_mut(&mut self, feature: AccessFeature) -> &mut AccessValue {
        match feature {
            AccessFeature::Ramp => &mut self.has_ramp,
            AccessFeature::Lift => &mut self.has_lift,
            AccessFeature::Toilet => &mut self.has_accessible_toilet,
            AccessFeature::Parking => &mut self.has_accessible_parking,
            AccessFeature::Entrance => &mut self.has_accessible_entrance,
        }
    }
}

impl From<&Place> for PlaceId {
    fn from(place: &Place) -> Self {
        place.id.clone()
    }
}

/// One accessibility observation. Every field is optional; `None` means the
/// submitter said nothing about it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<PlaceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_ramp: Option<AccessValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_lift: Option<AccessValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_accessible_toilet: Option<AccessValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_accessible_parking: Option<AccessValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_accessible_entrance: Option<AccessValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_rating: Option<OverallRating>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<i32>,
}

impl Report {
    pub fn for_place(id: impl Into<PlaceId>) -> Self {
        Self {
            place_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn access(&self, feature: AccessFeature) -> Option<&AccessValue> {
        match feature {
            AccessFeature::Ramp => self.has_ramp.as_ref(),
            AccessFeature::Lift => self.has_lift.as_ref(),
            AccessFeature::Toilet => self.has_accessible_toilet.as_ref(),
            AccessFeature::Parking => self.has_accessible_parking.as_ref(),
            AccessFeature::Entrance => self.has_accessible_entrance.as_ref(),
        }
    }

    pub fn set_access(&mut self, feature: AccessFeature, value: Option<AccessValue>) {
        let slot = match feature {
            AccessFeature::Ramp => &mut self.has_ramp,
            AccessFeature::Lift => &mut self.has_lift,
            AccessFeature::Toilet => &mut self.has_accessible_toilet,
            AccessFeature::Parking => &mut self.has_accessible_parking,
            AccessFeature::Entrance => &mut self.has_accessible_entrance,
        };
        *slot = value;
    }
}

/// A report as recorded on a place, stamped at submission time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserReport {
    #[serde(flatten)]
    pub report: Report,
    pub created_date: DateTime<Utc>,
    pub created_by: String,
}

impl UserReport {
    pub fn local(report: Report, created_date: DateTime<Utc>) -> Self {
        Self {
            report,
            created_date,
            created_by: LOCAL_USER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_enumerations_pass_through() {
        let report: Report = serde_json::from_value(serde_json::json!({
            "has_ramp": "sometimes",
            "overall_rating": "wheelchair_friendly"
        }))
        .expect("report");

        assert_eq!(report.has_ramp, Some(AccessValue::Other("sometimes".into())));
        assert_eq!(
            serde_json::to_value(&report).expect("json")["overall_rating"],
            "wheelchair_friendly"
        );
    }

    #[test]
    fn rating_label_replaces_first_underscore() {
        assert_eq!(OverallRating::PartiallyAccessible.label(), "partially accessible");
        assert_eq!(OverallRating::from("a_b_c").label(), "a b_c");
    }

    #[test]
    fn place_uses_camel_case_provenance_keys() {
        let place: Place = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Vidhana Soudha",
            "address": "Bangalore",
            "latitude": 12.932,
            "longitude": 77.5892,
            "overall_rating": "accessible",
            "has_ramp": "yes",
            "has_lift": "yes",
            "has_accessible_toilet": "yes",
            "has_accessible_parking": "yes",
            "has_accessible_entrance": "yes",
            "reportCount": 7,
            "verified": true,
            "confidence_score": 92
        }))
        .expect("place");

        assert_eq!(place.id, PlaceId::from(3));
        assert_eq!(place.report_count, 7);
        assert!(place.user_reports.is_empty());
        assert_eq!(place.access(AccessFeature::Lift), &AccessValue::Yes);
    }

    #[test]
    fn user_report_flattens_submission_fields() {
        let stamped = UserReport::local(
            Report {
                has_lift: Some(AccessValue::No),
                ..Report::for_place("custom_4")
            },
            DateTime::<Utc>::from_timestamp(1_700_000_000, 0).expect("timestamp"),
        );
        let json = serde_json::to_value(&stamped).expect("json");
        assert_eq!(json["place_id"], "custom_4");
        assert_eq!(json["has_lift"], "no");
        assert_eq!(json["created_by"], "you");
        assert!(json.get("has_ramp").is_none());
    }
}
