use access_core::{AccessFeature, AccessValue, OverallRating, PlaceId, Report};
use serde::{Deserialize, Serialize};

/// Raw values of the report form, exactly as typed or picked.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportForm {
    pub place_id: String,
    pub place_name: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
    pub has_ramp: String,
    pub has_lift: String,
    pub has_accessible_toilet: String,
    pub has_accessible_parking: String,
    pub has_accessible_entrance: String,
    pub overall_rating: String,
    pub confidence_score: String,
}

/// A field that held text but could not be used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedField {
    pub field: &'static str,
    pub raw: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    pub report: Report,
    pub dropped: Vec<DroppedField>,
}

fn text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn number<T: std::str::FromStr>(
    field: &'static str,
    raw: &str,
    dropped: &mut Vec<DroppedField>,
) -> Option<T> {
    let value = text(raw)?;
    match value.parse::<T>() {
        Ok(n) => Some(n),
        Err(_) => {
            dropped.push(DroppedField { field, raw: value });
            None
        }
    }
}

impl ReportForm {
    /// Starts a form for an existing place.
    pub fn for_place(id: &PlaceId) -> Self {
        Self {
            place_id: id.to_string(),
            ..Self::default()
        }
    }

    pub fn access(&self, feature: AccessFeature) -> &str {
        match feature {
            AccessFeature::Ramp => &self.has_ramp,
            AccessFeature::Lift => &self.has_lift,
            AccessFeature::Toilet => &self.has_accessible_toilet,
            AccessFeature::Parking => &self.has_accessible_parking,
            AccessFeature::Entrance => &self.has_accessible_entrance,
        }
    }

    pub fn set_access(&mut self, feature: AccessFeature, value: impl Into<String>) {
        let slot = match feature {
            AccessFeature::Ramp => &mut self.has_ramp,
            AccessFeature::Lift => &mut self.has_lift,
            AccessFeature::Toilet => &mut self.has_accessible_toilet,
            AccessFeature::Parking => &mut self.has_accessible_parking,
            AccessFeature::Entrance => &mut self.has_accessible_entrance,
        };
        *slot = value.into();
    }

    /// Blank fields become absent. Numbers that do not parse are dropped and
    /// listed; nothing is rejected.
    pub fn normalize(&self) -> Normalized {
        let mut dropped = Vec::new();
        let mut report = Report {
            place_id: text(&self.place_id).map(PlaceId::from),
            place_name: text(&self.place_name),
            address: text(&self.address),
            latitude: number("latitude", &self.latitude, &mut dropped),
            longitude: number("longitude", &self.longitude, &mut dropped),
            overall_rating: text(&self.overall_rating).map(OverallRating::from),
            confidence_score: number("confidence_score", &self.confidence_score, &mut dropped),
            ..Report::default()
        };
        for feature in AccessFeature::ALL {
            report.set_access(feature, text(self.access(feature)).map(AccessValue::from));
        }

        for field in &dropped {
            tracing::debug!(field = field.field, raw = %field.raw, "dropping unparsable form field");
        }
        Normalized { report, dropped }
    }

    pub fn into_report(self) -> Report {
        self.normalize().report
    }
}
