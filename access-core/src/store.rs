use crate::ids::{IdGenerator, MatchKey, PlaceId};
use crate::place::{AccessFeature, AccessValue, OverallRating, Place, Report, UserReport};
use crate::seed;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

pub const DEFAULT_CONFIDENCE: i32 = 50;
pub const DEFAULT_PLACE_NAME: &str = "Custom Place";

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// The report matched an existing place, which was replaced at `index`.
    Updated { id: PlaceId, index: usize },
    /// No place matched; a new one was put at the front of the list.
    Created { id: PlaceId },
}

impl SubmitOutcome {
    pub fn id(&self) -> &PlaceId {
        match self {
            SubmitOutcome::Updated { id, .. } | SubmitOutcome::Created { id } => id,
        }
    }
}

/// Authoritative in-memory list of places.
///
/// Every write publishes a fresh `Arc<Vec<Place>>`; snapshots handed out
/// earlier never change.
#[derive(Clone, Debug, Default)]
pub struct PlaceStore {
    places: Arc<Vec<Place>>,
    ids: IdGenerator,
}

impl PlaceStore {
    /// Builds a store from `places`. A place whose match key repeats an
    /// earlier one is dropped.
    pub fn new(places: Vec<Place>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(places.len());
        for place in places {
            if seen.insert(place.id.match_key()) {
                unique.push(place);
            } else {
                tracing::warn!(id = %place.id, "dropping place with duplicate id");
            }
        }

        Self {
            places: Arc::new(unique),
            ids: IdGenerator::new(),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed::sample_places())
    }

    pub fn places(&self) -> Arc<Vec<Place>> {
        Arc::clone(&self.places)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn position(&self, id: &PlaceId) -> Option<usize> {
        let key = id.match_key();
        self.places.iter().position(|p| p.id.match_key() == key)
    }

    pub fn get(&self, id: &PlaceId) -> Option<&Place> {
        self.position(id).map(|index| &self.places[index])
    }

    pub fn submit_report(&mut self, report: Report) -> SubmitOutcome {
        self.submit_report_at(report, Utc::now())
    }

    /// Merges `report` into the matching place, or creates a place from it.
    /// Never fails; missing data falls back to defaults.
    pub fn submit_report_at(&mut self, report: Report, at: DateTime<Utc>) -> SubmitOutcome {
        let target = report.place_id.clone().filter(|id| !id.is_blank());
        let index = target.as_ref().and_then(|id| self.position(id));
        let entry = UserReport::local(report.clone(), at);

        let mut next: Vec<Place> = Vec::with_capacity(self.places.len() + 1);
        let outcome = match index {
            Some(index) => {
                let updated = merge(&self.places[index], &report, entry);
                let id = updated.id.clone();
                next.extend(self.places.iter().cloned());
                next[index] = updated;
                SubmitOutcome::Updated { id, index }
            }
            None => {
                let id = match target {
                    Some(id) => id,
                    None => {
                        let places = &self.places;
                        self.ids.next_free(|key: &MatchKey| {
                            places.iter().any(|p| p.id.match_key() == *key)
                        })
                    }
                };
                next.push(create(id.clone(), &report, entry));
                next.extend(self.places.iter().cloned());
                SubmitOutcome::Created { id }
            }
        };

        self.places = Arc::new(next);
        match &outcome {
            SubmitOutcome::Updated { id, index } => tracing::info!(%id, index, "report merged"),
            SubmitOutcome::Created { id } => tracing::info!(%id, "place created from report"),
        }
        outcome
    }
}

fn overwrite<T: Clone>(slot: &mut T, incoming: Option<&T>) {
    if let Some(value) = incoming {
        *slot = value.clone();
    }
}

fn merge(existing: &Place, report: &Report, entry: UserReport) -> Place {
    let mut place = existing.clone();
    overwrite(&mut place.name, report.place_name.as_ref());
    overwrite(&mut place.address, report.address.as_ref());
    overwrite(&mut place.latitude, report.latitude.as_ref());
    overwrite(&mut place.longitude, report.longitude.as_ref());
    for feature in AccessFeature::ALL {
        overwrite(place.access_mut(feature), report.access(feature));
    }
    overwrite(&mut place.overall_rating, report.overall_rating.as_ref());
    overwrite(&mut place.confidence_score, report.confidence_score.as_ref());
    place.report_count += 1;
    place.user_reports.push(entry);
    place
}

fn create(id: PlaceId, report: &Report, entry: UserReport) -> Place {
    let access = |feature| report.access(feature).cloned().unwrap_or(AccessValue::Unknown);
    Place {
        id,
        name: report
            .place_name
            .clone()
            .unwrap_or_else(|| DEFAULT_PLACE_NAME.to_string()),
        address: report.address.clone().unwrap_or_default(),
        latitude: report.latitude.unwrap_or(0.0),
        longitude: report.longitude.unwrap_or(0.0),
        overall_rating: report
            .overall_rating
            .clone()
            .unwrap_or(OverallRating::Unknown),
        has_ramp: access(AccessFeature::Ramp),
        has_lift: access(AccessFeature::Lift),
        has_accessible_toilet: access(AccessFeature::Toilet),
        has_accessible_parking: access(AccessFeature::Parking),
        has_accessible_entrance: access(AccessFeature::Entrance),
        report_count: 1,
        verified: false,
        confidence_score: report.confidence_score.unwrap_or(DEFAULT_CONFIDENCE),
        user_reports: vec![entry],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).expect("timestamp")
    }

    fn ramp_place(id: &str, ramp: &str) -> Place {
        let mut place = seed::sample_places().remove(0);
        place.id = PlaceId::parse(id);
        place.has_ramp = AccessValue::from(ramp);
        place
    }

    #[test]
    fn supplied_field_overwrites_and_absent_field_keeps() {
        let mut store = PlaceStore::new(vec![ramp_place("a", "yes")]);

        store.submit_report_at(Report::for_place("a"), at());
        assert_eq!(store.places()[0].has_ramp, AccessValue::Yes);

        store.submit_report_at(
            Report {
                has_ramp: Some(AccessValue::No),
                ..Report::for_place("a")
            },
            at(),
        );
        assert_eq!(store.places()[0].has_ramp, AccessValue::No);
    }

    #[test]
    fn zero_coordinates_are_values_not_absence() {
        let mut store = PlaceStore::new(vec![ramp_place("a", "yes")]);
        store.submit_report_at(
            Report {
                latitude: Some(0.0),
                ..Report::for_place("a")
            },
            at(),
        );
        let place = &store.places()[0];
        assert_eq!(place.latitude, 0.0);
        assert_eq!(place.longitude, 77.5945);
    }

    #[test]
    fn synthetic_prefix_matches_both_ways() {
        let mut store = PlaceStore::new(vec![ramp_place("custom_42", "yes")]);

        let bare = store.submit_report_at(Report::for_place("42"), at());
        let prefixed = store.submit_report_at(Report::for_place("custom_42"), at());

        assert_eq!(bare, SubmitOutcome::Updated { id: PlaceId::Pending(42), index: 0 });
        assert_eq!(prefixed, SubmitOutcome::Updated { id: PlaceId::Pending(42), index: 0 });
        assert_eq!(store.len(), 1);
        assert_eq!(store.places()[0].user_reports.len(), 2);
    }

    #[test]
    fn unmatched_explicit_id_is_kept_for_new_place() {
        let mut store = PlaceStore::seeded();
        let outcome = store.submit_report_at(Report::for_place("osm-991"), at());
        assert_eq!(outcome, SubmitOutcome::Created { id: PlaceId::parse("osm-991") });
        assert_eq!(store.places()[0].id, PlaceId::parse("osm-991"));
    }

    #[test]
    fn generated_ids_never_collide_with_seeds() {
        let mut store = PlaceStore::seeded();
        let first = store.submit_report_at(Report::default(), at());
        let second = store.submit_report_at(Report::default(), at());

        assert_eq!(first.id(), &PlaceId::Pending(9));
        assert_eq!(second.id(), &PlaceId::Pending(10));
        assert_eq!(store.len(), 10);
    }

    #[test]
    fn blank_place_id_counts_as_absent() {
        let mut store = PlaceStore::seeded();
        let outcome = store.submit_report_at(Report::for_place("  "), at());
        assert!(outcome.id().is_pending());
    }

    #[test]
    fn old_snapshot_is_untouched_by_writes() {
        let mut store = PlaceStore::seeded();
        let before = store.places();
        store.submit_report_at(
            Report {
                overall_rating: Some(OverallRating::Accessible),
                ..Report::for_place(6u64)
            },
            at(),
        );
        assert_eq!(before[5].overall_rating, OverallRating::NotAccessible);
        assert_eq!(store.places()[5].overall_rating, OverallRating::Accessible);
    }

    #[test]
    fn duplicate_ids_are_dropped_on_construction() {
        let store = PlaceStore::new(vec![ramp_place("7", "yes"), ramp_place("custom_7", "no")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.places()[0].has_ramp, AccessValue::Yes);
    }
}
