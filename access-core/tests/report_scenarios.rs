use access_core::{AccessValue, OverallRating, PlaceId, PlaceStore, Report, SubmitOutcome};

#[test]
fn cathedral_report_updates_in_place() {
    let mut store = PlaceStore::seeded();
    let order_before: Vec<PlaceId> = store.places().iter().map(|p| p.id.clone()).collect();

    let outcome = store.submit_report(Report {
        overall_rating: Some(OverallRating::Accessible),
        has_ramp: Some(AccessValue::Yes),
        ..Report::for_place(6u64)
    });

    assert_eq!(outcome, SubmitOutcome::Updated { id: PlaceId::from(6), index: 5 });

    let places = store.places();
    let order_after: Vec<PlaceId> = places.iter().map(|p| p.id.clone()).collect();
    assert_eq!(order_before, order_after);

    let cathedral = &places[5];
    assert_eq!(cathedral.name, "St. Mark's Cathedral");
    assert_eq!(cathedral.overall_rating, OverallRating::Accessible);
    assert_eq!(cathedral.has_ramp, AccessValue::Yes);
    assert_eq!(cathedral.has_lift, AccessValue::No);
    assert_eq!(cathedral.report_count, 2);
    assert_eq!(cathedral.user_reports.len(), 1);
    assert_eq!(cathedral.user_reports[0].created_by, "you");
    assert!(cathedral.verified);
}

#[test]
fn report_without_id_prepends_new_place() {
    let mut store = PlaceStore::seeded();

    let outcome = store.submit_report(Report {
        place_name: Some("New Cafe".into()),
        latitude: Some(12.9),
        longitude: Some(77.6),
        ..Report::default()
    });

    let places = store.places();
    assert_eq!(places.len(), 9);

    let cafe = &places[0];
    assert_eq!(&cafe.id, outcome.id());
    assert!(cafe.id.is_pending());
    assert_eq!(
        places.iter().filter(|p| p.id.matches(&cafe.id)).count(),
        1,
        "generated id must be unique"
    );
    assert_eq!(cafe.name, "New Cafe");
    assert_eq!(cafe.address, "");
    assert_eq!((cafe.latitude, cafe.longitude), (12.9, 77.6));
    assert_eq!(cafe.overall_rating, OverallRating::Unknown);
    assert_eq!(cafe.has_accessible_toilet, AccessValue::Unknown);
    assert_eq!(cafe.confidence_score, 50);
    assert_eq!(cafe.report_count, 1);
    assert!(!cafe.verified);
    assert_eq!(cafe.user_reports.len(), 1);
    assert_eq!(places[1].id, PlaceId::from(1));
}

#[test]
fn follow_up_report_on_created_place_matches_by_bare_number() {
    let mut store = PlaceStore::seeded();
    let created = store.submit_report(Report::default());
    let PlaceId::Pending(n) = created.id().clone() else {
        panic!("expected a synthetic id, got {created:?}");
    };

    let outcome = store.submit_report(Report {
        has_lift: Some(AccessValue::Yes),
        ..Report::for_place(n.to_string())
    });

    assert_eq!(outcome, SubmitOutcome::Updated { id: PlaceId::Pending(n), index: 0 });
    assert_eq!(store.places()[0].report_count, 2);
    assert_eq!(store.places()[0].has_lift, AccessValue::Yes);
}

#[test]
fn same_report_twice_is_not_deduplicated() {
    let mut store = PlaceStore::seeded();
    let report = Report {
        has_lift: Some(AccessValue::Yes),
        ..Report::for_place(4u64)
    };

    store.submit_report(report.clone());
    store.submit_report(report);

    let place = store.get(&PlaceId::from(4)).expect("seeded place");
    assert_eq!(place.report_count, 4);
    assert_eq!(place.user_reports.len(), 2);
}

#[test]
fn report_json_from_form_shape() {
    let report: Report = serde_json::from_value(serde_json::json!({
        "place_id": 6,
        "overall_rating": "accessible",
        "has_ramp": "yes"
    }))
    .expect("report");

    let mut store = PlaceStore::seeded();
    let outcome = store.submit_report(report);
    assert_eq!(outcome.id(), &PlaceId::from(6));
}
