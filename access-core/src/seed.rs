use crate::ids::PlaceId;
use crate::place::{AccessValue, OverallRating, Place};

/// Sample places around Bengaluru that every session starts from.
pub fn sample_places() -> Vec<Place> {
    vec![
        sample(
            1,
            "Bangalore Central Library",
            "Cubbon Park, Bangalore, Karnataka 560001",
            (12.9352, 77.5945),
            "accessible",
            ["yes", "yes", "yes", "yes", "yes"],
            (5, true, 85),
        ),
        sample(
            2,
            "Forum Mall Bangalore",
            "Koramangala, Bangalore, Karnataka 560034",
            (12.9352, 77.6245),
            "partially_accessible",
            ["yes", "yes", "yes", "yes", "no"],
            (3, true, 72),
        ),
        sample(
            3,
            "Vidhana Soudha",
            "Vidhan Bhavan, Bangalore, Karnataka 560001",
            (12.9320, 77.5892),
            "accessible",
            ["yes", "yes", "yes", "yes", "yes"],
            (7, true, 92),
        ),
        sample(
            4,
            "Indira Gandhi Rashtriya Manav Sangrahalaya",
            "Vasantkunj, Bangalore, Karnataka 560001",
            (12.9698, 77.5902),
            "partially_accessible",
            ["yes", "no", "yes", "yes", "yes"],
            (2, false, 65),
        ),
        sample(
            5,
            "Bangalore International Airport",
            "Devanahalli, Bangalore, Karnataka 560008",
            (13.1979, 77.7064),
            "accessible",
            ["yes", "yes", "yes", "yes", "yes"],
            (9, true, 95),
        ),
        sample(
            6,
            "St. Mark's Cathedral",
            "Whitefield, Bangalore, Karnataka 560066",
            (12.9716, 77.7404),
            "not_accessible",
            ["no", "no", "no", "no", "no"],
            (1, true, 50),
        ),
        sample(
            7,
            "Lal Bagh Botanical Garden",
            "Lal Bagh Road, Bangalore, Karnataka 560004",
            (12.9450, 77.5850),
            "partially_accessible",
            ["yes", "unknown", "yes", "yes", "yes"],
            (4, true, 78),
        ),
        sample(
            8,
            "Bangalore Metro Station - MG Road",
            "MG Road, Bangalore, Karnataka 560001",
            (12.9352, 77.6021),
            "accessible",
            ["yes", "yes", "yes", "yes", "yes"],
            (6, true, 88),
        ),
    ]
}

// access order: ramp, lift, toilet, parking, entrance
fn sample(
    id: u64,
    name: &str,
    address: &str,
    (latitude, longitude): (f64, f64),
    rating: &str,
    access: [&str; 5],
    (report_count, verified, confidence_score): (u32, bool, i32),
) -> Place {
    let [ramp, lift, toilet, parking, entrance] = access.map(AccessValue::from);
    Place {
        id: PlaceId::from(id),
        name: name.to_string(),
        address: address.to_string(),
        latitude,
        longitude,
        overall_rating: OverallRating::from(rating),
        has_ramp: ramp,
        has_lift: lift,
        has_accessible_toilet: toilet,
        has_accessible_parking: parking,
        has_accessible_entrance: entrance,
        report_count,
        verified,
        confidence_score,
        user_reports: Vec::new(),
    }
}
