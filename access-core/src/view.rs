//! What the map surface needs to draw: marker styling, popup text, and where
//! the camera should point.

use crate::config::MapConfig;
use crate::ids::PlaceId;
use crate::place::{LatLng, OverallRating, Place};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerStyle {
    pub color: &'static str,
    pub glyph: &'static str,
}

pub fn marker_style(rating: &OverallRating) -> MarkerStyle {
    match rating {
        OverallRating::Accessible => MarkerStyle { color: "#10b981", glyph: "✓" },
        OverallRating::PartiallyAccessible => MarkerStyle { color: "#f59e0b", glyph: "~" },
        OverallRating::NotAccessible => MarkerStyle { color: "#ef4444", glyph: "✗" },
        OverallRating::Unknown | OverallRating::Other(_) => {
            MarkerStyle { color: "#9ca3af", glyph: "?" }
        }
    }
}

pub const USER_LOCATION_COLOR: &str = "#3b82f6";

#[derive(Clone, Debug, PartialEq)]
pub struct PopupContent {
    pub name: String,
    pub address: String,
    pub rating_label: String,
    pub color: &'static str,
    /// `None` when the place has no reports.
    pub reports: Option<String>,
}

pub fn report_summary(count: u32) -> Option<String> {
    match count {
        0 => None,
        1 => Some("1 user report".into()),
        n => Some(format!("{n} user reports")),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MarkerDescriptor {
    pub id: PlaceId,
    pub position: LatLng,
    pub style: MarkerStyle,
    pub aria_label: String,
    pub popup: PopupContent,
}

impl MarkerDescriptor {
    pub fn for_place(place: &Place) -> Self {
        let style = marker_style(&place.overall_rating);
        let rating_label = place.overall_rating.label();
        Self {
            id: place.id.clone(),
            position: place.position(),
            style,
            aria_label: format!("{}, {}", place.name, rating_label),
            popup: PopupContent {
                name: place.name.clone(),
                address: place.address.clone(),
                rating_label,
                color: style.color,
                reports: report_summary(place.report_count),
            },
        }
    }
}

pub fn markers(places: &[Place]) -> Vec<MarkerDescriptor> {
    places.iter().map(MarkerDescriptor::for_place).collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTarget {
    pub center: LatLng,
    pub zoom: u8,
    pub animate: bool,
}

/// Selected place first, then the user's location, then the static center.
pub fn resolve_view(
    places: &[Place],
    selected: Option<&PlaceId>,
    user_location: Option<LatLng>,
    default_center: LatLng,
    config: &MapConfig,
) -> ViewTarget {
    let selected_place = selected.and_then(|id| places.iter().find(|p| p.id.matches(id)));
    if let Some(place) = selected_place {
        return ViewTarget {
            center: place.position(),
            zoom: config.zoom.max(config.selected_min_zoom),
            animate: true,
        };
    }

    if let Some(location) = user_location {
        return ViewTarget {
            center: location,
            zoom: config.zoom.max(config.user_location_min_zoom),
            animate: true,
        };
    }

    ViewTarget {
        center: default_center,
        zoom: config.zoom,
        animate: false,
    }
}

/// Input coming back from the map surface.
#[derive(Clone, Debug, PartialEq)]
pub enum MapEvent {
    MarkerClicked(PlaceId),
    MapClicked(LatLng),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_places;

    #[test]
    fn unknown_and_unrecognized_ratings_are_gray() {
        let gray = MarkerStyle { color: "#9ca3af", glyph: "?" };
        assert_eq!(marker_style(&OverallRating::Unknown), gray);
        assert_eq!(marker_style(&OverallRating::from("closed")), gray);
        assert_eq!(marker_style(&OverallRating::NotAccessible).glyph, "✗");
    }

    #[test]
    fn popup_pluralizes_report_count() {
        let places = sample_places();
        let markers = markers(&places);
        assert_eq!(markers.len(), places.len());
        assert_eq!(markers[5].popup.reports.as_deref(), Some("1 user report"));
        assert_eq!(markers[0].popup.reports.as_deref(), Some("5 user reports"));
        assert_eq!(markers[1].aria_label, "Forum Mall Bangalore, partially accessible");
        assert_eq!(report_summary(0), None);
    }

    #[test]
    fn selection_wins_over_user_location() {
        let places = sample_places();
        let config = MapConfig::default();
        let user = LatLng::new(1.0, 2.0);

        let target = resolve_view(&places, Some(&PlaceId::from(5)), Some(user), config.center, &config);
        assert_eq!(target.center, LatLng::new(13.1979, 77.7064));
        assert_eq!(target.zoom, 17);
        assert!(target.animate);

        let target = resolve_view(&places, None, Some(user), config.center, &config);
        assert_eq!(target.center, user);
        assert_eq!(target.zoom, 15);
    }

    #[test]
    fn falls_back_to_static_center_without_animation() {
        let places = sample_places();
        let config = MapConfig { zoom: 18, ..MapConfig::default() };
        let target = resolve_view(&places, Some(&PlaceId::from(404)), None, config.center, &config);
        assert_eq!(
            target,
            ViewTarget { center: config.center, zoom: 18, animate: false }
        );
    }
}
