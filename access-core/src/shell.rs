use crate::config::MapConfig;
use crate::geolocation::{FixSource, PositionFix};
use crate::ids::PlaceId;
use crate::place::{LatLng, Place, Report};
use crate::store::{PlaceStore, SubmitOutcome};
use crate::view::{self, MapEvent, MarkerDescriptor, ViewTarget};
use std::sync::Arc;

/// Currently highlighted place, if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection(Option<PlaceId>);

impl Selection {
    pub fn select(&mut self, id: impl Into<PlaceId>) {
        self.0 = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn id(&self) -> Option<&PlaceId> {
        self.0.as_ref()
    }
}

/// Everything the layout needs: places, selection, user location and the
/// open/closed flags of its panels.
#[derive(Clone, Debug)]
pub struct ShellState {
    store: PlaceStore,
    selection: Selection,
    user_location: Option<LatLng>,
    default_center: LatLng,
    config: MapConfig,
    pub sidebar_open: bool,
    pub report_form_open: bool,
}

impl ShellState {
    pub fn new(store: PlaceStore, config: MapConfig) -> Self {
        Self {
            store,
            selection: Selection::default(),
            user_location: None,
            default_center: config.center,
            config,
            sidebar_open: false,
            report_form_open: false,
        }
    }

    pub fn seeded(config: MapConfig) -> Self {
        Self::new(PlaceStore::seeded(), config)
    }

    pub fn places(&self) -> Arc<Vec<Place>> {
        self.store.places()
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn user_location(&self) -> Option<LatLng> {
        self.user_location
    }

    pub fn default_center(&self) -> LatLng {
        self.default_center
    }

    pub fn selected_id(&self) -> Option<&PlaceId> {
        self.selection.id()
    }

    /// Selected place as it is in the current snapshot.
    pub fn selected_place(&self) -> Option<Place> {
        self.selection.id().and_then(|id| self.store.get(id)).cloned()
    }

    pub fn select_place(&mut self, place_or_id: impl Into<PlaceId>) {
        self.selection.select(place_or_id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn on_place_select(&mut self, place_or_id: impl Into<PlaceId>) {
        self.select_place(place_or_id);
    }

    pub fn on_place_close(&mut self) {
        self.clear_selection();
    }

    /// Applies the report, then selects the affected place and closes the form.
    pub fn on_add_report(&mut self, report: Report) -> SubmitOutcome {
        let outcome = self.store.submit_report(report);
        self.selection.select(outcome.id());
        self.report_form_open = false;
        outcome
    }

    /// One-shot fixes also move the default center; watch fixes only move the
    /// user marker.
    pub fn on_position(&mut self, fix: PositionFix) {
        self.user_location = Some(fix.coords);
        if fix.source == FixSource::OneShot {
            self.default_center = fix.coords;
        }
    }

    pub fn on_map_click(&self, at: LatLng) {
        tracing::debug!(lat = at.lat, lng = at.lng, "map clicked");
    }

    pub fn on_map_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::MarkerClicked(id) => self.on_place_select(id),
            MapEvent::MapClicked(at) => self.on_map_click(at),
        }
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn open_report_form(&mut self) {
        self.report_form_open = true;
    }

    pub fn close_report_form(&mut self) {
        self.report_form_open = false;
    }

    pub fn markers(&self) -> Vec<MarkerDescriptor> {
        view::markers(&self.store.places())
    }

    pub fn view_target(&self) -> ViewTarget {
        view::resolve_view(
            &self.store.places(),
            self.selection.id(),
            self.user_location,
            self.default_center,
            &self.config,
        )
    }
}
