use crate::leaflet::LeafletMap;
use access_core::config::MapConfig;
use access_core::view::{self, ViewTarget};
use access_core::{LatLng, Place, PlaceId};
use leptos::*;
use std::sync::Arc;

/// The map surface: one marker per place, the user marker, and camera moves
/// driven by `view_target`.
#[component]
pub fn MapView(
    #[prop(into)] places: Signal<Arc<Vec<Place>>>,
    #[prop(into)] view_target: Signal<ViewTarget>,
    #[prop(into)] user_location: Signal<Option<LatLng>>,
    config: MapConfig,
    #[prop(into)] on_place_click: Callback<PlaceId>,
    #[prop(into)] on_map_click: Callback<LatLng>,
) -> impl IntoView {
    let container = create_node_ref::<html::Div>();
    let map = store_value(None::<LeafletMap>);
    let mounted = create_rw_signal(false);

    container.on_load(move |div| {
        // wait one frame so the container is attached and has a size
        request_animation_frame(move || {
            let element: &web_sys::HtmlElement = &div;
            match LeafletMap::mount(element, &config) {
                Ok(mut leaflet) => {
                    if let Err(err) = leaflet.invalidate_size() {
                        tracing::warn!(error = %err, "map size not refreshed");
                    }
                    if let Err(err) = leaflet.on_map_click(move |at| on_map_click.call(at)) {
                        tracing::warn!(error = %err, "map click handler not attached");
                    }
                    map.set_value(Some(leaflet));
                    mounted.set(true);
                }
                Err(err) => tracing::warn!(error = %err, "map not mounted"),
            }
        });
    });

    create_effect(move |_| {
        if !mounted.get() {
            return;
        }
        let markers = places.with(|places| view::markers(places));
        map.update_value(|map| {
            if let Some(map) = map {
                if let Err(err) = map.replace_markers(&markers, move |id| on_place_click.call(id)) {
                    tracing::warn!(error = %err, "markers not rendered");
                }
            }
        });
    });

    create_effect(move |_| {
        if !mounted.get() {
            return;
        }
        let at = user_location.get();
        map.update_value(|map| {
            if let Some(map) = map {
                if let Err(err) = map.set_user_location(at) {
                    tracing::warn!(error = %err, "user marker not rendered");
                }
            }
        });
    });

    create_effect(move |_| {
        if !mounted.get() {
            return;
        }
        let target = view_target.get();
        map.with_value(|map| {
            if let Some(map) = map {
                if let Err(err) = map.set_view(target) {
                    tracing::warn!(error = %err, "view not updated");
                }
            }
        });
    });

    on_cleanup(move || {
        map.try_update_value(|map| map.take());
    });

    view! {
      <div
        node_ref=container
        class="map"
        role="application"
        aria-label="Interactive accessibility map"
      ></div>
    }
}
