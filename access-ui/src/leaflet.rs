//! Leaflet (`window.L`) reached through reflection.

use access_core::config::MapConfig;
use access_core::view::{MarkerDescriptor, MarkerStyle, PopupContent, ViewTarget, USER_LOCATION_COLOR};
use access_core::{LatLng, PlaceId};
use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, thiserror::Error)]
pub enum InteropError {
    #[error("window not available")]
    NoWindow,
    #[error("Leaflet is not loaded (window.L missing)")]
    LeafletMissing,
    #[error("`{0}` is not a function")]
    NotAFunction(String),
    #[error("{call} failed: {message}")]
    Call { call: String, message: String },
}

impl InteropError {
    fn call(call: &str, err: JsValue) -> Self {
        InteropError::Call {
            call: call.to_string(),
            message: format!("{err:?}"),
        }
    }
}

type EventClosure = Closure<dyn FnMut(JsValue)>;

fn leaflet() -> Result<JsValue, InteropError> {
    let window = web_sys::window().ok_or(InteropError::NoWindow)?;
    let l = Reflect::get(&window, &JsValue::from_str("L")).map_err(|_| InteropError::LeafletMissing)?;
    if l.is_undefined() || l.is_null() {
        return Err(InteropError::LeafletMissing);
    }
    Ok(l)
}

fn invoke(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, InteropError> {
    let f = Reflect::get(target, &JsValue::from_str(name)).map_err(|e| InteropError::call(name, e))?;
    let f = f
        .dyn_into::<Function>()
        .map_err(|_| InteropError::NotAFunction(name.to_string()))?;
    let args: Array = args.iter().collect();
    f.apply(target, &args).map_err(|e| InteropError::call(name, e))
}

fn options<T: Serialize>(value: &T) -> Result<JsValue, InteropError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| InteropError::Call {
            call: "serialize options".into(),
            message: e.to_string(),
        })
}

fn lat_lng(at: LatLng) -> JsValue {
    Array::of2(&JsValue::from_f64(at.lat), &JsValue::from_f64(at.lng)).into()
}

fn read_lat_lng(event: &JsValue) -> Option<LatLng> {
    let latlng = Reflect::get(event, &JsValue::from_str("latlng")).ok()?;
    let lat = Reflect::get(&latlng, &JsValue::from_str("lat")).ok()?.as_f64()?;
    let lng = Reflect::get(&latlng, &JsValue::from_str("lng")).ok()?.as_f64()?;
    Some(LatLng::new(lat, lng))
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn marker_html(style: MarkerStyle) -> String {
    format!(
        r#"<div class="place-marker" style="background-color: {}">{}</div>"#,
        style.color, style.glyph
    )
}

pub fn popup_html(popup: &PopupContent) -> String {
    let mut html = format!(
        concat!(
            r#"<div class="popup">"#,
            r#"<h3>{name}</h3><p class="address">{address}</p>"#,
            r#"<div class="rating"><span class="dot" style="background-color: {color}"></span>"#,
            r#"<span class="label">{label}</span></div>"#
        ),
        name = escape_html(&popup.name),
        address = escape_html(&popup.address),
        color = popup.color,
        label = escape_html(&popup.rating_label),
    );
    if let Some(reports) = &popup.reports {
        html.push_str(&format!(r#"<p class="reports">{}</p>"#, escape_html(reports)));
    }
    html.push_str("</div>");
    html
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IconOptions {
    class_name: &'static str,
    html: String,
    icon_size: [u32; 2],
    icon_anchor: [u32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    popup_anchor: Option<[i32; 2]>,
}

#[derive(Serialize)]
struct MarkerOptions<'a> {
    alt: &'a str,
    keyboard: bool,
}

/// A Leaflet map bound to one container element. Removed from the page on
/// drop.
pub struct LeafletMap {
    l: JsValue,
    map: JsValue,
    markers: Vec<(JsValue, EventClosure)>,
    user_marker: Option<JsValue>,
    click: Option<EventClosure>,
}

impl LeafletMap {
    pub fn mount(container: &web_sys::HtmlElement, config: &MapConfig) -> Result<Self, InteropError> {
        let l = leaflet()?;
        let map = invoke(&l, "map", &[JsValue::from(container.clone())])?;
        invoke(&map, "setView", &[lat_lng(config.center), JsValue::from(config.zoom)])?;

        let tiles = invoke(
            &l,
            "tileLayer",
            &[
                JsValue::from_str(&config.tile_url),
                options(&serde_json::json!({ "attribution": config.attribution }))?,
            ],
        )?;
        invoke(&tiles, "addTo", &[map.clone()])?;

        Ok(Self {
            l,
            map,
            markers: Vec::new(),
            user_marker: None,
            click: None,
        })
    }

    /// Recomputes the map size after the container was attached or resized.
    pub fn invalidate_size(&self) -> Result<(), InteropError> {
        invoke(&self.map, "invalidateSize", &[]).map(drop)
    }

    pub fn on_map_click(&mut self, handler: impl Fn(LatLng) + 'static) -> Result<(), InteropError> {
        let closure = EventClosure::new(move |event: JsValue| match read_lat_lng(&event) {
            Some(at) => handler(at),
            None => tracing::warn!("map click without latlng"),
        });
        invoke(
            &self.map,
            "on",
            &[JsValue::from_str("click"), closure.as_ref().clone()],
        )?;
        self.click = Some(closure);
        Ok(())
    }

    pub fn set_view(&self, target: ViewTarget) -> Result<(), InteropError> {
        invoke(
            &self.map,
            "setView",
            &[
                lat_lng(target.center),
                JsValue::from(target.zoom),
                options(&serde_json::json!({ "animate": target.animate }))?,
            ],
        )
        .map(drop)
    }

    fn clear_markers(&mut self) {
        for (marker, _closure) in self.markers.drain(..) {
            if let Err(err) = invoke(&marker, "remove", &[]) {
                tracing::warn!(error = %err, "failed to remove marker");
            }
        }
    }

    /// Replaces every place marker. `on_click` receives the clicked place id.
    pub fn replace_markers(
        &mut self,
        markers: &[MarkerDescriptor],
        on_click: impl Fn(PlaceId) + Clone + 'static,
    ) -> Result<(), InteropError> {
        self.clear_markers();

        for descriptor in markers {
            let icon = invoke(
                &self.l,
                "divIcon",
                &[options(&IconOptions {
                    class_name: "custom-marker",
                    html: marker_html(descriptor.style),
                    icon_size: [32, 32],
                    icon_anchor: [16, 32],
                    popup_anchor: Some([0, -32]),
                })?],
            )?;
            let marker_options = options(&MarkerOptions {
                alt: &descriptor.aria_label,
                keyboard: true,
            })?;
            Reflect::set(&marker_options, &JsValue::from_str("icon"), &icon)
                .map_err(|e| InteropError::call("set icon", e))?;

            let marker = invoke(&self.l, "marker", &[lat_lng(descriptor.position), marker_options])?;
            invoke(&marker, "bindPopup", &[JsValue::from_str(&popup_html(&descriptor.popup))])?;

            let id = descriptor.id.clone();
            let on_click = on_click.clone();
            let closure = EventClosure::new(move |_event: JsValue| on_click(id.clone()));
            invoke(&marker, "on", &[JsValue::from_str("click"), closure.as_ref().clone()])?;
            invoke(&marker, "addTo", &[self.map.clone()])?;

            self.markers.push((marker, closure));
        }
        Ok(())
    }

    pub fn set_user_location(&mut self, at: Option<LatLng>) -> Result<(), InteropError> {
        if let Some(marker) = self.user_marker.take() {
            invoke(&marker, "remove", &[])?;
        }
        let Some(at) = at else {
            return Ok(());
        };

        let icon = invoke(
            &self.l,
            "divIcon",
            &[options(&IconOptions {
                class_name: "user-location-marker",
                html: format!(
                    r#"<div class="user-dot" style="background-color: {USER_LOCATION_COLOR}"><div></div></div>"#
                ),
                icon_size: [24, 24],
                icon_anchor: [12, 12],
                popup_anchor: None,
            })?],
        )?;
        let marker_options = options(&MarkerOptions {
            alt: "Your current location",
            keyboard: false,
        })?;
        Reflect::set(&marker_options, &JsValue::from_str("icon"), &icon)
            .map_err(|e| InteropError::call("set icon", e))?;

        let marker = invoke(&self.l, "marker", &[lat_lng(at), marker_options])?;
        invoke(&marker, "bindPopup", &[JsValue::from_str("<div class=\"popup\">Your Location</div>")])?;
        invoke(&marker, "addTo", &[self.map.clone()])?;
        self.user_marker = Some(marker);
        Ok(())
    }
}

impl Drop for LeafletMap {
    fn drop(&mut self) {
        if let Err(err) = invoke(&self.map, "remove", &[]) {
            tracing::warn!(error = %err, "failed to remove map");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use access_core::place::OverallRating;
    use access_core::view::marker_style;

    #[test]
    fn popup_escapes_user_text() {
        let html = popup_html(&PopupContent {
            name: "<b>Cafe</b>".into(),
            address: "A & B".into(),
            rating_label: "accessible".into(),
            color: "#10b981",
            reports: None,
        });
        assert!(html.contains("&lt;b&gt;Cafe&lt;/b&gt;"));
        assert!(html.contains("A &amp; B"));
        assert!(!html.contains("class=\"reports\""));
    }

    #[test]
    fn popup_lists_report_summary() {
        let html = popup_html(&PopupContent {
            name: "Library".into(),
            address: String::new(),
            rating_label: "partially accessible".into(),
            color: "#f59e0b",
            reports: Some("3 user reports".into()),
        });
        assert!(html.contains(r#"<p class="reports">3 user reports</p>"#));
    }

    #[test]
    fn marker_html_carries_color_and_glyph() {
        let html = marker_html(marker_style(&OverallRating::NotAccessible));
        assert!(html.contains("#ef4444"));
        assert!(html.contains("✗"));
    }
}
