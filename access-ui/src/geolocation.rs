use access_core::geolocation::{ErrorCallback, GeolocationProvider, PositionCallback, PositionError};
use access_core::LatLng;
use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

/// `navigator.geolocation` as a [`GeolocationProvider`].
#[derive(Clone)]
pub struct BrowserGeolocation {
    geolocation: web_sys::Geolocation,
}

/// Watch id plus the callbacks the browser still holds.
pub struct BrowserWatch {
    id: i32,
    _on_fix: Closure<dyn FnMut(JsValue)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
}

impl BrowserGeolocation {
    pub fn from_window() -> Result<Self, PositionError> {
        let window = web_sys::window().ok_or(PositionError::Unsupported)?;
        let geolocation = window
            .navigator()
            .geolocation()
            .map_err(|_| PositionError::Unsupported)?;
        Ok(Self { geolocation })
    }
}

fn coords(position: &JsValue) -> Option<LatLng> {
    let coords = Reflect::get(position, &JsValue::from_str("coords")).ok()?;
    let lat = Reflect::get(&coords, &JsValue::from_str("latitude")).ok()?.as_f64()?;
    let lng = Reflect::get(&coords, &JsValue::from_str("longitude")).ok()?.as_f64()?;
    Some(LatLng::new(lat, lng))
}

fn position_error(err: &JsValue) -> PositionError {
    let code = Reflect::get(err, &JsValue::from_str("code"))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0) as u16;
    let message = Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default();
    PositionError::from_code(code, message)
}

fn deliver(on_fix: &mut PositionCallback, position: &JsValue) {
    match coords(position) {
        Some(at) => on_fix(at),
        None => tracing::debug!("position without coordinates"),
    }
}

impl GeolocationProvider for BrowserGeolocation {
    type WatchHandle = BrowserWatch;

    fn get_current_position(&self, mut on_fix: PositionCallback, mut on_error: ErrorCallback) {
        let success = Closure::once_into_js(move |position: JsValue| deliver(&mut on_fix, &position));
        let failure = Closure::once_into_js(move |err: JsValue| on_error(position_error(&err)));
        if let Err(err) = self
            .geolocation
            .get_current_position_with_error_callback(success.unchecked_ref(), Some(failure.unchecked_ref()))
        {
            tracing::debug!(error = ?err, "getCurrentPosition rejected");
        }
    }

    fn watch_position(
        &self,
        mut on_fix: PositionCallback,
        mut on_error: ErrorCallback,
    ) -> Result<BrowserWatch, PositionError> {
        let success = Closure::<dyn FnMut(JsValue)>::new(move |position: JsValue| {
            deliver(&mut on_fix, &position)
        });
        let failure =
            Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| on_error(position_error(&err)));

        let id = self
            .geolocation
            .watch_position_with_error_callback(
                success.as_ref().unchecked_ref(),
                Some(failure.as_ref().unchecked_ref()),
            )
            .map_err(|err| PositionError::Other(format!("{err:?}")))?;

        Ok(BrowserWatch {
            id,
            _on_fix: success,
            _on_error: failure,
        })
    }

    fn clear_watch(&self, handle: BrowserWatch) {
        self.geolocation.clear_watch(handle.id);
    }
}
