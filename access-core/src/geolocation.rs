//! One-shot plus continuous position tracking over a host geolocation API.
//!
//! Failures are logged and dropped; the last fix delivered wins.

use crate::place::LatLng;
use crate::streams::{self, PositionSender, PositionStream};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    Unavailable,
    #[error("timed out")]
    Timeout,
    #[error("geolocation not supported")]
    Unsupported,
    #[error("{0}")]
    Other(String),
}

impl PositionError {
    /// Maps W3C `GeolocationPositionError.code`.
    pub fn from_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            1 => PositionError::PermissionDenied,
            2 => PositionError::Unavailable,
            3 => PositionError::Timeout,
            _ => PositionError::Other(message.into()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixSource {
    OneShot,
    Watch,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionFix {
    pub coords: LatLng,
    pub source: FixSource,
}

pub type PositionCallback = Box<dyn FnMut(LatLng)>;
pub type ErrorCallback = Box<dyn FnMut(PositionError)>;

pub trait GeolocationProvider {
    type WatchHandle;

    fn get_current_position(&self, on_fix: PositionCallback, on_error: ErrorCallback);

    fn watch_position(
        &self,
        on_fix: PositionCallback,
        on_error: ErrorCallback,
    ) -> Result<Self::WatchHandle, PositionError>;

    fn clear_watch(&self, handle: Self::WatchHandle);
}

/// Keeps a position watch alive. Dropping it cancels the watch.
pub struct ActiveWatch<P: GeolocationProvider> {
    provider: P,
    handle: Option<P::WatchHandle>,
}

impl<P: GeolocationProvider> ActiveWatch<P> {
    pub fn is_watching(&self) -> bool {
        self.handle.is_some()
    }

    pub fn deactivate(self) {}
}

impl<P: GeolocationProvider> Drop for ActiveWatch<P> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.provider.clear_watch(handle);
            tracing::debug!("position watch cleared");
        }
    }
}

fn forward(tx: &PositionSender, source: FixSource) -> PositionCallback {
    let tx = tx.clone();
    Box::new(move |coords: LatLng| {
        if tx.unbounded_send(PositionFix { coords, source }).is_err() {
            tracing::trace!(?source, "position stream closed");
        }
    })
}

fn swallow(source: FixSource) -> ErrorCallback {
    Box::new(move |err: PositionError| tracing::debug!(?source, error = %err, "geolocation error ignored"))
}

/// Requests one position immediately and starts watching for updates.
pub fn activate<P: GeolocationProvider>(provider: P) -> (ActiveWatch<P>, PositionStream) {
    let (tx, stream) = streams::position_channel();

    provider.get_current_position(forward(&tx, FixSource::OneShot), swallow(FixSource::OneShot));

    let handle = match provider.watch_position(forward(&tx, FixSource::Watch), swallow(FixSource::Watch)) {
        Ok(handle) => Some(handle),
        Err(err) => {
            tracing::debug!(error = %err, "position watch unavailable");
            None
        }
    };

    (ActiveWatch { provider, handle }, stream)
}
