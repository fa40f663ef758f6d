//! Place records, report merging and the map view model for the
//! accessibility map.

pub mod config;
pub mod geolocation;
pub mod ids;
pub mod place;
pub mod seed;
pub mod shell;
pub mod store;
pub mod streams;
pub mod view;

pub use ids::PlaceId;
pub use place::{AccessFeature, AccessValue, LatLng, OverallRating, Place, Report, UserReport};
pub use store::{PlaceStore, SubmitOutcome};
