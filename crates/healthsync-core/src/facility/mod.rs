//! Nearby healthcare facility search.
//!
//! The locator resolves the user's position through a [`LocationProvider`],
//! queries a [`PlacesSearch`] once per place type of the requested filter,
//! and reports deduplicated facilities sorted by distance. It is driven by
//! [`FacilitySearchRequest`](healthsync_types::facility::FacilitySearchRequest)s
//! arriving on the channel the chat client was given.

pub mod locator;
pub mod ports;

pub use locator::{FacilityError, FacilityLocator, FacilityReport};
pub use ports::{LocationProvider, PlacesSearch};
