//! Restaurant records supplied by the catalog.
//!
//! Read-only to the decision engine. Ingestion adapters build these through the
//! `with_*` builders so that every predicate sees normalized values.

pub mod attributes;
pub mod entities;
pub mod geo;

pub use attributes::{PartyRange, Portion, PriceTier, Spiciness, VenueKind};
pub use entities::{Restaurant, RestaurantId};
pub use geo::GeoPoint;
