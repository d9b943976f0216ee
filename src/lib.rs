//! A small Rust client for the Lizard geospatial time-series API.
//!
//! This crate wraps the v4 REST API behind one blocking [`Client`] with a
//! method per resource operation: creating and looking up organisations,
//! locations, observation types, time series, rasters and raster sources,
//! posting events, uploading raster files, and checking background tasks.
//!
//! ## Quick start
//! - Configure authentication via environment variables (`LIZARDAPI_URL`,
//!   `LIZARDAPI_KEY`) or a `.lizardrc` file (supported in the current
//!   directory and in your home directory).
//! - Call the operation you need; every call is one HTTP round trip.
//!
//! ```no_run
//! use chrono::{TimeZone, Utc};
//! use lizardapi::{Client, Endpoint, Event, EventValue, Result, UuidLookup};
//!
//! fn main() -> Result<()> {
//!     let client = Client::from_env()?;
//!
//!     if let Some(UuidLookup::One(uuid)) =
//!         client.get_object_uuid(Endpoint::Timeseries, "code=GW01")?
//!     {
//!         let event = Event {
//!             time: Utc.with_ymd_and_hms(2024, 3, 1, 13, 0, 0).unwrap(),
//!             value: Some(EventValue::Number(1.5)),
//!             flag: None,
//!             validation_code: String::new(),
//!             comment: String::new(),
//!             detection_limit: String::new(),
//!         };
//!         client.post_timeseries_events(&uuid, &[event])?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Lookup semantics follow the service's `count` field: one match resolves
//! to the identifier, zero matches resolve to `None` with a logged
//! warning. See the individual methods for the multi-match behavior.

#![forbid(unsafe_code)]

mod client;
mod config;
mod endpoint;
mod error;
mod models;
mod page;

pub use client::{Client, ClientConfig, UuidLookup};
pub use endpoint::Endpoint;
pub use error::{BASE_URL_SUFFIX, Error, Failure, Result};
pub use models::{
    Event, EventBatch, EventValue, Location, ObservationType, Organisation, Scale, Timeseries,
    zulu,
};
