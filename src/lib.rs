//! Send events to [Google Analytics].
//!
//! [Google Analytics]: https://analytics.google.com
//!
//! Two independent protocols are supported:
//!
//! - [`measurement`]: the Google Analytics 4 [Measurement Protocol]. Events are posted as JSON,
//!   first to the debug endpoint and then to the collection endpoint.
//! - [`universal`]: the legacy Universal Analytics protocol. One event is posted as form data.
//!
//! Metadata and events are validated before anything is sent. A send is a single blocking call
//! with a 5 second timeout. There are no retries, no batching across calls and no queuing.
//!
//! [Measurement Protocol]: https://developers.google.com/analytics/devguides/collection/protocol/ga4
//!
//! # Usage
//!
//! ```rust,no_run
//! use ga_event_tracker::measurement::{self, Event, Meta};
//!
//! fn main() -> Result<(), ga_event_tracker::Error> {
//!     let meta = Meta {
//!         api_secret: "...".into(),
//!         measurement_id: "G-XXXXXXX".into(),
//!         client_id: "555".into(),
//!         ..Default::default()
//!     };
//!     measurement::send_events(&meta, &[Event::new("purchase").with_param("amount", 9.99)])
//! }
//! ```
//!
//! To reuse a client, send through another HTTP client, or report to another host, use a
//! [`measurement::Tracker`] or [`universal::Tracker`]. Both implement [`SendEvent`].
//!
//! # Validation rules
//!
//! | Protocol    | Rule                                                                     |
//! | ----------- | ------------------------------------------------------------------------ |
//! | Measurement | `api_secret`, `measurement_id`, `client_id` and event `name` are required |
//! | Measurement | event names in [`reserved::RESERVED_EVENT_NAMES`] are rejected            |
//! | Measurement | param keys starting with [`reserved::RESERVED_PARAM_PREFIXES`] are rejected |
//! | Universal   | `tracking_id` is required and must start with `UA`                        |
//! | Universal   | `client_id` and `category` are required                                   |
//! | Universal   | `value` must not be negative                                              |
//!
//! # Binary
//!
//! The `ga-event-tracker` binary reads its configuration from environment variables (see
//! [`config`]), sends one event and exits with a non-zero status on failure.
#![doc(html_root_url = "https://docs.rs/ga-event-tracker/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs, unreachable_pub, missing_debug_implementations)]

pub mod config;
mod endpoint;
mod error;
mod http_client;
pub mod measurement;
pub mod reserved;
#[cfg(test)]
mod test_support;
pub mod universal;
mod uploader;

pub use endpoint::DEFAULT_BASE_URL;
pub use error::{EndpointKind, Error, ValidationError};
#[cfg(feature = "reqwest-client")]
pub use http_client::default_client;
pub use http_client::{HttpClient, HttpError, ResponseBody, DEFAULT_TIMEOUT};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Validate, encode and send a single event.
///
/// Implemented by [`measurement::Tracker`] and [`universal::Tracker`]. The protocols share no data
/// model, so each names its own event type.
pub trait SendEvent {
    /// Event type of the protocol.
    type Event;

    /// Send one event. Returns an error if validation fails, the request cannot be completed or
    /// Google Analytics answers with a status outside of `200..300`.
    fn send_event(&self, event: &Self::Event) -> Result<(), Error>;
}
