//! Google Analytics 4 [Measurement Protocol].
//!
//! Every send posts the same JSON body twice: first to the debug endpoint, whose validation
//! messages are logged and otherwise ignored, then to the collection endpoint, whose status decides
//! the outcome. A transport failure on the debug call aborts before the collection call.
//!
//! [Measurement Protocol]: https://developers.google.com/analytics/devguides/collection/protocol/ga4

use crate::{
    endpoint::BaseUrl,
    http_client::HttpClient,
    reserved::{is_reserved_event_name, reserved_param_prefix},
    uploader::{self, Reply, CONTENT_TYPE_JSON},
    EndpointKind, Error, SendEvent, ValidationError,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Custom event parameters. Values may be any JSON value, nested to any depth. Only keys are
/// validated.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Identifies where events go and who they are about.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Meta {
    /// API secret generated in the Google Analytics UI under
    /// Admin > Data Streams > choose your stream > Measurement Protocol > Create.
    pub api_secret: String,

    /// Identifier of the data stream, found under Admin > Data Streams > choose your stream >
    /// Measurement ID.
    pub measurement_id: String,

    /// Uniquely identifies a user instance of a web client.
    pub client_id: String,

    /// Optional unique identifier for a user. Left out of the request when empty.
    pub user_id: String,
}

impl Meta {
    /// Checks required fields in the order `api_secret`, `measurement_id`, `client_id`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_secret.is_empty() {
            return Err(ValidationError::MissingField("api_secret"));
        }
        if self.measurement_id.is_empty() {
            return Err(ValidationError::MissingField("measurement_id"));
        }
        if self.client_id.is_empty() {
            return Err(ValidationError::MissingField("client_id"));
        }
        Ok(())
    }
}

/// A single event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Name of the event. Must not be empty or one of
    /// [`RESERVED_EVENT_NAMES`](crate::reserved::RESERVED_EVENT_NAMES).
    pub name: String,

    /// Additional parameters attached to the event.
    #[serde(default, skip_serializing_if = "no_params")]
    pub params: Option<Params>,
}

fn no_params(params: &Option<Params>) -> bool {
    params.as_ref().map_or(true, Params::is_empty)
}

impl Event {
    /// Create an event without parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Event {
            name: name.into(),
            params: None,
        }
    }

    /// Attach a parameter, replacing any previous value under `key`.
    ///
    /// ```
    /// let event = ga_event_tracker::measurement::Event::new("purchase")
    ///     .with_param("amount", 9.99)
    ///     .with_param("currency", "EUR");
    /// assert_eq!(2, event.params.unwrap().len());
    /// ```
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params
            .get_or_insert_with(Params::new)
            .insert(key.into(), value.into());
        self
    }

    /// Checks the name is set and not reserved, then that no parameter key uses a reserved prefix.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if is_reserved_event_name(&self.name) {
            return Err(ValidationError::ReservedEventName(self.name.clone()));
        }
        for key in self.params.iter().flat_map(|params| params.keys()) {
            if let Some(prefix) = reserved_param_prefix(key) {
                return Err(ValidationError::ReservedParamPrefix {
                    event: self.name.clone(),
                    prefix,
                    key: key.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Validate metadata, then each event in order. Stops at the first failure.
pub fn validate(meta: &Meta, events: &[Event]) -> Result<(), Error> {
    meta.validate()?;
    for (index, event) in events.iter().enumerate() {
        event
            .validate()
            .map_err(|source| Error::InvalidEvent { index, source })?;
    }
    Ok(())
}

#[derive(Serialize)]
struct Payload<'a> {
    client_id: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    user_id: &'a str,
    events: &'a [Event],
}

fn is_empty(value: &&str) -> bool {
    value.is_empty()
}

/// Encode the JSON request body. Does not validate.
pub fn encode(meta: &Meta, events: &[Event]) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(&Payload {
        client_id: &meta.client_id,
        user_id: &meta.user_id,
        events,
    })
    .map_err(Error::SerializeRequest)
}

/// One diagnostic returned by the debug endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationMessage {
    /// Path to the offending field, e.g. `events[0].name`.
    pub field_path: String,
    /// Human readable description.
    pub description: String,
    /// Machine readable code, e.g. `NAME_RESERVED`.
    pub validation_code: String,
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.field_path, self.validation_code, self.description
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DebugResponse {
    validation_messages: Vec<ValidationMessage>,
}

/// Sends events through a given HTTP client.
///
/// ```no_run
/// use ga_event_tracker::measurement::{Event, Meta, Tracker};
///
/// let meta = Meta {
///     api_secret: "secret".into(),
///     measurement_id: "G-XXXXXXX".into(),
///     client_id: "client".into(),
///     ..Default::default()
/// };
/// let tracker = Tracker::new(meta, ga_event_tracker::default_client()?);
/// tracker.send_events(&[Event::new("purchase").with_param("amount", 9.99)])?;
/// # Ok::<(), ga_event_tracker::Error>(())
/// ```
#[derive(Debug)]
pub struct Tracker<C> {
    client: C,
    meta: Meta,
    base_url: BaseUrl,
}

impl<C: HttpClient> Tracker<C> {
    /// Create a tracker that reports to Google Analytics.
    pub fn new(meta: Meta, client: C) -> Self {
        Tracker {
            client,
            meta,
            base_url: BaseUrl::default(),
        }
    }

    /// Report to another host, e.g. a proxy or a local test server. Paths and query are appended
    /// to `base_url`.
    pub fn with_endpoint(mut self, base_url: &str) -> Result<Self, Error> {
        self.base_url = BaseUrl::parse(base_url)?;
        Ok(self)
    }

    /// Metadata attached to every request.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Validate, encode and send events in a single request body.
    ///
    /// Nothing is sent if validation fails.
    pub fn send_events(&self, events: &[Event]) -> Result<(), Error> {
        validate(&self.meta, events)?;
        let body = encode(&self.meta, events)?;

        // The collection endpoint accepts invalid payloads silently.
        self.call_debug(body.clone())?;

        let url = self
            .base_url
            .measurement_collect(&self.meta.api_secret, &self.meta.measurement_id)?;
        uploader::send(
            &self.client,
            EndpointKind::Production,
            &url,
            CONTENT_TYPE_JSON,
            body,
        )?
        .error_for_status()?;
        Ok(())
    }

    /// Validate and encode events, then send them to the debug endpoint only and return what it
    /// reported. Nothing is collected.
    pub fn validate_remotely(&self, events: &[Event]) -> Result<Vec<ValidationMessage>, Error> {
        validate(&self.meta, events)?;
        let body = encode(&self.meta, events)?;
        let reply = self.call_debug(body)?.error_for_status()?;
        Ok(parse_validation_messages(&reply.body))
    }

    fn call_debug(&self, body: Vec<u8>) -> Result<Reply, Error> {
        let url = self
            .base_url
            .measurement_debug_collect(&self.meta.api_secret, &self.meta.measurement_id)?;
        let reply = uploader::send(&self.client, EndpointKind::Debug, &url, CONTENT_TYPE_JSON, body)?;
        info!(
            "Results of debug test call. Status: {}. Body: {}",
            reply.status.as_u16(),
            reply.body
        );
        for message in parse_validation_messages(&reply.body) {
            info!("Debug validation message: {}", message);
        }
        Ok(reply)
    }
}

fn parse_validation_messages(body: &str) -> Vec<ValidationMessage> {
    serde_json::from_str::<DebugResponse>(body)
        .map(|response| response.validation_messages)
        .unwrap_or_default()
}

impl<C: HttpClient> SendEvent for Tracker<C> {
    type Event = Event;

    fn send_event(&self, event: &Event) -> Result<(), Error> {
        self.send_events(std::slice::from_ref(event))
    }
}

/// Send events to Google Analytics with a fresh [`default_client`](crate::default_client).
#[cfg(feature = "reqwest-client")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest-client")))]
pub fn send_events(meta: &Meta, events: &[Event]) -> Result<(), Error> {
    validate(meta, events)?;
    Tracker::new(meta.clone(), crate::default_client()?).send_events(events)
}
