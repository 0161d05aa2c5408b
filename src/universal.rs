//! Legacy Universal Analytics protocol (protocol version `1`).
//!
//! One event per request, sent as `application/x-www-form-urlencoded` to the `/collect` endpoint.

use crate::{
    endpoint::BaseUrl,
    http_client::HttpClient,
    uploader::{self, CONTENT_TYPE_FORM},
    EndpointKind, Error, SendEvent, ValidationError,
};
use url::form_urlencoded;

const TRACKING_ID_PREFIX: &str = "UA";

/// Property and client an event is reported for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Meta {
    /// Tracking id of the property, e.g. `UA-12345-1`.
    pub tracking_id: String,
    /// Identifies the subject of the event.
    pub client_id: String,
}

impl Meta {
    /// Checks `tracking_id` is set and starts with `UA`, then that `client_id` is set.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tracking_id.is_empty() {
            return Err(ValidationError::MissingField("tracking_id"));
        }
        if !self.tracking_id.starts_with(TRACKING_ID_PREFIX) {
            return Err(ValidationError::MalformedTrackingId(
                self.tracking_id.clone(),
            ));
        }
        if self.client_id.is_empty() {
            return Err(ValidationError::MissingField("client_id"));
        }
        Ok(())
    }
}

/// A single Universal Analytics event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Event {
    /// Event category. Required.
    pub category: String,
    /// Event action. Documented as required, but an empty action is accepted and left out of the
    /// request.
    pub action: String,
    /// Event label. Always sent, possibly empty.
    pub label: String,
    /// Event value. Must not be negative. Zero is not sent.
    pub value: i64,
}

impl Event {
    /// Create an event with a category and an action.
    pub fn new(category: impl Into<String>, action: impl Into<String>) -> Self {
        Event {
            category: category.into(),
            action: action.into(),
            ..Default::default()
        }
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the value.
    pub fn with_value(mut self, value: i64) -> Self {
        self.value = value;
        self
    }

    /// Checks the category is set and the value is not negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.category.is_empty() {
            return Err(ValidationError::MissingField("category"));
        }
        // TODO: reject an empty action once it is settled whether the collector requires it.
        if self.value < 0 {
            return Err(ValidationError::NegativeValue(self.value));
        }
        Ok(())
    }
}

/// Validate metadata, then the event.
pub fn validate(meta: &Meta, event: &Event) -> Result<(), Error> {
    meta.validate()?;
    event.validate()?;
    Ok(())
}

/// Encode the form body. Does not validate.
///
/// ```
/// use ga_event_tracker::universal::{encode, Event, Meta};
///
/// let meta = Meta { tracking_id: "UA-1-1".into(), client_id: "c".into() };
/// assert_eq!(
///     "t=event&v=1&tid=UA-1-1&cid=c&ec=video&ea=play&el=intro&ev=3",
///     encode(&meta, &Event::new("video", "play").with_label("intro").with_value(3)),
/// );
/// ```
pub fn encode(meta: &Meta, event: &Event) -> String {
    let mut form = form_urlencoded::Serializer::new(String::new());
    form.append_pair("t", "event")
        .append_pair("v", "1")
        .append_pair("tid", &meta.tracking_id)
        .append_pair("cid", &meta.client_id)
        .append_pair("ec", &event.category);
    if !event.action.is_empty() {
        form.append_pair("ea", &event.action);
    }
    form.append_pair("el", &event.label);
    if event.value != 0 {
        form.append_pair("ev", &event.value.to_string());
    }
    form.finish()
}

/// Sends events through a given HTTP client.
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

    /// Report to another host. The `/collect` path is appended to `base_url`.
    pub fn with_endpoint(mut self, base_url: &str) -> Result<Self, Error> {
        self.base_url = BaseUrl::parse(base_url)?;
        Ok(self)
    }

    /// Metadata attached to every request.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }
}

impl<C: HttpClient> SendEvent for Tracker<C> {
    type Event = Event;

    /// Validate, encode and send one event. Nothing is sent if validation fails.
    fn send_event(&self, event: &Event) -> Result<(), Error> {
        validate(&self.meta, event)?;
        let body = encode(&self.meta, event);
        let url = self.base_url.universal_collect()?;
        uploader::send(
            &self.client,
            EndpointKind::Collect,
            &url,
            CONTENT_TYPE_FORM,
            body.into_bytes(),
        )?
        .error_for_status()?;
        Ok(())
    }
}

/// Send an event to Google Analytics with a fresh [`default_client`](crate::default_client).
#[cfg(feature = "reqwest-client")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest-client")))]
pub fn send_event(meta: &Meta, event: &Event) -> Result<(), Error> {
    validate(meta, event)?;
    Tracker::new(meta.clone(), crate::default_client()?).send_event(event)
}
