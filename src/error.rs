use crate::http_client::HttpError;
use std::fmt;

/// The endpoint a request was sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointKind {
    /// Measurement Protocol validation endpoint (`/debug/mp/collect`).
    Debug,
    /// Measurement Protocol collection endpoint (`/mp/collect`).
    Production,
    /// Universal Analytics collection endpoint (`/collect`).
    Collect,
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EndpointKind::Debug => "debug",
            EndpointKind::Production => "production",
            EndpointKind::Collect => "collect",
        })
    }
}

/// A metadata record or event broke one of the protocol rules. Nothing was sent.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// A required field is empty. Holds the field name.
    #[error("{0} cannot be empty")]
    MissingField(&'static str),

    /// The Universal Analytics tracking id does not start with `UA`.
    #[error("tracking_id {0:?} must start with \"UA\"")]
    MalformedTrackingId(String),

    /// The event name is one of the names reserved by Google Analytics.
    #[error("the event name {0} is reserved by Google Analytics")]
    ReservedEventName(String),

    /// A parameter key starts with a prefix reserved by Google Analytics.
    #[error("event {event} has param with reserved prefix {prefix}, param: {key}")]
    ReservedParamPrefix {
        /// Name of the offending event.
        event: String,
        /// The reserved prefix that matched.
        prefix: &'static str,
        /// The offending parameter key.
        key: String,
    },

    /// The Universal Analytics event value is negative.
    #[error("value must not be negative, got {0}")]
    NegativeValue(i64),
}

/// Errors that occurred while sending events.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Metadata failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The event at `index` failed validation. Events are checked in order and checking stops at
    /// the first invalid one.
    #[error("validation error for event #{index}: {source}")]
    InvalidEvent {
        /// Position of the event in the submitted sequence.
        index: usize,
        /// The rule that was violated.
        source: ValidationError,
    },

    /// Events failed to serialize to JSON.
    ///
    /// Note: This is an error in this crate. If you spot this, please open an issue.
    #[error("serializing request body failed with {0}")]
    SerializeRequest(serde_json::Error),

    /// The HTTP client could not be created.
    #[error("building HTTP client failed with {0}")]
    BuildClient(HttpError),

    /// A base URL override could not be used.
    #[error("invalid endpoint {url:?}: {reason}")]
    InvalidEndpoint {
        /// The URL as given.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Could not complete the HTTP request (DNS, connect, timeout).
    #[error("error making call to the {endpoint} endpoint: {source}")]
    Connection {
        /// Endpoint the request was sent to.
        endpoint: EndpointKind,
        /// Underlying transport error.
        source: HttpError,
    },

    /// The response arrived but its body could not be read.
    #[error("error reading response body from the {endpoint} endpoint: {source}")]
    ReadResponse {
        /// Endpoint the request was sent to.
        endpoint: EndpointKind,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Google Analytics answered with a status outside of `200..300`.
    #[error("got error calling Google Analytics from the {endpoint} endpoint [status {status}]: {body}")]
    Status {
        /// Endpoint the request was sent to.
        endpoint: EndpointKind,
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded as UTF-8.
        body: String,
    },

    /// A required params variable is empty or unset.
    #[error("required params env var {0} is empty")]
    MissingParams(String),

    /// A params variable does not hold a JSON object.
    #[error("value of params env var {name} does not appear to be JSON, error: {source}")]
    InvalidParams {
        /// Name of the variable.
        name: String,
        /// Parse error.
        source: serde_json::Error,
    },

    /// A required configuration variable is empty or unset.
    #[error("env var {0} is required")]
    MissingConfig(&'static str),

    /// A configuration variable holds a value that cannot be used.
    #[error("env var {name} is invalid: {reason}")]
    InvalidConfig {
        /// Name of the variable.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl Error {
    /// Returns `true` if nothing was sent because input did not pass validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::InvalidEvent { .. })
    }
}
