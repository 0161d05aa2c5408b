//! Configuration read from environment variables, as used by the `ga-event-tracker` binary.

use crate::{
    measurement::{self, Params},
    universal, Error,
};
use std::env;

/// Variable holding event parameters as a JSON object, unless another name is given.
pub const DEFAULT_PARAMS_ENV_VAR: &str = "GA_EVENT_PARAMS";

const API_SECRET: &str = "GA_API_SECRET";
const MEASUREMENT_ID: &str = "GA_MEASUREMENT_ID";
const CLIENT_ID: &str = "GA_CLIENT_ID";
const USER_ID: &str = "GA_USER_ID";
const EVENT_NAME: &str = "GA_EVENT_NAME";
const TRACKING_ID: &str = "GA_TRACKING_ID";
const EVENT_CATEGORY: &str = "GA_EVENT_CATEGORY";
const EVENT_ACTION: &str = "GA_EVENT_ACTION";
const EVENT_LABEL: &str = "GA_EVENT_LABEL";
const EVENT_VALUE: &str = "GA_EVENT_VALUE";
const ENDPOINT: &str = "GA_ENDPOINT";

/// Read event parameters from the environment variable `var_name`, or [`DEFAULT_PARAMS_ENV_VAR`]
/// if `var_name` is empty.
///
/// An unset or empty variable, or JSON `null`, gives `None`, or [`Error::MissingParams`] when
/// `required`.
pub fn params_from_env(var_name: &str, required: bool) -> Result<Option<Params>, Error> {
    params_from_lookup(var_name, required, |name| env::var(name).ok())
}

fn params_from_lookup(
    var_name: &str,
    required: bool,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<Params>, Error> {
    let name = if var_name.is_empty() {
        DEFAULT_PARAMS_ENV_VAR
    } else {
        var_name
    };
    let value = lookup(name).unwrap_or_default();
    if value.is_empty() {
        return if required {
            Err(Error::MissingParams(name.to_string()))
        } else {
            Ok(None)
        };
    }
    // JSON `null` is treated like an unset variable.
    let params: Option<Params> =
        serde_json::from_str(&value).map_err(|source| Error::InvalidParams {
            name: name.to_string(),
            source,
        })?;
    match params {
        None if required => Err(Error::MissingParams(name.to_string())),
        params => Ok(params),
    }
}

/// What to send, and with which protocol.
#[derive(Clone, Debug, PartialEq)]
pub enum Protocol {
    /// Measurement Protocol, selected when `GA_TRACKING_ID` is not set.
    Measurement {
        /// Credentials and identity.
        meta: measurement::Meta,
        /// The event to send.
        event: measurement::Event,
    },
    /// Universal Analytics, selected when `GA_TRACKING_ID` is set.
    Universal {
        /// Tracking id and client id.
        meta: universal::Meta,
        /// The event to send.
        event: universal::Event,
    },
}

/// Everything the binary needs to send one event.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Protocol, metadata and event.
    pub protocol: Protocol,
    /// Base URL override from `GA_ENDPOINT`.
    pub endpoint: Option<String>,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns the value of a variable if set.
    ///
    /// Only the event name and, for Universal Analytics, a numeric value are checked here. Metadata
    /// and events are validated when sent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let var = |name: &str| lookup(name).unwrap_or_default();

        let tracking_id = var(TRACKING_ID);
        let protocol = if tracking_id.is_empty() {
            let name = var(EVENT_NAME);
            if name.is_empty() {
                return Err(Error::MissingConfig(EVENT_NAME));
            }
            Protocol::Measurement {
                meta: measurement::Meta {
                    api_secret: var(API_SECRET),
                    measurement_id: var(MEASUREMENT_ID),
                    client_id: var(CLIENT_ID),
                    user_id: var(USER_ID),
                },
                event: measurement::Event {
                    name,
                    params: params_from_lookup(DEFAULT_PARAMS_ENV_VAR, false, &lookup)?,
                },
            }
        } else {
            let value = match var(EVENT_VALUE).trim() {
                "" => 0,
                value => value.parse::<i64>().map_err(|err| Error::InvalidConfig {
                    name: EVENT_VALUE,
                    reason: format!("{}", err),
                })?,
            };
            Protocol::Universal {
                meta: universal::Meta {
                    tracking_id,
                    client_id: var(CLIENT_ID),
                },
                event: universal::Event {
                    category: var(EVENT_CATEGORY),
                    action: var(EVENT_ACTION),
                    label: var(EVENT_LABEL),
                    value,
                },
            }
        };

        let endpoint = Some(var(ENDPOINT)).filter(|endpoint| !endpoint.is_empty());
        Ok(Config { protocol, endpoint })
    }

    /// Name of the configured event, for reporting.
    pub fn event_name(&self) -> &str {
        match &self.protocol {
            Protocol::Measurement { event, .. } => &event.name,
            Protocol::Universal { event, .. } => &event.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use test_case::test_case;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test_case("", false ; "unset")]
    #[test_case("GA_OTHER", false ; "unset custom name")]
    fn absent_params_are_none(var_name: &str, required: bool) {
        let params = params_from_lookup(var_name, required, lookup(&[])).unwrap();
        assert_eq!(None, params);
    }

    #[test]
    fn required_params_missing() {
        let err = params_from_lookup("", true, lookup(&[(DEFAULT_PARAMS_ENV_VAR, "")])).unwrap_err();
        assert!(matches!(err, Error::MissingParams(ref name) if name == DEFAULT_PARAMS_ENV_VAR));
    }

    #[test]
    fn null_params_are_none() {
        let params =
            params_from_lookup("", false, lookup(&[(DEFAULT_PARAMS_ENV_VAR, "null")])).unwrap();
        assert_eq!(None, params);

        let err = params_from_lookup("", true, lookup(&[(DEFAULT_PARAMS_ENV_VAR, "null")]))
            .unwrap_err();
        assert!(matches!(err, Error::MissingParams(ref name) if name == DEFAULT_PARAMS_ENV_VAR));
    }

    #[test]
    fn params_are_parsed_from_named_variable() {
        let params = params_from_lookup(
            "MY_PARAMS",
            true,
            lookup(&[("MY_PARAMS", r#"{"amount": 9.99, "items": [{"id": 1}]}"#)]),
        )
        .unwrap()
        .unwrap();
        assert_eq!(json!(9.99), params["amount"]);
        assert_eq!(json!([{"id": 1}]), params["items"]);
    }

    #[test_case("not json" ; "garbage")]
    #[test_case("[1, 2]" ; "array")]
    #[test_case("\"text\"" ; "string")]
    fn invalid_params(value: &str) {
        let err = params_from_lookup("", false, lookup(&[(DEFAULT_PARAMS_ENV_VAR, value)]))
            .unwrap_err();
        assert!(err.to_string().contains(DEFAULT_PARAMS_ENV_VAR));
    }

    #[test]
    fn measurement_config() {
        let config = Config::from_lookup(lookup(&[
            (API_SECRET, "s"),
            (MEASUREMENT_ID, "m"),
            (CLIENT_ID, "c"),
            (USER_ID, "u"),
            (EVENT_NAME, "purchase"),
            (DEFAULT_PARAMS_ENV_VAR, r#"{"amount": 9.99}"#),
        ]))
        .unwrap();
        assert_eq!(
            Config {
                protocol: Protocol::Measurement {
                    meta: measurement::Meta {
                        api_secret: "s".into(),
                        measurement_id: "m".into(),
                        client_id: "c".into(),
                        user_id: "u".into(),
                    },
                    event: measurement::Event::new("purchase").with_param("amount", 9.99),
                },
                endpoint: None,
            },
            config
        );
        assert_eq!("purchase", config.event_name());
    }

    #[test]
    fn event_name_is_required() {
        let err = Config::from_lookup(lookup(&[(API_SECRET, "s")])).unwrap_err();
        assert!(matches!(err, Error::MissingConfig(EVENT_NAME)));
    }

    #[test]
    fn tracking_id_selects_universal() {
        let config = Config::from_lookup(lookup(&[
            (TRACKING_ID, "UA-1-1"),
            (CLIENT_ID, "c"),
            (EVENT_CATEGORY, "video"),
            (EVENT_ACTION, "play"),
            (EVENT_VALUE, " 42 "),
            (ENDPOINT, "http://localhost:9000"),
        ]))
        .unwrap();
        assert_eq!(
            Protocol::Universal {
                meta: universal::Meta {
                    tracking_id: "UA-1-1".into(),
                    client_id: "c".into(),
                },
                event: universal::Event::new("video", "play").with_value(42),
            },
            config.protocol
        );
        assert_eq!(Some("http://localhost:9000".to_string()), config.endpoint);
        assert_eq!("video", config.event_name());
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            (TRACKING_ID, "UA-1-1"),
            (EVENT_VALUE, "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { name: EVENT_VALUE, .. }));
    }
}
