//! Event names and parameter prefixes Google Analytics keeps for itself.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Event names reserved by Google Analytics. Custom events must not use them.
pub const RESERVED_EVENT_NAMES: [&str; 22] = [
    "ad_activeview",
    "ad_click",
    "ad_exposure",
    "ad_impression",
    "ad_query",
    "adunit_exposure",
    "app_clear_data",
    "app_install",
    "app_update",
    "app_remove",
    "error",
    "first_open",
    "first_visit",
    "in_app_purchase",
    "notification_dismiss",
    "notification_foreground",
    "notification_open",
    "notification_receive",
    "os_update",
    "screen_view",
    "session_start",
    "user_engagement",
];

/// Parameter key prefixes reserved by Google Analytics.
pub const RESERVED_PARAM_PREFIXES: [&str; 3] = ["google_", "ga_", "firebase_"];

static EVENT_NAMES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| RESERVED_EVENT_NAMES.iter().copied().collect());

/// Case-sensitive exact match against [`RESERVED_EVENT_NAMES`].
pub fn is_reserved_event_name(name: &str) -> bool {
    EVENT_NAMES.contains(name)
}

/// The first entry of [`RESERVED_PARAM_PREFIXES`] that `key` starts with.
pub fn reserved_param_prefix(key: &str) -> Option<&'static str> {
    RESERVED_PARAM_PREFIXES
        .iter()
        .copied()
        .find(|prefix| key.starts_with(*prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn all_names_are_distinct() {
        assert_eq!(RESERVED_EVENT_NAMES.len(), EVENT_NAMES.len());
    }

    #[test_case("first_open", true)]
    #[test_case("session_start", true)]
    #[test_case("user_engagement", true)]
    #[test_case("First_Open", false ; "case sensitive")]
    #[test_case("first_open_custom", false ; "exact match only")]
    #[test_case("purchase", false)]
    #[test_case("", false)]
    fn event_name(name: &str, reserved: bool) {
        assert_eq!(reserved, is_reserved_event_name(name));
    }

    #[test_case("google_campaign", Some("google_"))]
    #[test_case("ga_session_id", Some("ga_"))]
    #[test_case("firebase_screen", Some("firebase_"))]
    #[test_case("my_google_value", None ; "prefix only")]
    #[test_case("GA_upper", None ; "case sensitive")]
    #[test_case("amount", None)]
    fn param_prefix(key: &str, expected: Option<&str>) {
        assert_eq!(expected, reserved_param_prefix(key));
    }
}
