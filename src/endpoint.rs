use crate::Error;
use url::Url;

/// Default Google Analytics host.
pub const DEFAULT_BASE_URL: &str = "https://www.google-analytics.com";
const MEASUREMENT_COLLECT_PATH: &str = "/mp/collect";
const MEASUREMENT_DEBUG_COLLECT_PATH: &str = "/debug/mp/collect";
const UNIVERSAL_COLLECT_PATH: &str = "/collect";

/// Scheme and host every collection URL is built on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BaseUrl(String);

impl Default for BaseUrl {
    fn default() -> Self {
        BaseUrl(DEFAULT_BASE_URL.into())
    }
}

impl BaseUrl {
    /// Trims whitespace and trailing slashes. Only `http` and `https` URLs without query or
    /// fragment are accepted.
    pub(crate) fn parse(url: &str) -> Result<Self, Error> {
        let invalid = |reason: String| Error::InvalidEndpoint {
            url: url.to_string(),
            reason,
        };
        let trimmed = url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "unsupported scheme {}; only http and https are supported",
                parsed.scheme()
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed".into()));
        }
        Ok(BaseUrl(trimmed.to_string()))
    }

    pub(crate) fn measurement_collect(
        &self,
        api_secret: &str,
        measurement_id: &str,
    ) -> Result<Url, Error> {
        self.measurement(MEASUREMENT_COLLECT_PATH, api_secret, measurement_id)
    }

    pub(crate) fn measurement_debug_collect(
        &self,
        api_secret: &str,
        measurement_id: &str,
    ) -> Result<Url, Error> {
        self.measurement(MEASUREMENT_DEBUG_COLLECT_PATH, api_secret, measurement_id)
    }

    pub(crate) fn universal_collect(&self) -> Result<Url, Error> {
        self.join(UNIVERSAL_COLLECT_PATH)
    }

    fn measurement(&self, path: &str, api_secret: &str, measurement_id: &str) -> Result<Url, Error> {
        let mut url = self.join(path)?;
        url.query_pairs_mut()
            .append_pair("api_secret", api_secret)
            .append_pair("measurement_id", measurement_id);
        Ok(url)
    }

    fn join(&self, path: &str) -> Result<Url, Error> {
        let url = format!("{}{}", self.0, path);
        Url::parse(&url).map_err(|err| Error::InvalidEndpoint {
            url,
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("https://www.google-analytics.com", "https://www.google-analytics.com" ; "default")]
    #[test_case("  http://127.0.0.1:8080/  ", "http://127.0.0.1:8080" ; "trim whitespace and slash")]
    #[test_case("https://proxy.example.com/ga//", "https://proxy.example.com/ga" ; "keep path prefix")]
    fn parse_succeeds(input: &'static str, expected: &'static str) {
        assert_eq!(BaseUrl(expected.into()), BaseUrl::parse(input).unwrap());
    }

    #[test_case("" ; "empty")]
    #[test_case("www.google-analytics.com" ; "no scheme")]
    #[test_case("ftp://example.com" ; "unsupported scheme")]
    #[test_case("https://example.com?a=b" ; "query")]
    fn parse_fails(input: &'static str) {
        assert!(matches!(
            BaseUrl::parse(input),
            Err(Error::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn measurement_urls_carry_credentials() {
        let base = BaseUrl::default();
        assert_eq!(
            "https://www.google-analytics.com/mp/collect?api_secret=s&measurement_id=G-123",
            base.measurement_collect("s", "G-123").unwrap().as_str()
        );
        assert_eq!(
            "https://www.google-analytics.com/debug/mp/collect?api_secret=s&measurement_id=G-123",
            base.measurement_debug_collect("s", "G-123").unwrap().as_str()
        );
    }

    #[test]
    fn measurement_url_encodes_query_values() {
        let url = BaseUrl::default()
            .measurement_collect("a&b=c", "G 1")
            .unwrap();
        assert_eq!(
            Some("api_secret=a%26b%3Dc&measurement_id=G+1"),
            url.query()
        );
    }

    #[test]
    fn universal_url() {
        assert_eq!(
            "http://localhost:1234/collect",
            BaseUrl::parse("http://localhost:1234/")
                .unwrap()
                .universal_collect()
                .unwrap()
                .as_str()
        );
    }
}
