use crate::{http_client::HttpClient, EndpointKind, Error, USER_AGENT};
use http::{header, Request, StatusCode};
use std::io::Read;
use url::Url;

pub(crate) const CONTENT_TYPE_JSON: &str = "application/json";
pub(crate) const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// A response whose body has been read to the end.
#[derive(Debug)]
pub(crate) struct Reply {
    pub(crate) endpoint: EndpointKind,
    pub(crate) status: StatusCode,
    pub(crate) body: String,
}

impl Reply {
    /// Anything outside of `200..300` is an error carrying status and body.
    pub(crate) fn error_for_status(self) -> Result<Self, Error> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(Error::Status {
                endpoint: self.endpoint,
                status: self.status.as_u16(),
                body: self.body,
            })
        }
    }
}

/// Posts `body` to `url` and drains the response, whatever its status.
pub(crate) fn send<C: HttpClient>(
    client: &C,
    endpoint: EndpointKind,
    url: &Url,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<Reply, Error> {
    let request = Request::post(url.as_str())
        .header(header::USER_AGENT, USER_AGENT)
        .header(header::CONTENT_TYPE, content_type)
        .body(body)
        .map_err(|err| Error::InvalidEndpoint {
            url: url.to_string(),
            reason: err.to_string(),
        })?;

    // No retries. Callers decide whether to try again.
    let response = client
        .send(request)
        .map_err(|source| Error::Connection { endpoint, source })?;
    let status = response.status();
    let mut bytes = Vec::new();
    response
        .into_body()
        .read_to_end(&mut bytes)
        .map_err(|source| Error::ReadResponse { endpoint, source })?;

    Ok(Reply {
        endpoint,
        status,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}
