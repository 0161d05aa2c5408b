use http::{Request, Response};
use std::{fmt::Debug, io::Read, time::Duration};

/// Timeout applied to every request made by [`default_client`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Error returned by an [`HttpClient`] when a request could not be completed.
pub type HttpError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Response body that has not been read yet.
pub type ResponseBody = Box<dyn Read + Send>;

/// A blocking HTTP client.
///
/// Implementations send the request as given and hand back the response as soon as the status is
/// known. The body is read by the caller, so failures reading it can be told apart from failures
/// connecting.
pub trait HttpClient: Debug {
    /// Send a request and return the response with its body still unread.
    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<ResponseBody>, HttpError>;
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<ResponseBody>, HttpError> {
        (**self).send(request)
    }
}

#[cfg(feature = "reqwest-client")]
mod reqwest {
    use super::{HttpClient, HttpError, Request, Response, ResponseBody};

    impl HttpClient for reqwest::blocking::Client {
        fn send(&self, request: Request<Vec<u8>>) -> Result<Response<ResponseBody>, HttpError> {
            let response = self.execute(request.try_into()?)?;
            let status = response.status();
            let body: ResponseBody = Box::new(response);
            Ok(Response::builder().status(status).body(body)?)
        }
    }
}

/// Create the client used by the `send_*` functions: a `reqwest` blocking client with a
/// [`DEFAULT_TIMEOUT`] request timeout.
#[cfg(feature = "reqwest-client")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest-client")))]
pub fn default_client() -> Result<::reqwest::blocking::Client, crate::Error> {
    ::reqwest::blocking::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .map_err(|err| crate::Error::BuildClient(err.into()))
}
