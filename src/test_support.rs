use crate::http_client::{HttpClient, HttpError, ResponseBody};
use http::{Request, Response};
use std::{
    cell::{Ref, RefCell},
    collections::VecDeque,
    io,
};

/// What the next request gets back.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Scripted {
    Reply(u16, &'static str),
    ConnectionFailure,
    BrokenBody(u16),
}

/// Records requests and answers them from a script. Unscripted requests get `204 No Content`.
#[derive(Debug, Default)]
pub(crate) struct RecordingClient {
    requests: RefCell<Vec<Request<Vec<u8>>>>,
    script: RefCell<VecDeque<Scripted>>,
}

impl RecordingClient {
    pub(crate) fn with_responses(script: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            requests: RefCell::default(),
            script: RefCell::new(script.into_iter().collect()),
        }
    }

    pub(crate) fn requests(&self) -> Ref<'_, Vec<Request<Vec<u8>>>> {
        self.requests.borrow()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

struct BrokenReader;

impl io::Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
    }
}

impl HttpClient for RecordingClient {
    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<ResponseBody>, HttpError> {
        self.requests.borrow_mut().push(request);
        let next = self
            .script
            .borrow_mut()
            .pop_front()
            .unwrap_or(Scripted::Reply(204, ""));
        let (status, body): (u16, ResponseBody) = match next {
            Scripted::Reply(status, body) => (status, Box::new(io::Cursor::new(body.as_bytes()))),
            Scripted::ConnectionFailure => return Err("connection refused".into()),
            Scripted::BrokenBody(status) => (status, Box::new(BrokenReader)),
        };
        Ok(Response::builder().status(status).body(body)?)
    }
}
