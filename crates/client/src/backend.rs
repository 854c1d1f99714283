use crate::error::{Error, Result};
use http_body_util::{BodyExt, Full};
use hyper::{
    body::Bytes,
    header::{HeaderValue, ACCEPT, CONTENT_TYPE},
    Method, Request, StatusCode, Uri,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use model::{Attempt, Outcome, Quiz, RoomCode, Submission};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;
use std::future::Future;

/// The quiz service as seen by a client session.
pub trait Backend {
    /// Business rejections arrive as an unsuccessful [`Outcome`], not as an error.
    fn create_quiz(&self, submission: &Submission) -> impl Future<Output = Result<Outcome>>;
    fn get_quiz(&self, code: &RoomCode) -> impl Future<Output = Result<Quiz>>;
    fn record_completion(&self, code: &RoomCode, attempt: &Attempt) -> impl Future<Output = Result<()>>;
}

/// Talks to the service over its HTTP/JSON contract.
pub struct HttpBackend {
    /// Service origin without a trailing slash, e.g. `http://localhost:5005`.
    base: Box<str>,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HttpBackend {
    pub fn new(base: &str) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { base: base.trim_end_matches('/').into(), client }
    }

    fn uri(&self, path: &str) -> Result<Uri> {
        Ok([self.base.as_ref(), path].concat().parse()?)
    }

    /// Path of a quiz resource. The code is percent-encoded as a single segment.
    fn quiz_path(code: &RoomCode, action: &str) -> String {
        let code = utf8_percent_encode(code.as_str(), NON_ALPHANUMERIC);
        format!("/api/quiz/{code}{action}")
    }

    async fn send(&self, method: Method, uri: Uri, body: Option<Vec<u8>>) -> Result<(StatusCode, Bytes)> {
        let mut req = Request::builder().method(method).uri(uri);
        req = req.header(ACCEPT, HeaderValue::from_static("application/json"));
        if body.is_some() {
            req = req.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let req = req.body(Full::new(body.map(Bytes::from).unwrap_or_default()))?;
        let res = self.client.request(req).await?;
        let status = res.status();
        let bytes = res.into_body().collect().await?.to_bytes();
        Ok((status, bytes))
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<(StatusCode, Bytes)> {
        let uri = self.uri(path)?;
        let payload = serde_json::to_vec(body)?;
        self.send(Method::POST, uri, Some(payload)).await
    }
}

impl Backend for HttpBackend {
    async fn create_quiz(&self, submission: &Submission) -> Result<Outcome> {
        let (status, bytes) = self.post("/api/quiz/create", submission).await?;
        match status {
            StatusCode::OK | StatusCode::CREATED => Ok(serde_json::from_slice(&bytes)?),
            status => Err(Error::Status(status)),
        }
    }

    async fn get_quiz(&self, code: &RoomCode) -> Result<Quiz> {
        let uri = self.uri(&Self::quiz_path(code, ""))?;
        let (status, bytes) = self.send(Method::GET, uri, None).await?;
        match status {
            StatusCode::OK => Ok(serde_json::from_slice(&bytes)?),
            StatusCode::NOT_FOUND => Err(Error::NotFound),
            status => Err(Error::Status(status)),
        }
    }

    async fn record_completion(&self, code: &RoomCode, attempt: &Attempt) -> Result<()> {
        let (status, _) = self.post(&Self::quiz_path(code, "/complete"), attempt).await?;
        match status {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => Err(Error::NotFound),
            status => Err(Error::Status(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HttpBackend;
    use model::RoomCode;

    #[test]
    fn base_is_normalized() {
        let backend = HttpBackend::new("http://localhost:5005/");
        assert_eq!(backend.uri("/api/quiz/ABC").unwrap(), "http://localhost:5005/api/quiz/ABC");
    }

    #[test]
    fn room_codes_are_encoded() {
        let backend = HttpBackend::new("http://localhost:5005");
        let path = HttpBackend::quiz_path(&RoomCode::new("love u"), "");
        assert_eq!(backend.uri(&path).unwrap(), "http://localhost:5005/api/quiz/LOVE%20U");
        let path = HttpBackend::quiz_path(&RoomCode::new("café"), "/complete");
        assert_eq!(path, "/api/quiz/CAF%C3%89/complete");
        assert!(backend.uri(&path).is_ok());
    }

    #[test]
    fn rejects_unparsable_base() {
        let backend = HttpBackend::new("not a url");
        assert!(backend.uri("/api/quiz/ABC").is_err());
    }
}
