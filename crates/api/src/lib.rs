extern crate alloc;

mod cors;
pub mod error;
mod quiz;
mod service;

pub use cors::Cors;
pub use http_body_util::Full;
pub use hyper::body::Bytes;
pub use service::QuizService;

use alloc::{boxed::Box, vec::Vec};
use db::Store;
use hyper::{body::Body, header::ORIGIN, Method, Request, Response, StatusCode};
use model::RoomCode;
use percent_encoding::percent_decode_str;

/// Photos travel inside the JSON body as data URIs, hence the generous default.
pub const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Routes HTTP requests to the [`QuizService`].
pub struct Handler<S> {
    service: QuizService<S>,
    cors: Cors,
    body_limit: usize,
}

impl<S: Store> Handler<S> {
    pub fn new(service: QuizService<S>, cors: Cors) -> Self {
        Self { service, cors, body_limit: DEFAULT_BODY_LIMIT }
    }

    pub fn with_body_limit(self, body_limit: usize) -> Self {
        Self { body_limit, ..self }
    }

    pub fn service(&self) -> &QuizService<S> {
        &self.service
    }

    /// Never fails: every outcome, including transport errors, becomes a JSON response.
    pub async fn respond<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        if req.method() == Method::OPTIONS {
            let mut res = Response::new(Full::new(Bytes::new()));
            *res.status_mut() = StatusCode::NO_CONTENT;
            self.cors.decorate_preflight(req.headers(), res.headers_mut());
            return res;
        }

        let origin = req.headers().get(ORIGIN).cloned();
        let mut res = self.try_respond(req).await.unwrap_or_else(quiz::reply_status);
        self.cors.decorate(origin.as_ref(), res.headers_mut());
        res
    }

    async fn try_respond<B>(&self, req: Request<B>) -> Result<Response<Full<Bytes>>, StatusCode>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        // Room codes may arrive percent-encoded, e.g. `LOVE%20U` or `CAF%C3%A9`.
        let decoded: Vec<_> =
            path.trim_matches('/').split('/').map(|segment| percent_decode_str(segment).decode_utf8_lossy()).collect();
        let segments: Vec<&str> = decoded.iter().map(|segment| &**segment).collect();
        log::debug!("{method} {path}");

        Ok(match (&method, segments.as_slice()) {
            (&Method::GET, [""]) => quiz::health(),
            (&Method::POST, ["api", "quiz", "create"]) => {
                let submission = quiz::read_json(req.into_body(), self.body_limit).await?;
                quiz::create(&self.service, submission).await
            }
            (&Method::GET, ["api", "quiz", code]) => quiz::get(&self.service, &RoomCode::new(code)).await,
            (&Method::POST, ["api", "quiz", code, "complete"]) => {
                let code = RoomCode::new(code);
                let attempt = quiz::read_json(req.into_body(), self.body_limit).await?;
                quiz::complete(&self.service, &code, attempt).await
            }
            (&Method::GET, ["api", "quiz", code, "stats"]) => quiz::stats(&self.service, &RoomCode::new(code)).await,
            _ => quiz::fallback(&method, &path),
        })
    }
}
