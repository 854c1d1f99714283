use crate::{error::Error, QuizService};
use alloc::{boxed::Box, string::ToString};
use db::Store;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::{
    body::{Body, Bytes},
    header::{HeaderValue, CONTENT_TYPE},
    Method, Response, StatusCode,
};
use model::{
    reply::{ROOM_CODE_TAKEN, VALIDATION_FAILED},
    Attempt, Outcome, RoomCode, Submission, Utc,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const ENDPOINTS: [&str; 5] = [
    "GET /",
    "POST /api/quiz/create",
    "GET /api/quiz/:code",
    "POST /api/quiz/:code/complete",
    "GET /api/quiz/:code/stats",
];

pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let mut res = match serde_json::to_vec(body) {
        Ok(bytes) => Response::new(Full::new(Bytes::from(bytes))),
        Err(err) => {
            log::error!("cannot serialize response body: {err}");
            let mut res = Response::new(Full::new(Bytes::new()));
            *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            return res;
        }
    };
    *res.status_mut() = status;
    res.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    res
}

/// Collects at most `limit` bytes of the body and parses them as JSON.
pub async fn read_json<B, T>(body: B, limit: usize) -> Result<T, StatusCode>
where
    B: Body,
    B::Error: Into<BoxError>,
    T: DeserializeOwned,
{
    let bytes = Limited::new(body, limit)
        .collect()
        .await
        .map_err(|err| {
            if err.downcast_ref::<LengthLimitError>().is_some() {
                StatusCode::PAYLOAD_TOO_LARGE
            } else {
                StatusCode::BAD_REQUEST
            }
        })?
        .to_bytes();
    serde_json::from_slice(&bytes).map_err(|err| {
        log::debug!("malformed JSON body: {err}");
        StatusCode::BAD_REQUEST
    })
}

/// Transport-level failures that never reached the service.
pub fn reply_status(status: StatusCode) -> Response<Full<Bytes>> {
    let message = match status {
        StatusCode::PAYLOAD_TOO_LARGE => "Request body is too large.",
        StatusCode::BAD_REQUEST => "Malformed request body.",
        _ => "Oops! We have encountered an unrecoverable error on our end.",
    };
    let error = status.canonical_reason().unwrap_or("Error");
    json(status, &Outcome::rejected(error, message))
}

fn unrecoverable(err: &Error) -> Response<Full<Bytes>> {
    json(StatusCode::INTERNAL_SERVER_ERROR, &json!({ "success": false, "message": err.to_string() }))
}

fn quiz_not_found() -> Response<Full<Bytes>> {
    json(StatusCode::NOT_FOUND, &json!({ "message": Error::NotFound.to_string() }))
}

pub fn health() -> Response<Full<Bytes>> {
    json(
        StatusCode::OK,
        &json!({
            "status": "OK",
            "message": "Valentine Quiz API is running!",
            "timestamp": Utc::now(),
            "endpoints": {
                "createQuiz": ENDPOINTS[1],
                "getQuiz": ENDPOINTS[2],
                "complete": ENDPOINTS[3],
                "stats": ENDPOINTS[4],
            },
        }),
    )
}

pub fn fallback(method: &Method, path: &str) -> Response<Full<Bytes>> {
    json(
        StatusCode::NOT_FOUND,
        &json!({
            "error": "Not Found",
            "message": alloc::format!("Cannot {method} {path}"),
            "availableEndpoints": ENDPOINTS,
        }),
    )
}

pub async fn create<S: Store>(service: &QuizService<S>, submission: Submission) -> Response<Full<Bytes>> {
    match service.create_quiz(submission).await {
        Ok(code) => json(StatusCode::CREATED, &Outcome::created(code, "Quiz created successfully!")),
        // Business rejections are successful requests with a negative outcome.
        Err(err @ Error::RoomCodeTaken(_)) => json(StatusCode::OK, &Outcome::rejected(ROOM_CODE_TAKEN, err.to_string())),
        Err(err @ Error::ValidationFailed(_)) => {
            json(StatusCode::OK, &Outcome::rejected(VALIDATION_FAILED, err.to_string()))
        }
        Err(err) => unrecoverable(&err),
    }
}

pub async fn get<S: Store>(service: &QuizService<S>, code: &RoomCode) -> Response<Full<Bytes>> {
    match service.get_quiz(code).await {
        Ok(quiz) => json(StatusCode::OK, &quiz),
        Err(Error::NotFound) => json(
            StatusCode::NOT_FOUND,
            &json!({ "success": false, "message": "Room not found. Please check the code!" }),
        ),
        Err(err) => unrecoverable(&err),
    }
}

pub async fn complete<S: Store>(service: &QuizService<S>, code: &RoomCode, attempt: Attempt) -> Response<Full<Bytes>> {
    match service.record_completion(code, attempt).await {
        Ok(()) => json(StatusCode::OK, &Outcome::accepted("Score saved!")),
        Err(Error::NotFound) => quiz_not_found(),
        Err(err) => unrecoverable(&err),
    }
}

pub async fn stats<S: Store>(service: &QuizService<S>, code: &RoomCode) -> Response<Full<Bytes>> {
    match service.get_stats(code).await {
        Ok(stats) => json(StatusCode::OK, &stats),
        Err(Error::NotFound) => quiz_not_found(),
        Err(err) => unrecoverable(&err),
    }
}
