use hyper::StatusCode;
use serde_json::error::Category;
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    /// The service could not be reached.
    FailedFetch,
    /// The request could not be built, typically due to a bad base URL.
    InvalidUri,
    /// JSON syntax error detected.
    Syntax,
    /// Unexpected data types encountered.
    Data,
    /// No quiz has the requested room code.
    NotFound,
    /// The service answered with an unexpected status.
    Status(StatusCode),
}

impl From<hyper_util::client::legacy::Error> for Error {
    fn from(_: hyper_util::client::legacy::Error) -> Self {
        Self::FailedFetch
    }
}

impl From<hyper::Error> for Error {
    fn from(_: hyper::Error) -> Self {
        Self::FailedFetch
    }
}

impl From<http::Error> for Error {
    fn from(_: http::Error) -> Self {
        Self::InvalidUri
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(_: http::uri::InvalidUri) -> Self {
        Self::InvalidUri
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::Data,
            Category::Syntax | Category::Eof => Self::Syntax,
            Category::Io => Self::FailedFetch,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailedFetch => f.write_str("Could not connect to the server."),
            Self::InvalidUri => f.write_str("Invalid server address."),
            Self::Syntax => f.write_str("Syntax error in JSON detected."),
            Self::Data => f.write_str("Unexpected data types detected."),
            Self::NotFound => f.write_str("Room not found! Please check the code."),
            Self::Status(status) => write!(f, "Unexpected response from the server ({status})."),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
