use alloc::{string::String, vec::Vec};
use core::fmt::{self, Display};
use model::RoomCode;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Required fields are absent or blank. Holds the field paths.
    ValidationFailed(Vec<String>),
    /// Another quiz already uses this room code.
    RoomCodeTaken(RoomCode),
    /// No quiz has the requested room code.
    NotFound,
    /// The store failed. Details are logged, never shown.
    Unrecoverable,
}

impl From<db::error::Error> for Error {
    fn from(err: db::error::Error) -> Self {
        match err {
            db::error::Error::NotFound => Self::NotFound,
            db::error::Error::AlreadyExists | db::error::Error::Fatal => Self::Unrecoverable,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(fields) => write!(f, "Missing required fields: {}", fields.join(", ")),
            Self::RoomCodeTaken(code) => write!(
                f,
                "The room code \"{code}\" is already being used by another lovely couple. \
                 Please choose a different code to create your unique love quiz!"
            ),
            Self::NotFound => f.write_str("Quiz not found"),
            Self::Unrecoverable => f.write_str("Oops! We have encountered an unrecoverable error on our end."),
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
