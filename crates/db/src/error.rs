use core::fmt::{self, Display};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The room code we are trying to insert already exists.
    AlreadyExists,
    /// No quiz has the requested room code.
    NotFound,
    /// Unrecoverable error.
    Fatal,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AlreadyExists => "room code already exists",
            Self::NotFound => "quiz not found",
            Self::Fatal => "unrecoverable storage failure",
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
