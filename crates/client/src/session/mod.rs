//! Creator and player flows as explicit state machines.
//!
//! Each state owns an immutable draft and is consumed by its transitions, so
//! a state that has moved on can no longer be acted upon. Transitions that
//! may be refused hand the unchanged state back inside a [`Stay`].

pub mod creator;
pub mod player;

pub use creator::{CardConfig, Details, Invalid, Questions, SaveError, Saved};
pub use player::{Answering, Complete, EntryForm, Next, Refusal, Revealed, Submitting, Verdict, REVEAL_DELAY};

/// A refused transition: the state to continue from and why it stayed.
#[derive(Debug)]
pub struct Stay<S, R> {
    pub state: S,
    pub reason: R,
}

impl<S, R> Stay<S, R> {
    pub(crate) fn new(state: S, reason: R) -> Self {
        Self { state, reason }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use crate::{
        backend::Backend,
        error::{Error, Result},
    };
    use api::{error::Error as ServiceError, QuizService};
    use db::Memory;
    use hyper::StatusCode;
    use model::{
        reply::{ROOM_CODE_TAKEN, VALIDATION_FAILED},
        Attempt, Outcome, Quiz, RoomCode, Submission,
    };

    /// Runs the real service against an in-memory store.
    pub struct InProcess(pub QuizService<Memory>);

    impl InProcess {
        pub fn new() -> Self {
            Self(QuizService::from(Memory::default()))
        }
    }

    /// Every call fails as if the server were down.
    pub struct Offline;

    impl Backend for Offline {
        async fn create_quiz(&self, _: &Submission) -> Result<Outcome> {
            Err(Error::FailedFetch)
        }

        async fn get_quiz(&self, _: &RoomCode) -> Result<Quiz> {
            Err(Error::FailedFetch)
        }

        async fn record_completion(&self, _: &RoomCode, _: &Attempt) -> Result<()> {
            Err(Error::FailedFetch)
        }
    }

    impl Backend for InProcess {
        async fn create_quiz(&self, submission: &Submission) -> Result<Outcome> {
            match self.0.create_quiz(submission.clone()).await {
                Ok(code) => Ok(Outcome::created(code, "Quiz created successfully!")),
                Err(err @ ServiceError::RoomCodeTaken(_)) => Ok(Outcome::rejected(ROOM_CODE_TAKEN, err.to_string())),
                Err(err @ ServiceError::ValidationFailed(_)) => {
                    Ok(Outcome::rejected(VALIDATION_FAILED, err.to_string()))
                }
                Err(_) => Err(Error::Status(StatusCode::INTERNAL_SERVER_ERROR)),
            }
        }

        async fn get_quiz(&self, code: &RoomCode) -> Result<Quiz> {
            self.0.get_quiz(code).await.map_err(|err| match err {
                ServiceError::NotFound => Error::NotFound,
                _ => Error::Status(StatusCode::INTERNAL_SERVER_ERROR),
            })
        }

        async fn record_completion(&self, code: &RoomCode, attempt: &Attempt) -> Result<()> {
            self.0.record_completion(code, attempt.clone()).await.map_err(|err| match err {
                ServiceError::NotFound => Error::NotFound,
                _ => Error::Status(StatusCode::INTERNAL_SERVER_ERROR),
            })
        }
    }
}
