use crate::error::{Error, Result};
use db::Store;
use model::{Attempt, Quiz, RoomCode, Stats, Submission, Utc};

/// Business operations over a [`Store`]. Holds no state of its own, so any
/// number of instances may share one store.
pub struct QuizService<S> {
    store: S,
}

impl<S> From<S> for QuizService<S> {
    fn from(store: S) -> Self {
        Self { store }
    }
}

impl<S: Store> QuizService<S> {
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and persists a new quiz. Returns the normalized room code.
    pub async fn create_quiz(&self, submission: Submission) -> Result<RoomCode> {
        let missing = submission.missing_fields();
        if !missing.is_empty() {
            log::info!("rejected quiz {:?}: missing {}", submission.room_code.as_str(), missing.join(", "));
            return Err(Error::ValidationFailed(missing));
        }

        let quiz = submission.into_quiz(Utc::now());
        match self.store.insert(&quiz).await {
            Ok(()) => {
                log::info!("created quiz {} with {} questions", quiz.room_code, quiz.questions.len());
                Ok(quiz.room_code)
            }
            Err(db::error::Error::AlreadyExists) => {
                log::info!("room code {} is already taken", quiz.room_code);
                Err(Error::RoomCodeTaken(quiz.room_code))
            }
            Err(err) => Err(Self::escalate(err)),
        }
    }

    /// Returns the whole document, correct answers included.
    pub async fn get_quiz(&self, code: &RoomCode) -> Result<Quiz> {
        self.store.get(code).await.map_err(Self::escalate)
    }

    /// The score is trusted as-is and not checked against the question count.
    pub async fn record_completion(&self, code: &RoomCode, attempt: Attempt) -> Result<()> {
        let completion = attempt.complete_at(Utc::now());
        self.store.append_completion(code, &completion).await.map_err(Self::escalate)?;
        log::info!("{:?} scored {} on quiz {code}", completion.name, completion.score);
        Ok(())
    }

    pub async fn get_stats(&self, code: &RoomCode) -> Result<Stats> {
        let quiz = self.store.get(code).await.map_err(Self::escalate)?;
        Ok(Stats::from(quiz.completed_by))
    }

    fn escalate(err: db::error::Error) -> Error {
        let err = Error::from(err);
        if err == Error::Unrecoverable {
            log::error!("store failure surfaced to a client");
        }
        err
    }
}
