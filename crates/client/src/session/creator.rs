use super::Stay;
use crate::{backend::Backend, distractor::Catalog, error::Error, share};
use model::{Question, RoomCode, Submission, Theme, ValentineCard};
use rand::Rng;
use std::fmt::{self, Display};

/// Why a creator transition was refused.
#[derive(Debug, PartialEq, Eq)]
pub enum Invalid {
    /// Room code or creator name is blank.
    MissingDetails,
    /// Question text or answer is blank.
    EmptyQuestion,
    /// No question at the requested position.
    UnknownQuestion,
    /// The quiz needs at least one question.
    NoQuestions,
}

impl Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingDetails => "Please enter both room code and your name to create the quiz.",
            Self::EmptyQuestion => "Please fill in both question and answer!",
            Self::UnknownQuestion => "That question does not exist.",
            Self::NoQuestions => "Please add at least one question before saving your quiz.",
        })
    }
}

/// Step one: who the quiz is from and for, and how it looks.
#[derive(Clone, Debug)]
pub struct Details {
    draft: Submission,
    /// Message explaining why the creator was sent back here.
    notice: Option<String>,
}

impl Default for Details {
    fn default() -> Self {
        let mut draft = Submission::default();
        draft.valentine_card.enabled = true;
        Self { draft, notice: None }
    }
}

impl Details {
    pub fn draft(&self) -> &Submission {
        &self.draft
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn room_code(mut self, code: &str) -> Self {
        self.draft.room_code = RoomCode::new(code);
        self
    }

    pub fn creator_name(mut self, name: &str) -> Self {
        self.draft.creator_name = name.into();
        self
    }

    pub fn partner_name(mut self, name: &str) -> Self {
        self.draft.partner_name = name.into();
        self
    }

    pub fn photo(mut self, url: &str) -> Self {
        self.draft.photo_url = url.into();
        self
    }

    pub fn music(mut self, tag: &str) -> Self {
        self.draft.background_music = tag.into();
        self
    }

    /// The card always follows the page theme when one is picked.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.draft.theme = theme;
        self.draft.valentine_card.style = theme.as_str().into();
        self
    }

    pub fn next(self) -> Result<Questions, Stay<Self, Invalid>> {
        if self.draft.room_code.is_empty() || self.draft.creator_name.trim().is_empty() {
            return Err(Stay::new(self, Invalid::MissingDetails));
        }
        Ok(Questions { draft: self.draft })
    }
}

/// Step two: authoring questions. Options are generated once, here.
#[derive(Clone, Debug)]
pub struct Questions {
    draft: Submission,
}

impl Questions {
    pub fn questions(&self) -> &[Question] {
        &self.draft.questions
    }

    pub fn add_question<R>(
        mut self,
        text: &str,
        answer: &str,
        catalog: &Catalog,
        rng: &mut R,
    ) -> Result<Self, Stay<Self, Invalid>>
    where
        R: Rng + ?Sized,
    {
        let (text, answer) = (text.trim(), answer.trim());
        if text.is_empty() || answer.is_empty() {
            return Err(Stay::new(self, Invalid::EmptyQuestion));
        }
        self.draft.questions.push(catalog.compose(text, answer, rng));
        Ok(self)
    }

    pub fn remove_question(mut self, index: usize) -> Result<Self, Stay<Self, Invalid>> {
        if index >= self.draft.questions.len() {
            return Err(Stay::new(self, Invalid::UnknownQuestion));
        }
        self.draft.questions.remove(index);
        Ok(self)
    }

    pub fn back(self) -> Details {
        Details { draft: self.draft, notice: None }
    }

    pub fn next(self) -> Result<CardConfig, Stay<Self, Invalid>> {
        if self.draft.questions.is_empty() {
            return Err(Stay::new(self, Invalid::NoQuestions));
        }
        Ok(CardConfig { draft: self.draft })
    }
}

/// Why saving did not reach [`Saved`].
#[derive(Debug)]
pub enum SaveError {
    /// Someone else owns the code. The creator restarts from the details
    /// step with the room code cleared and the service's message as notice.
    RoomCodeTaken(Details),
    /// The service refused the quiz for another reason.
    Rejected { state: CardConfig, message: String },
    /// The service could not be reached or answered unexpectedly.
    Failed { state: CardConfig, error: Error },
}

/// Step three: the companion card and the final save.
#[derive(Clone, Debug)]
pub struct CardConfig {
    draft: Submission,
}

impl CardConfig {
    pub fn submission(&self) -> &Submission {
        &self.draft
    }

    pub fn card(&self) -> &ValentineCard {
        &self.draft.valentine_card
    }

    pub fn enable_card(mut self, enabled: bool) -> Self {
        self.draft.valentine_card.enabled = enabled;
        self
    }

    pub fn card_style(mut self, style: &str) -> Self {
        self.draft.valentine_card.style = style.into();
        self
    }

    /// The love message doubles as the card's custom message.
    pub fn love_message(mut self, message: &str) -> Self {
        self.draft.love_message = message.into();
        self.draft.valentine_card.custom_message = message.into();
        self
    }

    pub fn back(self) -> Questions {
        Questions { draft: self.draft }
    }

    pub async fn save<B: Backend>(self, backend: &B) -> Result<Saved, SaveError> {
        let outcome = match backend.create_quiz(&self.draft).await {
            Ok(outcome) => outcome,
            Err(error) => {
                log::warn!("cannot save quiz {}: {error}", self.draft.room_code);
                return Err(SaveError::Failed { state: self, error });
            }
        };

        if outcome.success {
            let room_code = outcome.room_code.unwrap_or_else(|| self.draft.room_code.clone());
            return Ok(Saved { room_code, draft: self.draft });
        }

        if outcome.is_room_code_taken() {
            let mut draft = self.draft;
            draft.room_code = RoomCode::default();
            return Err(SaveError::RoomCodeTaken(Details { draft, notice: Some(outcome.message) }));
        }

        Err(SaveError::Rejected { state: self, message: outcome.message })
    }
}

/// The quiz is persisted and ready to share.
#[derive(Clone, Debug)]
pub struct Saved {
    room_code: RoomCode,
    draft: Submission,
}

impl Saved {
    pub fn room_code(&self) -> &RoomCode {
        &self.room_code
    }

    pub fn submission(&self) -> &Submission {
        &self.draft
    }

    pub fn share_link(&self, base: &str) -> String {
        share::share_link(base, &self.room_code)
    }
}
