use crate::{RoomCode, Timestamp};
use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};

/// Visual theme of the quiz pages and the companion card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Classic,
    Modern,
    Vintage,
    Playful,
    Elegant,
}

impl Theme {
    pub const ALL: [Self; 5] = [Self::Classic, Self::Modern, Self::Vintage, Self::Playful, Self::Elegant];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Modern => "modern",
            Self::Vintage => "vintage",
            Self::Playful => "playful",
            Self::Elegant => "elegant",
        }
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|theme| theme.as_str() == s).ok_or(())
    }
}

/// Unknown, missing, or `null` themes silently fall back to [`Theme::Classic`].
fn deserialize_lenient_theme<'de, D>(deserializer: D) -> Result<Theme, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|name| name.parse().ok()).unwrap_or_default())
}

fn default_music() -> String {
    "romantic_theme".into()
}

fn default_card_style() -> String {
    Theme::Classic.as_str().into()
}

/// Rendering configuration of the shareable card. Unrelated to scoring.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValentineCard {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_card_style")]
    pub style: String,
    #[serde(default)]
    pub custom_message: String,
}

impl Default for ValentineCard {
    fn default() -> Self {
        Self { enabled: false, style: default_card_style(), custom_message: String::new() }
    }
}

/// A single multiple-choice question.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub correct_answer: String,
    /// Presentation order, fixed when the question was authored.
    #[serde(default)]
    pub all_options: Vec<String>,
}

impl Question {
    pub fn is_correct(&self, choice: &str) -> bool {
        self.correct_answer == choice
    }

    /// Whether the correct answer appears exactly once among the options.
    pub fn has_single_correct_option(&self) -> bool {
        self.all_options.iter().filter(|option| self.is_correct(option)).count() == 1
    }
}

/// One play-through of a quiz.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    #[serde(default)]
    pub name: String,
    pub score: u32,
    pub completed_at: Timestamp,
}

/// Body of a completion submission. The timestamp is assigned by the server.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attempt {
    #[serde(default)]
    pub name: String,
    pub score: u32,
}

impl Attempt {
    pub fn complete_at(self, completed_at: Timestamp) -> Completion {
        let Self { name, score } = self;
        Completion { name, score, completed_at }
    }
}

/// A persisted quiz document.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub room_code: RoomCode,
    pub creator_name: String,
    #[serde(default)]
    pub partner_name: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default = "default_music")]
    pub background_music: String,
    #[serde(default, deserialize_with = "deserialize_lenient_theme")]
    pub theme: Theme,
    #[serde(default)]
    pub love_message: String,
    #[serde(default)]
    pub valentine_card: ValentineCard,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub completed_by: Vec<Completion>,
    pub created_at: Timestamp,
}

/// Acceptable schema for new quizzes. Every field is optional on the wire so
/// that validation can report all of the missing ones at once.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default)]
    pub room_code: RoomCode,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub partner_name: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default = "default_music")]
    pub background_music: String,
    #[serde(default, deserialize_with = "deserialize_lenient_theme")]
    pub theme: Theme,
    #[serde(default)]
    pub love_message: String,
    #[serde(default)]
    pub valentine_card: ValentineCard,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Default for Submission {
    fn default() -> Self {
        Self {
            room_code: RoomCode::default(),
            creator_name: String::new(),
            partner_name: String::new(),
            photo_url: String::new(),
            background_music: default_music(),
            theme: Theme::default(),
            love_message: String::new(),
            valentine_card: ValentineCard::default(),
            questions: Vec::new(),
        }
    }
}

impl Submission {
    /// Lists the paths of every required field that is absent or blank.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.room_code.is_empty() {
            missing.push("roomCode".to_string());
        }
        if self.creator_name.trim().is_empty() {
            missing.push("creatorName".to_string());
        }
        if self.questions.is_empty() {
            missing.push("questions".to_string());
        }

        for (i, question) in self.questions.iter().enumerate() {
            if question.question_text.trim().is_empty() {
                missing.push(alloc::format!("questions.{i}.questionText"));
            }
            if question.correct_answer.trim().is_empty() {
                missing.push(alloc::format!("questions.{i}.correctAnswer"));
            } else if !question.has_single_correct_option() {
                missing.push(alloc::format!("questions.{i}.allOptions"));
            }
        }

        missing
    }

    /// Stamps the submission into a fresh document with no completions.
    pub fn into_quiz(self, created_at: Timestamp) -> Quiz {
        let Self {
            room_code,
            creator_name,
            partner_name,
            photo_url,
            background_music,
            theme,
            love_message,
            valentine_card,
            questions,
        } = self;
        Quiz {
            room_code,
            creator_name,
            partner_name,
            photo_url,
            background_music,
            theme,
            love_message,
            valentine_card,
            questions,
            completed_by: Vec::new(),
            created_at,
        }
    }
}
