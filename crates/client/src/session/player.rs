use super::Stay;
use crate::{backend::Backend, error::Error};
use model::{Attempt, Question, Quiz, RoomCode, ValentineCard};
use std::{
    fmt::{self, Display},
    time::Duration,
};

/// How long the verdict on an answer stays visible before moving on.
pub const REVEAL_DELAY: Duration = Duration::from_millis(1500);

/// Why the player could not start the quiz.
#[derive(Debug)]
pub enum Refusal {
    MissingCode,
    MissingName,
    /// The quiz exists but has no questions to answer.
    Unplayable,
    Backend(Error),
}

impl Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCode => f.write_str("Please enter a room code!"),
            Self::MissingName => f.write_str("Please enter your name!"),
            Self::Unplayable => f.write_str("This quiz has no questions yet."),
            Self::Backend(err) => write!(f, "{err}"),
        }
    }
}

/// Room code and player name, before the quiz is loaded.
#[derive(Clone, Debug, Default)]
pub struct EntryForm {
    pub code: RoomCode,
    pub name: String,
}

impl EntryForm {
    pub fn new(code: &str, name: &str) -> Self {
        Self { code: RoomCode::new(code), name: name.into() }
    }

    /// Prefills the room code from a shared link, if it carries one.
    pub fn from_link(link: &str) -> Self {
        Self { code: crate::share::room_from_link(link).unwrap_or_default(), name: String::new() }
    }

    pub async fn enter<B: Backend>(self, backend: &B) -> Result<Answering, Stay<Self, Refusal>> {
        if self.code.is_empty() {
            return Err(Stay::new(self, Refusal::MissingCode));
        }
        if self.name.trim().is_empty() {
            return Err(Stay::new(self, Refusal::MissingName));
        }

        let quiz = match backend.get_quiz(&self.code).await {
            Ok(quiz) => quiz,
            Err(err) => return Err(Stay::new(self, Refusal::Backend(err))),
        };
        if quiz.questions.is_empty() {
            return Err(Stay::new(self, Refusal::Unplayable));
        }

        log::debug!("{:?} entered quiz {}", self.name, quiz.room_code);
        Ok(Answering { quiz, player: self.name, index: 0, score: 0 })
    }
}

/// Waiting for an answer to the question at `index`.
#[derive(Clone, Debug)]
pub struct Answering {
    quiz: Quiz,
    player: String,
    index: usize,
    score: u32,
}

impl Answering {
    pub fn question(&self) -> &Question {
        &self.quiz.questions[self.index]
    }

    /// One-based position of the current question.
    pub fn position(&self) -> usize {
        self.index + 1
    }

    pub fn total(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Locks in the option at `option`. Out-of-range choices are ignored.
    pub fn select(self, option: usize) -> Result<Revealed, Self> {
        let Some(chosen) = self.question().all_options.get(option) else {
            return Err(self);
        };
        let correct = self.question().is_correct(chosen);
        let Self { quiz, player, index, score } = self;
        Ok(Revealed { quiz, player, index, score: score + u32::from(correct), chosen: option, correct })
    }
}

/// An answer is locked in and its verdict is showing.
#[derive(Clone, Debug)]
pub struct Revealed {
    quiz: Quiz,
    player: String,
    index: usize,
    score: u32,
    chosen: usize,
    correct: bool,
}

/// Where a revealed answer leads.
#[derive(Debug)]
pub enum Next {
    Answering(Answering),
    Submitting(Submitting),
}

impl Revealed {
    pub fn is_correct(&self) -> bool {
        self.correct
    }

    /// Index of the chosen option.
    pub fn chosen(&self) -> usize {
        self.chosen
    }

    pub fn correct_answer(&self) -> &str {
        &self.quiz.questions[self.index].correct_answer
    }

    /// Score including this answer.
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn advance(self) -> Next {
        let Self { quiz, player, index, score, .. } = self;
        let index = index + 1;
        if index < quiz.questions.len() {
            Next::Answering(Answering { quiz, player, index, score })
        } else {
            Next::Submitting(Submitting { quiz, player, score })
        }
    }

    /// Keeps the verdict on screen for [`REVEAL_DELAY`], then advances.
    pub async fn settle(self) -> Next {
        tokio::time::sleep(REVEAL_DELAY).await;
        self.advance()
    }
}

/// Every question is answered. The final score is not yet recorded.
#[derive(Clone, Debug)]
pub struct Submitting {
    quiz: Quiz,
    player: String,
    score: u32,
}

impl Submitting {
    pub fn attempt(&self) -> Attempt {
        Attempt { name: self.player.clone(), score: self.score }
    }

    /// Records the completion. The player sees their result even if
    /// recording fails.
    pub async fn submit<B: Backend>(self, backend: &B) -> Complete {
        if let Err(err) = backend.record_completion(&self.quiz.room_code, &self.attempt()).await {
            log::warn!("failed to record completion of quiz {}: {err}", self.quiz.room_code);
        }
        let Self { quiz, player, score } = self;
        Complete { quiz, player, score }
    }
}

/// Result tier shown next to the percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Perfect,
    Amazing,
    Great,
    NotBad,
    Discover,
}

impl Verdict {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            100.. => Self::Perfect,
            80.. => Self::Amazing,
            60.. => Self::Great,
            40.. => Self::NotBad,
            _ => Self::Discover,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect! You know everything!",
            Self::Amazing => "Amazing! You know me so well!",
            Self::Great => "Great job! We're getting there!",
            Self::NotBad => "Not bad! We'll learn more together!",
            Self::Discover => "We have so much to discover!",
        }
    }
}

/// The quiz is over.
#[derive(Clone, Debug)]
pub struct Complete {
    quiz: Quiz,
    player: String,
    score: u32,
}

impl Complete {
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn percentage(&self) -> u32 {
        match self.total() {
            0 => 0,
            total => (f64::from(self.score) * 100.0 / total as f64).round() as u32,
        }
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_percentage(self.percentage())
    }

    /// The creator's card, when they enabled one.
    pub fn card(&self) -> Option<&ValentineCard> {
        self.quiz.valentine_card.enabled.then_some(&self.quiz.valentine_card)
    }

    /// Addressee of the card. Falls back to the player when the creator left it blank.
    pub fn recipient(&self) -> &str {
        match self.quiz.partner_name.trim() {
            "" => &self.player,
            partner => partner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Answering, Complete, EntryForm, Next, Refusal, Verdict, REVEAL_DELAY};
    use crate::{
        error::Error,
        session::fake::{InProcess, Offline},
    };
    use db::Store;
    use model::{Question, RoomCode, Submission, Utc, ValentineCard};

    fn question(text: &str, answer: &str, options: &[&str]) -> Question {
        Question {
            question_text: text.into(),
            correct_answer: answer.into(),
            all_options: options.iter().map(|&o| o.into()).collect(),
        }
    }

    async fn seeded(code: &str) -> InProcess {
        let backend = InProcess::new();
        let submission = Submission {
            room_code: code.into(),
            creator_name: "Jo".into(),
            valentine_card: ValentineCard { enabled: true, ..ValentineCard::default() },
            questions: vec![
                question("What's my favorite food?", "Sushi", &["Pizza", "Sushi", "Ramen", "Tacos"]),
                question("What's my favorite color?", "Red", &["Red", "Blue", "Green", "Gold"]),
            ],
            ..Submission::default()
        };
        backend.0.create_quiz(submission).await.unwrap();
        backend
    }

    fn answer(state: Answering, option: usize) -> Next {
        state.select(option).unwrap().advance()
    }

    #[tokio::test]
    async fn entry_requires_code_and_name() {
        let backend = seeded("ROOM").await;
        let stay = EntryForm::new("", "Sam").enter(&backend).await.unwrap_err();
        assert!(matches!(stay.reason, Refusal::MissingCode));
        let stay = EntryForm::new("room", " ").enter(&backend).await.unwrap_err();
        assert!(matches!(stay.reason, Refusal::MissingName));
        assert_eq!(stay.state.code.as_str(), "ROOM");
    }

    #[tokio::test]
    async fn unknown_room_stays_on_entry() {
        let backend = seeded("ROOM").await;
        let stay = EntryForm::new("nope", "Sam").enter(&backend).await.unwrap_err();
        assert!(matches!(stay.reason, Refusal::Backend(Error::NotFound)));
        assert_eq!(stay.reason.to_string(), "Room not found! Please check the code.");

        let stay = EntryForm::new("room", "Sam").enter(&Offline).await.unwrap_err();
        assert!(matches!(stay.reason, Refusal::Backend(Error::FailedFetch)));
    }

    #[tokio::test]
    async fn empty_quiz_is_unplayable() {
        let backend = InProcess::new();
        let quiz = Submission { room_code: "EMPTY".into(), creator_name: "Jo".into(), ..Submission::default() }
            .into_quiz(Utc::now());
        backend.0.store().insert(&quiz).await.unwrap();

        let stay = EntryForm::new("empty", "Sam").enter(&backend).await.unwrap_err();
        assert!(matches!(stay.reason, Refusal::Unplayable));
    }

    #[tokio::test]
    async fn plays_through_and_records() {
        let backend = seeded("VDAY2026").await;
        let form = EntryForm::from_link("http://localhost:5173/?room=vday2026");
        let first = EntryForm { name: "Sam".into(), ..form }.enter(&backend).await.unwrap();
        assert_eq!((first.position(), first.total()), (1, 2));

        // Out-of-range choices leave the question open.
        let first = first.select(9).unwrap_err();
        let revealed = first.select(1).unwrap();
        assert!(revealed.is_correct());
        assert_eq!(revealed.correct_answer(), "Sushi");

        let Next::Answering(second) = revealed.advance() else {
            panic!("expected a second question");
        };
        assert_eq!(second.score(), 1);
        let revealed = second.select(1).unwrap();
        assert!(!revealed.is_correct());
        assert_eq!(revealed.correct_answer(), "Red");

        let Next::Submitting(submitting) = revealed.advance() else {
            panic!("expected the quiz to be over");
        };
        assert_eq!(submitting.attempt().score, 1);
        let complete = submitting.submit(&backend).await;
        assert_eq!(complete.percentage(), 50);
        assert_eq!(complete.verdict(), Verdict::NotBad);
        assert_eq!(complete.recipient(), "Sam");
        assert!(complete.card().is_some());

        let stats = backend.0.get_stats(&RoomCode::new("VDAY2026")).await.unwrap();
        assert_eq!(stats.total_completions, 1);
        assert_eq!(stats.completions[0].name, "Sam");
        assert_eq!(stats.completions[0].score, 1);
    }

    #[tokio::test]
    async fn failed_recording_still_completes() {
        let backend = seeded("LOST").await;
        let state = EntryForm::new("lost", "Sam").enter(&backend).await.unwrap();
        let Next::Answering(state) = answer(state, 1) else { panic!("expected a second question") };
        let Next::Submitting(submitting) = answer(state, 0) else { panic!("expected the quiz to be over") };

        let complete = submitting.submit(&Offline).await;
        assert_eq!(complete.score(), 2);
        assert_eq!(complete.verdict(), Verdict::Perfect);

        let stats = backend.0.get_stats(&RoomCode::new("LOST")).await.unwrap();
        assert_eq!(stats.total_completions, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn settle_waits_before_advancing() {
        let backend = seeded("SLOW").await;
        let state = EntryForm::new("slow", "Sam").enter(&backend).await.unwrap();
        let start = tokio::time::Instant::now();
        let next = state.select(0).unwrap().settle().await;
        assert!(start.elapsed() >= REVEAL_DELAY);
        assert!(matches!(next, Next::Answering(_)));
    }

    #[test]
    fn verdict_tiers() {
        let cases = [(100, Verdict::Perfect), (80, Verdict::Amazing), (79, Verdict::Great), (60, Verdict::Great)];
        for (percentage, verdict) in cases {
            assert_eq!(Verdict::from_percentage(percentage), verdict);
        }
        assert_eq!(Verdict::from_percentage(40), Verdict::NotBad);
        assert_eq!(Verdict::from_percentage(39), Verdict::Discover);
        assert_eq!(Verdict::Discover.message(), "We have so much to discover!");
    }

    #[test]
    fn percentage_rounds() {
        let quiz = Submission {
            room_code: "R".into(),
            creator_name: "Jo".into(),
            questions: vec![question("a", "a", &["a"]); 3],
            ..Submission::default()
        }
        .into_quiz(Utc::now());
        let complete = Complete { quiz, player: "Sam".into(), score: 2 };
        assert_eq!(complete.percentage(), 67);
        assert_eq!(complete.verdict(), Verdict::Great);
        assert!(complete.card().is_none());
    }
}
