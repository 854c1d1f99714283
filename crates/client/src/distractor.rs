//! Plausible wrong answers for free-text questions.
//!
//! A question is sorted into a category by keyword, then up to
//! [`DECOY_COUNT`] decoys are drawn from that category's word list and
//! shuffled together with the correct answer. Both the keyword rules and the
//! word lists are data, see [`Catalog`].

use model::Question;
use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;
use std::collections::HashMap;

/// Maximum number of wrong answers generated per question.
pub const DECOY_COUNT: usize = 3;

const BUILTIN: &str = include_str!("catalog.json");

/// Maps a category to the keywords that select it.
#[derive(Clone, Debug, Deserialize)]
pub struct Rule {
    pub category: String,
    pub keywords: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Catalog {
    /// Checked in order. The first rule with a matching keyword wins.
    rules: Vec<Rule>,
    /// Category used when no rule matches.
    fallback: String,
    decoys: HashMap<String, Vec<String>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::from_json(BUILTIN).expect("built-in catalog must be valid")
    }
}

impl Catalog {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Case-insensitive substring match of the question against every rule.
    pub fn classify(&self, question: &str) -> &str {
        let question = question.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|keyword| question.contains(&keyword.to_lowercase())))
            .map_or(self.fallback.as_str(), |rule| rule.category.as_str())
    }

    /// Word list of a category. Unknown categories have no decoys.
    pub fn decoys(&self, category: &str) -> &[String] {
        self.decoys.get(category).map(Vec::as_slice).unwrap_or_default()
    }

    /// Decoys of the question's category that differ from the answer, without duplicates.
    fn candidates(&self, question: &str, answer: &str) -> Vec<&str> {
        let answer = answer.to_lowercase();
        let mut seen = vec![answer];
        let mut candidates = Vec::new();
        for decoy in self.decoys(self.classify(question)) {
            let folded = decoy.to_lowercase();
            if seen.contains(&folded) {
                continue;
            }
            seen.push(folded);
            candidates.push(decoy.as_str());
        }
        candidates
    }

    /// Builds the shuffled option list for a question. The correct answer
    /// appears exactly once, next to at most [`DECOY_COUNT`] distinct decoys.
    pub fn options<R>(&self, question: &str, answer: &str, rng: &mut R) -> Vec<String>
    where
        R: Rng + ?Sized,
    {
        let candidates = self.candidates(question, answer);
        let mut options: Vec<String> =
            candidates.choose_multiple(rng, DECOY_COUNT).map(|&decoy| decoy.to_owned()).collect();
        options.push(answer.to_owned());
        options.shuffle(rng);
        options
    }

    /// Authors a complete question. Its option order is final.
    pub fn compose<R>(&self, question: &str, answer: &str, rng: &mut R) -> Question
    where
        R: Rng + ?Sized,
    {
        Question {
            question_text: question.to_owned(),
            correct_answer: answer.to_owned(),
            all_options: self.options(question, answer, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, DECOY_COUNT};
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::default();
        for category in ["color", "food", "place", "hobby", "movie", "default"] {
            assert!(catalog.decoys(category).len() >= DECOY_COUNT, "{category}");
        }
    }

    #[test]
    fn classifies_by_first_matching_rule() {
        let catalog = Catalog::default();
        assert_eq!(catalog.classify("What's my favorite color?"), "color");
        assert_eq!(catalog.classify("Where do I want to travel?"), "place");
        assert_eq!(catalog.classify("What do I EAT for breakfast?"), "food");
        assert_eq!(catalog.classify("What do I do on weekends?"), "hobby");
        assert_eq!(catalog.classify("Best FILM ever?"), "movie");
        assert_eq!(catalog.classify("When is my birthday?"), "default");
    }

    #[test]
    fn options_hold_the_answer_once() {
        let catalog = Catalog::default();
        let mut rng = StdRng::seed_from_u64(14);
        for (question, answer) in [
            ("What's my favorite food?", "Sushi"),
            ("What's my favorite color?", "red"),
            ("Where did we meet?", "Under the stars"),
            ("Favorite movie genre?", "Comedy"),
            ("Will you be mine?", "Yes"),
        ] {
            let options = catalog.options(question, answer, &mut rng);
            assert_eq!(options.iter().filter(|o| o.as_str() == answer).count(), 1);
            let lowered: HashSet<_> = options.iter().map(|o| o.to_lowercase()).collect();
            assert_eq!(lowered.len(), options.len(), "{options:?}");
            assert_eq!(options.len(), 1 + DECOY_COUNT);
        }
    }

    #[test]
    fn correct_answer_is_never_a_decoy() {
        let catalog = Catalog::default();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let options = catalog.options("What's my favorite color?", "RED", &mut rng);
            assert!(!options.iter().any(|o| o == "Red"));
        }
    }

    #[test]
    fn small_lists_yield_fewer_decoys() {
        let catalog = Catalog::from_json(
            r#"{
                "fallback": "misc",
                "rules": [{ "category": "pet", "keywords": ["pet"] }],
                "decoys": { "pet": ["Cat", "Dog", "cat"], "misc": [] }
            }"#,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        let options = catalog.options("Which pet?", "Dog", &mut rng);
        assert_eq!(options.len(), 2);
        assert!(options.contains(&"Cat".to_owned()));

        assert_eq!(catalog.options("Anything?", "Sure", &mut rng), ["Sure"]);
    }

    #[test]
    fn same_seed_same_order() {
        let catalog = Catalog::default();
        let first = catalog.compose("What's my favorite food?", "Sushi", &mut StdRng::seed_from_u64(2026));
        let second = catalog.compose("What's my favorite food?", "Sushi", &mut StdRng::seed_from_u64(2026));
        assert_eq!(first, second);
        assert!(first.has_single_correct_option());
    }
}
