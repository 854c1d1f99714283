use crate::{error, Completion, Quiz, RoomCode, Store};
use dashmap::{mapref::entry::Entry, DashMap};

/// Process-local store. Every mutation happens under the shard lock of its
/// room code, which keeps inserts and appends linearizable per code.
#[derive(Default)]
pub struct Memory(DashMap<RoomCode, Quiz>);

impl Memory {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Store for Memory {
    async fn insert(&self, quiz: &Quiz) -> error::Result<()> {
        match self.0.entry(quiz.room_code.clone()) {
            Entry::Occupied(_) => Err(error::Error::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(quiz.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, code: &RoomCode) -> error::Result<Quiz> {
        self.0.get(code).map(|quiz| quiz.value().clone()).ok_or(error::Error::NotFound)
    }

    async fn append_completion(&self, code: &RoomCode, completion: &Completion) -> error::Result<()> {
        let mut quiz = self.0.get_mut(code).ok_or(error::Error::NotFound)?;
        quiz.completed_by.push(completion.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Memory, Store};
    use crate::error::Error;
    use model::{Attempt, Question, Quiz, RoomCode, Submission, Utc};
    use std::sync::Arc;

    fn sample(code: &str) -> Quiz {
        Submission {
            room_code: code.into(),
            creator_name: "Jo".into(),
            questions: vec![Question {
                question_text: "Where did we meet?".into(),
                correct_answer: "Ella".into(),
                all_options: vec!["Ella".into(), "Kandy".into()],
            }],
            ..Submission::default()
        }
        .into_quiz(Utc::now())
    }

    #[tokio::test]
    async fn rejects_duplicate_codes() {
        let store = Memory::default();
        store.insert(&sample("abc123")).await.unwrap();
        assert_eq!(store.insert(&sample("ABC123")).await, Err(Error::AlreadyExists));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn unknown_codes_are_not_found() {
        let store = Memory::default();
        let code = RoomCode::new("nothing");
        let done = Attempt { name: "Sam".into(), score: 0 }.complete_at(Utc::now());
        assert_eq!(store.get(&code).await, Err(Error::NotFound));
        assert_eq!(store.append_completion(&code, &done).await, Err(Error::NotFound));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn appends_in_order() {
        let store = Memory::default();
        let quiz = sample("order");
        store.insert(&quiz).await.unwrap();

        for (name, score) in [("Sam", 1), ("Alex", 0), ("Sam", 1)] {
            let done = Attempt { name: name.into(), score }.complete_at(Utc::now());
            store.append_completion(&quiz.room_code, &done).await.unwrap();
        }

        let stored = store.get(&quiz.room_code).await.unwrap();
        let names: Vec<_> = stored.completed_by.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Sam", "Alex", "Sam"]);
        assert_eq!(stored.questions, quiz.questions);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_have_one_winner() {
        let store = Arc::new(Memory::default());
        let handles = (0..32).map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.insert(&sample("race")).await })
        });

        let results = futures_util::future::join_all(handles).await;
        let wins = results.iter().filter(|res| matches!(res, Ok(Ok(())))).count();
        let conflicts = results.iter().filter(|res| matches!(res, Ok(Err(Error::AlreadyExists)))).count();
        assert_eq!(wins, 1);
        assert_eq!(conflicts, 31);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_are_all_kept() {
        let store = Arc::new(Memory::default());
        let quiz = sample("party");
        store.insert(&quiz).await.unwrap();

        let handles = (0..50u32).map(|score| {
            let store = Arc::clone(&store);
            let code = quiz.room_code.clone();
            tokio::spawn(async move {
                let done = Attempt { name: "guest".into(), score }.complete_at(Utc::now());
                store.append_completion(&code, &done).await
            })
        });

        for res in futures_util::future::join_all(handles).await {
            res.unwrap().unwrap();
        }

        let stored = store.get(&quiz.room_code).await.unwrap();
        assert_eq!(stored.completed_by.len(), 50);
    }
}
