#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
mod memory;

use core::future::Future;
use tokio_postgres::{error::SqlState, types::Json};

pub use memory::Memory;
pub use model::{Completion, Quiz, RoomCode};
pub use tokio_postgres::{tls::NoTls, Client, Config};

/// Durable mapping from room codes to quiz documents.
///
/// Implementations must make [`insert`](Store::insert) an atomic
/// insert-if-absent and [`append_completion`](Store::append_completion) an
/// atomic append: readers observe either all or none of an append.
pub trait Store: Send + Sync {
    /// Fails with [`AlreadyExists`](error::Error::AlreadyExists) if the room code is taken.
    fn insert(&self, quiz: &Quiz) -> impl Future<Output = error::Result<()>> + Send;
    fn get(&self, code: &RoomCode) -> impl Future<Output = error::Result<Quiz>> + Send;
    fn append_completion(
        &self,
        code: &RoomCode,
        completion: &Completion,
    ) -> impl Future<Output = error::Result<()>> + Send;
}

/// Creates the `quiz` table if it does not exist yet.
const SCHEMA: &str = include_str!("schema.sql");

pub struct Database(Client);

impl From<Client> for Database {
    fn from(client: Client) -> Self {
        Self(client)
    }
}

fn fatal(err: tokio_postgres::Error) -> error::Error {
    log::error!("database failure: {err}");
    error::Error::Fatal
}

fn deserialize_quiz_from_row(row: tokio_postgres::Row) -> Result<Quiz, tokio_postgres::Error> {
    let room_code: &str = row.try_get("room_code")?;
    let theme: &str = row.try_get("theme")?;
    let Json(valentine_card) = row.try_get("valentine_card")?;
    let Json(questions) = row.try_get("questions")?;
    let Json(completed_by) = row.try_get("completed_by")?;
    Ok(Quiz {
        room_code: room_code.into(),
        creator_name: row.try_get("creator_name")?,
        partner_name: row.try_get("partner_name")?,
        photo_url: row.try_get("photo_url")?,
        background_music: row.try_get("background_music")?,
        theme: theme.parse().unwrap_or_default(),
        love_message: row.try_get("love_message")?,
        valentine_card,
        questions,
        completed_by,
        created_at: row.try_get("created_at")?,
    })
}

impl Database {
    pub async fn init_schema(&self) -> error::Result<()> {
        self.0.batch_execute(SCHEMA).await.map_err(fatal)
    }
}

impl Store for Database {
    async fn insert(&self, quiz: &Quiz) -> error::Result<()> {
        let code = quiz.room_code.as_str();
        let theme = quiz.theme.as_str();
        let card = Json(&quiz.valentine_card);
        let questions = Json(&quiz.questions);
        let completed_by = Json(&quiz.completed_by);
        let err = match self
            .0
            .execute(
                "INSERT INTO quiz (room_code, creator_name, partner_name, photo_url, background_music, theme, \
                 love_message, valentine_card, questions, completed_by, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
                &[
                    &code,
                    &quiz.creator_name,
                    &quiz.partner_name,
                    &quiz.photo_url,
                    &quiz.background_music,
                    &theme,
                    &quiz.love_message,
                    &card,
                    &questions,
                    &completed_by,
                    &quiz.created_at,
                ],
            )
            .await
        {
            Ok(_) => return Ok(()),
            Err(err) => err,
        };

        match err.as_db_error() {
            Some(db) if *db.code() == SqlState::UNIQUE_VIOLATION => Err(error::Error::AlreadyExists),
            _ => Err(fatal(err)),
        }
    }

    async fn get(&self, code: &RoomCode) -> error::Result<Quiz> {
        let code = code.as_str();
        let row = self
            .0
            .query_opt(
                "SELECT room_code, creator_name, partner_name, photo_url, background_music, theme, love_message, \
                 valentine_card, questions, completed_by, created_at FROM quiz WHERE room_code = $1",
                &[&code],
            )
            .await
            .map_err(fatal)?
            .ok_or(error::Error::NotFound)?;
        deserialize_quiz_from_row(row).map_err(fatal)
    }

    async fn append_completion(&self, code: &RoomCode, completion: &Completion) -> error::Result<()> {
        let code = code.as_str();
        let entry = Json(core::slice::from_ref(completion));
        match self
            .0
            .execute(
                "UPDATE quiz SET completed_by = completed_by || $2::JSONB WHERE room_code = $1",
                &[&code, &entry],
            )
            .await
            .map_err(fatal)?
        {
            0 => Err(error::Error::NotFound),
            _ => Ok(()),
        }
    }
}
