#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod quiz;
pub mod reply;
pub mod room;
pub mod stats;

pub use chrono::{DateTime, Utc};
pub use quiz::{Attempt, Completion, Question, Quiz, Submission, Theme, ValentineCard};
pub use reply::Outcome;
pub use room::RoomCode;
pub use stats::Stats;

/// Timestamp type used for every persisted date.
pub type Timestamp = DateTime<Utc>;
