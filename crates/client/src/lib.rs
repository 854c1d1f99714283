//! Client side of the quiz: authoring helpers and the creator and player
//! flows, driven against any [`Backend`].

pub mod backend;
pub mod distractor;
pub mod error;
pub mod session;
pub mod share;

pub use backend::{Backend, HttpBackend};
pub use distractor::Catalog;
