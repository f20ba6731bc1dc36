//! Domain layer for story data.

pub mod grammar;
pub mod story_data;
