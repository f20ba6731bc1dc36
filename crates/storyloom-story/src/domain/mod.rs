//! Domain layer for the story session engine.

pub mod aggregates;
pub mod commands;
pub mod normalizer;
pub mod similarity;
