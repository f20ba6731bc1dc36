//! Application layer for story data.

pub mod exposition;
