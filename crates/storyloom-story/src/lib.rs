//! Storyloom — story session engine.
//!
//! Owns the live story transcript, normalises player actions before they
//! reach the generator, bounds every generation call with a deadline, and
//! suppresses degenerate repetition between consecutive turns.

pub mod application;
pub mod config;
pub mod domain;
