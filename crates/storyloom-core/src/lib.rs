//! Storyloom Core — shared abstractions.
//!
//! This crate defines the traits and types that the story engine, the
//! content collaborator, and the generation backends all depend on. It
//! contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod generator;
pub mod rng;
