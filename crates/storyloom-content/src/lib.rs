//! Storyloom — story data collaborator.
//!
//! Loads the declarative setting/character data, expands its template
//! grammars, and composes the opening context and prompt for a new story.

pub mod application;
pub mod domain;
