//! Session-mutating commands.

use uuid::Uuid;

/// A request to change the live story session.
///
/// Handlers log `command_type` and `correlation_id` on entry so a single
/// turn can be followed through the gateway and back.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable dotted name, e.g. `story.act`.
    fn command_type(&self) -> &'static str;

    fn correlation_id(&self) -> Uuid;
}
