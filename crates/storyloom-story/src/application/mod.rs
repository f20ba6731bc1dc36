//! Application layer: generation gateway, handlers, and the session manager.

pub mod command_handlers;
pub mod gateway;
pub mod manager;
pub mod query_handlers;
