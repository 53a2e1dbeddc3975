//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **realtime**: a process-local realtime tree serving the user directory,
//!   per-user notification lists and their live feeds.
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod realtime;
