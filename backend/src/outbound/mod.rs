//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **supabase**: reqwest clients for the hosted auth admin and REST APIs
//! - **memory**: in-process stores used for development and tests
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod supabase;
