//! The per-user profile actor: single writer for one profile.

mod service;

pub use service::*;
