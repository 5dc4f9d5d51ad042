//! # Profile editor core
//!
//! Display-name editing for a user profile: validation rules, a rename
//! cooldown, and an update path that serializes writes per user.
//!
//! ## Pieces
//!
//! - **Domain** - [`domain::Profile`], [`domain::validate`] and
//!   [`domain::RenameCooldown`]. Pure and usable without any runtime.
//! - **Profile actor** - [`profile_actor::ProfileService`] owns one profile and
//!   is its only writer; [`clients::ProfileClient`] is the handle callers use.
//! - **Store** - [`store::ProfileStore`] is the persistence seam, with
//!   in-memory and JSON-file implementations.
//! - **System** - [`app_system::ProfileSystem`] injects the store and clock and
//!   keeps one actor per user id.
//! - **Editor** - [`editor::ProfileEditor`] holds screen state: the draft,
//!   its validation, and self-hiding banners.
//!
//! ## Example
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use profile_editor::{app_system::ProfileSystem, clock::SystemClock, config::ServiceConfig, store::InMemoryProfileStore};
//! # async fn demo() -> Result<(), profile_editor::error::ProfileError> {
//! let system = ProfileSystem::new(
//!     Arc::new(InMemoryProfileStore::new()),
//!     Arc::new(SystemClock),
//!     ServiceConfig::default(),
//! );
//! let client = system.create_profile("Alice").await?;
//! client.update_display_name("Bob".to_string()).await?;
//! assert!(!client.can_change_name().await?);
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod app_system;
pub mod clients;
pub mod clock;
pub mod config;
pub mod domain;
pub mod editor;
pub mod error;
pub mod messages;
pub mod profile_actor;
pub mod store;

#[cfg(test)]
mod mock_framework;
