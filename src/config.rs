use std::time::Duration;

use crate::domain::RenameCooldown;

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_BUFFER_SIZE: usize = 32;
pub const DEFAULT_BANNER_TTL: Duration = Duration::from_secs(2);

/// Settings shared by every profile actor in a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    pub cooldown: RenameCooldown,
    /// Upper bound on a single store call before it is reported as failed.
    pub store_timeout: Duration,
    /// Capacity of each actor's request channel.
    pub buffer_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cooldown: RenameCooldown::default(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl ServiceConfig {
    pub fn with_cooldown(mut self, cooldown: chrono::Duration) -> Self {
        self.cooldown = RenameCooldown::new(cooldown);
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }
}

/// Settings for an editor session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// How long a banner stays visible before it hides itself.
    pub banner_ttl: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            banner_ttl: DEFAULT_BANNER_TTL,
        }
    }
}
