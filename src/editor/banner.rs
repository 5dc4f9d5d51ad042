use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Transient message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Saved,
    Copied,
    Error(String),
}

#[derive(Debug, Default)]
struct SlotState {
    generation: u64,
    banner: Option<Banner>,
}

/// Holds the visible banner and hides it after a delay. Showing a new banner
/// supersedes the pending hide of the previous one.
#[derive(Debug, Clone, Default)]
pub(crate) struct BannerSlot {
    state: Arc<Mutex<SlotState>>,
}

impl BannerSlot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Must be called inside a tokio runtime.
    pub(crate) fn show(&self, banner: Banner, ttl: Duration) {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.banner = Some(banner);
            state.generation
        };

        let slot = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut state = slot.lock();
            if state.generation == generation {
                state.banner = None;
            }
        });
    }

    pub(crate) fn current(&self) -> Option<Banner> {
        self.lock().banner.clone()
    }

    pub(crate) fn dismiss(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.banner = None;
    }
}
