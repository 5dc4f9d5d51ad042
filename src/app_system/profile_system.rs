use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::clients::ProfileClient;
use crate::clock::Clock;
use crate::config::ServiceConfig;
use crate::domain::{DisplayName, Profile, UserId};
use crate::error::ProfileError;
use crate::profile_actor::ProfileService;
use crate::store::{self, ProfileStore};

struct Session {
    client: ProfileClient,
    handle: JoinHandle<()>,
}

/// Starts profile actors on demand and keeps at most one running per user id.
///
/// The store and clock are injected here and shared by every actor.
pub struct ProfileSystem {
    store: Arc<dyn ProfileStore>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
    sessions: Mutex<HashMap<UserId, Session>>,
}

impl ProfileSystem {
    pub fn new(store: Arc<dyn ProfileStore>, clock: Arc<dyn Clock>, config: ServiceConfig) -> Self {
        Self {
            store,
            clock,
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a client for `user_id`, loading the profile and spawning its
    /// actor the first time. Later calls share the running actor.
    ///
    /// The registry is not locked during the load, so a slow store only
    /// delays callers opening the same user.
    #[instrument(skip(self, user_id), fields(user_id = %user_id))]
    pub async fn open(&self, user_id: &UserId) -> Result<ProfileClient, ProfileError> {
        if let Some(client) = self.running(user_id).await {
            return Ok(client);
        }

        let profile = store::with_timeout(self.config.store_timeout, self.store.load(user_id)).await?;

        let mut sessions = self.sessions.lock().await;
        if let Some(client) = live_client(&sessions, user_id) {
            debug!("Actor started by a concurrent open, discarding loaded profile");
            return Ok(client);
        }
        if sessions.contains_key(user_id) {
            info!("Previous actor has stopped, starting a new one");
        }
        Ok(self.spawn(profile, &mut sessions))
    }

    async fn running(&self, user_id: &UserId) -> Option<ProfileClient> {
        live_client(&*self.sessions.lock().await, user_id)
    }

    /// Creates a profile for a new account and opens it.
    #[instrument(skip(self))]
    pub async fn create_profile(&self, display_name: &str) -> Result<ProfileClient, ProfileError> {
        let name = DisplayName::parse(display_name)?;
        let profile = Profile::new(UserId::generate(), name);
        store::with_timeout(self.config.store_timeout, self.store.save(&profile)).await?;
        info!(user_id = %profile.user_id(), "Profile created");

        let mut sessions = self.sessions.lock().await;
        Ok(self.spawn(profile, &mut sessions))
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions
            .lock()
            .await
            .values()
            .filter(|session| !session.handle.is_finished())
            .count()
    }

    fn spawn(&self, profile: Profile, sessions: &mut HashMap<UserId, Session>) -> ProfileClient {
        let user_id = profile.user_id().clone();
        let (service, client) =
            ProfileService::new(profile, self.store.clone(), self.clock.clone(), self.config);
        let handle = tokio::spawn(service.run());
        sessions.insert(
            user_id,
            Session {
                client: client.clone(),
                handle,
            },
        );
        client
    }

    /// Stops every actor and waits for all of them, then reports the first
    /// task failure if any.
    pub async fn shutdown(self) -> Result<(), ProfileError> {
        info!("Shutting down profile system...");
        let sessions = self.sessions.into_inner();

        let mut handles = Vec::with_capacity(sessions.len());
        for (user_id, session) in sessions {
            // An actor that already stopped has nothing to receive
            let _ = session.client.shutdown().await;
            handles.push((user_id, session.handle));
        }

        let mut first_error = None;
        for (user_id, handle) in handles {
            if let Err(e) = handle.await {
                error!(user_id = %user_id, "Actor task failed: {:?}", e);
                first_error.get_or_insert_with(|| {
                    ProfileError::ActorCommunicationError(format!("Actor task failed: {:?}", e))
                });
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("Profile system shutdown complete.");
                Ok(())
            }
        }
    }
}

fn live_client(sessions: &HashMap<UserId, Session>, user_id: &UserId) -> Option<ProfileClient> {
    sessions
        .get(user_id)
        .filter(|session| !session.handle.is_finished())
        .map(|session| session.client.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::error::{StorageError, ValidationError};
    use crate::store::InMemoryProfileStore;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Semaphore;

    /// Holds loads of one user until the test releases them.
    struct GatedStore {
        inner: InMemoryProfileStore,
        gated: UserId,
        gate: Semaphore,
    }

    #[async_trait]
    impl ProfileStore for GatedStore {
        async fn load(&self, user_id: &UserId) -> Result<Profile, StorageError> {
            if user_id == &self.gated {
                let _permit = self.gate.acquire().await.unwrap();
            }
            self.inner.load(user_id).await
        }

        async fn save(&self, profile: &Profile) -> Result<(), StorageError> {
            self.inner.save(profile).await
        }
    }

    async fn gated_system() -> (Arc<ProfileSystem>, Arc<GatedStore>) {
        let store = Arc::new(GatedStore {
            inner: InMemoryProfileStore::new(),
            gated: UserId::new("slow"),
            gate: Semaphore::new(0),
        });
        for id in ["slow", "fast"] {
            let profile = Profile::new(UserId::new(id), DisplayName::parse("Alice").unwrap());
            store.inner.insert(profile).await;
        }
        let system = ProfileSystem::new(store.clone(), Arc::new(SystemClock), ServiceConfig::default());
        (Arc::new(system), store)
    }

    fn system() -> (ProfileSystem, Arc<InMemoryProfileStore>) {
        let store = Arc::new(InMemoryProfileStore::new());
        let system = ProfileSystem::new(store.clone(), Arc::new(SystemClock), ServiceConfig::default());
        (system, store)
    }

    #[tokio::test]
    async fn open_unknown_user_is_not_found() {
        let (system, _) = system();
        let id = UserId::new("ghost");

        let result = system.open(&id).await;

        assert_eq!(result.err(), Some(ProfileError::Storage(StorageError::NotFound(id))));
        assert_eq!(system.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn open_reuses_the_running_actor() {
        let (system, store) = system();
        let profile = Profile::new(UserId::new("user_1"), DisplayName::parse("Alice").unwrap());
        store.insert(profile.clone()).await;

        let first = system.open(profile.user_id()).await.unwrap();
        let second = system.open(profile.user_id()).await.unwrap();
        first.update_display_name("Bob".to_string()).await.unwrap();

        assert_eq!(system.active_sessions().await, 1);
        assert_eq!(second.current_profile().await.unwrap().display_name().as_str(), "Bob");
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn open_restarts_a_stopped_actor() {
        let (system, store) = system();
        let profile = Profile::new(UserId::new("user_1"), DisplayName::parse("Alice").unwrap());
        store.insert(profile.clone()).await;

        let first = system.open(profile.user_id()).await.unwrap();
        first.shutdown().await.unwrap();
        while system.active_sessions().await > 0 {
            tokio::task::yield_now().await;
        }

        let second = system.open(profile.user_id()).await.unwrap();

        assert_eq!(second.current_profile().await.unwrap(), profile);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn create_profile_validates_and_persists() {
        let (system, store) = system();

        let rejected = system.create_profile("admin").await;
        assert_eq!(
            rejected.err(),
            Some(ProfileError::Validation(ValidationError::BannedWord))
        );

        let client = system.create_profile(" Alice ").await.unwrap();
        let profile = client.current_profile().await.unwrap();

        assert_eq!(profile.display_name().as_str(), "Alice");
        assert_eq!(profile.last_name_change_at(), None);
        assert_eq!(store.load(profile.user_id()).await.unwrap(), profile);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn slow_load_does_not_block_other_users() {
        let (system, store) = gated_system().await;

        let slow = tokio::spawn({
            let system = system.clone();
            async move { system.open(&UserId::new("slow")).await }
        });
        tokio::task::yield_now().await;

        let fast = tokio::time::timeout(Duration::from_secs(1), system.open(&UserId::new("fast")))
            .await
            .expect("open for another user was blocked")
            .unwrap();
        assert_eq!(fast.current_profile().await.unwrap().user_id().as_str(), "fast");
        assert_eq!(system.active_sessions().await, 1);

        store.gate.add_permits(1);
        slow.await.unwrap().unwrap();
        assert_eq!(system.active_sessions().await, 2);
    }

    #[tokio::test]
    async fn concurrent_opens_share_one_actor() {
        let (system, store) = gated_system().await;
        let user_id = UserId::new("slow");

        let opens: Vec<_> = (0..2)
            .map(|_| {
                let system = system.clone();
                let user_id = user_id.clone();
                tokio::spawn(async move { system.open(&user_id).await })
            })
            .collect();
        tokio::task::yield_now().await;
        store.gate.add_permits(2);

        let mut clients = Vec::new();
        for open in opens {
            clients.push(open.await.unwrap().unwrap());
        }
        clients[0].update_display_name("Bob".to_string()).await.unwrap();

        assert_eq!(system.active_sessions().await, 1);
        assert_eq!(clients[1].current_profile().await.unwrap().display_name().as_str(), "Bob");
    }

    #[tokio::test]
    async fn shutdown_stops_every_actor_even_after_a_failure() {
        let (system, store) = system();
        for id in ["user_1", "user_2", "user_3"] {
            store
                .insert(Profile::new(UserId::new(id), DisplayName::parse("Alice").unwrap()))
                .await;
        }
        let mut clients = Vec::new();
        for id in ["user_1", "user_2", "user_3"] {
            clients.push(system.open(&UserId::new(id)).await.unwrap());
        }
        system
            .sessions
            .lock()
            .await
            .get(&UserId::new("user_2"))
            .unwrap()
            .handle
            .abort();

        let result = system.shutdown().await;

        assert!(matches!(result, Err(ProfileError::ActorCommunicationError(_))));
        for client in clients {
            assert!(matches!(
                client.current_profile().await,
                Err(ProfileError::ActorCommunicationError(_))
            ));
        }
    }
}
