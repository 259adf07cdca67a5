use crate::kv::KeyValueStore;
use crate::{StoreError, StoreResult};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use wanderlust_core::identity::{Authenticator, Credentials, Registration, SessionUser};

/// Storage key for the persisted session record
pub const SESSION_KEY: &str = "wanderlust_user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

impl SessionState {
    pub fn of(user: Option<&SessionUser>) -> Self {
        match user {
            Some(_) => SessionState::Authenticated,
            None => SessionState::Anonymous,
        }
    }
}

/// Simulated authentication state, backed by durable key-value storage.
///
/// The stored record under [`SESSION_KEY`] is owned by this type alone. A
/// login or signup only touches state once the authenticator has answered, so
/// dropping the returned future before then leaves the session as it was.
///
/// Every commit (establish or logout) holds the write lock across both the
/// storage write and the in-memory swap, so the two never disagree. Commits
/// run on their own task and finish even if the caller goes away.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    authenticator: Arc<dyn Authenticator>,
    user: Arc<RwLock<Option<SessionUser>>>,
}

impl SessionStore {
    /// Rehydrate from storage. A record that fails to parse is discarded.
    pub fn open(storage: Arc<dyn KeyValueStore>, authenticator: Arc<dyn Authenticator>) -> Self {
        let user = rehydrate(storage.as_ref());
        match &user {
            Some(u) => info!("Session restored for {}", u.email),
            None => info!("No stored session, starting anonymous"),
        }
        Self {
            storage,
            authenticator,
            user: Arc::new(RwLock::new(user)),
        }
    }

    pub async fn current_user(&self) -> Option<SessionUser> {
        self.user.read().await.clone()
    }

    pub async fn state(&self) -> SessionState {
        SessionState::of(self.user.read().await.as_ref())
    }

    /// Returns `Ok(false)` when the credentials are rejected; the session is
    /// then unchanged.
    pub async fn login(&self, credentials: &Credentials) -> StoreResult<bool> {
        match self.authenticator.login(credentials).await {
            Some(user) => {
                self.establish(user).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn signup(&self, registration: &Registration) -> StoreResult<bool> {
        match self.authenticator.signup(registration).await {
            Some(user) => {
                self.establish(user).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Always succeeds. A storage failure is logged; memory is cleared regardless.
    pub async fn logout(&self) {
        let slot = self.user.clone();
        let storage = self.storage.clone();
        let commit = tokio::spawn(async move {
            let mut current = slot.write_owned().await;
            match tokio::task::spawn_blocking(move || storage.remove(SESSION_KEY)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Failed to remove stored session: {}", e),
                Err(e) => error!("Session removal task failed: {}", e),
            }
            current.take()
        });

        match commit.await {
            Ok(Some(user)) => info!("Logged out {}", user.email),
            Ok(None) => {}
            Err(e) => error!("Logout task failed: {}", e),
        }
    }

    async fn establish(&self, user: SessionUser) -> StoreResult<()> {
        let record = serde_json::to_string(&user)?;
        let slot = self.user.clone();
        let storage = self.storage.clone();
        tokio::spawn(async move {
            let mut current = slot.write_owned().await;
            tokio::task::spawn_blocking(move || storage.set(SESSION_KEY, &record)).await??;
            info!("Session established for {}", user.email);
            *current = Some(user);
            Ok::<_, StoreError>(())
        })
        .await?
    }
}

fn rehydrate(storage: &dyn KeyValueStore) -> Option<SessionUser> {
    let raw = match storage.get(SESSION_KEY) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!("Could not read stored session, starting anonymous: {}", e);
            return None;
        }
    };

    match serde_json::from_str::<SessionUser>(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!("Discarding malformed session record: {}", e);
            if let Err(e) = storage.remove(SESSION_KEY) {
                warn!("Failed to remove malformed session record: {}", e);
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{FileStore, MemoryStore};
    use std::time::Duration;
    use wanderlust_core::MockAuthenticator;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials { email: email.to_string(), password: password.to_string() }
    }

    fn instant_store(storage: Arc<dyn KeyValueStore>) -> SessionStore {
        SessionStore::open(storage, Arc::new(MockAuthenticator::instant()))
    }

    #[tokio::test]
    async fn test_login_persists_user() {
        let storage = Arc::new(MemoryStore::new());
        let session = instant_store(storage.clone());
        assert_eq!(session.state().await, SessionState::Anonymous);

        assert!(session.login(&credentials("a@b.com", "pw")).await.unwrap());

        let user = session.current_user().await.unwrap();
        assert_eq!(user.first_name, "A");
        assert_eq!(user.last_name, "User");
        assert_eq!(session.state().await, SessionState::Authenticated);

        let stored = storage.get(SESSION_KEY).unwrap().unwrap();
        let stored: SessionUser = serde_json::from_str(&stored).unwrap();
        assert_eq!(stored, user);
    }

    #[tokio::test]
    async fn test_rejected_login_leaves_anonymous() {
        let storage = Arc::new(MemoryStore::new());
        let session = instant_store(storage.clone());

        assert!(!session.login(&credentials("", "pw")).await.unwrap());

        assert_eq!(session.state().await, SessionState::Anonymous);
        assert_eq!(storage.get(SESSION_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_signup_overwrites_existing_session() {
        let session = instant_store(Arc::new(MemoryStore::new()));
        session.login(&credentials("a@b.com", "pw")).await.unwrap();

        let registration = Registration {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(session.signup(&registration).await.unwrap());

        let user = session.current_user().await.unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_logout_then_reopen_is_anonymous() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let session = instant_store(storage.clone());
        session.login(&credentials("a@b.com", "pw")).await.unwrap();

        session.logout().await;
        assert_eq!(session.state().await, SessionState::Anonymous);

        let reopened = instant_store(storage.clone());
        assert_eq!(reopened.state().await, SessionState::Anonymous);
        assert_eq!(storage.get(SESSION_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_when_anonymous_is_harmless() {
        let session = instant_store(Arc::new(MemoryStore::new()));
        session.logout().await;
        assert_eq!(session.state().await, SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_truncated_record_rehydrates_anonymous() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(SESSION_KEY, r#"{"id":"1","email":"a@b.c"#).unwrap();

        let session = instant_store(storage.clone());

        assert_eq!(session.state().await, SessionState::Anonymous);
        assert_eq!(storage.get(SESSION_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_wrong_shape_records_rehydrate_anonymous() {
        for record in [r#"{"id":1}"#, "null", "[]", r#""a@b.com""#] {
            let storage = Arc::new(MemoryStore::new());
            storage.set(SESSION_KEY, record).unwrap();

            let session = instant_store(storage.clone());

            assert_eq!(session.state().await, SessionState::Anonymous, "record {}", record);
            assert_eq!(storage.get(SESSION_KEY).unwrap(), None, "record {}", record);
        }
    }

    #[tokio::test]
    async fn test_session_survives_restart_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let storage = Arc::new(FileStore::open(&path).unwrap());
            let session = instant_store(storage);
            session.login(&credentials("traveler@example.com", "pw")).await.unwrap();
        }

        let storage = Arc::new(FileStore::open(&path).unwrap());
        let session = instant_store(storage);
        let user = session.current_user().await.unwrap();
        assert_eq!(user.first_name, "Traveler");
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_resolves_after_delay() {
        let session = SessionStore::open(
            Arc::new(MemoryStore::new()),
            Arc::new(MockAuthenticator::default()),
        );
        let started = tokio::time::Instant::now();

        assert!(session.login(&credentials("a@b.com", "pw")).await.unwrap());
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_login_changes_nothing() {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::open(storage.clone(), Arc::new(MockAuthenticator::default()));

        let attempt = tokio::time::timeout(
            Duration::from_millis(500),
            session.login(&credentials("a@b.com", "pw")),
        )
        .await;
        assert!(attempt.is_err());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(session.state().await, SessionState::Anonymous);
        assert_eq!(storage.get(SESSION_KEY).unwrap(), None);
    }

    /// Memory store whose removals take a while, so a commit can be
    /// observed in flight.
    struct SlowRemoveStore {
        inner: MemoryStore,
        delay: Duration,
    }

    impl KeyValueStore for SlowRemoveStore {
        fn get(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StoreResult<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> StoreResult<()> {
            std::thread::sleep(self.delay);
            self.inner.remove(key)
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_login_during_logout_keeps_storage_and_memory_in_step() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(SlowRemoveStore {
            inner: MemoryStore::new(),
            delay: Duration::from_millis(300),
        });
        let session = Arc::new(instant_store(storage.clone()));
        session.login(&credentials("old@b.com", "pw")).await.unwrap();

        let logout = tokio::spawn({
            let session = session.clone();
            async move { session.logout().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(session.login(&credentials("new@b.com", "pw")).await.unwrap());
        logout.await.unwrap();

        let in_memory = session.current_user().await;
        let on_disk = storage.get(SESSION_KEY).unwrap();
        assert_eq!(in_memory.is_some(), on_disk.is_some());
        assert_eq!(in_memory.unwrap().email, "new@b.com");

        let reopened = instant_store(storage);
        assert_eq!(reopened.current_user().await.unwrap().email, "new@b.com");
    }

    #[tokio::test]
    async fn test_logout_clears_memory_even_when_storage_fails() {
        struct BrokenRemove(MemoryStore);
        impl KeyValueStore for BrokenRemove {
            fn get(&self, key: &str) -> StoreResult<Option<String>> {
                self.0.get(key)
            }
            fn set(&self, key: &str, value: &str) -> StoreResult<()> {
                self.0.set(key, value)
            }
            fn remove(&self, _key: &str) -> StoreResult<()> {
                Err(StoreError::Poisoned)
            }
        }

        let session = instant_store(Arc::new(BrokenRemove(MemoryStore::new())));
        session.login(&credentials("a@b.com", "pw")).await.unwrap();

        session.logout().await;
        assert_eq!(session.state().await, SessionState::Anonymous);
    }
}
