//! Signed-in profile shared by every page of one session.
//!
//! The profile is fetched once and published on a `watch` channel; changes
//! that other views must react to (a password change clearing the temporary
//! password flag, a logout) are also announced on a typed `broadcast`
//! channel.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::{broadcast, watch, Mutex};
use tracing::debug;

use shared_models::auth::UserProfile;

const EVENT_CAPACITY: usize = 16;

#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self) -> Result<UserProfile>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Loaded(UserProfile),
    PasswordUpdated { user_id: i64 },
    Cleared,
}

pub struct SessionStore<S: ProfileSource> {
    source: S,
    profile: watch::Sender<Option<UserProfile>>,
    events: broadcast::Sender<SessionEvent>,
    load_lock: Mutex<()>,
}

impl<S: ProfileSource> SessionStore<S> {
    pub fn new(source: S) -> Self {
        let (profile, _) = watch::channel(None);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            source,
            profile,
            events,
            load_lock: Mutex::new(()),
        }
    }

    /// Store seeded with a profile that is already known, e.g. the one the
    /// edge gate resolved for this request.
    pub fn with_profile(source: S, profile: UserProfile) -> Self {
        let store = Self::new(source);
        store.profile.send_replace(Some(profile));
        store
    }

    pub fn current(&self) -> Option<UserProfile> {
        self.profile.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<Option<UserProfile>> {
        self.profile.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Returns the cached profile, fetching it at most once across
    /// concurrent callers.
    pub async fn load(&self) -> Result<UserProfile> {
        if let Some(profile) = self.current() {
            return Ok(profile);
        }

        let _guard = self.load_lock.lock().await;
        if let Some(profile) = self.current() {
            return Ok(profile);
        }

        let profile = self.source.fetch_profile().await?;
        debug!("Session profile loaded for user {}", profile.id);
        self.profile.send_replace(Some(profile.clone()));
        self.publish(SessionEvent::Loaded(profile.clone()));

        Ok(profile)
    }

    /// Drops the cache and fetches again.
    pub async fn refresh(&self) -> Result<UserProfile> {
        self.profile.send_replace(None);
        self.load().await
    }

    pub fn mark_password_updated(&self) -> Option<UserProfile> {
        let mut updated = None;
        self.profile.send_modify(|current| {
            if let Some(profile) = current {
                profile.debe_cambiar_clave = false;
                updated = Some(profile.clone());
            }
        });

        if let Some(profile) = &updated {
            self.publish(SessionEvent::PasswordUpdated { user_id: profile.id });
        }
        updated
    }

    pub fn invalidate(&self) {
        self.profile.send_replace(None);
        self.publish(SessionEvent::Cleared);
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use shared_models::auth::Role;

    struct CountingSource {
        calls: Arc<AtomicUsize>,
        must_change: bool,
    }

    #[async_trait]
    impl ProfileSource for CountingSource {
        async fn fetch_profile(&self) -> Result<UserProfile> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(UserProfile {
                id: 7,
                nombre_completo: "Ana López".to_string(),
                correo: "ana@clinica.com".to_string(),
                rol: Role::Receptionist,
                activo: true,
                debe_cambiar_clave: self.must_change,
                id_clinica: 1,
                nombre_clinica: None,
                id_sucursal: Some(3),
                nombre_sucursal: None,
                fecha_creacion: String::new(),
            })
        }
    }

    fn store(must_change: bool) -> (SessionStore<CountingSource>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            calls: calls.clone(),
            must_change,
        };
        (SessionStore::new(source), calls)
    }

    #[tokio::test]
    async fn test_load_fetches_once() {
        let (store, calls) = store(false);

        let (a, b) = tokio::join!(store.load(), store.load());
        assert_eq!(a.unwrap().id, 7);
        assert_eq!(b.unwrap().id, 7);
        store.load().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_password_update_clears_flag_and_notifies() {
        let (store, _) = store(true);
        let mut events = store.events();
        let mut watcher = store.watch();

        assert!(store.load().await.unwrap().must_change_password());
        assert_matches!(events.recv().await.unwrap(), SessionEvent::Loaded(_));

        let updated = store.mark_password_updated().unwrap();
        assert!(!updated.must_change_password());
        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::PasswordUpdated { user_id: 7 }
        );

        assert!(watcher.has_changed().unwrap());
        let seen = watcher.borrow_and_update().clone().unwrap();
        assert!(!seen.debe_cambiar_clave);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let (store, calls) = store(false);
        let mut events = store.events();

        store.load().await.unwrap();
        store.invalidate();
        assert!(store.current().is_none());

        let _ = events.recv().await.unwrap();
        assert_eq!(events.recv().await.unwrap(), SessionEvent::Cleared);

        store.load().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_mark_password_updated_without_profile_is_noop() {
        let (store, _) = store(true);
        assert!(store.mark_password_updated().is_none());
    }
}
