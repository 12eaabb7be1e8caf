//! Process-wide collection of sessions.
//!
//! The registry has its own lock, separate from the per-session locks:
//! holding a session handle never blocks registry lookups, and creating a
//! session never waits on a merge in progress.

use crate::{CapacityPolicy, RegistryConfig, Session, SessionError, SessionResult};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct IndexedSessions {
    by_id: HashMap<String, Arc<Session>>,
    /// Ids in creation order, oldest first.
    order: VecDeque<String>,
}

/// Thread-safe, insertion-ordered session registry.
///
/// # Example
///
/// ```rust
/// use dualpng_session::{RegistryConfig, SessionRegistry, SessionError};
///
/// let registry = SessionRegistry::new(RegistryConfig::default());
/// let session = registry.create("alice").unwrap();
/// assert_eq!(registry.find("alice").unwrap().id(), session.id());
/// assert!(matches!(registry.find("bob"), Err(SessionError::NotFound(_))));
/// ```
#[derive(Debug)]
pub struct SessionRegistry {
    config: RegistryConfig,
    sessions: RwLock<IndexedSessions>,
    next_id: AtomicU64,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl SessionRegistry {
    /// Creates an empty registry.
    ///
    /// A `max_sessions` of `Some(0)` is raised to `Some(1)`; use
    /// [`RegistryConfig::validate`] to reject it instead.
    pub fn new(mut config: RegistryConfig) -> Self {
        if config.max_sessions == Some(0) {
            warn!("max_sessions of 0 raised to 1");
            config.max_sessions = Some(1);
        }
        debug!(max_sessions = ?config.max_sessions, on_full = ?config.on_full, "session registry created");
        Self {
            config,
            sessions: RwLock::new(IndexedSessions::default()),
            next_id: AtomicU64::new(1),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexedSessions> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexedSessions> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new empty session under `id`.
    ///
    /// # Errors
    ///
    /// [`SessionError::AlreadyExists`] for a duplicate id,
    /// [`SessionError::CapacityExceeded`] when full under
    /// [`CapacityPolicy::Reject`].
    pub fn create(&self, id: impl Into<String>) -> SessionResult<Arc<Session>> {
        let id = id.into();
        let mut sessions = self.write();
        if sessions.by_id.contains_key(&id) {
            return Err(SessionError::AlreadyExists(id));
        }
        self.insert(&mut sessions, id)
    }

    /// Registers a session under a generated id.
    pub fn create_anonymous(&self) -> SessionResult<Arc<Session>> {
        let mut sessions = self.write();
        let id = loop {
            let n = self.next_id.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("session-{n}");
            if !sessions.by_id.contains_key(&candidate) {
                break candidate;
            }
        };
        self.insert(&mut sessions, id)
    }

    /// Looks up a session.
    pub fn find(&self, id: &str) -> SessionResult<Arc<Session>> {
        self.read()
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_owned()))
    }

    /// Looks up a session, creating it on first reference.
    pub fn find_or_create(&self, id: &str) -> SessionResult<Arc<Session>> {
        if let Ok(session) = self.find(id) {
            return Ok(session);
        }
        let mut sessions = self.write();
        // another thread may have created it between the two locks
        if let Some(session) = sessions.by_id.get(id) {
            return Ok(Arc::clone(session));
        }
        self.insert(&mut sessions, id.to_owned())
    }

    /// Unregisters a session. Outstanding handles stay usable.
    pub fn remove(&self, id: &str) -> Option<Arc<Session>> {
        let mut sessions = self.write();
        let removed = sessions.by_id.remove(id)?;
        sessions.order.retain(|other| other != id);
        debug!(session = id, "session removed");
        Some(removed)
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.read().by_id.len()
    }

    /// True if no sessions are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Session ids, oldest first.
    pub fn ids(&self) -> Vec<String> {
        self.read().order.iter().cloned().collect()
    }

    fn insert(&self, sessions: &mut IndexedSessions, id: String) -> SessionResult<Arc<Session>> {
        if let Some(limit) = self.config.max_sessions {
            while sessions.by_id.len() >= limit {
                match self.config.on_full {
                    CapacityPolicy::Reject => {
                        debug!(session = %id, limit, "session refused, registry full");
                        return Err(SessionError::CapacityExceeded { limit });
                    }
                    CapacityPolicy::EvictOldest => {
                        let Some(oldest) = sessions.order.pop_front() else {
                            break;
                        };
                        sessions.by_id.remove(&oldest);
                        info!(evicted = %oldest, "registry full, evicted oldest session");
                    }
                }
            }
        }

        let session = Arc::new(Session::new(id.clone()));
        sessions.by_id.insert(id.clone(), Arc::clone(&session));
        sessions.order.push_back(id);
        debug!(session = session.id(), total = sessions.by_id.len(), "session created");
        Ok(session)
    }
}
