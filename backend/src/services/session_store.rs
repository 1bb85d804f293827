//! In-memory playground sessions.
//!
//! Each session owns one [`Playground`]. Access goes through short closures
//! that run under the store lock; callers must not hold a session across an
//! await point, which is what the playground's begin/finish split is for.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::ids::{IdGenerator, UuidIds};
use super::playground::Playground;

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Playground>>>,
    ids: Arc<dyn IdGenerator>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_ids(Arc::new(UuidIds))
    }

    /// Store whose playgrounds all draw block ids from `ids`.
    pub fn with_ids(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ids,
        }
    }

    /// Create an empty session and return its id.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .insert(id, Playground::with_ids(Arc::clone(&self.ids)));
        log::info!("created playground session {}", id);
        id
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.sessions.read().contains_key(id)
    }

    /// Run `f` against a session for reading. `None` if the session is unknown.
    pub fn read<R>(&self, id: &Uuid, f: impl FnOnce(&Playground) -> R) -> Option<R> {
        self.sessions.read().get(id).map(f)
    }

    /// Run `f` against a session for writing. `None` if the session is unknown.
    pub fn write<R>(&self, id: &Uuid, f: impl FnOnce(&mut Playground) -> R) -> Option<R> {
        self.sessions.write().get_mut(id).map(f)
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Guard that cancels `ticket` on `session` unless it is disarmed first.
    pub fn hold_ticket(&self, session: Uuid, ticket: u64) -> TicketGuard {
        TicketGuard {
            sessions: self.clone(),
            session,
            ticket: Some(ticket),
        }
    }
}

/// A claimed explainer ticket that is released if the request goes away
/// before its result is applied.
pub struct TicketGuard {
    sessions: SessionStore,
    session: Uuid,
    ticket: Option<u64>,
}

impl TicketGuard {
    /// The result is about to be applied; keep the ticket claimed.
    pub fn disarm(mut self) {
        self.ticket = None;
    }
}

impl Drop for TicketGuard {
    fn drop(&mut self) {
        let Some(ticket) = self.ticket.take() else {
            return;
        };
        let released = self
            .sessions
            .write(&self.session, |pg| pg.cancel(ticket).is_ok());
        if released == Some(true) {
            log::warn!(
                "request on session {} dropped; released ticket {}",
                self.session,
                ticket
            );
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChainId;

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.create();
        let b = store.create();

        store
            .write(&a, |pg| pg.add_template_block(&ChainId::Main, "Claim"))
            .unwrap()
            .unwrap();

        assert_eq!(store.read(&a, |pg| pg.main_chain().len()), Some(1));
        assert_eq!(store.read(&b, |pg| pg.main_chain().len()), Some(0));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_unknown_session() {
        let store = SessionStore::new();
        assert!(store.read(&Uuid::new_v4(), |_| ()).is_none());
        assert!(!store.remove(&Uuid::new_v4()));
    }

    #[test]
    fn test_clones_share_sessions() {
        let store = SessionStore::new();
        let clone = store.clone();
        let id = store.create();
        assert!(clone.contains(&id));
        assert!(clone.remove(&id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_dropped_guard_releases_ticket() {
        let store = SessionStore::new();
        let id = store.create();
        let ticket = store
            .write(&id, |pg| {
                pg.add_template_block(&ChainId::Main, "Claim").unwrap();
                pg.begin_generate(ChainId::Main, "lifetimes").unwrap()
            })
            .unwrap();

        drop(store.hold_ticket(id, ticket.ticket));

        assert_eq!(store.read(&id, |pg| pg.is_pending()), Some(false));
        let again = store.write(&id, |pg| pg.begin_generate(ChainId::Main, "again"));
        assert!(matches!(again, Some(Ok(_))));
    }

    #[test]
    fn test_disarmed_guard_keeps_ticket() {
        let store = SessionStore::new();
        let id = store.create();
        let ticket = store
            .write(&id, |pg| {
                pg.add_template_block(&ChainId::Main, "Claim").unwrap();
                pg.begin_generate(ChainId::Main, "lifetimes").unwrap()
            })
            .unwrap();

        store.hold_ticket(id, ticket.ticket).disarm();
        assert_eq!(store.read(&id, |pg| pg.is_pending()), Some(true));

        let outcome = store
            .write(&id, |pg| pg.finish_generate(ticket, Ok("Done.".to_string())))
            .unwrap()
            .unwrap();
        assert_eq!(outcome.output, "Done.");
    }

    #[test]
    fn test_guard_on_removed_session_is_harmless() {
        let store = SessionStore::new();
        let id = store.create();
        let guard = store.hold_ticket(id, 1);
        assert!(store.remove(&id));
        drop(guard);
        assert!(store.is_empty());
    }
}
