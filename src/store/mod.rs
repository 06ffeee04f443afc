//! Centralized user store.
//!
//! Owns the only mutable copy of the user collection plus its load status,
//! and tells subscribers whenever that state changes. Network effects run
//! on short-lived worker threads and settle back into the store through a
//! channel; the snapshot itself is only ever touched on the thread that
//! calls [`UserStore::pump`], so operations never interleave mid-mutation.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crate::api::{User, UserService};

/// Observable state: the user list plus load status flags.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    /// Remote collection in server response order, mutated in place by
    /// deletes and local edits.
    pub users: Vec<User>,
    /// True only between fetch-start and fetch-settle.
    pub loading: bool,
    /// Human-readable message from the last failed load.
    pub error: Option<String>,
}

/// Settled result of a worker-thread effect.
enum StoreEvent {
    LoadSettled(crate::error::Result<Vec<User>>),
    DeleteSettled { id: u64 },
}

pub struct UserStore {
    snapshot: Snapshot,
    service: Arc<dyn UserService>,
    tx: Sender<StoreEvent>,
    rx: Receiver<StoreEvent>,
    listeners: Vec<Sender<()>>,
    next_id: u64,
}

impl UserStore {
    pub fn new(service: Arc<dyn UserService>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            snapshot: Snapshot::default(),
            service,
            tx,
            rx,
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Register for change notifications. One `()` arrives per applied
    /// state change; no-op operations stay silent.
    pub fn subscribe(&mut self) -> Receiver<()> {
        let (tx, rx) = mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    /// Begin a full reload of the collection.
    ///
    /// Overlapping calls are not serialized: each settles independently
    /// and the last one applied wins.
    pub fn load_all(&mut self) {
        self.snapshot.loading = true;
        self.notify();
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let _ = tx.send(StoreEvent::LoadSettled(service.fetch_users()));
        });
    }

    /// Ask the remote service to drop `id`, then remove it locally.
    ///
    /// Removal is optimistic: it happens when the request settles, whether
    /// or not the service reported success. A transport failure is logged
    /// and otherwise indistinguishable from success.
    pub fn delete_by_id(&mut self, id: u64) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        thread::spawn(move || {
            if let Err(err) = service.delete_user(id) {
                tracing::warn!(id, error = %err, "remote delete failed; removing locally anyway");
            }
            let _ = tx.send(StoreEvent::DeleteSettled { id });
        });
    }

    /// Append a user to the local snapshot only.
    ///
    /// The record never reaches the remote service and is gone after the
    /// next successful reload.
    pub fn add_local(&mut self, user: User) {
        self.next_id = self.next_id.max(user.id + 1);
        self.snapshot.users.push(user);
        self.notify();
    }

    /// Replace the entry whose id matches `user.id`, keeping its position.
    /// Silent no-op when no entry matches. Local only, like [`add_local`].
    ///
    /// [`add_local`]: UserStore::add_local
    pub fn update_local(&mut self, user: User) {
        if let Some(slot) = self.snapshot.users.iter_mut().find(|u| u.id == user.id) {
            *slot = user;
            self.notify();
        }
    }

    /// Hand out an id no load or local add has ever produced.
    ///
    /// The high-water mark only grows, so deleting an entry can never
    /// cause its id to be re-issued within this session.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Apply every effect that has settled so far. Returns true when any
    /// was applied. Called once per event-loop tick.
    pub fn pump(&mut self) -> bool {
        let mut applied = false;
        while let Ok(event) = self.rx.try_recv() {
            self.apply(event);
            applied = true;
        }
        applied
    }

    /// Block up to `timeout` for one settled effect and apply it. Returns
    /// false on timeout. Lets tests settle deterministically.
    #[allow(dead_code)]
    pub fn apply_next(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                self.apply(event);
                true
            }
            Err(_) => false,
        }
    }

    fn apply(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::LoadSettled(Ok(users)) => {
                tracing::debug!(count = users.len(), "load settled");
                for user in &users {
                    self.next_id = self.next_id.max(user.id + 1);
                }
                self.snapshot.users = users;
                self.snapshot.loading = false;
                self.snapshot.error = None;
                self.notify();
            }
            StoreEvent::LoadSettled(Err(err)) => {
                tracing::warn!(error = %err, "load failed");
                self.snapshot.loading = false;
                self.snapshot.error = Some(err.to_string());
                self.notify();
            }
            StoreEvent::DeleteSettled { id } => {
                let before = self.snapshot.users.len();
                self.snapshot.users.retain(|u| u.id != id);
                if self.snapshot.users.len() != before {
                    self.notify();
                }
            }
        }
    }

    fn notify(&mut self) {
        self.listeners.retain(|listener| listener.send(()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Address;
    use crate::error::ApiError;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const SETTLE: Duration = Duration::from_secs(5);

    fn user(id: u64, name: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: format!("{name}@example.com"),
            phone: "555-0100".to_string(),
            address: Address {
                city: "Springfield".to_string(),
                zipcode: "00001".to_string(),
            },
        }
    }

    #[derive(Default)]
    struct FakeService {
        users: Mutex<Vec<User>>,
        fail_fetch: AtomicBool,
        fetch_calls: AtomicUsize,
        delete_calls: AtomicUsize,
    }

    impl UserService for FakeService {
        fn fetch_users(&self) -> crate::error::Result<Vec<User>> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_fetch.load(Ordering::SeqCst) {
                Err(ApiError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR))
            } else {
                Ok(self.users.lock().unwrap().clone())
            }
        }

        fn delete_user(&self, _id: u64) -> crate::error::Result<()> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn load_replaces_users_and_clears_flags() {
        let service = Arc::new(FakeService::default());
        service.users.lock().unwrap().extend([user(1, "ann"), user(2, "bea")]);
        let mut store = UserStore::new(service);

        store.load_all();
        assert!(store.snapshot().loading);
        assert!(store.apply_next(SETTLE));

        let snap = store.snapshot();
        assert!(!snap.loading);
        assert!(snap.error.is_none());
        assert_eq!(
            snap.users.iter().map(|u| u.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn failed_load_sets_error_and_keeps_users() {
        let service = Arc::new(FakeService::default());
        let mut store = UserStore::new(Arc::clone(&service) as Arc<dyn UserService>);
        store.add_local(user(7, "kept"));

        service.fail_fetch.store(true, Ordering::SeqCst);
        store.load_all();
        assert!(store.apply_next(SETTLE));

        let snap = store.snapshot();
        assert!(!snap.loading);
        assert!(snap.error.as_deref().is_some_and(|e| !e.is_empty()));
        assert_eq!(snap.users.len(), 1);
        assert_eq!(snap.users[0].id, 7);
    }

    #[test]
    fn local_add_never_touches_the_service() {
        let service = Arc::new(FakeService::default());
        let mut store = UserStore::new(Arc::clone(&service) as Arc<dyn UserService>);

        store.add_local(user(1, "ann"));
        assert_eq!(store.snapshot().users.len(), 1);
        assert_eq!(service.fetch_calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.delete_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn update_keeps_position_and_ignores_unknown_ids() {
        let service = Arc::new(FakeService::default());
        let mut store = UserStore::new(service);
        store.add_local(user(1, "ann"));
        store.add_local(user(2, "bea"));

        store.update_local(user(2, "renamed"));
        assert_eq!(store.snapshot().users[1].name, "renamed");
        assert_eq!(store.snapshot().users[0].name, "ann");

        let before = store.snapshot().users.clone();
        store.update_local(user(99, "ghost"));
        assert_eq!(store.snapshot().users, before);
    }

    #[test]
    fn allocator_never_reissues_after_delete() {
        let service = Arc::new(FakeService::default());
        let mut store = UserStore::new(service);
        store.add_local(user(5, "ann"));

        let first = store.allocate_id();
        assert_eq!(first, 6);

        store.delete_by_id(5);
        assert!(store.apply_next(SETTLE));
        assert!(store.snapshot().users.is_empty());

        // The freed id must not come back.
        assert_eq!(store.allocate_id(), 7);
    }
}
