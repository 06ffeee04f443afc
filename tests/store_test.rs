// Store behavior against an in-process fake of the remote user service.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use userdesk::api::{Address, User, UserService};
use userdesk::error::ApiError;
use userdesk::store::UserStore;

const SETTLE: Duration = Duration::from_secs(5);

fn mk_user(id: u64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("{name}@example.com"),
        phone: format!("555-01{id:02}"),
        address: Address {
            city: "Gwenborough".to_string(),
            zipcode: "92998-3874".to_string(),
        },
    }
}

/// Remote service stand-in with scriptable results and call counters.
#[derive(Default)]
struct FakeService {
    users: Mutex<Vec<User>>,
    fail_fetch: AtomicBool,
    fail_delete: AtomicBool,
    fetch_calls: AtomicUsize,
    deleted_ids: Mutex<Vec<u64>>,
}

impl FakeService {
    fn with_users(users: Vec<User>) -> Arc<Self> {
        let fake = Self::default();
        *fake.users.lock().unwrap() = users;
        Arc::new(fake)
    }
}

impl UserService for FakeService {
    fn fetch_users(&self) -> userdesk::error::Result<Vec<User>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            Err(ApiError::Status(reqwest::StatusCode::BAD_GATEWAY))
        } else {
            Ok(self.users.lock().unwrap().clone())
        }
    }

    fn delete_user(&self, id: u64) -> userdesk::error::Result<()> {
        self.deleted_ids.lock().unwrap().push(id);
        if self.fail_delete.load(Ordering::SeqCst) {
            Err(ApiError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
        } else {
            Ok(())
        }
    }
}

fn ids(store: &UserStore) -> Vec<u64> {
    store.snapshot().users.iter().map(|u| u.id).collect()
}

#[test]
fn successful_load_mirrors_the_service_set_and_order() {
    // Server order is not id order; it must be preserved verbatim.
    let service = FakeService::with_users(vec![
        mk_user(3, "carol"),
        mk_user(1, "ann"),
        mk_user(2, "bea"),
    ]);
    let mut store = UserStore::new(service);

    store.load_all();
    assert!(store.snapshot().loading);
    assert!(store.apply_next(SETTLE));

    assert!(!store.snapshot().loading);
    assert_eq!(store.snapshot().error, None);
    assert_eq!(ids(&store), vec![3, 1, 2]);
}

#[test]
fn failed_load_reports_error_and_keeps_prior_users() {
    let service = FakeService::with_users(vec![mk_user(1, "ann")]);
    let mut store = UserStore::new(Arc::clone(&service) as Arc<dyn UserService>);

    store.load_all();
    assert!(store.apply_next(SETTLE));
    assert_eq!(ids(&store), vec![1]);

    service.fail_fetch.store(true, Ordering::SeqCst);
    store.load_all();
    assert!(store.apply_next(SETTLE));

    let snap = store.snapshot();
    assert!(!snap.loading);
    assert!(snap.error.as_deref().is_some_and(|e| !e.is_empty()));
    assert_eq!(ids(&store), vec![1], "users must survive a failed reload");
}

#[test]
fn failed_first_load_leaves_the_snapshot_empty() {
    let service = FakeService::with_users(vec![]);
    service.fail_fetch.store(true, Ordering::SeqCst);
    let mut store = UserStore::new(service);

    store.load_all();
    assert!(store.apply_next(SETTLE));

    assert!(store.snapshot().users.is_empty());
    assert!(store.snapshot().error.is_some());
}

#[test]
fn reload_after_failure_clears_the_error() {
    let service = FakeService::with_users(vec![mk_user(1, "ann")]);
    service.fail_fetch.store(true, Ordering::SeqCst);
    let mut store = UserStore::new(Arc::clone(&service) as Arc<dyn UserService>);

    store.load_all();
    assert!(store.apply_next(SETTLE));
    assert!(store.snapshot().error.is_some());

    service.fail_fetch.store(false, Ordering::SeqCst);
    store.load_all();
    assert!(store.apply_next(SETTLE));

    assert_eq!(store.snapshot().error, None);
    assert_eq!(ids(&store), vec![1]);
}

#[test]
fn delete_removes_exactly_the_matching_entry() {
    let service = FakeService::with_users(vec![
        mk_user(1, "ann"),
        mk_user(2, "bea"),
        mk_user(3, "carol"),
    ]);
    let mut store = UserStore::new(Arc::clone(&service) as Arc<dyn UserService>);
    store.load_all();
    assert!(store.apply_next(SETTLE));

    store.delete_by_id(2);
    assert!(store.apply_next(SETTLE));

    assert_eq!(ids(&store), vec![1, 3]);
    assert_eq!(*service.deleted_ids.lock().unwrap(), vec![2]);
}

#[test]
fn delete_of_absent_id_still_calls_remote_but_changes_nothing() {
    let service = FakeService::with_users(vec![mk_user(1, "ann")]);
    let mut store = UserStore::new(Arc::clone(&service) as Arc<dyn UserService>);
    store.load_all();
    assert!(store.apply_next(SETTLE));

    store.delete_by_id(99);
    assert!(store.apply_next(SETTLE));

    assert_eq!(ids(&store), vec![1]);
    assert_eq!(*service.deleted_ids.lock().unwrap(), vec![99]);
}

#[test]
fn delete_settles_optimistically_even_when_remote_fails() {
    let service = FakeService::with_users(vec![mk_user(1, "ann")]);
    service.fail_delete.store(true, Ordering::SeqCst);
    let mut store = UserStore::new(Arc::clone(&service) as Arc<dyn UserService>);
    store.load_all();
    assert!(store.apply_next(SETTLE));

    store.delete_by_id(1);
    assert!(store.apply_next(SETTLE));

    // Removal happens on settle, not on confirmed success.
    assert!(store.snapshot().users.is_empty());
}

#[test]
fn local_add_appends_without_reaching_the_service() {
    let service = FakeService::with_users(vec![mk_user(1, "ann")]);
    let mut store = UserStore::new(Arc::clone(&service) as Arc<dyn UserService>);
    store.load_all();
    assert!(store.apply_next(SETTLE));

    let fetches_before = service.fetch_calls.load(Ordering::SeqCst);
    let id = store.allocate_id();
    store.add_local(mk_user(id, "dora"));

    assert_eq!(ids(&store), vec![1, id]);
    assert_eq!(service.fetch_calls.load(Ordering::SeqCst), fetches_before);
    assert!(service.deleted_ids.lock().unwrap().is_empty());

    // A reload drops the local draft: the service never heard of it.
    store.load_all();
    assert!(store.apply_next(SETTLE));
    assert_eq!(ids(&store), vec![1]);
}

#[test]
fn local_update_replaces_in_place_and_ignores_unknown_ids() {
    let service = FakeService::with_users(vec![mk_user(1, "ann"), mk_user(2, "bea")]);
    let mut store = UserStore::new(service);
    store.load_all();
    assert!(store.apply_next(SETTLE));

    store.update_local(mk_user(2, "renamed"));
    assert_eq!(store.snapshot().users[0].name, "ann");
    assert_eq!(store.snapshot().users[1].name, "renamed");
    assert_eq!(store.snapshot().users[1].id, 2);

    let before = store.snapshot().users.clone();
    store.update_local(mk_user(42, "ghost"));
    assert_eq!(store.snapshot().users, before);
}

#[test]
fn delete_scenario_empties_a_single_entry_directory() {
    let service = FakeService::with_users(vec![mk_user(1, "Ann")]);
    let mut store = UserStore::new(service);
    store.load_all();
    assert!(store.apply_next(SETTLE));

    store.delete_by_id(1);
    assert!(store.apply_next(SETTLE));

    assert!(store.snapshot().users.is_empty());
}

#[test]
fn update_scenario_touches_only_the_second_position() {
    let service = FakeService::with_users(vec![mk_user(1, "ann"), mk_user(2, "bea")]);
    let mut store = UserStore::new(service);
    store.load_all();
    assert!(store.apply_next(SETTLE));

    let mut updated = mk_user(2, "Bea");
    updated.email = "bea@new.example".to_string();
    store.update_local(updated.clone());

    assert_eq!(store.snapshot().users[0], mk_user(1, "ann"));
    assert_eq!(store.snapshot().users[1], updated);
}

#[test]
fn subscribers_hear_every_change_and_nothing_else() {
    let service = FakeService::with_users(vec![mk_user(1, "ann")]);
    let mut store = UserStore::new(service);
    let changes = store.subscribe();

    store.load_all();
    assert!(store.apply_next(SETTLE));
    // load-start + load-settle
    assert_eq!(changes.try_iter().count(), 2);

    store.add_local(mk_user(50, "dora"));
    assert_eq!(changes.try_iter().count(), 1);

    store.update_local(mk_user(99, "ghost"));
    assert_eq!(changes.try_iter().count(), 0, "no-op must not notify");

    store.delete_by_id(99);
    assert!(store.apply_next(SETTLE));
    assert_eq!(changes.try_iter().count(), 0, "no-op delete must not notify");

    store.delete_by_id(50);
    assert!(store.apply_next(SETTLE));
    assert_eq!(changes.try_iter().count(), 1);
}

#[test]
fn allocated_ids_stay_unique_across_loads_and_deletes() {
    let service = FakeService::with_users(vec![mk_user(10, "ann")]);
    let mut store = UserStore::new(service);
    store.load_all();
    assert!(store.apply_next(SETTLE));

    let first = store.allocate_id();
    assert!(first > 10);

    store.delete_by_id(10);
    assert!(store.apply_next(SETTLE));

    let second = store.allocate_id();
    assert!(second > first, "deleting must never free an id for reuse");
}
