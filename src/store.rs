//! Client-side state container for the user directory.
//!
//! The store owns the authoritative in-memory user list plus the loading and
//! error flags the presentation layer renders from. Reads come from an
//! injected [`UserApi`]; all writes (add/update/delete) are local-only and
//! never persisted back to the endpoint.

use crate::api::{FetchError, UserApi};
use crate::model::{User, UserPatch};

/// State change notifications delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    FetchStarted,
    FetchCompleted { count: usize },
    FetchFailed { error: String },
    Added { id: u64 },
    Updated { id: u64 },
    Deleted { id: u64 },
}

/// Observable result of a fetch. Failures are fully recovered into
/// `error_msg`; this enum only reports which way the call settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched(usize),
    Failed,
    /// A fetch was already in flight; state was left untouched.
    AlreadyInFlight,
}

type Observer = Box<dyn Fn(&StoreEvent)>;

/// The user store. Single-threaded; every mutation runs to completion on the
/// calling thread and observers are notified before the call returns.
pub struct UserStore {
    users: Vec<User>,
    is_loading: bool,
    error_msg: String,
    observers: Vec<Observer>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            is_loading: false,
            error_msg: String::new(),
            observers: Vec::new(),
        }
    }

    /// Register an observer. Observers are invoked synchronously on every
    /// state change and must not call back into the store.
    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    fn notify(&self, event: StoreEvent) {
        for observer in &self.observers {
            observer(&event);
        }
    }

    /// Current user list, newest-added-first.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Empty string means no error.
    pub fn error_msg(&self) -> &str {
        &self.error_msg
    }

    pub fn get(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Mark a fetch as in flight. Returns false (state untouched) if one is
    /// already in progress; fetches are single-flight rather than
    /// last-response-wins.
    pub fn begin_fetch(&mut self) -> bool {
        if self.is_loading {
            return false;
        }
        self.is_loading = true;
        self.error_msg.clear();
        self.notify(StoreEvent::FetchStarted);
        true
    }

    /// Settle an in-flight fetch. Success replaces the user list wholesale;
    /// failure leaves it untouched and records the error text. Either way
    /// the loading flag ends false.
    pub fn finish_fetch(&mut self, result: Result<Vec<User>, FetchError>) -> FetchOutcome {
        self.is_loading = false;
        match result {
            Ok(users) => {
                let count = users.len();
                self.users = users;
                self.notify(StoreEvent::FetchCompleted { count });
                FetchOutcome::Fetched(count)
            }
            Err(err) => {
                self.error_msg = err.to_string();
                self.notify(StoreEvent::FetchFailed {
                    error: self.error_msg.clone(),
                });
                FetchOutcome::Failed
            }
        }
    }

    /// Issue one read against the endpoint and settle the result. Never
    /// returns an error; failures land in `error_msg`. No retry is attempted
    /// here, the caller decides whether to call again.
    pub fn fetch_users(&mut self, api: &dyn UserApi) -> FetchOutcome {
        if !self.begin_fetch() {
            return FetchOutcome::AlreadyInFlight;
        }
        let result = api.fetch_users();
        self.finish_fetch(result)
    }

    fn next_id(&self) -> u64 {
        self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1
    }

    /// Add a locally-created user. The candidate's `id` is ignored; the
    /// store assigns `max(existing ids, 0) + 1` and prepends the record so
    /// the newest addition lists first. Returns the assigned id.
    pub fn add_user(&mut self, candidate: User) -> u64 {
        let id = self.next_id();
        let user = User { id, ..candidate };
        self.users.insert(0, user);
        self.notify(StoreEvent::Added { id });
        id
    }

    /// Shallow-merge `patch` into the record with the given id, replacing it
    /// copy-on-write. Returns false (and changes nothing) if no record
    /// matches.
    pub fn update_user(&mut self, id: u64, patch: UserPatch) -> bool {
        let Some(pos) = self.users.iter().position(|u| u.id == id) else {
            return false;
        };
        let merged = self.users[pos].merged(patch);
        self.users[pos] = merged;
        self.notify(StoreEvent::Updated { id });
        true
    }

    /// Remove the record with the given id. Returns false if absent.
    pub fn delete_user(&mut self, id: u64) -> bool {
        let Some(pos) = self.users.iter().position(|u| u.id == id) else {
            return false;
        };
        self.users.remove(pos);
        self.notify(StoreEvent::Deleted { id });
        true
    }
}
