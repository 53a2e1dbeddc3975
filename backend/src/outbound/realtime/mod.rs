//! Process-local realtime tree backing the directory and notification ports.
//!
//! The tree mirrors the layout of a hosted realtime database:
//!
//! ```text
//! users/<userId>                      directory entry
//! notifications/<userId>/<pushKey>    notification record
//! ```
//!
//! Push keys sort in append order. Every change to a user's list is pushed to
//! that user's live listeners as the complete child set.

mod seed;

pub use seed::{DirectorySeedError, load_directory_seed};

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::ports::{
    NotificationChild, NotificationChildStream, NotificationFeed, NotificationFeedError,
    NotificationStore, NotificationStoreError, UserDirectory, UserDirectoryError,
};
use crate::domain::{
    DirectoryRecord, DirectorySnapshot, Notification, NotificationKey, ProfileCache, UserId,
};

const HAS_READ_FIELD: &str = "hasRead";

type Listener = mpsc::UnboundedSender<Vec<NotificationChild>>;

#[derive(Default)]
struct Tree {
    users: Vec<DirectoryRecord>,
    notifications: HashMap<UserId, Vec<NotificationChild>>,
    listeners: HashMap<UserId, Vec<Listener>>,
    profile_caches: Vec<Arc<ProfileCache>>,
}

impl Tree {
    fn children(&self, user_id: &UserId) -> Vec<NotificationChild> {
        self.notifications.get(user_id).cloned().unwrap_or_default()
    }

    /// Returns true when `record` replaced an entry with the same key.
    fn upsert_user(&mut self, record: DirectoryRecord) -> bool {
        if let Some(existing) = self.users.iter_mut().find(|existing| existing.id == record.id) {
            *existing = record;
            return true;
        }
        self.users.push(record);
        false
    }

    fn forget_profile(&self, user_id: &UserId) {
        for cache in &self.profile_caches {
            if cache.invalidate(user_id) {
                debug!(user_id = %user_id, "directory record replaced; cached profile dropped");
            }
        }
    }

    fn publish(&mut self, user_id: &UserId) {
        let children = self.children(user_id);
        if let Some(listeners) = self.listeners.get_mut(user_id) {
            listeners.retain(|listener| listener.send(children.clone()).is_ok());
            if listeners.is_empty() {
                self.listeners.remove(user_id);
            }
        }
    }
}

/// In-memory realtime store implementing [`UserDirectory`],
/// [`NotificationStore`] and [`NotificationFeed`].
#[derive(Default)]
pub struct InMemoryRealtimeStore {
    tree: Mutex<Tree>,
    next_push: AtomicU64,
}

impl InMemoryRealtimeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tree(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push_key(&self) -> String {
        let sequence = self.next_push.fetch_add(1, Ordering::Relaxed);
        format!("-N{sequence:016x}")
    }

    /// Drop `cache` entries whenever the directory record they mirror is
    /// replaced.
    pub fn invalidate_on_change(&self, cache: Arc<ProfileCache>) {
        self.tree().profile_caches.push(cache);
    }

    /// Insert directory records, replacing any record with the same key in
    /// place. New keys are appended in iteration order.
    pub fn seed_directory(&self, records: impl IntoIterator<Item = DirectoryRecord>) {
        let mut tree = self.tree();
        for record in records {
            let id = record.id.clone();
            if tree.upsert_user(record) {
                tree.forget_profile(&id);
            }
        }
    }

    /// Number of live listeners on `user_id`'s list.
    #[must_use]
    pub fn listener_count(&self, user_id: &UserId) -> usize {
        let mut tree = self.tree();
        let Some(listeners) = tree.listeners.get_mut(user_id) else {
            return 0;
        };
        listeners.retain(|listener| !listener.is_closed());
        listeners.len()
    }

    /// Store a raw record under `user_id` without going through the typed
    /// path. Used to load data written by other clients.
    pub fn insert_raw(&self, user_id: &UserId, value: Value) -> String {
        let key = self.push_key();
        let mut tree = self.tree();
        tree.notifications
            .entry(user_id.clone())
            .or_default()
            .push(NotificationChild::new(key.clone(), value));
        tree.publish(user_id);
        key
    }
}

#[async_trait]
impl UserDirectory for InMemoryRealtimeStore {
    async fn snapshot(&self) -> Result<DirectorySnapshot, UserDirectoryError> {
        Ok(DirectorySnapshot::new(self.tree().users.clone()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<DirectoryRecord>, UserDirectoryError> {
        Ok(self
            .tree()
            .users
            .iter()
            .find(|record| &record.id == id)
            .cloned())
    }
}

#[async_trait]
impl NotificationStore for InMemoryRealtimeStore {
    async fn append(
        &self,
        user_id: &UserId,
        notification: &Notification,
    ) -> Result<String, NotificationStoreError> {
        let value = notification
            .to_value()
            .map_err(|err| NotificationStoreError::serialization(err.to_string()))?;
        let key = self.insert_raw(user_id, value);
        debug!(user_id = %user_id, push_key = %key, "notification appended");
        Ok(key)
    }

    async fn list(&self, user_id: &UserId) -> Result<Vec<NotificationChild>, NotificationStoreError> {
        Ok(self.tree().children(user_id))
    }

    async fn mark_read(
        &self,
        user_id: &UserId,
        key: &NotificationKey,
    ) -> Result<usize, NotificationStoreError> {
        let mut tree = self.tree();
        let mut matched = 0;
        let mut changed = false;
        if let Some(children) = tree.notifications.get_mut(user_id) {
            for child in children.iter_mut().filter(|child| key.matches_record(&child.value)) {
                matched += 1;
                changed |= set_read(&mut child.value);
            }
        }
        if changed {
            tree.publish(user_id);
        }
        Ok(matched)
    }

    async fn mark_all_read(&self, user_id: &UserId) -> Result<usize, NotificationStoreError> {
        let mut tree = self.tree();
        let mut changed = 0;
        if let Some(children) = tree.notifications.get_mut(user_id) {
            for child in children.iter_mut() {
                if set_read(&mut child.value) {
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            tree.publish(user_id);
        }
        Ok(changed)
    }
}

#[async_trait]
impl NotificationFeed for InMemoryRealtimeStore {
    async fn subscribe(
        &self,
        user_id: &UserId,
    ) -> Result<NotificationChildStream, NotificationFeedError> {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut tree = self.tree();
        sender
            .send(tree.children(user_id))
            .map_err(|err| NotificationFeedError::connection(err.to_string()))?;
        tree.listeners.entry(user_id.clone()).or_default().push(sender);
        Ok(stream::poll_fn(move |cx| receiver.poll_recv(cx)).boxed())
    }
}

/// Set `hasRead` on an object record. Returns true when the flag changed.
fn set_read(record: &mut Value) -> bool {
    let Some(fields) = record.as_object_mut() else {
        return false;
    };
    if fields.get(HAS_READ_FIELD) == Some(&Value::Bool(true)) {
        return false;
    }
    fields.insert(HAS_READ_FIELD.to_owned(), Value::Bool(true));
    true
}
