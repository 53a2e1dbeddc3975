//! Shared fixtures for the integration test crates.
//!
//! Integration tests under `backend/tests/` compile as separate crates, so
//! each one pulls this module in with `mod support;`.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::Arc;

use backend::domain::{
    DirectoryEntry, DirectoryRecord, NotificationService, ProfileCache, Role, UserId,
    UserProfileService,
};
use backend::inbound::http::state::HttpState;
use backend::inbound::ws::state::WsState;
use backend::outbound::realtime::InMemoryRealtimeStore;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

pub type Services = NotificationService<InMemoryRealtimeStore, InMemoryRealtimeStore, InMemoryRealtimeStore>;

/// Clock pinned to a single instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 15, 30)
        .single()
        .expect("valid fixture timestamp")
}

pub fn record(id: &str, email: &str, first: &str, last: &str, role: &str) -> DirectoryRecord {
    DirectoryRecord::new(
        UserId::new(id).expect("fixture key"),
        DirectoryEntry::new(email, first, last, Role::new(role)).expect("fixture entry"),
    )
}

pub fn store_with(records: impl IntoIterator<Item = DirectoryRecord>) -> Arc<InMemoryRealtimeStore> {
    let store = Arc::new(InMemoryRealtimeStore::new());
    store.seed_directory(records);
    store
}

pub fn services(store: &Arc<InMemoryRealtimeStore>) -> Arc<Services> {
    Arc::new(NotificationService::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(store),
        Arc::new(FixedClock(fixed_instant())),
    ))
}

pub fn http_state(store: &Arc<InMemoryRealtimeStore>) -> HttpState {
    let notifications = services(store);
    let cache = Arc::new(ProfileCache::new());
    store.invalidate_on_change(Arc::clone(&cache));
    HttpState::new(
        Arc::new(UserProfileService::new(Arc::clone(store), cache)),
        notifications.clone(),
        notifications,
    )
}

pub fn ws_state(store: &Arc<InMemoryRealtimeStore>) -> WsState {
    WsState::new(services(store))
}
