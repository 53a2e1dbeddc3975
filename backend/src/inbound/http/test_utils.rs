//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use mockable::DefaultClock;

use crate::domain::{
    DirectoryEntry, DirectoryRecord, NotificationService, ProfileCache, Role, UserId,
    UserProfileService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::realtime::InMemoryRealtimeStore;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Store seeded with a client, a coffee cooperative and an admin.
pub fn seeded_store() -> Arc<InMemoryRealtimeStore> {
    let store = Arc::new(InMemoryRealtimeStore::new());
    let record = |id: &str, email: &str, first: &str, last: &str, role: &str| {
        DirectoryRecord::new(
            UserId::new(id).expect("fixture key"),
            DirectoryEntry::new(email, first, last, Role::new(role)).expect("fixture entry"),
        )
    };
    store.seed_directory([
        record("u-client", "cara@coco.ph", "Cara", "Dela", "Client"),
        record("u-coffee", "kape@coco.ph", "Kape", "Coop", "CoopCoffee"),
        record("u-admin", "ada@coco.ph", "Ada", "Reyes", "Admin"),
    ]);
    store
}

/// HTTP state wired to real services over `store`.
pub fn http_state(store: Arc<InMemoryRealtimeStore>) -> HttpState {
    let notifications = Arc::new(NotificationService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::new(DefaultClock),
    ));
    let cache = Arc::new(ProfileCache::new());
    store.invalidate_on_change(Arc::clone(&cache));
    HttpState::new(
        Arc::new(UserProfileService::new(store, cache)),
        notifications.clone(),
        notifications,
    )
}
