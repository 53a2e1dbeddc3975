//! Builders wiring domain services over the realtime store into adapter state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use backend::domain::{NotificationService, ProfileCache, UserProfileService};
use backend::inbound::http::state::HttpState;
use backend::inbound::ws::state::WsState;
use backend::outbound::realtime::InMemoryRealtimeStore;

/// HTTP and WebSocket state sharing one notification service.
pub(super) fn build_states(store: &Arc<InMemoryRealtimeStore>) -> (HttpState, WsState) {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let notifications = Arc::new(NotificationService::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(store),
        clock,
    ));
    let cache = Arc::new(ProfileCache::new());
    store.invalidate_on_change(Arc::clone(&cache));
    let profile = Arc::new(UserProfileService::new(Arc::clone(store), cache));

    let http = HttpState::new(profile, notifications.clone(), notifications.clone());
    let ws = WsState::new(notifications);
    (http, ws)
}
