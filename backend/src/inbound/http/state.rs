//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{NotificationCommand, NotificationQuery, UserProfileQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub profile: Arc<dyn UserProfileQuery>,
    pub notifications: Arc<dyn NotificationCommand>,
    pub notifications_query: Arc<dyn NotificationQuery>,
}

impl HttpState {
    /// Bundle the driving ports used by the REST handlers.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::{NotificationService, ProfileCache, UserProfileService};
    /// use backend::inbound::http::state::HttpState;
    /// use backend::outbound::realtime::InMemoryRealtimeStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryRealtimeStore::new());
    /// let notifications = Arc::new(NotificationService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     store.clone(),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(
    ///     Arc::new(UserProfileService::new(store, Arc::new(ProfileCache::new()))),
    ///     notifications.clone(),
    ///     notifications,
    /// );
    /// let _profile = state.profile.clone();
    /// ```
    pub fn new(
        profile: Arc<dyn UserProfileQuery>,
        notifications: Arc<dyn NotificationCommand>,
        notifications_query: Arc<dyn NotificationQuery>,
    ) -> Self {
        Self {
            profile,
            notifications,
            notifications_query,
        }
    }
}
