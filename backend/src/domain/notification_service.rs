//! Notification domain service.
//!
//! Composes the resolver, dispatcher and observer behind the driving ports.
//! Publishing reads the directory once and shares that snapshot between
//! resolution and identifier lookup. Reads and acknowledgements are always
//! scoped to the session user's own list.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use super::notification_observer::parse_notifications;
use super::ports::{
    NotificationCommand, NotificationFeed, NotificationListener, NotificationQuery,
    NotificationStore, NotificationSubscriptions, PublishNotificationRequest, UserDirectory,
};
use super::{
    DispatchReport, Error, Notification, NotificationDispatcher, NotificationKey,
    NotificationObserver, NotificationSubscription, RecipientResolver, UserSession,
};

/// Notification service implementing the notification driving ports.
pub struct NotificationService<D, S, F> {
    directory: Arc<D>,
    store: Arc<S>,
    resolver: RecipientResolver,
    dispatcher: NotificationDispatcher<S>,
    observer: NotificationObserver<F>,
    clock: Arc<dyn Clock>,
}

impl<D, S, F> Clone for NotificationService<D, S, F> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            store: Arc::clone(&self.store),
            resolver: self.resolver,
            dispatcher: self.dispatcher.clone(),
            observer: self.observer.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<D, S, F> NotificationService<D, S, F>
where
    D: UserDirectory,
    S: NotificationStore,
    F: NotificationFeed,
{
    /// Create a service over the given ports. `clock` stamps published
    /// notifications.
    pub fn new(directory: Arc<D>, store: Arc<S>, feed: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self {
            directory,
            dispatcher: NotificationDispatcher::new(Arc::clone(&store)),
            store,
            resolver: RecipientResolver,
            observer: NotificationObserver::new(feed),
            clock,
        }
    }

    async fn own_notifications(&self, session: &UserSession) -> Result<Vec<Notification>, Error> {
        let children = self
            .store
            .list(session.user_id())
            .await
            .map_err(Error::from)?;
        Ok(parse_notifications(children))
    }
}

#[async_trait]
impl<D, S, F> NotificationCommand for NotificationService<D, S, F>
where
    D: UserDirectory,
    S: NotificationStore,
    F: NotificationFeed,
{
    async fn publish(&self, request: PublishNotificationRequest) -> Result<DispatchReport, Error> {
        let snapshot = self
            .directory
            .snapshot()
            .await
            .map_err(Error::from)?;
        let recipients = self.resolver.resolve(&snapshot, &request.event);
        debug!(
            kind = ?request.event.kind(),
            recipients = recipients.len(),
            "resolved notification recipients"
        );

        let notification = Notification::new(
            self.clock.utc(),
            request.sender,
            request.message,
            request.event,
        );
        Ok(self
            .dispatcher
            .dispatch(&snapshot, &recipients, &notification)
            .await)
    }

    async fn mark_as_read(&self, session: &UserSession, key: &NotificationKey) -> Result<(), Error> {
        let matched = self
            .store
            .mark_read(session.user_id(), key)
            .await
            .map_err(Error::from)?;
        if matched == 0 {
            return Err(Error::not_found("notification not found"));
        }
        Ok(())
    }

    async fn mark_all_as_read(&self, session: &UserSession) -> Result<usize, Error> {
        self.store
            .mark_all_read(session.user_id())
            .await
            .map_err(Error::from)
    }
}

#[async_trait]
impl<D, S, F> NotificationQuery for NotificationService<D, S, F>
where
    D: UserDirectory,
    S: NotificationStore,
    F: NotificationFeed,
{
    async fn list(&self, session: &UserSession) -> Result<Vec<Notification>, Error> {
        let mut notifications = self.own_notifications(session).await?;
        notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(notifications)
    }

    async fn unread_count(&self, session: &UserSession) -> Result<usize, Error> {
        let notifications = self.own_notifications(session).await?;
        Ok(notifications.iter().filter(|n| !n.has_read).count())
    }
}

#[async_trait]
impl<D, S, F> NotificationSubscriptions for NotificationService<D, S, F>
where
    D: UserDirectory,
    S: NotificationStore,
    F: NotificationFeed,
{
    async fn observe(
        &self,
        session: &UserSession,
        listener: NotificationListener,
    ) -> Result<NotificationSubscription, Error> {
        self.observer
            .observe(session.user_id(), listener)
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "notification_service_tests.rs"]
mod tests;
