//! Live observation of one user's notification list.
//!
//! The observer consumes a [`NotificationFeed`] stream on a spawned task. On
//! every change it re-parses the complete child set and hands the parsed list
//! to the listener. Records that fail to parse are dropped and logged at
//! debug level; they never reach the listener and never end the
//! subscription.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::ports::{NotificationChild, NotificationFeed, NotificationFeedError, NotificationListener};
use super::{Notification, UserId};

/// Parse a full child set, keeping push order and dropping malformed records.
///
/// # Examples
/// ```
/// use backend::domain::parse_notifications;
/// use backend::domain::ports::NotificationChild;
/// use serde_json::json;
///
/// let children = vec![NotificationChild::new("-Nk1", json!({ "sender": "Admin" }))];
/// assert!(parse_notifications(children).is_empty());
/// ```
#[must_use]
pub fn parse_notifications(children: Vec<NotificationChild>) -> Vec<Notification> {
    children
        .into_iter()
        .filter_map(|child| match Notification::from_value(child.value) {
            Ok(notification) => Some(notification),
            Err(error) => {
                debug!(key = %child.key, error = %error, "dropping malformed notification record");
                None
            }
        })
        .collect()
}

/// Whether a subscription is still delivering updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Subscribed,
    Unsubscribed,
}

/// Handle to a running observation.
///
/// Dropping the handle cancels the subscription.
#[derive(Debug)]
pub struct NotificationSubscription {
    task: Option<JoinHandle<()>>,
}

impl NotificationSubscription {
    fn spawn(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// Current state. A subscription whose feed ended reports
    /// `Unsubscribed` without being cancelled.
    #[must_use]
    pub fn state(&self) -> SubscriptionState {
        match &self.task {
            Some(task) if !task.is_finished() => SubscriptionState::Subscribed,
            _ => SubscriptionState::Unsubscribed,
        }
    }

    /// Stop delivering updates. Calling it again has no effect.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for NotificationSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Subscribes listeners to users' notification feeds.
pub struct NotificationObserver<F> {
    feed: Arc<F>,
}

impl<F> Clone for NotificationObserver<F> {
    fn clone(&self) -> Self {
        Self {
            feed: Arc::clone(&self.feed),
        }
    }
}

impl<F> NotificationObserver<F>
where
    F: NotificationFeed,
{
    pub fn new(feed: Arc<F>) -> Self {
        Self { feed }
    }

    /// Deliver the parsed list of `user_id` to `listener` now and after every
    /// change. Must be called from within a Tokio runtime.
    pub async fn observe(
        &self,
        user_id: &UserId,
        listener: NotificationListener,
    ) -> Result<NotificationSubscription, NotificationFeedError> {
        let mut stream = self.feed.subscribe(user_id).await?;
        let owner = user_id.clone();
        let task = tokio::spawn(async move {
            while let Some(children) = stream.next().await {
                listener(parse_notifications(children));
            }
            info!(user_id = %owner, "notification feed ended");
        });
        Ok(NotificationSubscription::spawn(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockNotificationFeed;
    use chrono::{TimeZone, Utc};
    use futures_util::stream;
    use rstest::rstest;
    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    fn record(sender: &str) -> Value {
        json!({
            "timestamp": Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp")
                .timestamp_millis(),
            "sender": sender,
            "message": "Order placed",
            "type": "ORDER_PLACED",
            "details": {
                "orderId": "o-1",
                "client": "Cara Dela",
                "status": "Pending",
                "items": [{ "productType": "Coffee", "productName": "Arabica", "quantity": 2.0 }]
            },
            "hasRead": false
        })
    }

    fn user() -> UserId {
        UserId::new("u-1").expect("fixture key")
    }

    #[rstest]
    fn parse_drops_record_missing_a_field() {
        let mut broken = record("Second");
        broken
            .as_object_mut()
            .expect("record is an object")
            .remove("message");

        let parsed = parse_notifications(vec![
            NotificationChild::new("-a", record("First")),
            NotificationChild::new("-b", broken),
        ]);

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].sender, "First");
    }

    #[rstest]
    #[case(json!({ "type": "NOTICE" }))]
    #[case(json!("not an object"))]
    #[case(json!({
        "timestamp": 1, "sender": "S", "message": "M",
        "type": "SPECIAL_REQUEST_UPDATED", "details": { "orderId": "o-1" }, "hasRead": false
    }))]
    #[case(json!({
        "timestamp": 1, "sender": "S", "message": "M",
        "type": "SOMETHING_ELSE", "details": {}, "hasRead": false
    }))]
    fn parse_drops_malformed_records(#[case] value: Value) {
        let parsed = parse_notifications(vec![NotificationChild::new("-x", value)]);
        assert!(parsed.is_empty());
    }

    #[rstest]
    fn parse_keeps_push_order() {
        let parsed = parse_notifications(vec![
            NotificationChild::new("-a", record("A")),
            NotificationChild::new("-b", record("B")),
            NotificationChild::new("-c", record("C")),
        ]);
        let senders: Vec<&str> = parsed.iter().map(|n| n.sender.as_str()).collect();
        assert_eq!(senders, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn delivers_every_parsed_update_until_the_feed_ends() {
        let mut feed = MockNotificationFeed::new();
        feed.expect_subscribe().times(1).return_once(|_| {
            Ok(stream::iter(vec![
                vec![],
                vec![
                    NotificationChild::new("-a", record("A")),
                    NotificationChild::new("-b", json!({ "broken": true })),
                ],
            ])
            .boxed())
        });
        let observer = NotificationObserver::new(Arc::new(feed));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let subscription = observer
            .observe(
                &user(),
                Box::new(move |list| {
                    let _ = tx.send(list);
                }),
            )
            .await
            .expect("subscribe succeeds");

        let first = rx.recv().await.expect("initial list");
        assert!(first.is_empty());
        let second = rx.recv().await.expect("changed list");
        assert_eq!(second.len(), 1);
        assert!(!second[0].has_read);
        assert!(rx.recv().await.is_none(), "listener dropped once the feed ends");
        drop(subscription);
    }

    #[tokio::test]
    async fn cancel_stops_delivery() {
        let mut feed = MockNotificationFeed::new();
        feed.expect_subscribe()
            .times(1)
            .return_once(|_| Ok(stream::pending().boxed()));
        let observer = NotificationObserver::new(Arc::new(feed));

        let mut subscription = observer
            .observe(&user(), Box::new(|_| {}))
            .await
            .expect("subscribe succeeds");
        assert_eq!(subscription.state(), SubscriptionState::Subscribed);

        subscription.cancel();
        assert_eq!(subscription.state(), SubscriptionState::Unsubscribed);
        subscription.cancel();
        assert_eq!(subscription.state(), SubscriptionState::Unsubscribed);
    }

    #[tokio::test]
    async fn feed_failure_is_returned() {
        let mut feed = MockNotificationFeed::new();
        feed.expect_subscribe()
            .times(1)
            .return_once(|_| Err(NotificationFeedError::connection("offline")));
        let observer = NotificationObserver::new(Arc::new(feed));

        let error = observer
            .observe(&user(), Box::new(|_| {}))
            .await
            .expect_err("subscribe fails");
        assert_eq!(error, NotificationFeedError::connection("offline"));
    }
}
