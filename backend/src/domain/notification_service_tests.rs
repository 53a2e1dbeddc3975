//! Tests for the notification service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{
    MockNotificationFeed, MockNotificationStore, MockUserDirectory, NotificationChild,
    NotificationFeedError, NotificationStoreError, UserDirectoryError,
};
use crate::domain::{
    DirectoryEntry, DirectoryRecord, DirectorySnapshot, DispatchOutcome, ErrorCode,
    NotificationEvent, OrderItem, OrderSnapshot, Role, UserId,
};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use rstest::{fixture, rstest};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 15, 30)
        .single()
        .expect("valid fixture timestamp")
        + Duration::microseconds(123_456)
}

type Service = NotificationService<MockUserDirectory, MockNotificationStore, MockNotificationFeed>;

fn make_service(
    directory: MockUserDirectory,
    store: MockNotificationStore,
    now: DateTime<Utc>,
) -> Service {
    NotificationService::new(
        Arc::new(directory),
        Arc::new(store),
        Arc::new(MockNotificationFeed::new()),
        Arc::new(FixtureClock { utc_now: now }),
    )
}

fn session() -> UserSession {
    UserSession::new(UserId::new("u-self").expect("fixture key"))
}

fn coffee_order() -> OrderSnapshot {
    OrderSnapshot {
        order_id: "o-7".to_owned(),
        client: "Cara Dela".to_owned(),
        status: "Pending".to_owned(),
        date: "2024-05-01".to_owned(),
        items: vec![OrderItem {
            product_type: "Coffee".to_owned(),
            product_name: "Arabica".to_owned(),
            quantity: 3.0,
            price: 450.0,
        }],
    }
}

fn directory_with_coffee_coop() -> MockUserDirectory {
    let entry = DirectoryEntry::new("a@x.com", "A", "B", Role::new("CoopCoffee"))
        .expect("fixture entry");
    let snapshot = DirectorySnapshot::new(vec![DirectoryRecord::new(
        UserId::new("u-coop").expect("fixture key"),
        entry,
    )]);
    let mut directory = MockUserDirectory::new();
    directory
        .expect_snapshot()
        .times(1)
        .return_once(move || Ok(snapshot));
    directory
}

fn stored(notification: &Notification, key: &str) -> NotificationChild {
    NotificationChild::new(key, notification.to_value().expect("serialisable"))
}

fn notification_at(at: DateTime<Utc>, sender: &str, has_read: bool) -> Notification {
    let mut notification = Notification::new(
        at,
        sender,
        "Order placed",
        NotificationEvent::OrderPlaced(coffee_order()),
    );
    notification.has_read = has_read;
    notification
}

#[rstest]
#[tokio::test]
async fn publish_resolves_and_appends_with_clock_timestamp(now: DateTime<Utc>) {
    let mut store = MockNotificationStore::new();
    store
        .expect_append()
        .withf(move |user_id, notification| {
            user_id.as_ref() == "u-coop"
                && notification.timestamp.timestamp_millis() == now.timestamp_millis()
                && notification.sender == "Cara Dela"
                && !notification.has_read
        })
        .times(1)
        .returning(|_, _| Ok("-push".to_owned()));
    let service = make_service(directory_with_coffee_coop(), store, now);

    let report = service
        .publish(PublishNotificationRequest {
            sender: "Cara Dela".to_owned(),
            message: "New order".to_owned(),
            event: NotificationEvent::OrderPlaced(coffee_order()),
        })
        .await
        .expect("publish succeeds");

    assert_eq!(report.outcome(), DispatchOutcome::Complete);
    assert_eq!(report.delivered.len(), 1);
}

#[rstest]
#[case(UserDirectoryError::connection("timeout"), ErrorCode::ServiceUnavailable)]
#[case(UserDirectoryError::read("bad payload"), ErrorCode::InternalError)]
#[tokio::test]
async fn publish_aborts_when_directory_read_fails(
    now: DateTime<Utc>,
    #[case] failure: UserDirectoryError,
    #[case] expected: ErrorCode,
) {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_snapshot()
        .times(1)
        .return_once(move || Err(failure));
    let mut store = MockNotificationStore::new();
    store.expect_append().never();
    let service = make_service(directory, store, now);

    let error = service
        .publish(PublishNotificationRequest {
            sender: "Cara Dela".to_owned(),
            message: "New order".to_owned(),
            event: NotificationEvent::OrderPlaced(coffee_order()),
        })
        .await
        .expect_err("publish fails");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn mark_as_read_targets_own_list(now: DateTime<Utc>) {
    let key = NotificationKey::new(now, "Cara Dela");
    let expected = key.clone();
    let mut store = MockNotificationStore::new();
    store
        .expect_mark_read()
        .withf(move |user_id, sent| user_id.as_ref() == "u-self" && *sent == expected)
        .times(2)
        .returning(|_, _| Ok(1));
    let service = make_service(MockUserDirectory::new(), store, now);

    service
        .mark_as_read(&session(), &key)
        .await
        .expect("first mark succeeds");
    service
        .mark_as_read(&session(), &key)
        .await
        .expect("second mark is idempotent");
}

#[rstest]
#[tokio::test]
async fn mark_as_read_reports_missing_notification(now: DateTime<Utc>) {
    let mut store = MockNotificationStore::new();
    store.expect_mark_read().times(1).returning(|_, _| Ok(0));
    let service = make_service(MockUserDirectory::new(), store, now);

    let error = service
        .mark_as_read(&session(), &NotificationKey::new(now, "Nobody"))
        .await
        .expect_err("nothing matched");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn mark_all_as_read_returns_changed_count(now: DateTime<Utc>) {
    let mut store = MockNotificationStore::new();
    store
        .expect_mark_all_read()
        .withf(|user_id| user_id.as_ref() == "u-self")
        .times(1)
        .returning(|_| Ok(4));
    let service = make_service(MockUserDirectory::new(), store, now);

    let changed = service
        .mark_all_as_read(&session())
        .await
        .expect("mark all succeeds");

    assert_eq!(changed, 4);
}

#[rstest]
#[tokio::test]
async fn list_is_newest_first_and_skips_malformed(now: DateTime<Utc>) {
    let older = notification_at(now - Duration::hours(2), "Older", true);
    let newer = notification_at(now, "Newer", false);
    let children = vec![
        stored(&older, "-a"),
        NotificationChild::new("-b", serde_json::json!({ "sender": "broken" })),
        stored(&newer, "-c"),
    ];
    let mut store = MockNotificationStore::new();
    store
        .expect_list()
        .times(2)
        .returning(move |_| Ok(children.clone()));
    let service = make_service(MockUserDirectory::new(), store, now);

    let listed = service.list(&session()).await.expect("list succeeds");
    let senders: Vec<&str> = listed.iter().map(|n| n.sender.as_str()).collect();
    assert_eq!(senders, vec!["Newer", "Older"]);

    let unread = service
        .unread_count(&session())
        .await
        .expect("count succeeds");
    assert_eq!(unread, 1);
}

#[rstest]
#[tokio::test]
async fn list_maps_store_outage(now: DateTime<Utc>) {
    let mut store = MockNotificationStore::new();
    store
        .expect_list()
        .times(1)
        .returning(|_| Err(NotificationStoreError::connection("down")));
    let service = make_service(MockUserDirectory::new(), store, now);

    let error = service.list(&session()).await.expect_err("list fails");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn observe_maps_feed_failure(now: DateTime<Utc>) {
    let mut feed = MockNotificationFeed::new();
    feed.expect_subscribe()
        .times(1)
        .return_once(|_| Err(NotificationFeedError::connection("down")));
    let service = NotificationService::new(
        Arc::new(MockUserDirectory::new()),
        Arc::new(MockNotificationStore::new()),
        Arc::new(feed),
        Arc::new(FixtureClock { utc_now: now }),
    );

    let error = service
        .observe(&session(), Box::new(|_| {}))
        .await
        .expect_err("observe fails");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
