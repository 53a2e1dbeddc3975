//! Recipient resolution: which directory users receive a given event.
//!
//! Resolution is a pure function of one [`DirectorySnapshot`] and the event.
//! The service reads the snapshot once and shares it with the dispatcher so
//! identifier lookup sees the same directory state.
//!
//! | Event                   | Recipients                                         |
//! |-------------------------|----------------------------------------------------|
//! | `Notice`                | every entry with a non-empty full name             |
//! | `OrderPlaced`           | entries whose role is `Coop<type>` for an item type |
//! | `OrderUpdated`          | first entry whose full name equals the client      |
//! | `SpecialRequestUpdated` | first entry whose full name equals the requester   |

use super::{DirectoryEntry, DirectorySnapshot, NotificationEvent};

/// Stateless resolver over directory snapshots.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecipientResolver;

impl RecipientResolver {
    /// Entries that should receive `event`, cloned out of `snapshot` in
    /// directory order.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{
    ///     DirectoryEntry, DirectoryRecord, DirectorySnapshot, NotificationEvent, OrderItem,
    ///     OrderSnapshot, RecipientResolver, Role, UserId,
    /// };
    ///
    /// let coop = DirectoryEntry::new("a@x.com", "A", "B", Role::new("CoopCoffee")).expect("entry");
    /// let snapshot = DirectorySnapshot::new(vec![DirectoryRecord::new(
    ///     UserId::new("u-1").expect("key"),
    ///     coop.clone(),
    /// )]);
    /// let order = OrderSnapshot {
    ///     order_id: "o-1".to_owned(),
    ///     client: "C D".to_owned(),
    ///     status: "Pending".to_owned(),
    ///     date: String::new(),
    ///     items: vec![OrderItem {
    ///         product_type: "Coffee".to_owned(),
    ///         product_name: "Robusta".to_owned(),
    ///         quantity: 1.0,
    ///         price: 0.0,
    ///     }],
    /// };
    ///
    /// let recipients = RecipientResolver.resolve(&snapshot, &NotificationEvent::OrderPlaced(order));
    /// assert_eq!(recipients, vec![coop]);
    /// ```
    #[must_use]
    pub fn resolve(
        &self,
        snapshot: &DirectorySnapshot,
        event: &NotificationEvent,
    ) -> Vec<DirectoryEntry> {
        match event {
            NotificationEvent::Notice(_) => snapshot
                .entries()
                .filter(|entry| !entry.full_name().is_empty())
                .cloned()
                .collect(),
            NotificationEvent::OrderPlaced(order) => {
                let product_types = order.product_types();
                snapshot
                    .entries()
                    .filter(|entry| {
                        product_types
                            .iter()
                            .any(|product_type| entry.role.handles_product(product_type))
                    })
                    .cloned()
                    .collect()
            }
            NotificationEvent::OrderUpdated(order) => named(snapshot, &order.client),
            NotificationEvent::SpecialRequestUpdated(request) => named(snapshot, &request.requester),
        }
    }
}

fn named(snapshot: &DirectorySnapshot, full_name: &str) -> Vec<DirectoryEntry> {
    snapshot
        .entries()
        .find(|entry| entry.full_name() == full_name)
        .cloned()
        .into_iter()
        .collect()
}
