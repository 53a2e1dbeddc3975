//! Best-effort fan-out of one notification to many users.
//!
//! Each resolved recipient is mapped back to its backend key through an
//! `(email, full name)` lookup in the same snapshot used for resolution.
//! Recipients without a key are skipped silently, as are recipients whose
//! lookup lands on a key already targeted by this fan-out. All appends run
//! concurrently and are joined; a failed append never cancels its siblings
//! and nothing is rolled back.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use super::ports::NotificationStore;
use super::{DirectoryEntry, DirectorySnapshot, Notification, UserId};

/// Batch-level result of a fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Every recipient received the notification.
    Complete,
    /// Some recipients received it; others were skipped or failed.
    Partial,
    /// Nobody received it although there were recipients.
    Failed,
}

/// Recipient whose append was rejected by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FailedDelivery {
    pub user_id: UserId,
    pub reason: String,
}

/// Per-recipient accounting for one fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    /// Keys of users whose list received the notification.
    pub delivered: Vec<UserId>,
    /// Emails of recipients with no matching directory key, or whose key was
    /// already targeted by another recipient.
    pub skipped: Vec<String>,
    /// Appends the store rejected.
    pub failed: Vec<FailedDelivery>,
}

impl DispatchReport {
    /// Classify the batch.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{DispatchOutcome, DispatchReport, UserId};
    ///
    /// let mut report = DispatchReport::default();
    /// assert_eq!(report.outcome(), DispatchOutcome::Complete);
    ///
    /// report.skipped.push("ghost@x.com".to_owned());
    /// assert_eq!(report.outcome(), DispatchOutcome::Failed);
    ///
    /// report.delivered.push(UserId::new("u-1").expect("key"));
    /// assert_eq!(report.outcome(), DispatchOutcome::Partial);
    /// ```
    #[must_use]
    pub fn outcome(&self) -> DispatchOutcome {
        let shortfall = !self.skipped.is_empty() || !self.failed.is_empty();
        match (shortfall, self.delivered.is_empty()) {
            (false, _) => DispatchOutcome::Complete,
            (true, false) => DispatchOutcome::Partial,
            (true, true) => DispatchOutcome::Failed,
        }
    }

    /// True when every recipient received the notification.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.outcome() == DispatchOutcome::Complete
    }
}

/// Fans notifications out through a [`NotificationStore`].
pub struct NotificationDispatcher<S> {
    store: Arc<S>,
}

impl<S> Clone for NotificationDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> NotificationDispatcher<S>
where
    S: NotificationStore,
{
    /// Create a dispatcher writing through `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Append `notification` to every recipient's list.
    pub async fn dispatch(
        &self,
        snapshot: &DirectorySnapshot,
        recipients: &[DirectoryEntry],
        notification: &Notification,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        let mut targets: Vec<UserId> = Vec::with_capacity(recipients.len());
        let mut seen: HashSet<&UserId> = HashSet::with_capacity(recipients.len());

        for recipient in recipients {
            let full_name = recipient.full_name();
            match snapshot.identifier_for(&recipient.email, &full_name) {
                Some(id) if seen.insert(id) => targets.push(id.clone()),
                Some(id) => {
                    warn!(
                        email = %recipient.email,
                        user_id = %id,
                        "recipient shares a directory key with an earlier recipient; skipping"
                    );
                    report.skipped.push(recipient.email.clone());
                }
                None => {
                    warn!(
                        email = %recipient.email,
                        name = %full_name,
                        "recipient has no directory key; skipping"
                    );
                    report.skipped.push(recipient.email.clone());
                }
            }
        }

        let writes = targets.into_iter().map(|user_id| async move {
            let result = self.store.append(&user_id, notification).await;
            (user_id, result)
        });

        for (user_id, result) in join_all(writes).await {
            match result {
                Ok(_) => report.delivered.push(user_id),
                Err(error) => {
                    warn!(user_id = %user_id, error = %error, "notification append failed");
                    report.failed.push(FailedDelivery {
                        user_id,
                        reason: error.to_string(),
                    });
                }
            }
        }

        info!(
            kind = ?notification.kind(),
            delivered = report.delivered.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            outcome = ?report.outcome(),
            "notification fan-out settled"
        );
        report
    }
}

#[cfg(test)]
#[path = "notification_dispatcher_tests.rs"]
mod tests;
