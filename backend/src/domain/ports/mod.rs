//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`UserDirectory`], [`NotificationStore`],
//! [`NotificationFeed`]) are implemented by outbound adapters. Driving ports
//! ([`NotificationCommand`], [`NotificationQuery`],
//! [`NotificationSubscriptions`], [`UserProfileQuery`]) are what inbound
//! adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod notification_command;
mod notification_feed;
mod notification_query;
mod notification_store;
mod notification_subscriptions;
mod user_directory;
mod user_profile_query;

pub use notification_command::{NotificationCommand, PublishNotificationRequest};
#[cfg(test)]
pub use notification_feed::MockNotificationFeed;
pub use notification_feed::{NotificationChildStream, NotificationFeed, NotificationFeedError};
pub use notification_query::NotificationQuery;
#[cfg(test)]
pub use notification_store::MockNotificationStore;
pub use notification_store::{NotificationChild, NotificationStore, NotificationStoreError};
pub use notification_subscriptions::{NotificationListener, NotificationSubscriptions};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserDirectory, UserDirectoryError};
pub use user_profile_query::UserProfileQuery;
