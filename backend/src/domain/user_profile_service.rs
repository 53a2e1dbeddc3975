//! Directory profile lookups backed by [`ProfileCache`].

use std::sync::Arc;

use async_trait::async_trait;

use super::ports::{UserDirectory, UserProfileQuery};
use super::{DirectoryEntry, DirectoryRecord, Error, ProfileCache, UserId};

/// Profile service implementing [`UserProfileQuery`].
pub struct UserProfileService<D> {
    directory: Arc<D>,
    cache: Arc<ProfileCache>,
}

impl<D> Clone for UserProfileService<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<D> UserProfileService<D>
where
    D: UserDirectory,
{
    pub fn new(directory: Arc<D>, cache: Arc<ProfileCache>) -> Self {
        Self { directory, cache }
    }
}

#[async_trait]
impl<D> UserProfileQuery for UserProfileService<D>
where
    D: UserDirectory,
{
    async fn profile(&self, user_id: &UserId) -> Result<DirectoryEntry, Error> {
        if let Some(entry) = self.cache.get(user_id) {
            return Ok(entry);
        }
        let record = self
            .directory
            .find_by_id(user_id)
            .await
            .map_err(Error::from)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;
        self.cache.insert(record.id.clone(), record.entry.clone());
        Ok(record.entry)
    }

    async fn find_by_email(&self, email: &str) -> Result<DirectoryRecord, Error> {
        let snapshot = self
            .directory
            .snapshot()
            .await
            .map_err(Error::from)?;
        let record = snapshot
            .find_by_email(email)
            .cloned()
            .ok_or_else(|| Error::not_found("no directory user with that email"))?;
        self.cache.insert(record.id.clone(), record.entry.clone());
        Ok(record)
    }
}
