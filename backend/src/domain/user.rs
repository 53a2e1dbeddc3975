//! Directory users: identifiers, roles and profile entries.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Characters the realtime tree forbids inside a path segment.
const FORBIDDEN_KEY_CHARS: [char; 6] = ['.', '#', '$', '[', ']', '/'];

/// Role prefix shared by every cooperative role; the suffix names the
/// product type the cooperative handles (for example `CoopCoffee`).
pub const COOP_ROLE_PREFIX: &str = "Coop";

/// Validation errors for directory primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// Identifier had surrounding whitespace or a forbidden key character.
    #[error("user id must be a trimmed key without . # $ [ ] or /")]
    InvalidId,
    /// Email was blank.
    #[error("email must not be empty")]
    EmptyEmail,
}

/// Backend key of a directory record.
///
/// # Examples
/// ```
/// use backend::domain::UserId;
///
/// let id = UserId::new("u-1").expect("valid key");
/// assert_eq!(id.as_ref(), "u-1");
/// assert!(UserId::new("users/u-1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "u-7f3c")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id || id.contains(FORBIDDEN_KEY_CHARS) {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Raw role string as stored in the directory.
///
/// Matching is exact on the stored string: `CoopCoffee` handles `Coffee`
/// but not `coffee`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "CoopCoffee")]
pub struct Role(String);

impl Role {
    /// Wrap a raw role string.
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// Borrow the stored role string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// True when this role is the cooperative for `product_type`.
    #[must_use]
    pub fn handles_product(&self, product_type: &str) -> bool {
        self.0
            .strip_prefix(COOP_ROLE_PREFIX)
            .is_some_and(|suffix| suffix == product_type)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user record from the directory.
///
/// ## Invariants
/// - `email` is never blank once constructed through [`DirectoryEntry::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub email: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl DirectoryEntry {
    /// Construct an entry with no ancillary profile fields.
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: Role,
    ) -> Result<Self, UserValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(Self {
            email,
            first_name: first_name.into(),
            last_name: last_name.into(),
            role,
            contact: None,
            address: None,
            profile_picture: None,
        })
    }

    /// Display name used for recipient matching: `"<first> <last>"`, with an
    /// empty half omitted.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{DirectoryEntry, Role};
    ///
    /// let entry = DirectoryEntry::new("a@x.com", "A", "B", Role::new("Client")).expect("entry");
    /// assert_eq!(entry.full_name(), "A B");
    /// ```
    #[must_use]
    pub fn full_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        match (first.is_empty(), last.is_empty()) {
            (false, false) => format!("{first} {last}"),
            (false, true) => first.to_owned(),
            (true, false) => last.to_owned(),
            (true, true) => String::new(),
        }
    }

    /// True when both email and full name equal the given values exactly.
    #[must_use]
    pub fn matches_identity(&self, email: &str, full_name: &str) -> bool {
        self.email == email && self.full_name() == full_name
    }
}
